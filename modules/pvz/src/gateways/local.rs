use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::contract::{
    client::PvzApi,
    error::PvzError,
    model::{DeleteOutcome, Point, PointReport, Product, ProductType, Reception, ReportQuery, Role},
};
use crate::domain::access::{authorize, Operation};
use crate::domain::error::{Disposition, DomainError};
use crate::domain::service::Service;

/// Local implementation of the PvzApi trait that delegates to the domain service
pub struct PvzLocalClient {
    service: Arc<Service>,
}

impl PvzLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

fn gate(operation: Operation, caller: Role) -> Result<(), PvzError> {
    authorize(operation, caller).map_err(|denied| {
        warn!(
            operation = denied.operation,
            required = %denied.required,
            actual = %denied.actual,
            "access denied"
        );
        PvzError::forbidden(denied.operation, denied.required)
    })
}

#[async_trait]
impl PvzApi for PvzLocalClient {
    async fn create_point(&self, caller: Role, city: &str) -> Result<Point, PvzError> {
        gate(Operation::CreatePoint, caller)?;
        self.service.create_point(city).await.map_err(Into::into)
    }

    async fn list_points(&self) -> Result<Vec<Point>, PvzError> {
        self.service.list_points().await.map_err(Into::into)
    }

    async fn list_points_extended(
        &self,
        query: ReportQuery,
    ) -> Result<Vec<PointReport>, PvzError> {
        self.service
            .list_points_extended(query)
            .await
            .map_err(Into::into)
    }

    async fn open_reception(&self, caller: Role, point_id: Uuid) -> Result<Reception, PvzError> {
        gate(Operation::OpenReception, caller)?;
        self.service
            .open_reception(point_id)
            .await
            .map_err(Into::into)
    }

    async fn close_last_reception(
        &self,
        caller: Role,
        point_id: Uuid,
    ) -> Result<Reception, PvzError> {
        gate(Operation::CloseLastReception, caller)?;
        self.service
            .close_last_reception(point_id)
            .await
            .map_err(Into::into)
    }

    async fn add_product(
        &self,
        caller: Role,
        point_id: Uuid,
        product_type: ProductType,
    ) -> Result<Product, PvzError> {
        gate(Operation::AddProduct, caller)?;
        self.service
            .add_product(point_id, product_type)
            .await
            .map_err(Into::into)
    }

    async fn delete_last_product(
        &self,
        caller: Role,
        point_id: Uuid,
    ) -> Result<DeleteOutcome, PvzError> {
        gate(Operation::RemoveLastProduct, caller)?;
        match self.service.remove_last_product(point_id).await {
            Ok(()) => Ok(DeleteOutcome::Deleted),
            Err(e) => map_delete_error(e),
        }
    }
}

/// A lost delete race is success-like for the caller.
fn map_delete_error(e: DomainError) -> Result<DeleteOutcome, PvzError> {
    if e.disposition() == Disposition::Benign {
        debug!(error = %e, "treating benign delete error as success");
        return Ok(DeleteOutcome::AlreadyDeleted);
    }
    Err(e.into())
}
