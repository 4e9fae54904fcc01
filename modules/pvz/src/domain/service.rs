use std::sync::Arc;

use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::config::PvzConfig;
use crate::contract::model::{
    Point, PointReport, Product, ProductType, Reception, ReportQuery,
};
use crate::domain::error::DomainError;
use crate::domain::ports::Counters;
use crate::domain::repo::{LedgerStore, StoreError};
use crate::domain::report::{Pagination, DEFAULT_LIMIT, DEFAULT_PAGE};

/// Domain service for the reception ledger.
/// Depends only on the store port and the counters, not on infra types.
#[derive(Clone)]
pub struct Service {
    store: Arc<dyn LedgerStore>,
    counters: Counters,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub default_page: i64,
    pub default_limit: i64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_page: DEFAULT_PAGE,
            default_limit: DEFAULT_LIMIT,
        }
    }
}

impl From<&PvzConfig> for ServiceConfig {
    fn from(cfg: &PvzConfig) -> Self {
        Self {
            default_page: cfg.default_page,
            default_limit: cfg.default_limit,
        }
    }
}

/// Log an unexpected store failure and hide it behind `Unavailable`.
fn unavailable(operation: &'static str, err: StoreError) -> DomainError {
    error!(operation, error = %err, "storage failure");
    DomainError::unavailable(operation)
}

impl Service {
    pub fn new(store: Arc<dyn LedgerStore>, counters: Counters, config: ServiceConfig) -> Self {
        Self {
            store,
            counters,
            config,
        }
    }

    #[instrument(name = "pvz.service.create_point", skip(self), fields(city = %city))]
    pub async fn create_point(&self, city: &str) -> Result<Point, DomainError> {
        info!("Creating point");

        let point = self.store.create_point(city).await.map_err(|e| match e {
            StoreError::NotFound => DomainError::city_not_found(city),
            other => unavailable("create_point", other),
        })?;

        self.counters.points_created.increment();
        info!("Successfully created point with id={}", point.id);
        Ok(point)
    }

    #[instrument(name = "pvz.service.list_points", skip(self))]
    pub async fn list_points(&self) -> Result<Vec<Point>, DomainError> {
        debug!("Listing points");

        let points = self
            .store
            .list_points()
            .await
            .map_err(|e| unavailable("list_points", e))?;

        debug!("Successfully listed {} points", points.len());
        Ok(points)
    }

    #[instrument(
        name = "pvz.service.list_points_extended",
        skip(self, query),
        fields(page = ?query.page, limit = ?query.limit)
    )]
    pub async fn list_points_extended(
        &self,
        query: ReportQuery,
    ) -> Result<Vec<PointReport>, DomainError> {
        let window = Pagination::normalize(
            query.page,
            query.limit,
            self.config.default_page,
            self.config.default_limit,
        );
        debug!(
            page = window.page,
            limit = window.limit,
            offset = window.offset(),
            "Building point report"
        );

        let report = self
            .store
            .list_points_extended(&query.filter, window.offset(), window.limit)
            .await
            .map_err(|e| unavailable("list_points_extended", e))?;

        debug!("Successfully built report for {} points", report.len());
        Ok(report)
    }

    #[instrument(name = "pvz.service.open_reception", skip(self), fields(point_id = %point_id))]
    pub async fn open_reception(&self, point_id: Uuid) -> Result<Reception, DomainError> {
        info!("Opening reception");

        let reception = self
            .store
            .create_reception(point_id)
            .await
            .map_err(|e| match e {
                StoreError::AlreadyExists => DomainError::reception_already_opened(point_id),
                StoreError::NotFound => DomainError::point_not_found(point_id),
                other => unavailable("open_reception", other),
            })?;

        self.counters.receptions_created.increment();
        info!("Successfully opened reception with id={}", reception.id);
        Ok(reception)
    }

    #[instrument(name = "pvz.service.get_active_reception", skip(self), fields(point_id = %point_id))]
    pub async fn get_active_reception(&self, point_id: Uuid) -> Result<Reception, DomainError> {
        let reception_id = self.active_reception_id(point_id, "get_active_reception").await?;
        self.store
            .get_reception(reception_id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => DomainError::active_reception_not_found(point_id),
                other => unavailable("get_active_reception", other),
            })
    }

    #[instrument(name = "pvz.service.close_last_reception", skip(self), fields(point_id = %point_id))]
    pub async fn close_last_reception(&self, point_id: Uuid) -> Result<Reception, DomainError> {
        info!("Closing reception");

        let reception_id = self.active_reception_id(point_id, "close_last_reception").await?;
        let reception = self
            .store
            .close_reception(reception_id)
            .await
            .map_err(|e| match e {
                // Closed by a concurrent caller between lookup and update.
                StoreError::NotFound => DomainError::active_reception_not_found(point_id),
                other => unavailable("close_last_reception", other),
            })?;

        info!("Successfully closed reception with id={}", reception.id);
        Ok(reception)
    }

    #[instrument(
        name = "pvz.service.add_product",
        skip(self),
        fields(point_id = %point_id, product_type = %product_type)
    )]
    pub async fn add_product(
        &self,
        point_id: Uuid,
        product_type: ProductType,
    ) -> Result<Product, DomainError> {
        info!("Adding product");

        let reception_id = self.active_reception_id(point_id, "add_product").await?;
        let product = self
            .store
            .create_product(reception_id, product_type)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => DomainError::active_reception_not_found(point_id),
                other => unavailable("add_product", other),
            })?;

        self.counters.products_created.increment();
        info!(
            reception_id = %reception_id,
            "Successfully added product with id={}", product.id
        );
        Ok(product)
    }

    #[instrument(name = "pvz.service.remove_last_product", skip(self), fields(point_id = %point_id))]
    pub async fn remove_last_product(&self, point_id: Uuid) -> Result<(), DomainError> {
        info!("Removing last product");

        let reception_id = self.active_reception_id(point_id, "remove_last_product").await?;
        let product_id = self
            .store
            .get_latest_product_id(reception_id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => DomainError::product_not_found(reception_id),
                other => unavailable("remove_last_product", other),
            })?;
        debug!(product_id = %product_id, "Resolved latest product");

        self.store
            .delete_product(product_id)
            .await
            .map_err(|e| match e {
                StoreError::NoRowsDeleted | StoreError::NotFound => {
                    DomainError::product_already_deleted(product_id)
                }
                other => unavailable("remove_last_product", other),
            })?;

        info!("Successfully removed product with id={}", product_id);
        Ok(())
    }

    async fn active_reception_id(
        &self,
        point_id: Uuid,
        operation: &'static str,
    ) -> Result<Uuid, DomainError> {
        let id = self
            .store
            .get_active_reception_id(point_id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => DomainError::active_reception_not_found(point_id),
                other => unavailable(operation, other),
            })?;
        debug!(reception_id = %id, "Resolved active reception");
        Ok(id)
    }
}
