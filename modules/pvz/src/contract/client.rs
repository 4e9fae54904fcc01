use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::error::PvzError;
use crate::contract::model::{
    DeleteOutcome, Point, PointReport, Product, ProductType, Reception, ReportQuery, Role,
};

/// Public API trait for the pvz module that other modules can use.
///
/// Mutating calls take the caller's role explicitly; the implementation
/// rejects callers whose role does not match the operation.
#[async_trait]
pub trait PvzApi: Send + Sync {
    /// Create a pickup point (moderators only)
    async fn create_point(&self, caller: Role, city: &str) -> Result<Point, PvzError>;

    /// All pickup points
    async fn list_points(&self) -> Result<Vec<Point>, PvzError>;

    /// Paged report of points with nested receptions and products
    async fn list_points_extended(&self, query: ReportQuery)
        -> Result<Vec<PointReport>, PvzError>;

    /// Open a reception at a point (employees only)
    async fn open_reception(&self, caller: Role, point_id: Uuid) -> Result<Reception, PvzError>;

    /// Close the reception in progress at a point (employees only)
    async fn close_last_reception(
        &self,
        caller: Role,
        point_id: Uuid,
    ) -> Result<Reception, PvzError>;

    /// Register a product in the active reception (employees only)
    async fn add_product(
        &self,
        caller: Role,
        point_id: Uuid,
        product_type: ProductType,
    ) -> Result<Product, PvzError>;

    /// Remove the most recent product of the active reception (employees only)
    async fn delete_last_product(
        &self,
        caller: Role,
        point_id: Uuid,
    ) -> Result<DeleteOutcome, PvzError>;
}
