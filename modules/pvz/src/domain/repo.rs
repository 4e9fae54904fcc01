use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::contract::model::{
    Point, PointReport, Product, ProductType, Reception, ReportFilter, Role, User,
};

/// Signals a store adapter reports back to the domain. Everything that is not
/// one of the named outcomes is an `Internal` failure.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("not found")]
    NotFound,
    #[error("already exists")]
    AlreadyExists,
    #[error("no rows deleted")]
    NoRowsDeleted,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Port for pickup point persistence.
#[async_trait]
pub trait PointRepository: Send + Sync {
    /// Insert a point for a city from the catalogue. `NotFound` if the city
    /// is not in the catalogue.
    async fn create_point(&self, city: &str) -> StoreResult<Point>;
    /// All points ordered by `(created_at, id)`.
    async fn list_points(&self) -> StoreResult<Vec<Point>>;
    /// One page of points with their receptions (filtered by creation time)
    /// and products nested under each reception.
    async fn list_points_extended(
        &self,
        filter: &ReportFilter,
        offset: u64,
        limit: u64,
    ) -> StoreResult<Vec<PointReport>>;
}

/// Port for reception persistence.
#[async_trait]
pub trait ReceptionRepository: Send + Sync {
    /// Atomic insert-if-no-active: `AlreadyExists` when the point already has
    /// a reception in progress, `NotFound` when the point does not exist.
    async fn create_reception(&self, point_id: Uuid) -> StoreResult<Reception>;
    async fn get_active_reception_id(&self, point_id: Uuid) -> StoreResult<Uuid>;
    /// Close a reception that is still in progress. `NotFound` if there is
    /// no such reception in progress.
    async fn close_reception(&self, reception_id: Uuid) -> StoreResult<Reception>;
    async fn get_reception(&self, reception_id: Uuid) -> StoreResult<Reception>;
}

/// Port for product persistence.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a product; the store assigns `id`, `created_at` and `seq`.
    async fn create_product(
        &self,
        reception_id: Uuid,
        product_type: ProductType,
    ) -> StoreResult<Product>;
    /// Id of the product with the greatest `(created_at, seq)`.
    async fn get_latest_product_id(&self, reception_id: Uuid) -> StoreResult<Uuid>;
    /// `NoRowsDeleted` when nothing matched.
    async fn delete_product(&self, product_id: Uuid) -> StoreResult<()>;
}

/// Port for user accounts. Owned by the authentication collaborator.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, email: &str, password_hash: &str, role: Role)
        -> StoreResult<User>;
    async fn get_user_by_email(&self, email: &str) -> StoreResult<User>;
}

/// Everything the ledger needs from a backing store.
pub trait LedgerStore:
    PointRepository + ReceptionRepository + ProductRepository + UserRepository
{
}

impl<T> LedgerStore for T where
    T: PointRepository + ReceptionRepository + ProductRepository + UserRepository
{
}
