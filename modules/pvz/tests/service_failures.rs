//! Storage failures and unknown inputs seen through the service.

mod common;

use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use tracing_test::traced_test;
use uuid::Uuid;

use pvz::contract::model::{
    Point, PointReport, Product, ProductType, Reception, ReportFilter, ReportQuery, Role, User,
};
use pvz::domain::error::{Disposition, DomainError};
use pvz::domain::repo::{
    PointRepository, ProductRepository, ReceptionRepository, StoreError, StoreResult,
    UserRepository,
};
use pvz::domain::service::{Service, ServiceConfig};
use pvz::infra::metrics::AtomicCounters;

use common::harnesses;

fn broken() -> StoreError {
    StoreError::Internal(anyhow!("connection refused: 10.0.0.7:5432"))
}

// Mock store whose every call fails at the storage layer
struct BrokenStore;

#[async_trait]
impl PointRepository for BrokenStore {
    async fn create_point(&self, _city: &str) -> StoreResult<Point> {
        Err(broken())
    }
    async fn list_points(&self) -> StoreResult<Vec<Point>> {
        Err(broken())
    }
    async fn list_points_extended(
        &self,
        _filter: &ReportFilter,
        _offset: u64,
        _limit: u64,
    ) -> StoreResult<Vec<PointReport>> {
        Err(broken())
    }
}

#[async_trait]
impl ReceptionRepository for BrokenStore {
    async fn create_reception(&self, _point_id: Uuid) -> StoreResult<Reception> {
        Err(broken())
    }
    async fn get_active_reception_id(&self, _point_id: Uuid) -> StoreResult<Uuid> {
        Err(broken())
    }
    async fn close_reception(&self, _reception_id: Uuid) -> StoreResult<Reception> {
        Err(broken())
    }
    async fn get_reception(&self, _reception_id: Uuid) -> StoreResult<Reception> {
        Err(broken())
    }
}

#[async_trait]
impl ProductRepository for BrokenStore {
    async fn create_product(
        &self,
        _reception_id: Uuid,
        _product_type: ProductType,
    ) -> StoreResult<Product> {
        Err(broken())
    }
    async fn get_latest_product_id(&self, _reception_id: Uuid) -> StoreResult<Uuid> {
        Err(broken())
    }
    async fn delete_product(&self, _product_id: Uuid) -> StoreResult<()> {
        Err(broken())
    }
}

#[async_trait]
impl UserRepository for BrokenStore {
    async fn create_user(&self, _email: &str, _hash: &str, _role: Role) -> StoreResult<User> {
        Err(broken())
    }
    async fn get_user_by_email(&self, _email: &str) -> StoreResult<User> {
        Err(broken())
    }
}

fn broken_service() -> (Service, AtomicCounters) {
    let counters = AtomicCounters::new();
    let service = Service::new(
        Arc::new(BrokenStore),
        counters.counters(),
        ServiceConfig::default(),
    );
    (service, counters)
}

#[traced_test]
#[tokio::test]
async fn storage_failures_become_unavailable() {
    let (service, counters) = broken_service();
    let point_id = Uuid::new_v4();

    let results = [
        ("create_point", service.create_point("Москва").await.map(|_| ())),
        ("list_points", service.list_points().await.map(|_| ())),
        (
            "list_points_extended",
            service
                .list_points_extended(ReportQuery::default())
                .await
                .map(|_| ()),
        ),
        ("open_reception", service.open_reception(point_id).await.map(|_| ())),
        (
            "close_last_reception",
            service.close_last_reception(point_id).await.map(|_| ()),
        ),
        (
            "add_product",
            service
                .add_product(point_id, ProductType::Shoes)
                .await
                .map(|_| ()),
        ),
        ("remove_last_product", service.remove_last_product(point_id).await),
    ];

    for (operation, result) in results {
        let err = result.unwrap_err();
        assert_eq!(err, DomainError::unavailable(operation));
        assert_eq!(err.disposition(), Disposition::Internal);
        assert!(!err.to_string().contains("10.0.0.7"));
    }

    assert_eq!(counters.points_created.get(), 0);
    assert_eq!(counters.receptions_created.get(), 0);
    assert_eq!(counters.products_created.get(), 0);
    assert!(logs_contain("storage failure"));
    assert!(logs_contain("connection refused"));
}

#[tokio::test]
async fn unknown_city_is_rejected_by_every_store() {
    for h in harnesses().await {
        let err = h.service.create_point("Лондон").await.unwrap_err();
        assert_eq!(err, DomainError::city_not_found("Лондон"), "{}", h.name);
        assert_eq!(h.counters.points_created.get(), 0);
        assert!(h.service.list_points().await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn users_are_unique_by_email_in_every_store() {
    for h in harnesses().await {
        let user = h
            .store
            .create_user("worker@pvz.ru", "$argon2id$stub", Role::Employee)
            .await
            .unwrap();
        assert!(
            matches!(
                h.store
                    .create_user("worker@pvz.ru", "$argon2id$other", Role::Moderator)
                    .await,
                Err(StoreError::AlreadyExists)
            ),
            "{}",
            h.name
        );
        assert_eq!(h.store.get_user_by_email("worker@pvz.ru").await.unwrap(), user);
        assert!(matches!(
            h.store.get_user_by_email("ghost@pvz.ru").await,
            Err(StoreError::NotFound)
        ));
    }
}
