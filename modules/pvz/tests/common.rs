#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use pvz::domain::ports::ManualClock;
use pvz::domain::repo::LedgerStore;
use pvz::domain::service::{Service, ServiceConfig};
use pvz::infra::metrics::AtomicCounters;
use pvz::infra::storage::migrations::Migrator;
use pvz::infra::storage::{InMemoryLedgerStore, SeaOrmLedgerStore};

/// A service wired to one store, plus handles to the store, the counters and
/// the clock so tests can inspect and steer them.
pub struct Harness {
    pub name: &'static str,
    pub service: Arc<Service>,
    pub store: Arc<dyn LedgerStore>,
    pub counters: AtomicCounters,
    pub clock: Arc<ManualClock>,
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 1, 9, 0, 0).unwrap()
}

fn wire(name: &'static str, store: Arc<dyn LedgerStore>, clock: Arc<ManualClock>) -> Harness {
    let counters = AtomicCounters::new();
    let service = Arc::new(Service::new(
        store.clone(),
        counters.counters(),
        ServiceConfig::default(),
    ));
    Harness {
        name,
        service,
        store,
        counters,
        clock,
    }
}

pub fn memory_harness() -> Harness {
    let clock = Arc::new(ManualClock::new(start_time()));
    let store = Arc::new(InMemoryLedgerStore::new(clock.clone()));
    wire("memory", store, clock)
}

/// Create a fresh test database for each test
pub async fn create_test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).sqlx_logging(false);
    let db = Database::connect(opts)
        .await
        .expect("Failed to connect to test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub async fn sqlite_harness() -> Harness {
    let clock = Arc::new(ManualClock::new(start_time()));
    let db = create_test_db().await;
    let store = Arc::new(SeaOrmLedgerStore::new(db, clock.clone()));
    wire("sqlite", store, clock)
}

/// One harness per store implementation.
pub async fn harnesses() -> Vec<Harness> {
    vec![memory_harness(), sqlite_harness().await]
}
