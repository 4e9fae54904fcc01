//! In-process ledger store.
//!
//! All tables live behind one mutex, so every operation observes and
//! mutates a consistent snapshot. The lock is never held across an await.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::contract::model::{
    City, Point, PointReport, Product, ProductType, Reception, ReportFilter, Role, User,
};
use crate::domain::ledger;
use crate::domain::ports::Clock;
use crate::domain::reception;
use crate::domain::repo::{
    PointRepository, ProductRepository, ReceptionRepository, StoreError, StoreResult,
    UserRepository,
};
use crate::domain::report;

#[derive(Default)]
struct Tables {
    points: HashMap<Uuid, Point>,
    receptions: HashMap<Uuid, Reception>,
    products: HashMap<Uuid, Product>,
    users: HashMap<String, User>,
    next_seq: i64,
}

pub struct InMemoryLedgerStore {
    tables: Mutex<Tables>,
    clock: Arc<dyn Clock>,
}

impl InMemoryLedgerStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            clock,
        }
    }
}

#[async_trait]
impl PointRepository for InMemoryLedgerStore {
    async fn create_point(&self, city: &str) -> StoreResult<Point> {
        let city: City = city.parse().map_err(|_| StoreError::NotFound)?;
        let point = Point {
            id: Uuid::new_v4(),
            city,
            created_at: self.clock.now(),
        };
        self.tables.lock().points.insert(point.id, point.clone());
        Ok(point)
    }

    async fn list_points(&self) -> StoreResult<Vec<Point>> {
        let mut points: Vec<Point> = self.tables.lock().points.values().cloned().collect();
        report::sort_points(&mut points);
        Ok(points)
    }

    async fn list_points_extended(
        &self,
        filter: &ReportFilter,
        offset: u64,
        limit: u64,
    ) -> StoreResult<Vec<PointReport>> {
        let tables = self.tables.lock();

        let mut points: Vec<Point> = tables.points.values().cloned().collect();
        report::sort_points(&mut points);
        let page: Vec<Point> = points
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect();

        let receptions: Vec<Reception> = tables
            .receptions
            .values()
            .filter(|r| filter.contains(r.created_at))
            .filter(|r| page.iter().any(|p| p.id == r.point_id))
            .cloned()
            .collect();

        let products: Vec<Product> = tables
            .products
            .values()
            .filter(|p| receptions.iter().any(|r| r.id == p.reception_id))
            .cloned()
            .collect();

        Ok(report::assemble(page, receptions, products))
    }
}

#[async_trait]
impl ReceptionRepository for InMemoryLedgerStore {
    async fn create_reception(&self, point_id: Uuid) -> StoreResult<Reception> {
        let mut tables = self.tables.lock();
        if !tables.points.contains_key(&point_id) {
            return Err(StoreError::NotFound);
        }
        if tables
            .receptions
            .values()
            .any(|r| r.point_id == point_id && reception::is_active(r))
        {
            return Err(StoreError::AlreadyExists);
        }

        let created = Reception {
            id: Uuid::new_v4(),
            point_id,
            status: reception::INITIAL_STATUS,
            created_at: self.clock.now(),
        };
        tables.receptions.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_active_reception_id(&self, point_id: Uuid) -> StoreResult<Uuid> {
        self.tables
            .lock()
            .receptions
            .values()
            .find(|r| r.point_id == point_id && reception::is_active(r))
            .map(|r| r.id)
            .ok_or(StoreError::NotFound)
    }

    async fn close_reception(&self, reception_id: Uuid) -> StoreResult<Reception> {
        let mut tables = self.tables.lock();
        let found = tables
            .receptions
            .get_mut(&reception_id)
            .ok_or(StoreError::NotFound)?;
        reception::close(found).map_err(|_| StoreError::NotFound)?;
        Ok(found.clone())
    }

    async fn get_reception(&self, reception_id: Uuid) -> StoreResult<Reception> {
        self.tables
            .lock()
            .receptions
            .get(&reception_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl ProductRepository for InMemoryLedgerStore {
    async fn create_product(
        &self,
        reception_id: Uuid,
        product_type: ProductType,
    ) -> StoreResult<Product> {
        let mut tables = self.tables.lock();
        if !tables.receptions.contains_key(&reception_id) {
            return Err(StoreError::NotFound);
        }

        tables.next_seq += 1;
        let product = Product {
            id: Uuid::new_v4(),
            reception_id,
            product_type,
            created_at: self.clock.now(),
            seq: tables.next_seq,
        };
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn get_latest_product_id(&self, reception_id: Uuid) -> StoreResult<Uuid> {
        let tables = self.tables.lock();
        ledger::latest(
            tables
                .products
                .values()
                .filter(|p| p.reception_id == reception_id),
        )
        .map(|p| p.id)
        .ok_or(StoreError::NotFound)
    }

    async fn delete_product(&self, product_id: Uuid) -> StoreResult<()> {
        self.tables
            .lock()
            .products
            .remove(&product_id)
            .map(|_| ())
            .ok_or(StoreError::NoRowsDeleted)
    }
}

#[async_trait]
impl UserRepository for InMemoryLedgerStore {
    async fn create_user(&self, email: &str, password_hash: &str, role: Role) -> StoreResult<User> {
        let mut tables = self.tables.lock();
        if tables.users.contains_key(email) {
            return Err(StoreError::AlreadyExists);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role,
        };
        tables.users.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<User> {
        self.tables
            .lock()
            .users
            .get(email)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}
