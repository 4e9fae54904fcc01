//! SeaORM-backed implementation of the ledger store ports.
//!
//! This struct is generic over `C: ConnectionTrait`, so you can construct it
//! with a `DatabaseConnection` **or** a transactional connection.
//!
//! The single-active-reception rule is enforced by the partial unique index
//! created in the initial migration; a violation surfaces as
//! `StoreError::AlreadyExists`.

use std::sync::Arc;

use anyhow::{anyhow, Context};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr,
};
use uuid::Uuid;

use crate::contract::model::{
    Point, PointReport, Product, ProductType, Reception, ReceptionStatus, ReportFilter, Role,
    User,
};
use crate::domain::ports::Clock;
use crate::domain::reception;
use crate::domain::repo::{
    PointRepository, ProductRepository, ReceptionRepository, StoreError, StoreResult,
    UserRepository,
};
use crate::domain::report;
use crate::infra::storage::entity::{cities, points, products, receptions, users};
use crate::infra::storage::mapper::{self, to_micros};

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmLedgerStore<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
    clock: Arc<dyn Clock>,
}

impl<C> SeaOrmLedgerStore<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C, clock: Arc<dyn Clock>) -> Self {
        Self { conn, clock }
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn with_city(row: (points::Model, Option<cities::Model>)) -> anyhow::Result<Point> {
    let (point, city) = row;
    let city = city.ok_or_else(|| anyhow!("point {} references a missing city", point.id))?;
    mapper::point_to_contract(point, &city)
}

#[async_trait::async_trait]
impl<C> PointRepository for SeaOrmLedgerStore<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn create_point(&self, city: &str) -> StoreResult<Point> {
        let city = cities::Entity::find()
            .filter(cities::Column::Name.eq(city))
            .one(&self.conn)
            .await
            .context("find city failed")?
            .ok_or(StoreError::NotFound)?;

        let m = points::ActiveModel {
            id: Set(Uuid::new_v4()),
            city_id: Set(city.id),
            created_at: Set(to_micros(self.clock.now())),
        };
        let row = m.insert(&self.conn).await.context("insert point failed")?;
        Ok(mapper::point_to_contract(row, &city)?)
    }

    async fn list_points(&self) -> StoreResult<Vec<Point>> {
        let rows = points::Entity::find()
            .find_also_related(cities::Entity)
            .order_by_asc(points::Column::CreatedAt)
            .order_by_asc(points::Column::Id)
            .all(&self.conn)
            .await
            .context("list_points failed")?;
        Ok(rows
            .into_iter()
            .map(with_city)
            .collect::<anyhow::Result<Vec<_>>>()?)
    }

    async fn list_points_extended(
        &self,
        filter: &ReportFilter,
        offset: u64,
        limit: u64,
    ) -> StoreResult<Vec<PointReport>> {
        let page = points::Entity::find()
            .find_also_related(cities::Entity)
            .order_by_asc(points::Column::CreatedAt)
            .order_by_asc(points::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("list_points_extended: points page failed")?
            .into_iter()
            .map(with_city)
            .collect::<anyhow::Result<Vec<_>>>()?;
        if page.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = receptions::Entity::find()
            .filter(receptions::Column::PointId.is_in(page.iter().map(|p| p.id)));
        if let Some(from) = filter.date_from {
            query = query.filter(receptions::Column::CreatedAt.gte(to_micros(from)));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(receptions::Column::CreatedAt.lte(to_micros(to)));
        }
        let receptions = query
            .all(&self.conn)
            .await
            .context("list_points_extended: receptions failed")?
            .into_iter()
            .map(mapper::reception_to_contract)
            .collect::<anyhow::Result<Vec<_>>>()?;

        let products = if receptions.is_empty() {
            Vec::new()
        } else {
            products::Entity::find()
                .filter(products::Column::ReceptionId.is_in(receptions.iter().map(|r| r.id)))
                .all(&self.conn)
                .await
                .context("list_points_extended: products failed")?
                .into_iter()
                .map(mapper::product_to_contract)
                .collect::<anyhow::Result<Vec<_>>>()?
        };

        Ok(report::assemble(page, receptions, products))
    }
}

#[async_trait::async_trait]
impl<C> ReceptionRepository for SeaOrmLedgerStore<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn create_reception(&self, point_id: Uuid) -> StoreResult<Reception> {
        let point = points::Entity::find_by_id(point_id)
            .one(&self.conn)
            .await
            .context("find point failed")?;
        if point.is_none() {
            return Err(StoreError::NotFound);
        }

        let m = receptions::ActiveModel {
            id: Set(Uuid::new_v4()),
            point_id: Set(point_id),
            status: Set(reception::INITIAL_STATUS.as_str().to_string()),
            created_at: Set(to_micros(self.clock.now())),
        };
        match m.insert(&self.conn).await {
            Ok(row) => Ok(mapper::reception_to_contract(row)?),
            Err(e) if is_unique_violation(&e) => Err(StoreError::AlreadyExists),
            Err(e) => Err(anyhow::Error::new(e).context("insert reception failed").into()),
        }
    }

    async fn get_active_reception_id(&self, point_id: Uuid) -> StoreResult<Uuid> {
        let row = receptions::Entity::find()
            .filter(receptions::Column::PointId.eq(point_id))
            .filter(receptions::Column::Status.eq(ReceptionStatus::InProgress.as_str()))
            .one(&self.conn)
            .await
            .context("get_active_reception_id failed")?
            .ok_or(StoreError::NotFound)?;
        Ok(row.id)
    }

    async fn close_reception(&self, reception_id: Uuid) -> StoreResult<Reception> {
        let res = receptions::Entity::update_many()
            .col_expr(
                receptions::Column::Status,
                Expr::value(ReceptionStatus::Closed.as_str()),
            )
            .filter(receptions::Column::Id.eq(reception_id))
            .filter(receptions::Column::Status.eq(ReceptionStatus::InProgress.as_str()))
            .exec(&self.conn)
            .await
            .context("close_reception failed")?;
        if res.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }
        self.get_reception(reception_id).await
    }

    async fn get_reception(&self, reception_id: Uuid) -> StoreResult<Reception> {
        let row = receptions::Entity::find_by_id(reception_id)
            .one(&self.conn)
            .await
            .context("get_reception failed")?
            .ok_or(StoreError::NotFound)?;
        Ok(mapper::reception_to_contract(row)?)
    }
}

#[async_trait::async_trait]
impl<C> ProductRepository for SeaOrmLedgerStore<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn create_product(
        &self,
        reception_id: Uuid,
        product_type: ProductType,
    ) -> StoreResult<Product> {
        let parent = receptions::Entity::find_by_id(reception_id)
            .one(&self.conn)
            .await
            .context("find reception failed")?;
        if parent.is_none() {
            return Err(StoreError::NotFound);
        }

        let m = products::ActiveModel {
            seq: NotSet,
            id: Set(Uuid::new_v4()),
            reception_id: Set(reception_id),
            product_type: Set(product_type.as_str().to_string()),
            created_at: Set(to_micros(self.clock.now())),
        };
        let row = m.insert(&self.conn).await.context("insert product failed")?;
        Ok(mapper::product_to_contract(row)?)
    }

    async fn get_latest_product_id(&self, reception_id: Uuid) -> StoreResult<Uuid> {
        let row = products::Entity::find()
            .filter(products::Column::ReceptionId.eq(reception_id))
            .order_by_desc(products::Column::CreatedAt)
            .order_by_desc(products::Column::Seq)
            .one(&self.conn)
            .await
            .context("get_latest_product_id failed")?
            .ok_or(StoreError::NotFound)?;
        Ok(row.id)
    }

    async fn delete_product(&self, product_id: Uuid) -> StoreResult<()> {
        let res = products::Entity::delete_many()
            .filter(products::Column::Id.eq(product_id))
            .exec(&self.conn)
            .await
            .context("delete_product failed")?;
        if res.rows_affected == 0 {
            return Err(StoreError::NoRowsDeleted);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl<C> UserRepository for SeaOrmLedgerStore<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn create_user(&self, email: &str, password_hash: &str, role: Role) -> StoreResult<User> {
        let m = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            role: Set(role.as_str().to_string()),
        };
        match m.insert(&self.conn).await {
            Ok(row) => Ok(mapper::user_to_contract(row)?),
            Err(e) if is_unique_violation(&e) => Err(StoreError::AlreadyExists),
            Err(e) => Err(anyhow::Error::new(e).context("insert user failed").into()),
        }
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<User> {
        let row = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("get_user_by_email failed")?
            .ok_or(StoreError::NotFound)?;
        Ok(mapper::user_to_contract(row)?)
    }
}
