use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};

use crate::contract::model::{Point, Product, Reception, User};
use crate::infra::storage::entity::{cities, points, products, receptions, users};

pub fn to_micros(at: DateTime<Utc>) -> i64 {
    at.timestamp_micros()
}

pub fn from_micros(us: i64) -> anyhow::Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(us).ok_or_else(|| anyhow!("timestamp out of range: {us}"))
}

/// Convert a point row and its catalogue city to a contract model
pub fn point_to_contract(point: points::Model, city: &cities::Model) -> anyhow::Result<Point> {
    Ok(Point {
        id: point.id,
        city: city.name.parse().context("unknown city in catalogue")?,
        created_at: from_micros(point.created_at)?,
    })
}

pub fn reception_to_contract(reception: receptions::Model) -> anyhow::Result<Reception> {
    Ok(Reception {
        id: reception.id,
        point_id: reception.point_id,
        status: reception.status.parse().context("bad reception status")?,
        created_at: from_micros(reception.created_at)?,
    })
}

pub fn product_to_contract(product: products::Model) -> anyhow::Result<Product> {
    Ok(Product {
        id: product.id,
        reception_id: product.reception_id,
        product_type: product.product_type.parse().context("bad product type")?,
        created_at: from_micros(product.created_at)?,
        seq: product.seq,
    })
}

pub fn user_to_contract(user: users::Model) -> anyhow::Result<User> {
    Ok(User {
        id: user.id,
        email: user.email,
        password_hash: user.password_hash,
        role: user.role.parse().context("bad role")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::model::{City, ReceptionStatus};
    use chrono::TimeZone;
    use uuid::Uuid;

    #[test]
    fn micros_survive_the_trip() {
        let at = Utc.with_ymd_and_hms(2025, 4, 1, 9, 30, 0).unwrap()
            + chrono::Duration::microseconds(123_456);
        assert_eq!(from_micros(to_micros(at)).unwrap(), at);
    }

    #[test]
    fn rows_map_to_contract_models() {
        let city = cities::Model {
            id: 3,
            name: "Казань".into(),
        };
        let point = points::Model {
            id: Uuid::new_v4(),
            city_id: 3,
            created_at: 0,
        };
        assert_eq!(point_to_contract(point, &city).unwrap().city, City::Kazan);

        let reception = receptions::Model {
            id: Uuid::new_v4(),
            point_id: Uuid::new_v4(),
            status: "close".into(),
            created_at: 0,
        };
        assert_eq!(
            reception_to_contract(reception).unwrap().status,
            ReceptionStatus::Closed
        );
    }

    #[test]
    fn corrupt_rows_are_errors() {
        let reception = receptions::Model {
            id: Uuid::new_v4(),
            point_id: Uuid::new_v4(),
            status: "paused".into(),
            created_at: 0,
        };
        assert!(reception_to_contract(reception).is_err());
    }
}
