//! Hierarchical point report: points, each with its receptions, each with
//! its products.
//!
//! Pagination is over points. The date filter narrows receptions only, so a
//! point without matching receptions still appears with an empty list.

use std::collections::HashMap;

use uuid::Uuid;

use crate::contract::model::{Point, PointReport, Product, Reception, ReceptionReport};
use crate::domain::ledger;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// Normalised page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Pagination {
    /// Absent, zero and negative values fall back to the defaults.
    pub fn normalize(
        page: Option<i64>,
        limit: Option<i64>,
        default_page: i64,
        default_limit: i64,
    ) -> Self {
        let pick = |v: Option<i64>, default: i64| -> u64 {
            match v {
                Some(v) if v > 0 => v as u64,
                _ => default.max(1) as u64,
            }
        };
        Self {
            page: pick(page, default_page),
            limit: pick(limit, default_limit),
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::normalize(None, None, DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

/// Sort points in report order.
pub fn sort_points(points: &mut [Point]) {
    points.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
}

/// Nest already-filtered receptions and products under the given page of
/// points. Point order is preserved; receptions and products are sorted.
/// Receptions or products whose parent is not present are dropped.
pub fn assemble(
    points: Vec<Point>,
    receptions: Vec<Reception>,
    products: Vec<Product>,
) -> Vec<PointReport> {
    let mut products_by_reception: HashMap<Uuid, Vec<Product>> = HashMap::new();
    for product in products {
        products_by_reception
            .entry(product.reception_id)
            .or_default()
            .push(product);
    }

    let mut receptions_by_point: HashMap<Uuid, Vec<Reception>> = HashMap::new();
    for reception in receptions {
        receptions_by_point
            .entry(reception.point_id)
            .or_default()
            .push(reception);
    }

    points
        .into_iter()
        .map(|point| {
            let mut receptions = receptions_by_point.remove(&point.id).unwrap_or_default();
            receptions.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));

            let receptions = receptions
                .into_iter()
                .map(|reception| {
                    let mut products = products_by_reception
                        .remove(&reception.id)
                        .unwrap_or_default();
                    ledger::sort_in_ledger_order(&mut products);
                    ReceptionReport {
                        reception,
                        products,
                    }
                })
                .collect();

            PointReport { point, receptions }
        })
        .collect()
}
