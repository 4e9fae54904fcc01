//! Product ordering inside a reception.
//!
//! Products are removed last-in-first-out. "Last" is the greatest
//! `(created_at, seq)` pair: timestamps may collide, the store-assigned
//! sequence never does.

use chrono::{DateTime, Utc};

use crate::contract::model::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LedgerKey {
    pub created_at: DateTime<Utc>,
    pub seq: i64,
}

impl LedgerKey {
    pub fn of(product: &Product) -> Self {
        Self {
            created_at: product.created_at,
            seq: product.seq,
        }
    }
}

/// The product a LIFO removal would take.
pub fn latest<'a, I>(products: I) -> Option<&'a Product>
where
    I: IntoIterator<Item = &'a Product>,
{
    products.into_iter().max_by_key(|p| LedgerKey::of(p))
}

/// Sort products in insertion order.
pub fn sort_in_ledger_order(products: &mut [Product]) {
    products.sort_by_key(LedgerKey::of);
}
