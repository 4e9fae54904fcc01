use std::sync::Arc;

/// Output port: a monotonically increasing business counter.
///
/// Increments are fire-and-forget; an implementation must never block the
/// caller or report failure.
pub trait Counter: Send + Sync {
    fn increment(&self);
}

/// The counters the ledger bumps on successful creations.
#[derive(Clone)]
pub struct Counters {
    pub points_created: Arc<dyn Counter>,
    pub receptions_created: Arc<dyn Counter>,
    pub products_created: Arc<dyn Counter>,
}

impl Counters {
    pub fn new(
        points_created: Arc<dyn Counter>,
        receptions_created: Arc<dyn Counter>,
        products_created: Arc<dyn Counter>,
    ) -> Self {
        Self {
            points_created,
            receptions_created,
            products_created,
        }
    }
}

impl std::fmt::Debug for Counters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Counters").finish_non_exhaustive()
    }
}
