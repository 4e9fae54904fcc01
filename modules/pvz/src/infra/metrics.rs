//! Counter adapters.
//!
//! `AtomicCounter` keeps the value in process (tests, the CLI), `NoopCounter`
//! drops increments, and with the `metrics` feature `PrometheusCounter`
//! exports to a `prometheus::Registry`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::domain::ports::{Counter, Counters};

#[derive(Debug, Default)]
pub struct AtomicCounter {
    value: AtomicU64,
}

impl AtomicCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

impl Counter for AtomicCounter {
    fn increment(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCounter;

impl Counter for NoopCounter {
    fn increment(&self) {}
}

/// Handles to in-process counters, kept so callers can read them back.
#[derive(Debug, Clone, Default)]
pub struct AtomicCounters {
    pub points_created: Arc<AtomicCounter>,
    pub receptions_created: Arc<AtomicCounter>,
    pub products_created: Arc<AtomicCounter>,
}

impl AtomicCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counters(&self) -> Counters {
        Counters::new(
            self.points_created.clone(),
            self.receptions_created.clone(),
            self.products_created.clone(),
        )
    }
}

pub fn noop_counters() -> Counters {
    Counters::new(
        Arc::new(NoopCounter),
        Arc::new(NoopCounter),
        Arc::new(NoopCounter),
    )
}

#[cfg(feature = "metrics")]
pub use prometheus_counter::{prometheus_counters, PrometheusCounter};

#[cfg(feature = "metrics")]
mod prometheus_counter {
    use std::sync::Arc;

    use prometheus::{IntCounter, Opts, Registry};

    use crate::domain::ports::{Counter, Counters};

    /// Prometheus-backed counter.
    pub struct PrometheusCounter {
        inner: IntCounter,
    }

    impl PrometheusCounter {
        /// Create and register a counter with the given registry.
        ///
        /// # Errors
        ///
        /// Returns an error if a metric with the same name is already registered.
        pub fn new(registry: &Registry, name: &str, help: &str) -> Result<Self, prometheus::Error> {
            let inner = IntCounter::with_opts(Opts::new(name, help))?;
            registry.register(Box::new(inner.clone()))?;
            Ok(Self { inner })
        }
    }

    impl Counter for PrometheusCounter {
        fn increment(&self) {
            self.inner.inc();
        }
    }

    /// Register the three ledger counters.
    pub fn prometheus_counters(registry: &Registry) -> Result<Counters, prometheus::Error> {
        Ok(Counters::new(
            Arc::new(PrometheusCounter::new(
                registry,
                "points_created_total",
                "Number of points created",
            )?),
            Arc::new(PrometheusCounter::new(
                registry,
                "receptions_created_total",
                "Number of receptions created",
            )?),
            Arc::new(PrometheusCounter::new(
                registry,
                "products_created_total",
                "Number of products created",
            )?),
        ))
    }

}
