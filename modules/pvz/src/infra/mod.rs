pub mod metrics;
pub mod storage;
