pub mod clock;
pub mod metrics;

pub use clock::{Clock, ManualClock, SystemClock};
pub use metrics::{Counter, Counters};
