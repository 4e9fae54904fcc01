//! SeaORM entities. Timestamps are stored as microseconds since the Unix
//! epoch so ordering and range filters behave the same on every backend.

pub mod cities;
pub mod points;
pub mod products;
pub mod receptions;
pub mod users;
