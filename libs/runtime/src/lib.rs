//! Process runtime helpers shared by PVZ binaries: layered configuration
//! loading and logging initialisation.

pub mod config;
pub mod logging;

pub use config::{AppConfig, CliArgs, DatabaseConfig, LoggingConfig, Section};
