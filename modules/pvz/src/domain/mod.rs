pub mod access;
pub mod error;
pub mod ledger;
pub mod ports;
pub mod reception;
pub mod repo;
pub mod report;
pub mod service;
