//! Infrastructure for running a token ledger: journal, service, read models,
//! configuration, and the line-protocol driver.

pub mod config;
pub mod driver;
pub mod journal;
pub mod projections;
pub mod service;
pub mod workers;

pub use config::{ConfigError, LedgerConfig};
pub use service::{LedgerService, ServiceError};
