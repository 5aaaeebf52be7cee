//! Error types for the processing driver.

use crate::framework::PoolError;
use thiserror::Error;

/// Rejected [`ProcessorConfig`](super::ProcessorConfig) values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Worker count must be at least 1")]
    NoWorkers,
}

/// Errors that end a run early.
///
/// Individual order failures are not errors at this level; they are reported
/// in the [`RunReport`](super::RunReport).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProcessorError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Worker pool error: {0}")]
    Pool(#[from] PoolError),

    /// The drain wait was interrupted. Running orders were cancelled before returning.
    #[error("Interrupted while waiting for orders to finish")]
    Interrupted,
}
