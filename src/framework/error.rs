//! # Framework Errors
//!
//! Errors raised by the worker pool itself. Failures inside a submitted task
//! never surface here; tasks own their error handling.

/// Errors that can occur while configuring or feeding a [`WorkerPool`](super::WorkerPool).
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("Worker pool size must be at least 1")]
    InvalidSize,
    #[error("Worker pool is {0} and no longer accepts tasks")]
    Rejected(super::PoolState),
}
