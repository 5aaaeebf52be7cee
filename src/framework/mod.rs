//! Generic concurrency building blocks.
//!
//! # Main Components
//!
//! - [`WorkerPool`] - Fixed-size pool of workers fed from a shared queue
//! - [`PoolState`] - Accepting / Draining / Terminated lifecycle
//! - [`PoolError`] - Errors raised by the pool itself

pub mod error;
pub mod pool;

// Re-export core types for convenience
pub use error::PoolError;
pub use pool::{PoolState, PoolStats, WorkerPool};
