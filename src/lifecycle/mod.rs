//! # Run Lifecycle & Orchestration
//!
//! This module drives a processing run from start to finish: it builds the batch of orders,
//! feeds them to a [`WorkerPool`](crate::framework::WorkerPool), and shuts the pool down.
//!
//! ## The Driver Pattern
//!
//! [`OrderProcessor`] owns nothing but its configuration and a shared pipeline. Everything a
//! run needs is created inside [`OrderProcessor::run`] and torn down before it returns:
//!
//! ```rust,ignore
//! let mut pool = WorkerPool::new(config.workers)?;
//! for order in Order::batch(config.orders) {
//!     pool.submit(move |cancel| async move { pipeline.process(&order, &cancel).await; })?;
//! }
//! pool.shutdown();
//! if !pool.await_termination(config.drain_timeout).await {
//!     pool.shutdown_now(config.cancel_grace).await;
//! }
//! ```
//!
//! ## Configuration
//!
//! [`ProcessorConfig`] is passed in explicitly; there is no global state. Its defaults match
//! the reference run (20 orders, 4 workers, 60 second drain timeout).
//!
//! ## Interruption
//!
//! [`OrderProcessor::run`] takes a [`CancellationToken`](tokio_util::sync::CancellationToken)
//! that stands for an external interrupt (the binary wires it to Ctrl-C). If it fires while the
//! driver waits for the pool, running orders are cancelled and
//! [`ProcessorError::Interrupted`] is returned to the caller.
//!
//! ## Observability
//!
//! See the [`tracing`](self::tracing) module for the log layout and `RUST_LOG` usage.

pub mod config;
pub mod error;
pub mod order_processor;
pub mod tracing;

pub use self::tracing::setup_tracing;
pub use config::ProcessorConfig;
pub use error::{ConfigError, ProcessorError};
pub use order_processor::{OrderProcessor, OrderReport, RunReport, Termination};

use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Processes `num_orders` orders on `num_workers` workers, waiting at most `timeout`
/// for them to finish, with randomized stage delays and no external interrupt.
pub async fn run(
    num_orders: u64,
    num_workers: usize,
    timeout: Duration,
) -> Result<RunReport, ProcessorError> {
    OrderProcessor::new(ProcessorConfig::new(num_orders, num_workers, timeout))
        .run(CancellationToken::new())
        .await
}
