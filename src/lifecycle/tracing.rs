//! # Observability & Tracing
//!
//! The [`setup_tracing`] function initializes structured logging with the `tracing` crate.
//!
//! ## What Gets Logged
//!
//! - **Stage start** (`info`): activity and order id, e.g. `Validating order 3`
//! - **Order completion** (`info`): `Order 3 processed completely`
//! - **Order failure or cancellation** (`error`): order id, stage and reason
//! - **Pool lifecycle** (`info`/`warn`): start, forced cancellation, termination
//! - **Task state changes** (`debug`)
//!
//! Every order event carries an `order_id` field, stage events a `stage` field.
//!
//! ## Usage
//!
//! ```bash
//! # Default: info and above
//! cargo run
//!
//! # Show task state transitions and worker lifecycle
//! RUST_LOG=debug cargo run
//!
//! # Only failures
//! RUST_LOG=error cargo run
//! ```

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Falls back to `info` when `RUST_LOG` is unset.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();
}
