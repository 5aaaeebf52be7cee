//! Order fulfillment pipeline.
//!
//! Every order passes through the same four [`Stage`]s in fixed order:
//! validate, check inventory, process payment, prepare shipment. A stage logs what it is
//! doing and then waits for a simulated delay supplied by a [`DelayProvider`].
//!
//! # Main Components
//!
//! - [`OrderPipeline`] - Runs the stages for one order and reports an [`OrderOutcome`]
//! - [`DelayProvider`] - Source of per-stage latency ([`RandomDelay`], [`FixedDelay`])
//! - [`TaskState`] - Per-order lifecycle state
//! - [`StageError`] - Why a stage stopped early
//!
//! # Testing
//!
//! See [`mock`] for a scripted [`DelayProvider`] with failure injection.

pub mod delay;
pub mod error;
pub mod mock;
pub mod order_pipeline;
pub mod stage;
pub mod state;

pub use delay::{DelayProvider, FixedDelay, RandomDelay};
pub use error::StageError;
pub use order_pipeline::{OrderOutcome, OrderPipeline};
pub use stage::Stage;
pub use state::TaskState;
