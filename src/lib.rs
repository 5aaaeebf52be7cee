#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Order Processor
//!
//! > **Concurrent order fulfillment on a bounded worker pool.**
//!
//! This crate processes a fixed batch of orders on a fixed-size pool of Tokio workers. Every
//! order runs the same four-stage pipeline (validate, check inventory, process payment,
//! prepare shipment) where each stage is a logged, randomized delay. When the batch is
//! submitted the driver drains the pool with a bounded wait and forces cancellation if the
//! wait runs out.
//!
//! ## 🏗️ Design
//!
//! ### Isolation
//! Orders share nothing but the pool and the log. A failing or cancelled order logs one error
//! line and ends; no other order and not the driver itself ever sees the failure.
//!
//! ### Cooperative Cancellation
//! Each task gets a [`CancellationToken`](tokio_util::sync::CancellationToken). Stages watch it
//! while they wait, so a forced shutdown stops an order at its next suspension point with a
//! distinct `Cancelled` outcome instead of a generic failure.
//!
//! ### Injected Time
//! Stage delays come from a [`DelayProvider`](pipeline::DelayProvider). Production uses
//! [`RandomDelay`](pipeline::RandomDelay); tests use fixed or scripted delays
//! ([`pipeline::mock`]) together with Tokio's paused clock.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! The generic [`WorkerPool`](framework::WorkerPool): fixed size, shared FIFO queue,
//! Accepting → Draining → Terminated lifecycle, graceful and forced shutdown.
//!
//! ### 2. The Data ([`model`])
//! [`Order`](model::Order), an immutable id.
//!
//! ### 3. The Work ([`pipeline`])
//! [`OrderPipeline`](pipeline::OrderPipeline), [`Stage`](pipeline::Stage),
//! [`TaskState`](pipeline::TaskState) and the delay providers.
//!
//! ### 4. The Orchestrator ([`lifecycle`])
//! [`OrderProcessor`](lifecycle::OrderProcessor), the driver that submits the batch and
//! shuts the pool down, plus configuration and tracing setup.
//!
//! ## 🚀 Quick Start
//!
//! ### Running the Demo
//!
//! ```bash
//! # 20 orders, 4 workers, 60 second drain timeout
//! cargo run
//!
//! # With task state transitions
//! RUST_LOG=debug cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod pipeline;
