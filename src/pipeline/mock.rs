//! # Scripted Delays for Tests
//!
//! [`MockDelays`] implements [`DelayProvider`] entirely in memory. It lets a test decide how
//! long each stage waits, inject a failure at a given order and stage, and afterwards inspect
//! which stages were asked for in which order.
//!
//! ```rust
//! use order_processor::model::Order;
//! use order_processor::pipeline::mock::MockDelays;
//! use order_processor::pipeline::{DelayProvider, Stage, StageError};
//! use std::time::Duration;
//!
//! let delays = MockDelays::new()
//!     .with_stage_delay(Stage::ProcessPayment, Duration::from_secs(2))
//!     .fail_at(3, Stage::CheckInventory, "warehouse offline");
//!
//! let order = Order::new(3);
//! assert_eq!(delays.delay_for(Stage::Validate, &order), Ok(Duration::ZERO));
//! assert_eq!(
//!     delays.delay_for(Stage::CheckInventory, &order),
//!     Err(StageError::failed(Stage::CheckInventory, "warehouse offline"))
//! );
//! assert_eq!(delays.stages_for(3), vec![Stage::Validate, Stage::CheckInventory]);
//! ```
//!
//! Clones share the call log, so a test can keep one handle and give another to the pipeline.

use super::{DelayProvider, Stage, StageError};
use crate::model::Order;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Debug, Default)]
pub struct MockDelays {
    default: Duration,
    per_stage: HashMap<Stage, Duration>,
    failures: HashMap<(u64, Stage), String>,
    calls: Arc<Mutex<Vec<(u64, Stage)>>>,
}

impl MockDelays {
    /// Every stage completes immediately until told otherwise.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, delay: Duration) -> Self {
        self.default = delay;
        self
    }

    pub fn with_stage_delay(mut self, stage: Stage, delay: Duration) -> Self {
        self.per_stage.insert(stage, delay);
        self
    }

    /// Makes `stage` fail for the order with `order_id`.
    pub fn fail_at(mut self, order_id: u64, stage: Stage, message: impl Into<String>) -> Self {
        self.failures.insert((order_id, stage), message.into());
        self
    }

    /// Every `(order_id, stage)` requested so far, in call order.
    pub fn calls(&self) -> Vec<(u64, Stage)> {
        self.calls.lock().unwrap().clone()
    }

    /// Stages requested for one order, in call order.
    pub fn stages_for(&self, order_id: u64) -> Vec<Stage> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == order_id)
            .map(|(_, stage)| *stage)
            .collect()
    }
}

impl DelayProvider for MockDelays {
    fn delay_for(&self, stage: Stage, order: &Order) -> Result<Duration, StageError> {
        self.calls.lock().unwrap().push((order.id(), stage));

        if let Some(message) = self.failures.get(&(order.id(), stage)) {
            return Err(StageError::failed(stage, message.clone()));
        }
        Ok(self.per_stage.get(&stage).copied().unwrap_or(self.default))
    }
}
