//! # Simulated Latency
//!
//! Stages do no real work; they wait. How long they wait comes from a [`DelayProvider`],
//! so tests can swap the random source for fixed or scripted durations without touching
//! the pipeline's control flow.
//!
//! A provider may also refuse a stage by returning a [`StageError`]. The pipeline treats
//! that exactly like a failing stage: the order aborts and the error is logged.

use super::{Stage, StageError};
use crate::model::Order;
use rand::Rng;
use std::time::Duration;

/// Decides how long a stage's simulated work takes.
pub trait DelayProvider: Send + Sync {
    fn delay_for(&self, stage: Stage, order: &Order) -> Result<Duration, StageError>;
}

/// Uniform random delay drawn from the stage's own range.
///
/// Each call draws from the thread-local generator, so concurrent workers never
/// share a random source.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomDelay;

impl DelayProvider for RandomDelay {
    fn delay_for(&self, stage: Stage, _order: &Order) -> Result<Duration, StageError> {
        let millis = rand::thread_rng().gen_range(stage.delay_range());
        Ok(Duration::from_millis(millis))
    }
}

/// The same delay for every stage. `FixedDelay::default()` does not wait at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedDelay(pub Duration);

impl DelayProvider for FixedDelay {
    fn delay_for(&self, _stage: Stage, _order: &Order) -> Result<Duration, StageError> {
        Ok(self.0)
    }
}
