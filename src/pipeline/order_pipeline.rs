use super::{DelayProvider, Stage, StageError, TaskState};
use crate::model::Order;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// How an order's pipeline ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderOutcome {
    Completed,
    Failed { stage: Stage, message: String },
    Cancelled { stage: Stage },
}

impl OrderOutcome {
    /// The terminal [`TaskState`] matching this outcome.
    pub fn state(&self) -> TaskState {
        match self {
            OrderOutcome::Completed => TaskState::Completed,
            OrderOutcome::Failed { .. } => TaskState::Failed,
            OrderOutcome::Cancelled { .. } => TaskState::Cancelled,
        }
    }
}

impl From<StageError> for OrderOutcome {
    fn from(e: StageError) -> Self {
        match e {
            StageError::Cancelled(stage) => OrderOutcome::Cancelled { stage },
            StageError::Failed { stage, message } => OrderOutcome::Failed { stage, message },
        }
    }
}

/// Runs the four fulfillment stages for one order at a time.
///
/// # Architecture Note
/// The pipeline holds no per-order state; every call to [`process`](Self::process) is
/// independent, so one `Arc<OrderPipeline>` is shared by all tasks in the pool. The only
/// suspension point in a stage is its simulated delay, and that is where cancellation
/// is observed.
pub struct OrderPipeline {
    delays: Arc<dyn DelayProvider>,
}

impl OrderPipeline {
    pub fn new(delays: Arc<dyn DelayProvider>) -> Self {
        Self { delays }
    }

    /// Processes `order` through every stage, stopping at the first error.
    ///
    /// Exactly one outcome line is logged per call: `info` on completion, `error` on
    /// failure or cancellation. Errors are returned as an [`OrderOutcome`], never propagated.
    pub async fn process(&self, order: &Order, cancel: &CancellationToken) -> OrderOutcome {
        let order_id = order.id();
        info!(order_id, "Started processing order {}", order_id);

        let mut state = TaskState::Submitted;
        for stage in Stage::ALL {
            let next = TaskState::entering(stage);
            debug!(order_id, from = %state, to = %next, "Task state changed");
            state = next;

            if let Err(e) = self.run_stage(stage, order, cancel).await {
                let outcome = OrderOutcome::from(e.clone());
                debug!(order_id, from = %state, to = %outcome.state(), "Task state changed");
                match e {
                    StageError::Cancelled(_) => {
                        error!(order_id, %stage, error = %e, "Order {} cancelled", order_id)
                    }
                    StageError::Failed { .. } => {
                        error!(order_id, %stage, error = %e, "Error processing order {}", order_id)
                    }
                }
                return outcome;
            }
        }

        debug!(order_id, from = %state, to = %TaskState::Completed, "Task state changed");
        info!(order_id, "Order {} processed completely", order_id);
        OrderOutcome::Completed
    }

    async fn run_stage(
        &self,
        stage: Stage,
        order: &Order,
        cancel: &CancellationToken,
    ) -> Result<(), StageError> {
        info!(order_id = order.id(), %stage, "{} {}", stage.activity(), order.id());
        let delay = self.delays.delay_for(stage, order)?;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(StageError::Cancelled(stage)),
            _ = tokio::time::sleep(delay) => Ok(()),
        }
    }
}
