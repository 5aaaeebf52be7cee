use super::{ProcessorConfig, ProcessorError};
use crate::framework::WorkerPool;
use crate::model::Order;
use crate::pipeline::{DelayProvider, OrderOutcome, OrderPipeline, RandomDelay, TaskState};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// How the pool reached its terminated state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// Every submitted order finished within the drain timeout.
    Drained,
    /// The drain timeout elapsed and the remaining orders were cancelled.
    ForcedCancellation,
}

/// The outcome of one order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReport {
    pub order_id: u64,
    pub outcome: OrderOutcome,
}

/// Summary of a finished run.
///
/// A run succeeds even if every order failed; per-order results live in `outcomes`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub submitted: u64,
    /// One entry per order that reached an outcome, sorted by id.
    pub outcomes: Vec<OrderReport>,
    pub termination: Termination,
    /// Orders still queued when cancellation was forced.
    pub never_started: usize,
    /// Highest number of orders processed at the same time.
    pub peak_concurrency: usize,
}

impl RunReport {
    pub fn completed(&self) -> usize {
        self.count(TaskState::Completed)
    }

    pub fn failed(&self) -> usize {
        self.count(TaskState::Failed)
    }

    pub fn cancelled(&self) -> usize {
        self.count(TaskState::Cancelled)
    }

    fn count(&self, state: TaskState) -> usize {
        self.outcomes
            .iter()
            .filter(|report| report.outcome.state() == state)
            .count()
    }
}

/// The order processing driver.
///
/// `OrderProcessor` is responsible for:
/// - **Batch creation**: one [`Order`] per id in `1..=config.orders`
/// - **Submission**: one independent pool task per order, each running the shared [`OrderPipeline`]
/// - **Drain**: closing submission and waiting up to `config.drain_timeout` for the pool to empty
/// - **Forced cancellation**: cancelling whatever is still running when the wait runs out or is interrupted
///
/// # Example
///
/// ```ignore
/// let processor = OrderProcessor::new(ProcessorConfig::default());
/// let report = processor.run(CancellationToken::new()).await?;
/// info!(completed = report.completed(), "done");
/// ```
pub struct OrderProcessor {
    config: ProcessorConfig,
    pipeline: Arc<OrderPipeline>,
}

impl OrderProcessor {
    /// Creates a processor whose stages wait for random, stage-specific delays.
    pub fn new(config: ProcessorConfig) -> Self {
        Self::with_delays(config, Arc::new(RandomDelay))
    }

    pub fn with_delays(config: ProcessorConfig, delays: Arc<dyn DelayProvider>) -> Self {
        Self {
            config,
            pipeline: Arc::new(OrderPipeline::new(delays)),
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Processes the whole batch and shuts the pool down.
    ///
    /// # Shutdown Process
    ///
    /// 1. Submission closes once every order is queued.
    /// 2. The driver waits up to `drain_timeout` for all orders to finish.
    /// 3. If the timeout elapses, running orders are cancelled once and the report says
    ///    [`Termination::ForcedCancellation`].
    /// 4. If `interrupt` fires during the wait, running orders are cancelled and
    ///    [`ProcessorError::Interrupted`] is returned.
    pub async fn run(&self, interrupt: CancellationToken) -> Result<RunReport, ProcessorError> {
        let config = &self.config;
        config.validate()?;
        info!(
            orders = config.orders,
            workers = config.workers,
            drain_timeout = ?config.drain_timeout,
            "Starting order processing"
        );

        let mut pool = WorkerPool::new(config.workers)?;
        let (report_tx, mut report_rx) = mpsc::unbounded_channel();

        for order in Order::batch(config.orders) {
            let pipeline = self.pipeline.clone();
            let report_tx = report_tx.clone();
            pool.submit(move |cancel| async move {
                let outcome = pipeline.process(&order, &cancel).await;
                let _ = report_tx.send(OrderReport {
                    order_id: order.id(),
                    outcome,
                });
            })?;
        }
        drop(report_tx);
        pool.shutdown();

        let drained = tokio::select! {
            biased;
            _ = interrupt.cancelled() => None,
            drained = pool.await_termination(config.drain_timeout) => Some(drained),
        };

        let (termination, never_started) = match drained {
            Some(true) => (Termination::Drained, 0),
            Some(false) => {
                warn!(
                    timeout = ?config.drain_timeout,
                    "Orders still running after drain timeout"
                );
                let never_started = pool.shutdown_now(config.cancel_grace).await;
                (Termination::ForcedCancellation, never_started)
            }
            None => {
                warn!("Interrupted while waiting for orders, forcing cancellation");
                pool.shutdown_now(config.cancel_grace).await;
                return Err(ProcessorError::Interrupted);
            }
        };

        // Every task has finished or been aborted, so nothing else will be sent.
        let mut outcomes = Vec::new();
        while let Ok(report) = report_rx.try_recv() {
            outcomes.push(report);
        }
        outcomes.sort_by_key(|report| report.order_id);

        let report = RunReport {
            submitted: config.orders,
            outcomes,
            termination,
            never_started,
            peak_concurrency: pool.stats().peak_active,
        };
        info!(
            completed = report.completed(),
            failed = report.failed(),
            cancelled = report.cancelled(),
            never_started,
            termination = ?report.termination,
            "Order processing finished"
        );
        Ok(report)
    }
}
