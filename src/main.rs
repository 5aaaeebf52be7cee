//! # Order Processor
//!
//! Processes the reference batch: 20 orders on 4 workers, draining for at most 60 seconds.
//! Ctrl-C while draining cancels the remaining orders and exits.

use order_processor::lifecycle::{setup_tracing, OrderProcessor, ProcessorConfig, ProcessorError};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = ProcessorConfig::default();
    info!(?config, "Starting order processor");

    let interrupt = CancellationToken::new();
    let on_ctrl_c = interrupt.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    let processor = OrderProcessor::new(config);
    match processor.run(interrupt).await {
        Ok(report) => {
            info!(
                submitted = report.submitted,
                completed = report.completed(),
                failed = report.failed(),
                cancelled = report.cancelled(),
                "Application completed"
            );
        }
        Err(ProcessorError::Interrupted) => {
            warn!("Interrupted; outstanding orders were cancelled");
        }
        Err(e) => return Err(e.to_string()),
    }

    Ok(())
}
