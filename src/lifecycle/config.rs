use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Parameters of one processing run.
///
/// The defaults reproduce the reference run: 20 orders on 4 workers with a
/// 60 second drain timeout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Number of orders to create, with ids `1..=orders`.
    pub orders: u64,
    /// Size of the worker pool.
    pub workers: usize,
    /// How long to wait for submitted orders to finish before forcing cancellation.
    pub drain_timeout: Duration,
    /// After forcing cancellation, how long running tasks get before they are aborted.
    pub cancel_grace: Duration,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            orders: 20,
            workers: 4,
            drain_timeout: Duration::from_secs(60),
            cancel_grace: Duration::from_secs(5),
        }
    }
}

impl ProcessorConfig {
    pub fn new(orders: u64, workers: usize, drain_timeout: Duration) -> Self {
        Self {
            orders,
            workers,
            drain_timeout,
            ..Self::default()
        }
    }

    pub fn with_cancel_grace(mut self, cancel_grace: Duration) -> Self {
        self.cancel_grace = cancel_grace;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_run() {
        let config = ProcessorConfig::default();
        assert_eq!(config.orders, 20);
        assert_eq!(config.workers, 4);
        assert_eq!(config.drain_timeout, Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_workers_is_invalid() {
        let config = ProcessorConfig::new(5, 0, Duration::from_secs(1));
        assert_eq!(config.validate(), Err(ConfigError::NoWorkers));
    }

    #[test]
    fn test_zero_orders_is_valid() {
        let config = ProcessorConfig::new(0, 2, Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }
}
