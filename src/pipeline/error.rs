//! Error types for pipeline stages.

use super::Stage;
use thiserror::Error;

/// Errors that abort an order's pipeline.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StageError {
    /// The task's cancellation token fired while the stage was waiting.
    #[error("Cancelled during {0}")]
    Cancelled(Stage),

    /// The stage could not complete.
    #[error("{stage} failed: {message}")]
    Failed { stage: Stage, message: String },
}

impl StageError {
    pub fn failed(stage: Stage, message: impl Into<String>) -> Self {
        StageError::Failed {
            stage,
            message: message.into(),
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            StageError::Cancelled(stage) => *stage,
            StageError::Failed { stage, .. } => *stage,
        }
    }
}
