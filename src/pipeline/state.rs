use super::Stage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a single order's task is in its life.
///
/// ```text
/// Submitted -> Validating -> CheckingInventory -> ProcessingPayment -> PreparingShipment -> Completed
///                  \________________\___________________\___________________\--> Failed | Cancelled
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskState {
    Submitted,
    Validating,
    CheckingInventory,
    ProcessingPayment,
    PreparingShipment,
    Completed,
    Failed,
    Cancelled,
}

impl TaskState {
    /// The state a task is in while running `stage`.
    pub fn entering(stage: Stage) -> Self {
        match stage {
            Stage::Validate => TaskState::Validating,
            Stage::CheckInventory => TaskState::CheckingInventory,
            Stage::ProcessPayment => TaskState::ProcessingPayment,
            Stage::PrepareShipment => TaskState::PreparingShipment,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Failed | TaskState::Cancelled
        )
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskState::Submitted => "submitted",
            TaskState::Validating => "validating",
            TaskState::CheckingInventory => "checking_inventory",
            TaskState::ProcessingPayment => "processing_payment",
            TaskState::PreparingShipment => "preparing_shipment",
            TaskState::Completed => "completed",
            TaskState::Failed => "failed",
            TaskState::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}
