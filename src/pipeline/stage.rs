use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// One of the four fulfillment steps every order goes through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Validate,
    CheckInventory,
    ProcessPayment,
    PrepareShipment,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 4] = [
        Stage::Validate,
        Stage::CheckInventory,
        Stage::ProcessPayment,
        Stage::PrepareShipment,
    ];

    /// Simulated latency bounds in milliseconds, half-open.
    pub fn delay_range(&self) -> Range<u64> {
        match self {
            Stage::Validate => 100..300,
            Stage::CheckInventory => 200..500,
            Stage::ProcessPayment => 300..700,
            Stage::PrepareShipment => 200..400,
        }
    }

    /// What the stage is doing, as written to the log when it starts.
    pub fn activity(&self) -> &'static str {
        match self {
            Stage::Validate => "Validating order",
            Stage::CheckInventory => "Checking inventory for order",
            Stage::ProcessPayment => "Processing payment for order",
            Stage::PrepareShipment => "Preparing shipment for order",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validate => "validate",
            Stage::CheckInventory => "check_inventory",
            Stage::ProcessPayment => "process_payment",
            Stage::PrepareShipment => "prepare_shipment",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        assert_eq!(
            Stage::ALL,
            [
                Stage::Validate,
                Stage::CheckInventory,
                Stage::ProcessPayment,
                Stage::PrepareShipment
            ]
        );
    }

    #[test]
    fn test_delay_ranges() {
        assert_eq!(Stage::Validate.delay_range(), 100..300);
        assert_eq!(Stage::CheckInventory.delay_range(), 200..500);
        assert_eq!(Stage::ProcessPayment.delay_range(), 300..700);
        assert_eq!(Stage::PrepareShipment.delay_range(), 200..400);
    }
}
