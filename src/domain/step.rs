use serde::Serialize;
use std::fmt;

/// The stages a payment flow walks through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStep {
    Review,
    Configure,
    Transfer,
    Confirm,
}

impl PaymentStep {
    pub const ALL: [PaymentStep; 4] = [
        PaymentStep::Review,
        PaymentStep::Configure,
        PaymentStep::Transfer,
        PaymentStep::Confirm,
    ];

    /// The following step, or `None` at `Confirm`.
    pub fn next(self) -> Option<Self> {
        match self {
            PaymentStep::Review => Some(PaymentStep::Configure),
            PaymentStep::Configure => Some(PaymentStep::Transfer),
            PaymentStep::Transfer => Some(PaymentStep::Confirm),
            PaymentStep::Confirm => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == PaymentStep::Confirm
    }

    /// Display title. The transfer step is named after the settlement asset.
    pub fn title(self, asset: &str) -> String {
        match self {
            PaymentStep::Review => "Invoice Review".to_string(),
            PaymentStep::Configure => "Payment Details".to_string(),
            PaymentStep::Transfer => format!("{asset} Transfer"),
            PaymentStep::Confirm => "Confirmation".to_string(),
        }
    }

    /// Status of `self` when `current` is the active step.
    pub fn status_relative_to(self, current: PaymentStep) -> StepStatus {
        match self.cmp(&current) {
            std::cmp::Ordering::Less => StepStatus::Completed,
            std::cmp::Ordering::Equal => StepStatus::Active,
            std::cmp::Ordering::Greater => StepStatus::Pending,
        }
    }
}

impl fmt::Display for PaymentStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentStep::Review => "review",
            PaymentStep::Configure => "configure",
            PaymentStep::Transfer => "transfer",
            PaymentStep::Confirm => "confirm",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Completed,
    Active,
    Pending,
}

/// One entry of the progress indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub step: PaymentStep,
    pub title: String,
    pub status: StepStatus,
}
