//! Intake state machine: tracks which step of the lead wizard a visitor is on.

use serde::{Deserialize, Serialize};

/// Total number of visible wizard steps.
pub const STEP_COUNT: u8 = 3;

/// The steps of the lead intake wizard.
///
/// Progresses linearly: Address → Details → Contact → Submitting → Success.
/// There are no backward transitions; `reset` starts a fresh flow instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStep {
    #[default]
    Address,
    Details,
    Contact,
    Submitting,
    Success,
}

impl IntakeStep {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: IntakeStep) -> bool {
        use IntakeStep::*;
        matches!(
            (self, target),
            (Address, Details) | (Details, Contact) | (Contact, Submitting) | (Submitting, Success)
        )
    }

    /// Get the next step in the linear progression, if any.
    pub fn next(&self) -> Option<IntakeStep> {
        use IntakeStep::*;
        match self {
            Address => Some(Details),
            Details => Some(Contact),
            Contact => Some(Submitting),
            Submitting => Some(Success),
            Success => None,
        }
    }

    /// Whether this step is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// 1-based step number shown as "Step n of 3". Submission stays on the
    /// contact step visually, so the result is always in `1..=3`.
    pub fn number(&self) -> u8 {
        match self {
            Self::Address => 1,
            Self::Details => 2,
            Self::Contact | Self::Submitting | Self::Success => 3,
        }
    }

    /// Fraction of the progress bar to fill.
    pub fn progress(&self) -> f32 {
        f32::from(self.number()) / f32::from(STEP_COUNT)
    }

    /// Headline shown above the step's fields.
    pub fn headline(&self) -> &'static str {
        match self {
            Self::Address => "What's your home worth?",
            Self::Details => "Tell us about the property",
            Self::Contact | Self::Submitting => "Where should we send the report?",
            Self::Success => "Request Received",
        }
    }
}

impl std::fmt::Display for IntakeStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Address => "address",
            Self::Details => "details",
            Self::Contact => "contact",
            Self::Submitting => "submitting",
            Self::Success => "success",
        };
        write!(f, "{s}")
    }
}
