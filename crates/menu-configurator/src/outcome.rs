//! Results of applying actions and attempting commits.

use std::fmt;

use menu_commerce::{ModifierGroupId, Money};
use serde::Serialize;

/// What happened to an action.
///
/// Rejected actions are not errors: the state is left unchanged and the
/// reason is reported so the caller can explain it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    Applied,
    Ignored(IgnoreReason),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// Why an action left the state unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// No session is ready to receive actions.
    NotReady,
    /// The option is not offered by this product.
    UnknownOption,
    /// The option's multi-choice group is already at its maximum.
    GroupFull,
    /// The product is not configured step by step.
    NotAWizard,
    /// The current required step is not satisfied.
    StepIncomplete,
    /// Already at the last step.
    NoNextStep,
    /// Already at the first step.
    NoPreviousStep,
    /// The product's category does not offer half-and-half.
    SplitNotAllowed,
    /// The product cannot be its own second flavor.
    SameFlavor,
    /// The second flavor is not a sibling in the category.
    UnknownFlavor,
    /// There is no split to remove.
    SplitInactive,
    /// Quantity is already 1.
    QuantityAtMinimum,
    /// Quantity is already at the configured maximum.
    QuantityAtMaximum,
    /// The kit does not offer this product.
    UnknownVariety,
    /// The variety's count is already zero.
    VarietyEmpty,
    /// The action would not change anything.
    Unchanged,
}

impl IgnoreReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotReady => "session not ready",
            Self::UnknownOption => "unknown option",
            Self::GroupFull => "group is full",
            Self::NotAWizard => "product has no steps",
            Self::StepIncomplete => "current step is incomplete",
            Self::NoNextStep => "already at last step",
            Self::NoPreviousStep => "already at first step",
            Self::SplitNotAllowed => "category does not allow half-and-half",
            Self::SameFlavor => "product cannot be its own second flavor",
            Self::UnknownFlavor => "second flavor is not in this category",
            Self::SplitInactive => "no second flavor to remove",
            Self::QuantityAtMinimum => "quantity already at minimum",
            Self::QuantityAtMaximum => "quantity already at maximum",
            Self::UnknownVariety => "product is not part of this kit",
            Self::VarietyEmpty => "variety count already zero",
            Self::Unchanged => "nothing to change",
        }
    }
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reason a commit is refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Blocker {
    /// A required group is short of its minimum.
    RequiredGroup {
        group_id: ModifierGroupId,
        name: String,
        selected: u32,
        min: u32,
    },
    /// Half-and-half was started without a second flavor.
    SplitIncomplete,
    /// The kit total differs from its base quantity.
    KitIncomplete { total: u32, required: u32 },
}

impl fmt::Display for Blocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Blocker::RequiredGroup {
                name, selected, min, ..
            } => write!(f, "{}: {} of {} required selected", name, selected, min),
            Blocker::SplitIncomplete => write!(f, "choose the second flavor"),
            Blocker::KitIncomplete { total, required } => {
                write!(f, "kit has {} of {} units", total, required)
            }
        }
    }
}

/// Result of a commit attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommitOutcome {
    /// Line items were sent to the cart.
    Committed {
        /// Number of cart calls made.
        units: u32,
        unit_price: Money,
        total: Money,
    },
    /// Nothing was sent; the session is unchanged.
    Blocked { blockers: Vec<Blocker> },
}

impl CommitOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, CommitOutcome::Committed { .. })
    }
}
