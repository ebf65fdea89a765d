//! ControlMode transition guard.
//!
//! A requested drive mode is only commanded if the mechanism is currently
//! observed in a mode it may legally leave toward the target. The rules are
//! a per-class allow-list held by [`TransitionPolicy`]; `Faulted` has no row
//! and can therefore never be requested.

use dex_common::mechanism::ControlMode;

/// Result of a guard check for one requested transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Request permitted under the currently observed mode.
    Allowed,
    /// Request denied; reason is operator-facing.
    Rejected(&'static str),
}

/// A control-mode request the guard turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RejectedTransition {
    /// Mode that was asked for.
    pub requested: ControlMode,
    /// Mode the mechanism was observed in at the time.
    pub observed: ControlMode,
}

/// Transition table for one mechanism class: requested mode paired with the
/// observed modes it may be requested from.
pub type GuardTable = &'static [(ControlMode, &'static [ControlMode])];

/// Gripper-class table. `Faulted` is entered by the hardware, never
/// commanded, so it has no row.
const GRIPPER_TABLE: GuardTable = &[
    (
        ControlMode::Bootloader,
        &[ControlMode::Bootloader, ControlMode::Off],
    ),
    (
        ControlMode::Off,
        &[ControlMode::Bootloader, ControlMode::Off],
    ),
    (
        ControlMode::Park,
        &[
            ControlMode::Faulted,
            ControlMode::Off,
            ControlMode::Park,
            ControlMode::Neutral,
            ControlMode::Drive,
        ],
    ),
    (
        ControlMode::Neutral,
        &[
            ControlMode::Faulted,
            ControlMode::Off,
            ControlMode::Park,
            ControlMode::Neutral,
        ],
    ),
    (
        ControlMode::Drive,
        &[ControlMode::Park, ControlMode::Neutral, ControlMode::Drive],
    ),
];

/// Transition policy for one mechanism class.
#[derive(Debug, Clone, Copy)]
pub struct TransitionPolicy {
    table: GuardTable,
}

impl TransitionPolicy {
    /// Policy for gripper-class mechanisms.
    pub const fn gripper() -> Self {
        Self {
            table: GRIPPER_TABLE,
        }
    }

    /// Policy from a custom table, for mechanism classes with other rules.
    pub const fn from_table(table: GuardTable) -> Self {
        Self { table }
    }

    /// Policy for a mechanism class name as it appears in the descriptor.
    pub fn for_class(class: &str) -> Option<Self> {
        match class {
            "gripper" => Some(Self::gripper()),
            _ => None,
        }
    }

    /// Check whether `requested` may be commanded while the mechanism is
    /// observed in `observed`.
    pub fn permit(&self, requested: ControlMode, observed: ControlMode) -> GuardDecision {
        let Some((_, allowed)) = self.table.iter().find(|(row, _)| *row == requested) else {
            return GuardDecision::Rejected("mode is hardware-entered, never commanded");
        };
        if allowed.contains(&observed) {
            GuardDecision::Allowed
        } else {
            GuardDecision::Rejected("observed mode is outside the allowed set")
        }
    }
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        Self::gripper()
    }
}
