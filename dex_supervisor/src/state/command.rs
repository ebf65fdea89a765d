//! Commanded-intent side of the reconciliation loop.
//!
//! Tracks the most recent accepted value per mode category and writes the
//! matching word to the control registers. ControlMode requests pass the
//! transition guard first; the other three categories are written
//! unconditionally.

use std::sync::Arc;

use dex_common::mechanism::{ModeRequest, ModeSnapshot};
use dex_common::registers::{ControlBits, RegisterProvider};
use tracing::{debug, warn};

use crate::guard::{GuardDecision, RejectedTransition, TransitionPolicy};

/// Upper bound on rejections produced by a single request, one per
/// category. Only ControlMode is guarded today.
pub const MAX_REJECTIONS: usize = 4;

/// Commanded mode state and the control-register writer behind it.
#[derive(Debug)]
pub struct CommandStateFsm<P> {
    mechanism: String,
    provider: Arc<P>,
    bits: ControlBits,
    policy: TransitionPolicy,
    commanded: ModeSnapshot,
}

impl<P: RegisterProvider> CommandStateFsm<P> {
    /// FSM starting at the power-on snapshot. Nothing is written to the
    /// registers until the first accepted request.
    pub fn new(
        mechanism: impl Into<String>,
        provider: Arc<P>,
        bits: ControlBits,
        policy: TransitionPolicy,
    ) -> Self {
        Self {
            mechanism: mechanism.into(),
            provider,
            bits,
            policy,
            commanded: ModeSnapshot::new(),
        }
    }

    /// Most recent accepted value per category.
    pub fn snapshot(&self) -> ModeSnapshot {
        self.commanded
    }

    /// Apply a request against the currently observed modes.
    ///
    /// Accepted categories are written to their command registers and
    /// recorded in the commanded snapshot. A guarded ControlMode request
    /// the policy denies leaves the commanded state untouched, logs one
    /// warning and is reported in the returned list.
    pub fn apply(
        &mut self,
        request: &ModeRequest,
        observed: &ModeSnapshot,
    ) -> heapless::Vec<RejectedTransition, MAX_REJECTIONS> {
        let mut rejections = heapless::Vec::new();

        if let Some(mode) = request.control {
            match self.policy.permit(mode, observed.control) {
                GuardDecision::Allowed => {
                    self.provider
                        .set_control_value(&self.mechanism, &self.bits.control_mode, mode as i32);
                    self.commanded.control = mode;
                    debug!("Commanded {} on mechanism: {}", mode, self.mechanism);
                }
                GuardDecision::Rejected(reason) => {
                    warn!(
                        "Transition to {} not allowed on mechanism: {}, current actual state: {} ({})",
                        mode, self.mechanism, observed.control, reason
                    );
                    rejections
                        .push(RejectedTransition {
                            requested: mode,
                            observed: observed.control,
                        })
                        .ok();
                }
            }
        }

        if let Some(mode) = request.command {
            self.provider
                .set_control_value(&self.mechanism, &self.bits.command_mode, mode as i32);
            self.commanded.command = mode;
        }
        if let Some(mode) = request.calibration {
            self.provider
                .set_control_value(&self.mechanism, &self.bits.calibration_mode, mode as i32);
            self.commanded.calibration = mode;
        }
        if let Some(mode) = request.clear_fault {
            self.provider
                .set_control_value(&self.mechanism, &self.bits.clear_fault_mode, mode as i32);
            self.commanded.clear_fault = mode;
        }

        rejections
    }
}
