//! Mode reconciliation supervisor.
//!
//! One supervisor owns one mechanism. Every control tick it compares the
//! commanded snapshot against the register readback, category by category,
//! and reports mismatches that outlive the descriptor's grace period. A
//! hardware fault latch suspends the timeout and is reported once on its
//! rising edge; the fault summary names the tripped health bits.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dex_common::config::ConfigError;
use dex_common::mechanism::{ControlMode, ModeRequest, ModeSnapshot};
use dex_common::registers::{RegisterMap, RegisterProvider};
use tracing::info;

use crate::fault::FaultScan;
use crate::guard::{RejectedTransition, TransitionPolicy};
use crate::state::actual::ActualStateFsm;
use crate::state::command::{CommandStateFsm, MAX_REJECTIONS};

// ─── BadStateTimer ──────────────────────────────────────────────────

/// Per-category mismatch timer.
///
/// Restarts at the instant a category last matched or last reported a
/// timeout; it never restarts merely because time passed.
#[derive(Debug, Clone, Copy)]
struct BadStateTimer {
    since: Instant,
}

impl BadStateTimer {
    fn new(now: Instant) -> Self {
        Self { since: now }
    }

    fn reset(&mut self, now: Instant) {
        self.since = now;
    }

    fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.since)
    }
}

// ─── MechanismSupervisor ────────────────────────────────────────────

/// Supervises one mechanism's four mode categories.
#[derive(Debug)]
pub struct MechanismSupervisor<P> {
    mechanism: String,
    time_limit: Duration,
    command_fsm: CommandStateFsm<P>,
    actual_fsm: ActualStateFsm<P>,
    fault_scan: FaultScan<P>,
    prev_actual: ModeSnapshot,
    actual: ModeSnapshot,
    commanded: ModeSnapshot,
    control_timer: BadStateTimer,
    command_timer: BadStateTimer,
    calibration_timer: BadStateTimer,
    clear_fault_timer: BadStateTimer,
}

impl<P: RegisterProvider> MechanismSupervisor<P> {
    /// Supervisor with the transition policy selected by the descriptor's
    /// mechanism class.
    pub fn new(provider: Arc<P>, map: RegisterMap) -> Result<Self, ConfigError> {
        let policy = TransitionPolicy::for_class(&map.mechanism.class).ok_or_else(|| {
            ConfigError::ValidationError(format!(
                "no transition policy for mechanism class: {}",
                map.mechanism.class
            ))
        })?;
        Self::with_policy(provider, map, policy)
    }

    /// Supervisor with an explicit transition policy.
    ///
    /// Validates the descriptor and checks that every named register exists
    /// on the provider, then writes the optional constant enable bits to 1
    /// where the mechanism exposes them. After this returns, register
    /// access is infallible.
    pub fn with_policy(
        provider: Arc<P>,
        map: RegisterMap,
        policy: TransitionPolicy,
    ) -> Result<Self, ConfigError> {
        map.validate()?;
        let mechanism = map.mechanism.name.clone();

        for (key, bit) in map.status_entries() {
            if !provider.has_status_bit(&mechanism, bit) {
                return Err(ConfigError::ValidationError(format!(
                    "status.{key}: register {bit} not found on mechanism {mechanism}"
                )));
            }
        }
        for (key, bit) in map.required_control_entries() {
            if !provider.has_control_bit(&mechanism, bit) {
                return Err(ConfigError::ValidationError(format!(
                    "control.{key}: register {bit} not found on mechanism {mechanism}"
                )));
            }
        }
        for bit in map.constant_control_entries() {
            if provider.has_control_bit(&mechanism, bit) {
                provider.set_control_value(&mechanism, bit, 1);
            }
        }

        let time_limit = Duration::from_secs_f64(map.mechanism.time_limit);
        let command_fsm = CommandStateFsm::new(
            mechanism.clone(),
            provider.clone(),
            map.control.clone(),
            policy,
        );
        let actual_fsm =
            ActualStateFsm::new(mechanism.clone(), provider.clone(), map.status.clone());
        let fault_scan = FaultScan::new(mechanism.clone(), provider, map.status);

        info!(
            "Supervising mechanism: {} (class: {}, time limit: {:.1}s)",
            mechanism, map.mechanism.class, map.mechanism.time_limit
        );

        let now = Instant::now();
        Ok(Self {
            mechanism,
            time_limit,
            command_fsm,
            actual_fsm,
            fault_scan,
            prev_actual: ModeSnapshot::new(),
            actual: ModeSnapshot::new(),
            commanded: ModeSnapshot::new(),
            control_timer: BadStateTimer::new(now),
            command_timer: BadStateTimer::new(now),
            calibration_timer: BadStateTimer::new(now),
            clear_fault_timer: BadStateTimer::new(now),
        })
    }

    /// Run one reconciliation tick against the current clock.
    pub fn verify(&mut self) -> bool {
        self.verify_at(Instant::now())
    }

    /// Run one reconciliation tick at an explicit instant.
    ///
    /// Refreshes the actual and commanded snapshots, then checks every
    /// category and returns the conjunction. False means at least one
    /// category is faulted or has just been reported as timed out; a
    /// mismatch still inside its grace period counts as good.
    pub fn verify_at(&mut self, now: Instant) -> bool {
        self.prev_actual = self.actual;
        self.actual = self.actual_fsm.snapshot();
        self.commanded = self.command_fsm.snapshot();

        // Bound separately: every check must run each tick to keep its
        // own timer current.
        let control = self.verify_control(now);
        let command = verify_unguarded(
            &self.mechanism,
            &mut self.command_timer,
            self.time_limit,
            self.commanded.command,
            self.actual.command,
            now,
        );
        let calibration = verify_unguarded(
            &self.mechanism,
            &mut self.calibration_timer,
            self.time_limit,
            self.commanded.calibration,
            self.actual.calibration,
            now,
        );
        let clear_fault = verify_unguarded(
            &self.mechanism,
            &mut self.clear_fault_timer,
            self.time_limit,
            self.commanded.clear_fault,
            self.actual.clear_fault,
            now,
        );

        control && command && calibration && clear_fault
    }

    /// ControlMode check. Unlike the unguarded categories a hardware fault
    /// latch holds the timer and is reported once on its rising edge.
    fn verify_control(&mut self, now: Instant) -> bool {
        if self.actual.control == self.commanded.control {
            self.control_timer.reset(now);
            return true;
        }

        if self.actual.control == ControlMode::Faulted {
            self.control_timer.reset(now);
            if self.prev_actual.control != ControlMode::Faulted {
                info!("Joint faulted: {}", self.mechanism);
            }
            return false;
        }

        if self.control_timer.elapsed(now) > self.time_limit {
            info!(
                "Timed out waiting for {} received {} on mechanism: {}",
                self.commanded.control, self.actual.control, self.mechanism
            );
            self.control_timer.reset(now);
            return false;
        }

        true
    }

    /// Operator-facing fault summary at the current clock.
    pub fn fault_summary(&mut self) -> String {
        self.fault_summary_at(Instant::now())
    }

    /// Operator-facing fault summary at an explicit instant.
    ///
    /// Runs a verify tick first so the snapshots are fresh. `"none"` unless
    /// the mechanism reads `FAULTED`; otherwise `"FAULT"` plus the tripped
    /// health bit labels in scan order.
    pub fn fault_summary_at(&mut self, now: Instant) -> String {
        self.verify_at(now);
        if self.actual.control != ControlMode::Faulted {
            return "none".to_string();
        }
        self.fault_scan.scan().summary()
    }

    /// Apply a mode request against a fresh readback snapshot.
    pub fn apply_command(
        &mut self,
        request: &ModeRequest,
    ) -> heapless::Vec<RejectedTransition, MAX_REJECTIONS> {
        let observed = self.actual_fsm.snapshot();
        self.command_fsm.apply(request, &observed)
    }

    /// Fresh readback snapshot.
    pub fn actual_states(&self) -> ModeSnapshot {
        self.actual_fsm.snapshot()
    }

    /// Most recent accepted command per category.
    pub fn command_states(&self) -> ModeSnapshot {
        self.command_fsm.snapshot()
    }

    pub fn mechanism(&self) -> &str {
        &self.mechanism
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }
}

/// Mismatch check for a category with no fault latch of its own.
fn verify_unguarded<M>(
    mechanism: &str,
    timer: &mut BadStateTimer,
    time_limit: Duration,
    commanded: M,
    actual: M,
    now: Instant,
) -> bool
where
    M: PartialEq + fmt::Display + Copy,
{
    if actual == commanded {
        timer.reset(now);
        return true;
    }

    if timer.elapsed(now) > time_limit {
        info!("Timed out waiting for {commanded} received {actual} on mechanism: {mechanism}");
        timer.reset(now);
        return false;
    }

    true
}
