//! Prelude module for common re-exports.
//!
//! Consumers can `use dex_common::prelude::*;` and get the types that
//! appear in nearly every supervision call site without listing individual
//! paths.

use std::time::Duration;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader};

// ─── Mechanism model ────────────────────────────────────────────────
pub use crate::mechanism::command::ModeRequest;
pub use crate::mechanism::fault::{FAULT_LABELS, FaultFlags};
pub use crate::mechanism::state::{
    CalibrationMode, ClearFaultMode, CommandMode, ControlMode, ModeSnapshot,
};

// ─── Registers ──────────────────────────────────────────────────────
pub use crate::registers::map::RegisterMap;
pub use crate::registers::provider::RegisterProvider;
pub use crate::registers::sim::SimRegisterBank;

/// Default grace period before a commanded/actual mismatch is reported.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(2);
