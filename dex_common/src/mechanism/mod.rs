//! Mechanism mode model shared by the supervisor and its consumers.
//!
//! One mechanism is tracked along four independent mode categories; the
//! types here carry snapshots, command requests, and the fault flag word.

pub mod command;
pub mod fault;
pub mod state;

pub use command::ModeRequest;
pub use fault::{FAULT_LABELS, FaultFlags};
pub use state::{CalibrationMode, ClearFaultMode, CommandMode, ControlMode, ModeSnapshot};
