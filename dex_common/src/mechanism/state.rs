//! Mode enums for mechanism supervision.
//!
//! All enums use `#[repr(u8)]` so the discriminant doubles as the word
//! encoding on the status/command registers. A mechanism is tracked along
//! four independent mode categories (control, command, calibration,
//! clear-fault); `ModeSnapshot` bundles one value per category as read or
//! commanded at a single instant.

use core::fmt;
use serde::{Deserialize, Serialize};

// ─── ControlMode ────────────────────────────────────────────────────

/// Power/drive stage mode of a mechanism.
///
/// Only ControlMode transitions are guarded: moving a mechanism's drive
/// stage out of sequence has physical consequences. `Faulted` is reported
/// by the hardware, never commanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ControlMode {
    /// Firmware update / pre-boot supervision.
    Bootloader = 0,
    /// Drive stage unpowered.
    Off = 1,
    /// Bridge powered, motor held.
    Park = 2,
    /// Bridge powered, motor free.
    Neutral = 3,
    /// Closed-loop drive active.
    Drive = 4,
    /// Hardware-reported fault latch.
    Faulted = 5,
}

impl ControlMode {
    /// Convert from a raw register word. Returns `None` for unknown values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Bootloader),
            1 => Some(Self::Off),
            2 => Some(Self::Park),
            3 => Some(Self::Neutral),
            4 => Some(Self::Drive),
            5 => Some(Self::Faulted),
            _ => None,
        }
    }

    /// Wire name used in operator-facing logs.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bootloader => "BOOTLOADER",
            Self::Off => "OFF",
            Self::Park => "PARK",
            Self::Neutral => "NEUTRAL",
            Self::Drive => "DRIVE",
            Self::Faulted => "FAULTED",
        }
    }
}

impl Default for ControlMode {
    fn default() -> Self {
        Self::Off
    }
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── CommandMode ────────────────────────────────────────────────────

/// Servo loop closure mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CommandMode {
    /// Raw motor command passthrough.
    MotCom = 0,
    /// Stall/torque hold.
    StallMode = 1,
    /// Multi-loop position, stepwise setpoints.
    MultiLoopStep = 2,
    /// Multi-loop position, smoothed setpoints.
    MultiLoopSmooth = 3,
}

impl CommandMode {
    /// Convert from a raw register word. Returns `None` for unknown values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::MotCom),
            1 => Some(Self::StallMode),
            2 => Some(Self::MultiLoopStep),
            3 => Some(Self::MultiLoopSmooth),
            _ => None,
        }
    }

    /// Wire name used in operator-facing logs.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MotCom => "MOTCOM",
            Self::StallMode => "STALLMODE",
            Self::MultiLoopStep => "MULTILOOPSTEP",
            Self::MultiLoopSmooth => "MULTILOOPSMOOTH",
        }
    }
}

impl Default for CommandMode {
    fn default() -> Self {
        Self::MotCom
    }
}

impl fmt::Display for CommandMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── CalibrationMode ────────────────────────────────────────────────

/// Calibration routine gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CalibrationMode {
    Disable = 0,
    Enable = 1,
}

impl CalibrationMode {
    /// Convert from a raw register word. Returns `None` for unknown values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Disable),
            1 => Some(Self::Enable),
            _ => None,
        }
    }

    /// Wire name used in operator-facing logs.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Disable => "DISABLE",
            Self::Enable => "ENABLE",
        }
    }
}

impl Default for CalibrationMode {
    fn default() -> Self {
        Self::Disable
    }
}

impl fmt::Display for CalibrationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── ClearFaultMode ─────────────────────────────────────────────────

/// Fault-latch clear request gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ClearFaultMode {
    Disable = 0,
    Enable = 1,
}

impl ClearFaultMode {
    /// Convert from a raw register word. Returns `None` for unknown values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Disable),
            1 => Some(Self::Enable),
            _ => None,
        }
    }

    /// Wire name used in operator-facing logs.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Disable => "DISABLE",
            Self::Enable => "ENABLE",
        }
    }
}

impl Default for ClearFaultMode {
    fn default() -> Self {
        Self::Disable
    }
}

impl fmt::Display for ClearFaultMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── ModeSnapshot ───────────────────────────────────────────────────

/// One value per mode category, taken at a single instant.
///
/// Produced either by the actual-state FSM (register readback) or by the
/// command FSM (commanded intent). Two snapshots compare category-wise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeSnapshot {
    pub control: ControlMode,
    pub command: CommandMode,
    pub calibration: CalibrationMode,
    pub clear_fault: ClearFaultMode,
}

impl ModeSnapshot {
    /// Snapshot with every category at its power-on default.
    pub const fn new() -> Self {
        Self {
            control: ControlMode::Off,
            command: CommandMode::MotCom,
            calibration: CalibrationMode::Disable,
            clear_fault: ClearFaultMode::Disable,
        }
    }
}

impl fmt::Display for ModeSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.control, self.command, self.calibration, self.clear_fault
        )
    }
}
