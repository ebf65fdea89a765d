//! Structured mode command input.
//!
//! A `ModeRequest` names the target value for any subset of the four mode
//! categories. Absent categories are left untouched by the command FSM.

use serde::{Deserialize, Serialize};

use super::state::{CalibrationMode, ClearFaultMode, CommandMode, ControlMode};

/// One requested value per mode category; `None` means "leave as is".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeRequest {
    #[serde(default)]
    pub control: Option<ControlMode>,
    #[serde(default)]
    pub command: Option<CommandMode>,
    #[serde(default)]
    pub calibration: Option<CalibrationMode>,
    #[serde(default)]
    pub clear_fault: Option<ClearFaultMode>,
}

impl ModeRequest {
    /// Request touching no category.
    pub const fn empty() -> Self {
        Self {
            control: None,
            command: None,
            calibration: None,
            clear_fault: None,
        }
    }

    pub const fn with_control(mut self, mode: ControlMode) -> Self {
        self.control = Some(mode);
        self
    }

    pub const fn with_command(mut self, mode: CommandMode) -> Self {
        self.command = Some(mode);
        self
    }

    pub const fn with_calibration(mut self, mode: CalibrationMode) -> Self {
        self.calibration = Some(mode);
        self
    }

    pub const fn with_clear_fault(mut self, mode: ClearFaultMode) -> Self {
        self.clear_fault = Some(mode);
        self
    }

    /// True when no category is requested.
    pub const fn is_empty(&self) -> bool {
        self.control.is_none()
            && self.command.is_none()
            && self.calibration.is_none()
            && self.clear_fault.is_none()
    }
}
