//! Observed-state side of the reconciliation loop.
//!
//! Projects the four status mode words into a `ModeSnapshot` on every call;
//! nothing is cached between calls. An unrecognized control-mode word is
//! projected as `Faulted`; unrecognized words in the other categories fall
//! back to their power-on defaults. Both cases log at debug level.

use std::sync::Arc;

use dex_common::mechanism::{
    CalibrationMode, ClearFaultMode, CommandMode, ControlMode, ModeSnapshot,
};
use dex_common::registers::{RegisterProvider, StatusBits};
use tracing::debug;

/// Register readback projected onto the four mode categories.
#[derive(Debug)]
pub struct ActualStateFsm<P> {
    mechanism: String,
    provider: Arc<P>,
    bits: StatusBits,
}

impl<P: RegisterProvider> ActualStateFsm<P> {
    pub fn new(mechanism: impl Into<String>, provider: Arc<P>, bits: StatusBits) -> Self {
        Self {
            mechanism: mechanism.into(),
            provider,
            bits,
        }
    }

    /// Read and decode the four mode words at this instant.
    pub fn snapshot(&self) -> ModeSnapshot {
        ModeSnapshot {
            control: self.decode_control(),
            command: self.decode_command(),
            calibration: self.decode_calibration(),
            clear_fault: self.decode_clear_fault(),
        }
    }

    fn read(&self, bit: &str) -> i32 {
        self.provider.get_status_value(&self.mechanism, bit)
    }

    fn decode_control(&self) -> ControlMode {
        let raw = self.read(&self.bits.control_mode);
        match u8::try_from(raw).ok().and_then(ControlMode::from_u8) {
            Some(mode) => mode,
            None => {
                debug!(
                    "Unrecognized control mode word {} on mechanism: {}",
                    raw, self.mechanism
                );
                ControlMode::Faulted
            }
        }
    }

    fn decode_command(&self) -> CommandMode {
        let raw = self.read(&self.bits.command_mode);
        u8::try_from(raw)
            .ok()
            .and_then(CommandMode::from_u8)
            .unwrap_or_else(|| {
                debug!(
                    "Unrecognized command mode word {} on mechanism: {}",
                    raw, self.mechanism
                );
                CommandMode::default()
            })
    }

    fn decode_calibration(&self) -> CalibrationMode {
        let raw = self.read(&self.bits.calibration_mode);
        u8::try_from(raw)
            .ok()
            .and_then(CalibrationMode::from_u8)
            .unwrap_or_else(|| {
                debug!(
                    "Unrecognized calibration mode word {} on mechanism: {}",
                    raw, self.mechanism
                );
                CalibrationMode::default()
            })
    }

    fn decode_clear_fault(&self) -> ClearFaultMode {
        let raw = self.read(&self.bits.clear_fault_mode);
        u8::try_from(raw)
            .ok()
            .and_then(ClearFaultMode::from_u8)
            .unwrap_or_else(|| {
                debug!(
                    "Unrecognized clear fault mode word {} on mechanism: {}",
                    raw, self.mechanism
                );
                ClearFaultMode::default()
            })
    }
}
