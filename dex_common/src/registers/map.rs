//! Register descriptor for one mechanism.
//!
//! Deserialized from a TOML descriptor at startup. The descriptor binds the
//! logical bit names the supervisor uses (mode words, health bits, constant
//! enables) to the register names the bus layer understands. Names are
//! resolved once at construction; a missing or unreadable descriptor is
//! fatal.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{ConfigError, ConfigLoader};

// ─── Sections ───────────────────────────────────────────────────────

/// `[mechanism]` — identity and supervision tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MechanismSection {
    /// Mechanism name as known to the register provider.
    pub name: String,

    /// Mechanism class; selects the transition guard table.
    #[serde(default = "default_class")]
    pub class: String,

    /// Grace period in seconds before a commanded/actual mismatch is
    /// reported as a timeout.
    #[serde(default = "default_time_limit")]
    pub time_limit: f64,
}

fn default_class() -> String {
    "gripper".to_string()
}

fn default_time_limit() -> f64 {
    2.0
}

/// `[status]` — readback register names.
///
/// The four mode words come first; the 13 health bits follow in scan
/// order, matching the fault summary layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusBits {
    pub control_mode: String,
    pub command_mode: String,
    pub calibration_mode: String,
    pub clear_fault_mode: String,

    pub proc_alive: String,
    pub comm_alive: String,
    pub bridge_fault: String,
    pub joint_fault: String,
    pub bus_voltage_fault: String,
    pub aps_fault: String,
    pub aps1_tol_fault: String,
    pub aps2_tol_fault: String,
    pub enc_drift_fault: String,
    pub velocity_fault: String,
    pub limit_fault: String,
    pub coeffs_loaded: String,
    pub current_fault: String,
}

/// `[control]` — command register names.
///
/// The two enable bits are optional: they are written to 1 exactly once at
/// construction, and only when the mechanism exposes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlBits {
    pub control_mode: String,
    pub command_mode: String,
    pub calibration_mode: String,
    pub clear_fault_mode: String,

    #[serde(default)]
    pub comm_enable: Option<String>,
    #[serde(default)]
    pub sensor_enable: Option<String>,
}

// ─── RegisterMap ────────────────────────────────────────────────────

/// Complete register descriptor for one mechanism.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterMap {
    pub mechanism: MechanismSection,
    pub status: StatusBits,
    pub control: ControlBits,
}

impl RegisterMap {
    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load and validate a descriptor file.
    pub fn load_validated(path: &Path) -> Result<Self, ConfigError> {
        let map = Self::load(path)?;
        map.validate()?;
        Ok(map)
    }

    /// Semantic validation: non-empty names, sane grace period.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mechanism.name.is_empty() {
            return Err(ConfigError::ValidationError(
                "mechanism.name cannot be empty".to_string(),
            ));
        }
        if !(self.mechanism.time_limit.is_finite() && self.mechanism.time_limit > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "mechanism.time_limit must be a positive number of seconds, got {}",
                self.mechanism.time_limit
            )));
        }
        for (key, bit) in self.status_entries() {
            if bit.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "status.{key} cannot be empty"
                )));
            }
        }
        for (key, bit) in self.required_control_entries() {
            if bit.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "control.{key} cannot be empty"
                )));
            }
        }
        Ok(())
    }

    /// All `[status]` bindings as (descriptor key, register name) pairs,
    /// in declaration order.
    pub fn status_entries(&self) -> [(&'static str, &str); 17] {
        let s = &self.status;
        [
            ("control_mode", &s.control_mode),
            ("command_mode", &s.command_mode),
            ("calibration_mode", &s.calibration_mode),
            ("clear_fault_mode", &s.clear_fault_mode),
            ("proc_alive", &s.proc_alive),
            ("comm_alive", &s.comm_alive),
            ("bridge_fault", &s.bridge_fault),
            ("joint_fault", &s.joint_fault),
            ("bus_voltage_fault", &s.bus_voltage_fault),
            ("aps_fault", &s.aps_fault),
            ("aps1_tol_fault", &s.aps1_tol_fault),
            ("aps2_tol_fault", &s.aps2_tol_fault),
            ("enc_drift_fault", &s.enc_drift_fault),
            ("velocity_fault", &s.velocity_fault),
            ("limit_fault", &s.limit_fault),
            ("coeffs_loaded", &s.coeffs_loaded),
            ("current_fault", &s.current_fault),
        ]
    }

    /// The mandatory `[control]` bindings (mode command words).
    pub fn required_control_entries(&self) -> [(&'static str, &str); 4] {
        let c = &self.control;
        [
            ("control_mode", &c.control_mode),
            ("command_mode", &c.command_mode),
            ("calibration_mode", &c.calibration_mode),
            ("clear_fault_mode", &c.clear_fault_mode),
        ]
    }

    /// The optional constant enable bits, where declared.
    pub fn constant_control_entries(&self) -> impl Iterator<Item = &str> {
        self.control
            .comm_enable
            .as_deref()
            .into_iter()
            .chain(self.control.sensor_enable.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const GRIPPER_DESCRIPTOR: &str = r#"
[mechanism]
name = "left_gripper"
class = "gripper"
time_limit = 2.0

[status]
control_mode = "GripCtrlModeStat"
command_mode = "GripCmdModeStat"
calibration_mode = "GripCalModeStat"
clear_fault_mode = "GripClearFaultStat"
proc_alive = "GripProcAlive"
comm_alive = "GripCommAlive"
bridge_fault = "GripBridgeFault"
joint_fault = "GripJointFault"
bus_voltage_fault = "GripBusVoltFault"
aps_fault = "GripApsFault"
aps1_tol_fault = "GripAps1TolFault"
aps2_tol_fault = "GripAps2TolFault"
enc_drift_fault = "GripEncDriftFault"
velocity_fault = "GripVelocityFault"
limit_fault = "GripLimitFault"
coeffs_loaded = "GripCoeffsLoaded"
current_fault = "GripCurrentFault"

[control]
control_mode = "GripCtrlModeCmd"
command_mode = "GripCmdModeCmd"
calibration_mode = "GripCalModeCmd"
clear_fault_mode = "GripClearFaultCmd"
comm_enable = "GripCommEnable"
sensor_enable = "GripSensorEnable"
"#;

    #[test]
    fn parse_full_descriptor() {
        let map = RegisterMap::from_toml(GRIPPER_DESCRIPTOR).unwrap();
        assert_eq!(map.mechanism.name, "left_gripper");
        assert_eq!(map.mechanism.class, "gripper");
        assert_eq!(map.mechanism.time_limit, 2.0);
        assert_eq!(map.status.control_mode, "GripCtrlModeStat");
        assert_eq!(map.status.current_fault, "GripCurrentFault");
        assert_eq!(map.control.comm_enable.as_deref(), Some("GripCommEnable"));
        map.validate().unwrap();
    }

    #[test]
    fn class_and_time_limit_default() {
        let toml_str = GRIPPER_DESCRIPTOR
            .replace("class = \"gripper\"\n", "")
            .replace("time_limit = 2.0\n", "");
        let map = RegisterMap::from_toml(&toml_str).unwrap();
        assert_eq!(map.mechanism.class, "gripper");
        assert_eq!(map.mechanism.time_limit, 2.0);
    }

    #[test]
    fn enable_bits_are_optional() {
        let toml_str = GRIPPER_DESCRIPTOR
            .replace("comm_enable = \"GripCommEnable\"\n", "")
            .replace("sensor_enable = \"GripSensorEnable\"\n", "");
        let map = RegisterMap::from_toml(&toml_str).unwrap();
        assert!(map.control.comm_enable.is_none());
        assert!(map.control.sensor_enable.is_none());
        assert_eq!(map.constant_control_entries().count(), 0);
    }

    #[test]
    fn missing_status_key_is_a_parse_error() {
        let toml_str = GRIPPER_DESCRIPTOR.replace("joint_fault = \"GripJointFault\"\n", "");
        let err = RegisterMap::from_toml(&toml_str).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn zero_time_limit_fails_validation() {
        let toml_str = GRIPPER_DESCRIPTOR.replace("time_limit = 2.0", "time_limit = 0.0");
        let map = RegisterMap::from_toml(&toml_str).unwrap();
        assert!(matches!(
            map.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn empty_bit_name_fails_validation() {
        let toml_str =
            GRIPPER_DESCRIPTOR.replace("proc_alive = \"GripProcAlive\"", "proc_alive = \"\"");
        let map = RegisterMap::from_toml(&toml_str).unwrap();
        let err = map.validate().unwrap_err();
        assert!(err.to_string().contains("proc_alive"));
    }

    #[test]
    fn status_entries_keep_scan_order() {
        let map = RegisterMap::from_toml(GRIPPER_DESCRIPTOR).unwrap();
        let entries = map.status_entries();
        assert_eq!(entries[0].0, "control_mode");
        assert_eq!(entries[4].0, "proc_alive");
        assert_eq!(entries[16].0, "current_fault");
    }

    #[test]
    fn load_validated_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(GRIPPER_DESCRIPTOR.as_bytes()).unwrap();
        let map = RegisterMap::load_validated(file.path()).unwrap();
        assert_eq!(map.mechanism.name, "left_gripper");
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let err = RegisterMap::load_validated(Path::new("/nonexistent/gripper.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound));
    }
}
