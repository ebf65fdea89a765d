//! Health bit scan.
//!
//! Reads the 13 health status bits through the provider and folds them into
//! a [`FaultFlags`] word. Polarity differs per bit: the alive/loaded bits
//! trip when they read 0, the fault bits trip when they read 1.

use std::sync::Arc;

use dex_common::mechanism::FaultFlags;
use dex_common::registers::{RegisterProvider, StatusBits};

/// Reader of a mechanism's health status bits.
#[derive(Debug)]
pub struct FaultScan<P> {
    mechanism: String,
    provider: Arc<P>,
    bits: StatusBits,
}

impl<P: RegisterProvider> FaultScan<P> {
    pub fn new(mechanism: impl Into<String>, provider: Arc<P>, bits: StatusBits) -> Self {
        Self {
            mechanism: mechanism.into(),
            provider,
            bits,
        }
    }

    /// Scan all 13 health bits at this instant.
    pub fn scan(&self) -> FaultFlags {
        let mut flags = FaultFlags::empty();

        if self.read(&self.bits.proc_alive) == 0 {
            flags |= FaultFlags::PROC_NOT_ALIVE;
        }
        if self.read(&self.bits.comm_alive) == 0 {
            flags |= FaultFlags::COMM_NOT_ALIVE;
        }
        if self.read(&self.bits.bridge_fault) == 1 {
            flags |= FaultFlags::BRIDGE_FAULT;
        }
        if self.read(&self.bits.joint_fault) == 1 {
            flags |= FaultFlags::JOINT_FAULT;
        }
        if self.read(&self.bits.bus_voltage_fault) == 1 {
            flags |= FaultFlags::BUS_VOLTAGE;
        }
        if self.read(&self.bits.aps_fault) == 1 {
            flags |= FaultFlags::APS_FAULT;
        }
        if self.read(&self.bits.aps1_tol_fault) == 1 {
            flags |= FaultFlags::APS1_TOLERANCE;
        }
        if self.read(&self.bits.aps2_tol_fault) == 1 {
            flags |= FaultFlags::APS2_TOLERANCE;
        }
        if self.read(&self.bits.enc_drift_fault) == 1 {
            flags |= FaultFlags::ENC_DRIFT;
        }
        if self.read(&self.bits.velocity_fault) == 1 {
            flags |= FaultFlags::VELOCITY_FAULT;
        }
        if self.read(&self.bits.limit_fault) == 1 {
            flags |= FaultFlags::LIMIT_FAULT;
        }
        if self.read(&self.bits.coeffs_loaded) == 0 {
            flags |= FaultFlags::COEFFS_NOT_LOADED;
        }
        if self.read(&self.bits.current_fault) == 1 {
            flags |= FaultFlags::CURRENT_FAULT;
        }

        flags
    }

    fn read(&self, bit: &str) -> i32 {
        self.provider.get_status_value(&self.mechanism, bit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dex_common::registers::{RegisterMap, SimRegisterBank};

    const DESCRIPTOR: &str = r#"
[mechanism]
name = "test_gripper"

[status]
control_mode = "CtrlModeStat"
command_mode = "CmdModeStat"
calibration_mode = "CalModeStat"
clear_fault_mode = "ClearFaultStat"
proc_alive = "ProcAlive"
comm_alive = "CommAlive"
bridge_fault = "BridgeFault"
joint_fault = "JointFault"
bus_voltage_fault = "BusVoltFault"
aps_fault = "ApsFault"
aps1_tol_fault = "Aps1TolFault"
aps2_tol_fault = "Aps2TolFault"
enc_drift_fault = "EncDriftFault"
velocity_fault = "VelocityFault"
limit_fault = "LimitFault"
coeffs_loaded = "CoeffsLoaded"
current_fault = "CurrentFault"

[control]
control_mode = "CtrlModeCmd"
command_mode = "CmdModeCmd"
calibration_mode = "CalModeCmd"
clear_fault_mode = "ClearFaultCmd"
"#;

    fn seeded_scan() -> (FaultScan<SimRegisterBank>, Arc<SimRegisterBank>) {
        let map = RegisterMap::from_toml(DESCRIPTOR).unwrap();
        let bank = Arc::new(SimRegisterBank::new());
        bank.seed_defaults(&map);
        let scan = FaultScan::new(
            map.mechanism.name.clone(),
            bank.clone(),
            map.status.clone(),
        );
        (scan, bank)
    }

    #[test]
    fn healthy_mechanism_scans_clear() {
        let (scan, _bank) = seeded_scan();
        assert!(scan.scan().is_empty());
    }

    #[test]
    fn dead_heartbeats_trip_on_zero() {
        let (scan, bank) = seeded_scan();
        bank.set_status("test_gripper", "ProcAlive", 0);
        bank.set_status("test_gripper", "CommAlive", 0);
        bank.set_status("test_gripper", "CoeffsLoaded", 0);

        let flags = scan.scan();
        assert!(flags.contains(FaultFlags::PROC_NOT_ALIVE));
        assert!(flags.contains(FaultFlags::COMM_NOT_ALIVE));
        assert!(flags.contains(FaultFlags::COEFFS_NOT_LOADED));
        assert!(!flags.contains(FaultFlags::JOINT_FAULT));
    }

    #[test]
    fn fault_bits_trip_on_one() {
        let (scan, bank) = seeded_scan();
        bank.set_status("test_gripper", "JointFault", 1);
        bank.set_status("test_gripper", "CurrentFault", 1);

        let flags = scan.scan();
        assert_eq!(flags, FaultFlags::JOINT_FAULT | FaultFlags::CURRENT_FAULT);
        assert_eq!(flags.summary(), "FAULT, JointFault, CurrentFault");
    }

    #[test]
    fn fault_bits_require_an_exact_one() {
        let (scan, bank) = seeded_scan();
        bank.set_status("test_gripper", "BridgeFault", 2);
        assert!(scan.scan().is_empty());
    }

    #[test]
    fn every_health_bit_maps_to_its_flag() {
        let (scan, bank) = seeded_scan();
        bank.set_status("test_gripper", "ProcAlive", 0);
        bank.set_status("test_gripper", "CommAlive", 0);
        bank.set_status("test_gripper", "BridgeFault", 1);
        bank.set_status("test_gripper", "JointFault", 1);
        bank.set_status("test_gripper", "BusVoltFault", 1);
        bank.set_status("test_gripper", "ApsFault", 1);
        bank.set_status("test_gripper", "Aps1TolFault", 1);
        bank.set_status("test_gripper", "Aps2TolFault", 1);
        bank.set_status("test_gripper", "EncDriftFault", 1);
        bank.set_status("test_gripper", "VelocityFault", 1);
        bank.set_status("test_gripper", "LimitFault", 1);
        bank.set_status("test_gripper", "CoeffsLoaded", 0);
        bank.set_status("test_gripper", "CurrentFault", 1);

        assert_eq!(scan.scan(), FaultFlags::all());
    }
}
