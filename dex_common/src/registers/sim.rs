//! In-memory register bank for tests and bench/demo runs.
//!
//! Stands in for the bus layer: status cells are flipped by the test (or a
//! scripted scenario) and read by the supervisor; control cells are written
//! by the supervisor and read back by the test.

use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::debug;

use super::map::RegisterMap;
use super::provider::RegisterProvider;
use crate::mechanism::ModeSnapshot;

#[derive(Debug, Default)]
struct MechanismCells {
    status: HashMap<String, i32>,
    control: HashMap<String, i32>,
}

/// Simulated register provider.
///
/// Only declared cells exist; reads of undeclared status bits return 0 and
/// writes to undeclared control bits are dropped, matching the provider
/// contract.
#[derive(Debug, Default)]
pub struct SimRegisterBank {
    mechanisms: Mutex<HashMap<String, MechanismCells>>,
}

impl SimRegisterBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a status cell with an initial value.
    pub fn declare_status(&self, mechanism: &str, bit: &str, initial: i32) {
        let mut cells = self.mechanisms.lock();
        cells
            .entry(mechanism.to_string())
            .or_default()
            .status
            .insert(bit.to_string(), initial);
    }

    /// Declare a control cell with an initial value.
    pub fn declare_control(&self, mechanism: &str, bit: &str, initial: i32) {
        let mut cells = self.mechanisms.lock();
        cells
            .entry(mechanism.to_string())
            .or_default()
            .control
            .insert(bit.to_string(), initial);
    }

    /// Flip a status cell, declaring it if needed. Test-side hook.
    pub fn set_status(&self, mechanism: &str, bit: &str, value: i32) {
        self.declare_status(mechanism, bit, value);
    }

    /// Read back a control cell written by the supervisor. Test-side hook.
    pub fn control_value(&self, mechanism: &str, bit: &str) -> Option<i32> {
        let cells = self.mechanisms.lock();
        cells
            .get(mechanism)
            .and_then(|m| m.control.get(bit).copied())
    }

    /// Declare every cell named by a descriptor, with the status mode
    /// words at the power-on snapshot and the health bits reading healthy
    /// (alive/loaded bits 1, fault bits 0).
    pub fn seed_defaults(&self, map: &RegisterMap) {
        let mech = &map.mechanism.name;
        let snapshot = ModeSnapshot::new();
        let s = &map.status;

        self.declare_status(mech, &s.control_mode, snapshot.control as i32);
        self.declare_status(mech, &s.command_mode, snapshot.command as i32);
        self.declare_status(mech, &s.calibration_mode, snapshot.calibration as i32);
        self.declare_status(mech, &s.clear_fault_mode, snapshot.clear_fault as i32);

        self.declare_status(mech, &s.proc_alive, 1);
        self.declare_status(mech, &s.comm_alive, 1);
        self.declare_status(mech, &s.bridge_fault, 0);
        self.declare_status(mech, &s.joint_fault, 0);
        self.declare_status(mech, &s.bus_voltage_fault, 0);
        self.declare_status(mech, &s.aps_fault, 0);
        self.declare_status(mech, &s.aps1_tol_fault, 0);
        self.declare_status(mech, &s.aps2_tol_fault, 0);
        self.declare_status(mech, &s.enc_drift_fault, 0);
        self.declare_status(mech, &s.velocity_fault, 0);
        self.declare_status(mech, &s.limit_fault, 0);
        self.declare_status(mech, &s.coeffs_loaded, 1);
        self.declare_status(mech, &s.current_fault, 0);

        for (_, bit) in map.required_control_entries() {
            self.declare_control(mech, bit, 0);
        }
        for bit in map.constant_control_entries() {
            self.declare_control(mech, bit, 0);
        }
    }
}

impl RegisterProvider for SimRegisterBank {
    fn has_control_bit(&self, mechanism: &str, bit: &str) -> bool {
        let cells = self.mechanisms.lock();
        cells
            .get(mechanism)
            .is_some_and(|m| m.control.contains_key(bit))
    }

    fn has_status_bit(&self, mechanism: &str, bit: &str) -> bool {
        let cells = self.mechanisms.lock();
        cells
            .get(mechanism)
            .is_some_and(|m| m.status.contains_key(bit))
    }

    fn set_control_value(&self, mechanism: &str, bit: &str, value: i32) {
        let mut cells = self.mechanisms.lock();
        match cells.get_mut(mechanism).and_then(|m| m.control.get_mut(bit)) {
            Some(cell) => *cell = value,
            None => {
                debug!("Dropped write to undeclared control bit {bit} on mechanism: {mechanism}");
            }
        }
    }

    fn get_status_value(&self, mechanism: &str, bit: &str) -> i32 {
        let cells = self.mechanisms.lock();
        cells
            .get(mechanism)
            .and_then(|m| m.status.get(bit).copied())
            .unwrap_or(0)
    }
}
