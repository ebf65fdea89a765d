//! Fault flag word scanned from mechanism status bits.
//!
//! The 13 flags mirror the health bits exposed by the joint controller.
//! Scan order is fixed: operator-facing fault summaries list labels in
//! exactly this order, and downstream parsers rely on it.

use bitflags::bitflags;
use static_assertions::const_assert_eq;

bitflags! {
    /// Per-mechanism fault word; one bit per health status bit.
    ///
    /// Bit positions follow the scan order of the status registers.
    /// "NotAlive"/"NotLoaded" flags come from bits that trip on 0; the
    /// remainder trip on 1.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FaultFlags: u16 {
        /// Processor heartbeat lost.
        const PROC_NOT_ALIVE  = 0x0001;
        /// Bus communication heartbeat lost.
        const COMM_NOT_ALIVE  = 0x0002;
        /// Power bridge fault.
        const BRIDGE_FAULT    = 0x0004;
        /// Joint controller fault latch.
        const JOINT_FAULT     = 0x0008;
        /// Bus voltage out of range.
        const BUS_VOLTAGE     = 0x0010;
        /// Absolute position sensor fault.
        const APS_FAULT       = 0x0020;
        /// APS 1 outside tolerance.
        const APS1_TOLERANCE  = 0x0040;
        /// APS 2 outside tolerance.
        const APS2_TOLERANCE  = 0x0080;
        /// Incremental encoder drift.
        const ENC_DRIFT       = 0x0100;
        /// Velocity limit exceeded.
        const VELOCITY_FAULT  = 0x0200;
        /// Travel limit violation.
        const LIMIT_FAULT     = 0x0400;
        /// Servo coefficients missing.
        const COEFFS_NOT_LOADED = 0x0800;
        /// Motor current fault.
        const CURRENT_FAULT   = 0x1000;
    }
}

/// Labels in scan order, as they appear in fault summaries.
pub const FAULT_LABELS: [(FaultFlags, &str); 13] = [
    (FaultFlags::PROC_NOT_ALIVE, "ProcNotAlive"),
    (FaultFlags::COMM_NOT_ALIVE, "CommNotAlive"),
    (FaultFlags::BRIDGE_FAULT, "BridgeFault"),
    (FaultFlags::JOINT_FAULT, "JointFault"),
    (FaultFlags::BUS_VOLTAGE, "BusVoltageFault"),
    (FaultFlags::APS_FAULT, "ApsFault"),
    (FaultFlags::APS1_TOLERANCE, "Aps1TolFault"),
    (FaultFlags::APS2_TOLERANCE, "Aps2TolFault"),
    (FaultFlags::ENC_DRIFT, "EncDriftFault"),
    (FaultFlags::VELOCITY_FAULT, "VelocityFault"),
    (FaultFlags::LIMIT_FAULT, "LimitFault"),
    (FaultFlags::COEFFS_NOT_LOADED, "CoeffsNotLoaded"),
    (FaultFlags::CURRENT_FAULT, "CurrentFault"),
];

// Every defined flag must have a label entry.
const_assert_eq!(FaultFlags::all().bits().count_ones(), 13);

impl FaultFlags {
    /// Labels of the set flags, in scan order.
    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        FAULT_LABELS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, label)| *label)
    }

    /// Operator-facing summary for a faulted mechanism.
    ///
    /// `"FAULT"` followed by `", <label>"` per set flag in scan order.
    /// A faulted mechanism with no individually tripped bit yields the
    /// bare `"FAULT"`.
    pub fn summary(&self) -> String {
        let mut out = String::from("FAULT");
        for label in self.labels() {
            out.push_str(", ");
            out.push_str(label);
        }
        out
    }
}

impl Default for FaultFlags {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_table_matches_flag_order() {
        let mut previous = 0u16;
        for (flag, _) in FAULT_LABELS {
            assert!(flag.bits() > previous, "labels out of scan order");
            previous = flag.bits();
        }
    }

    #[test]
    fn summary_lists_labels_in_scan_order() {
        let flags = FaultFlags::CURRENT_FAULT | FaultFlags::COMM_NOT_ALIVE;
        assert_eq!(flags.summary(), "FAULT, CommNotAlive, CurrentFault");
    }

    #[test]
    fn summary_of_empty_word_is_bare_fault() {
        assert_eq!(FaultFlags::empty().summary(), "FAULT");
    }

    #[test]
    fn summary_of_full_word_lists_all_thirteen() {
        let summary = FaultFlags::all().summary();
        assert_eq!(summary.matches(", ").count(), 13);
        assert!(summary.starts_with("FAULT, ProcNotAlive"));
        assert!(summary.ends_with("CurrentFault"));
    }

    #[test]
    fn default_is_clear() {
        assert!(FaultFlags::default().is_empty());
    }
}
