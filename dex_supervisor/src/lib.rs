//! # Mechanism Mode Supervisor Library
//!
//! Supervisory mode reconciliation for physically actuated mechanisms.
//! Tracks a commanded and an observed mode snapshot per mechanism across
//! four independent categories, guards drive-stage transitions against the
//! currently observed mode, reports mismatches that outlive a grace period,
//! and renders operator-facing fault summaries from the health status bits.
//!
//! ## Pieces
//!
//! 1. **TransitionPolicy** — per-class allow-list for ControlMode requests
//! 2. **CommandStateFsm** — commanded intent and the control-register writer
//! 3. **ActualStateFsm** — readback projection of the status mode words
//! 4. **FaultScan** — health bit scan behind the fault summary
//! 5. **MechanismSupervisor** — per-tick reconciliation and timeout reporting
//!
//! ## Tick Path
//!
//! The reconciliation tick performs no heap allocation: snapshots are `Copy`
//! and rejection lists are fixed-capacity. Register access goes through the
//! `RegisterProvider` seam validated once at construction.

#![deny(clippy::disallowed_types)]

pub mod fault;
pub mod guard;
pub mod state;
pub mod supervisor;
