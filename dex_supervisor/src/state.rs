//! State tracking module root.
//!
//! The two sides of the reconciliation loop: the command FSM holds what the
//! supervisor asked the mechanism to do, the actual FSM projects what the
//! status registers say it is doing.

pub mod actual;
pub mod command;
