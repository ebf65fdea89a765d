//! Register descriptor and provider seam.
//!
//! The descriptor (`RegisterMap`) binds logical bit names to register
//! names once at startup; `RegisterProvider` is the read/write seam the
//! bus layer implements. `SimRegisterBank` is the in-memory provider used
//! by tests and scripted runs.

pub mod map;
pub mod provider;
pub mod sim;

pub use map::{ControlBits, MechanismSection, RegisterMap, StatusBits};
pub use provider::RegisterProvider;
pub use sim::SimRegisterBank;
