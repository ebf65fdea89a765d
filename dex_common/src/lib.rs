//! DEX Common Library
//!
//! Shared mechanism types, the register descriptor/provider seam, and
//! configuration loading utilities for all DEX workspace crates.
//!
//! # Module Structure
//!
//! - [`mechanism`] - Mode enums, snapshots, command requests, fault flags
//! - [`registers`] - Register descriptor, provider trait, simulated bank
//! - [`config`] - Configuration loading traits and types
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use dex_common::prelude::*;
//!
//! let snapshot = ModeSnapshot::new();
//! assert_eq!(snapshot.control, ControlMode::Off);
//! ```

pub mod config;
pub mod mechanism;
pub mod prelude;
pub mod registers;
