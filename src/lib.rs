//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (`core-bluetooth`, `core-runtime`). Host applications can
//! depend on `bluetooth-policy-workspace` and enable the documented features
//! without needing to wire each crate individually.

#[cfg(feature = "bluetooth")]
pub use core_bluetooth as bluetooth;

#[cfg(feature = "bluetooth")]
pub use core_runtime as runtime;
