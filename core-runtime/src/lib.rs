//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the Bluetooth policy core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - In-process event channel
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the policy crate depends on.
//! It establishes the logging conventions, the fail-fast configuration
//! builder and a reference [`EventChannel`](bridge_traits::EventChannel)
//! implementation for hosts without a native broadcast mechanism.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
