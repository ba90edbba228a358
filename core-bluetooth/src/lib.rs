//! # Bluetooth Playback Policy Module
//!
//! Translates Bluetooth connectivity broadcasts and remote-control status
//! queries into playback commands and status broadcasts.
//!
//! ## Overview
//!
//! This module handles:
//! - Pausing playback when an A2DP link or headset audio channel drops
//! - Resuming playback when one comes back
//! - Answering AVRCP play status requests
//! - Publishing play-state and metadata snapshots for remote controllers
//!
//! ## Components
//!
//! - **Connection Policy** (`policy`): Pure decision rule from state transition to command
//! - **Connection Policy Engine** (`engine`): Parses broadcasts and drives the playback bridge
//! - **Remote Status Responder** (`responder`): Status request handling and outbound snapshots
//! - **Subscription** (`subscription`): Paired start/stop of a channel registration
//! - **Bluetooth Manager** (`manager`): Owns both listeners
//!
//! ## Usage
//!
//! ```ignore
//! use core_bluetooth::BluetoothManager;
//! use core_runtime::config::CoreConfig;
//!
//! let config = CoreConfig::builder()
//!     .playback(playback)
//!     .policy_settings(settings)
//!     .status_callbacks(service)
//!     .event_channel(channel)
//!     .build()?;
//!
//! let manager = BluetoothManager::new(&config);
//! manager.start_connection_listener()?;
//! manager.start_status_listener()?;
//! // ...
//! manager.stop_status_listener()?;
//! manager.stop_connection_listener()?;
//! ```

pub mod engine;
pub mod error;
pub mod manager;
pub mod policy;
pub mod responder;
pub mod subscription;
pub mod tags;
pub mod types;

pub use core_runtime::config::{ConnectionKind, StateCodeTable, StateCodes};
pub use engine::ConnectionPolicyEngine;
pub use error::{BluetoothError, Result};
pub use manager::BluetoothManager;
pub use policy::decide;
pub use responder::RemoteStatusResponder;
pub use subscription::Subscription;
pub use types::{ConnectionEvent, PlaybackCommand, PolicyConfig};
