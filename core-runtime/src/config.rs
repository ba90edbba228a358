//! # Core Configuration Module
//!
//! Provides configuration management for the Bluetooth policy core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds the bridges the core talks to and the per-profile
//! state-code table. It enforces fail-fast validation so a host that forgot a
//! bridge finds out at startup rather than on the first disconnect.
//!
//! ## Required Dependencies
//!
//! - `PlaybackControl` - Pause / play commands
//! - `PolicySettings` - Pause-on-disconnect and resume-on-connect toggles
//! - `StatusCallbacks` - Status request notifications to the playback service
//! - `EventChannel` - Broadcast registration and publishing
//!
//! ## Optional Dependencies (with defaults)
//!
//! - `DiagnosticsSink` - Breadcrumbs (default: [`TracingDiagnostics`])
//! - `StateCodeTable` - Profile state codes (default: Android Bluetooth values)
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use core_runtime::events::EventBus;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .playback(Arc::new(MyPlayback))
//!     .policy_settings(Arc::new(MySettings))
//!     .status_callbacks(Arc::new(MyService))
//!     .event_channel(Arc::new(EventBus::default()))
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::CoreConfig;
//!
//! // This will panic with an actionable error message
//! let config = CoreConfig::builder()
//!     .build()
//!     .expect("Should fail - missing required bridges");
//! ```

use crate::error::{Error, Result};
use crate::logging::TracingDiagnostics;
use bridge_traits::{DiagnosticsSink, EventChannel, PlaybackControl, PolicySettings, StatusCallbacks};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Profile State Codes
// ============================================================================

/// Bluetooth signal a connection event originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionKind {
    /// A2DP stereo link connection state.
    A2dpLink,
    /// Headset (HFP/HSP) audio channel state.
    HeadsetAudio,
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionKind::A2dpLink => f.write_str("A2DP"),
            ConnectionKind::HeadsetAudio => f.write_str("Headset audio"),
        }
    }
}

/// Numeric state codes a profile reports in its state broadcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCodes {
    pub connected: i32,
    pub disconnected: i32,
    pub disconnecting: i32,
}

impl StateCodes {
    /// `BluetoothProfile` connection states as reported for the A2DP link.
    pub const A2DP_LINK: StateCodes = StateCodes {
        connected: 2,
        disconnected: 0,
        disconnecting: 3,
    };

    /// `BluetoothHeadset` audio states.
    ///
    /// The audio channel has no disconnecting state of its own; the link
    /// profile's disconnecting code is used instead, so a headset audio
    /// broadcast only matches it if the host reuses that value.
    pub const HEADSET_AUDIO: StateCodes = StateCodes {
        connected: 12,
        disconnected: 10,
        disconnecting: 3,
    };

    fn validate(&self, kind: ConnectionKind) -> Result<()> {
        if self.connected == self.disconnected || self.connected == self.disconnecting {
            return Err(Error::Config(format!(
                "{} connected state code {} must differ from its disconnected ({}) \
                 and disconnecting ({}) codes",
                kind, self.connected, self.disconnected, self.disconnecting
            )));
        }
        Ok(())
    }
}

/// Per-profile state codes consulted by the connection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCodeTable {
    pub a2dp_link: StateCodes,
    pub headset_audio: StateCodes,
}

impl Default for StateCodeTable {
    fn default() -> Self {
        Self {
            a2dp_link: StateCodes::A2DP_LINK,
            headset_audio: StateCodes::HEADSET_AUDIO,
        }
    }
}

impl StateCodeTable {
    /// Parse a table shipped by the host as JSON.
    ///
    /// ```
    /// use core_runtime::config::{ConnectionKind, StateCodeTable};
    ///
    /// let table = StateCodeTable::from_json(
    ///     r#"{
    ///         "a2dp_link": {"connected": 2, "disconnected": 0, "disconnecting": 3},
    ///         "headset_audio": {"connected": 12, "disconnected": 10, "disconnecting": 3}
    ///     }"#,
    /// )
    /// .unwrap();
    /// assert_eq!(table.codes(ConnectionKind::HeadsetAudio).connected, 12);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let table: Self = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("Invalid state code table: {}", e)))?;
        table.validate()?;
        Ok(table)
    }

    /// State codes for `kind`.
    pub fn codes(&self, kind: ConnectionKind) -> &StateCodes {
        match kind {
            ConnectionKind::A2dpLink => &self.a2dp_link,
            ConnectionKind::HeadsetAudio => &self.headset_audio,
        }
    }

    /// Checks that no profile reports "connected" with a code it also uses
    /// for disconnection, which would make pause and resume fire together.
    pub fn validate(&self) -> Result<()> {
        self.a2dp_link.validate(ConnectionKind::A2dpLink)?;
        self.headset_audio.validate(ConnectionKind::HeadsetAudio)
    }
}

// ============================================================================
// Core Configuration
// ============================================================================

/// Core configuration for the Bluetooth policy core.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Playback engine commands (required)
    pub playback: Arc<dyn PlaybackControl>,

    /// Policy toggles, read on every event (required)
    pub policy_settings: Arc<dyn PolicySettings>,

    /// Owning service callbacks (required)
    pub status_callbacks: Arc<dyn StatusCallbacks>,

    /// Host broadcast channel (required)
    pub event_channel: Arc<dyn EventChannel>,

    /// Breadcrumb sink
    pub diagnostics: Arc<dyn DiagnosticsSink>,

    /// Profile state codes
    pub state_codes: StateCodeTable,
}

impl fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoreConfig")
            .field("playback", &"PlaybackControl { ... }")
            .field("policy_settings", &"PolicySettings { ... }")
            .field("status_callbacks", &"StatusCallbacks { ... }")
            .field("event_channel", &"EventChannel { ... }")
            .field("diagnostics", &"DiagnosticsSink { ... }")
            .field("state_codes", &self.state_codes)
            .finish()
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        self.state_codes.validate()
    }
}

fn capability_missing(capability: &str, message: &str) -> Error {
    Error::CapabilityMissing {
        capability: capability.to_string(),
        message: message.to_string(),
    }
}

/// Builder for constructing [`CoreConfig`] instances.
///
/// Use this builder to incrementally set configuration options and then
/// call [`build()`](CoreConfigBuilder::build) to create the final config.
#[derive(Default)]
pub struct CoreConfigBuilder {
    playback: Option<Arc<dyn PlaybackControl>>,
    policy_settings: Option<Arc<dyn PolicySettings>>,
    status_callbacks: Option<Arc<dyn StatusCallbacks>>,
    event_channel: Option<Arc<dyn EventChannel>>,
    diagnostics: Option<Arc<dyn DiagnosticsSink>>,
    state_codes: Option<StateCodeTable>,
}

impl CoreConfigBuilder {
    /// Sets the playback engine bridge.
    pub fn playback(mut self, playback: Arc<dyn PlaybackControl>) -> Self {
        self.playback = Some(playback);
        self
    }

    /// Sets the policy settings bridge.
    pub fn policy_settings(mut self, settings: Arc<dyn PolicySettings>) -> Self {
        self.policy_settings = Some(settings);
        self
    }

    /// Sets the status callback target.
    pub fn status_callbacks(mut self, callbacks: Arc<dyn StatusCallbacks>) -> Self {
        self.status_callbacks = Some(callbacks);
        self
    }

    /// Sets the broadcast channel.
    pub fn event_channel(mut self, channel: Arc<dyn EventChannel>) -> Self {
        self.event_channel = Some(channel);
        self
    }

    /// Sets the diagnostics sink.
    ///
    /// Defaults to [`TracingDiagnostics`].
    pub fn diagnostics(mut self, diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Overrides the profile state codes.
    pub fn state_codes(mut self, table: StateCodeTable) -> Self {
        self.state_codes = Some(table);
        self
    }

    /// Builds the final configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityMissing`] if a required bridge was not provided
    /// - [`Error::Config`] if the state code table is inconsistent
    pub fn build(self) -> Result<CoreConfig> {
        let playback = self.playback.ok_or_else(|| {
            capability_missing(
                "PlaybackControl",
                "PlaybackControl implementation is required to pause and resume playback. \
                 Inject an adapter around the host playback service.",
            )
        })?;

        let policy_settings = self.policy_settings.ok_or_else(|| {
            capability_missing(
                "PolicySettings",
                "PolicySettings implementation is required to read the Bluetooth playback \
                 preferences. Use InMemoryPolicySettings if the host has no preferences store.",
            )
        })?;

        let status_callbacks = self.status_callbacks.ok_or_else(|| {
            capability_missing(
                "StatusCallbacks",
                "StatusCallbacks implementation is required to answer remote status requests.",
            )
        })?;

        let event_channel = self.event_channel.ok_or_else(|| {
            capability_missing(
                "EventChannel",
                "EventChannel implementation is required to receive Bluetooth broadcasts. \
                 Desktop: use core_runtime::events::EventBus. \
                 Mobile: inject an adapter over the platform broadcast mechanism.",
            )
        })?;

        let config = CoreConfig {
            playback,
            policy_settings,
            status_callbacks,
            event_channel,
            diagnostics: self
                .diagnostics
                .unwrap_or_else(|| Arc::new(TracingDiagnostics)),
            state_codes: self.state_codes.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}
