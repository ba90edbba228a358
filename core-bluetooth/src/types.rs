//! Value types flowing through the connection policy.

use crate::tags::{connection_kind_for_tag, EXTRA_PREVIOUS_STATE, EXTRA_STATE};
use bridge_traits::channel::ChannelEvent;
use bridge_traits::settings::PolicySettings;
use core_runtime::config::ConnectionKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A profile state transition reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionEvent {
    pub kind: ConnectionKind,
    pub state: i32,
    pub previous_state: i32,
}

impl ConnectionEvent {
    pub fn new(kind: ConnectionKind, state: i32, previous_state: i32) -> Self {
        Self {
            kind,
            state,
            previous_state,
        }
    }

    /// Parse a raw channel event.
    ///
    /// Returns `None` for tags that are not connection broadcasts and for
    /// payloads whose state extras are missing or not `i32` integers.
    pub fn from_channel_event(event: &ChannelEvent) -> Option<Self> {
        let kind = connection_kind_for_tag(&event.tag)?;
        let state = event.int_extra(EXTRA_STATE)?;
        let previous_state = event.int_extra(EXTRA_PREVIOUS_STATE)?;

        Some(Self::new(kind, state, previous_state))
    }
}

/// Snapshot of the user's Bluetooth playback preferences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub pause_on_disconnect: bool,
    pub resume_on_connect: bool,
}

impl PolicyConfig {
    /// Read both toggles from the settings bridge.
    pub fn read(settings: &dyn PolicySettings) -> Self {
        Self {
            pause_on_disconnect: settings.pause_on_disconnect(),
            resume_on_connect: settings.resume_on_connect(),
        }
    }
}

/// Command the policy asks the playback engine to carry out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackCommand {
    Pause,
    Play,
}

impl fmt::Display for PlaybackCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackCommand::Pause => f.write_str("pause"),
            PlaybackCommand::Play => f.write_str("play"),
        }
    }
}
