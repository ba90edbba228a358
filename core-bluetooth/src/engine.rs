//! # Connection Policy Engine
//!
//! Dispatch adapter around [`policy::decide`]: parses raw connection
//! broadcasts, reads the current preferences, and carries out the resulting
//! command against the playback bridge.

use crate::policy;
use crate::types::{ConnectionEvent, PlaybackCommand, PolicyConfig};
use bridge_traits::channel::{ChannelEvent, EventHandler};
use bridge_traits::diagnostics::DiagnosticsSink;
use bridge_traits::playback::PlaybackControl;
use bridge_traits::settings::PolicySettings;
use core_runtime::config::{CoreConfig, StateCodeTable};
use std::sync::Arc;
use tracing::{debug, trace};

/// Breadcrumb tag used for pause diagnostics.
pub const BREADCRUMB_TAG: &str = "BluetoothManager";

/// Reacts to A2DP link and headset audio state broadcasts.
pub struct ConnectionPolicyEngine {
    playback: Arc<dyn PlaybackControl>,
    settings: Arc<dyn PolicySettings>,
    diagnostics: Arc<dyn DiagnosticsSink>,
    state_codes: StateCodeTable,
}

impl ConnectionPolicyEngine {
    pub fn new(
        playback: Arc<dyn PlaybackControl>,
        settings: Arc<dyn PolicySettings>,
        diagnostics: Arc<dyn DiagnosticsSink>,
        state_codes: StateCodeTable,
    ) -> Self {
        Self {
            playback,
            settings,
            diagnostics,
            state_codes,
        }
    }

    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(
            Arc::clone(&config.playback),
            Arc::clone(&config.policy_settings),
            Arc::clone(&config.diagnostics),
            config.state_codes,
        )
    }

    /// Handle a raw broadcast.
    ///
    /// Events that are not connection broadcasts, or whose state extras are
    /// missing or malformed, are dropped and yield `None`.
    pub fn on_connection_event(&self, raw: &ChannelEvent) -> Option<PlaybackCommand> {
        match ConnectionEvent::from_channel_event(raw) {
            Some(event) => self.handle(&event),
            None => {
                trace!(tag = %raw.tag, "Ignoring unrecognised connection broadcast");
                None
            }
        }
    }

    /// Apply the policy to a parsed event and execute the resulting command.
    pub fn handle(&self, event: &ConnectionEvent) -> Option<PlaybackCommand> {
        let config = PolicyConfig::read(self.settings.as_ref());
        let command = policy::decide(event, &config, &self.state_codes)?;

        debug!(
            kind = ?event.kind,
            state = event.state,
            previous_state = event.previous_state,
            %command,
            "Bluetooth state change triggered playback command"
        );

        match command {
            PlaybackCommand::Pause => {
                self.diagnostics.drop_breadcrumb(
                    BREADCRUMB_TAG,
                    &format!("BT {} disconnect - pausing. State: {}", event.kind, event.state),
                );
                self.playback.pause(false);
            }
            PlaybackCommand::Play => self.playback.play(),
        }

        Some(command)
    }

    pub fn state_codes(&self) -> &StateCodeTable {
        &self.state_codes
    }
}

impl EventHandler for ConnectionPolicyEngine {
    fn on_event(&self, event: &ChannelEvent) {
        self.on_connection_event(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::{
        ACTION_A2DP_CONNECTION_STATE_CHANGED, ACTION_HEADSET_AUDIO_STATE_CHANGED,
        EXTRA_PREVIOUS_STATE, EXTRA_STATE, PLAY_STATUS_REQUEST,
    };
    use bridge_traits::settings::InMemoryPolicySettings;
    use mockall::mock;
    use mockall::predicate::eq;

    mock! {
        Playback {}

        impl PlaybackControl for Playback {
            fn pause(&self, from_user_action: bool);
            fn play(&self);
        }
    }

    mock! {
        Diagnostics {}

        impl DiagnosticsSink for Diagnostics {
            fn drop_breadcrumb(&self, tag: &str, message: &str);
        }
    }

    mock! {
        Settings {}

        impl PolicySettings for Settings {
            fn pause_on_disconnect(&self) -> bool;
            fn resume_on_connect(&self) -> bool;
        }
    }

    fn quiet_diagnostics() -> MockDiagnostics {
        let mut diagnostics = MockDiagnostics::new();
        diagnostics.expect_drop_breadcrumb().return_const(());
        diagnostics
    }

    fn engine(
        playback: MockPlayback,
        settings: Arc<dyn PolicySettings>,
        diagnostics: MockDiagnostics,
    ) -> ConnectionPolicyEngine {
        ConnectionPolicyEngine::new(
            Arc::new(playback),
            settings,
            Arc::new(diagnostics),
            StateCodeTable::default(),
        )
    }

    fn a2dp_broadcast(state: i32, previous: i32) -> ChannelEvent {
        ChannelEvent::new(ACTION_A2DP_CONNECTION_STATE_CHANGED)
            .with_extra(EXTRA_STATE, state)
            .with_extra(EXTRA_PREVIOUS_STATE, previous)
    }

    fn headset_broadcast(state: i32, previous: i32) -> ChannelEvent {
        ChannelEvent::new(ACTION_HEADSET_AUDIO_STATE_CHANGED)
            .with_extra(EXTRA_STATE, state)
            .with_extra(EXTRA_PREVIOUS_STATE, previous)
    }

    #[test]
    fn test_a2dp_disconnect_pauses_with_breadcrumb() {
        let mut playback = MockPlayback::new();
        playback.expect_pause().with(eq(false)).times(1).return_const(());
        playback.expect_play().never();

        let mut diagnostics = MockDiagnostics::new();
        diagnostics
            .expect_drop_breadcrumb()
            .withf(|tag: &str, message: &str| {
                tag == "BluetoothManager" && message == "BT A2DP disconnect - pausing. State: 0"
            })
            .times(1)
            .return_const(());

        let engine = engine(
            playback,
            Arc::new(InMemoryPolicySettings::new(true, false)),
            diagnostics,
        );

        assert_eq!(
            engine.on_connection_event(&a2dp_broadcast(0, 2)),
            Some(PlaybackCommand::Pause)
        );
    }

    #[test]
    fn test_headset_disconnect_breadcrumb_names_headset() {
        let mut playback = MockPlayback::new();
        playback.expect_pause().with(eq(false)).times(1).return_const(());

        let mut diagnostics = MockDiagnostics::new();
        diagnostics
            .expect_drop_breadcrumb()
            .withf(|tag: &str, message: &str| {
                tag == "BluetoothManager"
                    && message == "BT Headset audio disconnect - pausing. State: 10"
            })
            .times(1)
            .return_const(());

        let engine = engine(
            playback,
            Arc::new(InMemoryPolicySettings::new(true, false)),
            diagnostics,
        );

        engine.on_connection_event(&headset_broadcast(10, 12));
    }

    #[test]
    fn test_pause_disabled_leaves_playback_alone() {
        let mut playback = MockPlayback::new();
        playback.expect_pause().never();
        playback.expect_play().never();

        let mut diagnostics = MockDiagnostics::new();
        diagnostics.expect_drop_breadcrumb().never();

        let engine = engine(
            playback,
            Arc::new(InMemoryPolicySettings::new(false, false)),
            diagnostics,
        );

        assert_eq!(engine.on_connection_event(&a2dp_broadcast(0, 2)), None);
    }

    #[test]
    fn test_headset_connected_plays_without_breadcrumb() {
        let mut playback = MockPlayback::new();
        playback.expect_play().times(1).return_const(());
        playback.expect_pause().never();

        let mut diagnostics = MockDiagnostics::new();
        diagnostics.expect_drop_breadcrumb().never();

        let engine = engine(
            playback,
            Arc::new(InMemoryPolicySettings::new(true, true)),
            diagnostics,
        );

        assert_eq!(
            engine.on_connection_event(&headset_broadcast(12, 11)),
            Some(PlaybackCommand::Play)
        );
    }

    #[test]
    fn test_settings_read_on_every_dispatch() {
        let mut settings = MockSettings::new();
        settings.expect_pause_on_disconnect().times(2).return_const(false);
        settings.expect_resume_on_connect().times(2).return_const(false);

        let mut playback = MockPlayback::new();
        playback.expect_pause().never();
        playback.expect_play().never();

        let engine = engine(playback, Arc::new(settings), quiet_diagnostics());

        engine.on_connection_event(&a2dp_broadcast(0, 2));
        engine.on_connection_event(&a2dp_broadcast(2, 0));
    }

    #[test]
    fn test_toggle_change_applies_to_next_event() {
        let settings = Arc::new(InMemoryPolicySettings::new(true, false));

        let mut playback = MockPlayback::new();
        playback.expect_play().times(1).return_const(());

        let engine = engine(playback, settings.clone(), quiet_diagnostics());

        assert_eq!(engine.on_connection_event(&a2dp_broadcast(2, 0)), None);
        settings.set_resume_on_connect(true);
        assert_eq!(
            engine.on_connection_event(&a2dp_broadcast(2, 0)),
            Some(PlaybackCommand::Play)
        );
    }

    #[test]
    fn test_repeated_disconnect_pauses_each_time() {
        let mut playback = MockPlayback::new();
        playback.expect_pause().with(eq(false)).times(2).return_const(());

        let engine = engine(
            playback,
            Arc::new(InMemoryPolicySettings::new(true, false)),
            quiet_diagnostics(),
        );

        engine.on_connection_event(&a2dp_broadcast(0, 2));
        engine.on_connection_event(&a2dp_broadcast(0, 2));
    }

    #[test]
    fn test_malformed_and_foreign_events_dropped() {
        let mut playback = MockPlayback::new();
        playback.expect_pause().never();
        playback.expect_play().never();

        let mut settings = MockSettings::new();
        settings.expect_pause_on_disconnect().never();
        settings.expect_resume_on_connect().never();

        let engine = engine(playback, Arc::new(settings), quiet_diagnostics());

        let foreign = ChannelEvent::new(PLAY_STATUS_REQUEST);
        let missing = ChannelEvent::new(ACTION_A2DP_CONNECTION_STATE_CHANGED);
        let wrong_type = ChannelEvent::new(ACTION_HEADSET_AUDIO_STATE_CHANGED)
            .with_extra(EXTRA_STATE, 12.5)
            .with_extra(EXTRA_PREVIOUS_STATE, 10);

        assert_eq!(engine.on_connection_event(&foreign), None);
        assert_eq!(engine.on_connection_event(&missing), None);
        assert_eq!(engine.on_connection_event(&wrong_type), None);
    }

    #[test]
    fn test_event_handler_delegates() {
        let mut playback = MockPlayback::new();
        playback.expect_pause().with(eq(false)).times(1).return_const(());

        let engine = engine(
            playback,
            Arc::new(InMemoryPolicySettings::new(true, false)),
            quiet_diagnostics(),
        );

        let handler: &dyn EventHandler = &engine;
        handler.on_event(&a2dp_broadcast(3, 2));
    }
}
