//! # Connection Policy
//!
//! The decision rule that turns a profile state transition into a playback
//! command. It is a pure function of the event, the user's preferences and
//! the profile state codes; all side effects live in
//! [`ConnectionPolicyEngine`](crate::engine::ConnectionPolicyEngine).
//!
//! ## Rules
//!
//! - **Pause** when pause-on-disconnect is enabled, the new state is the
//!   kind's disconnected or disconnecting code and the previous state was the
//!   kind's connected code.
//! - **Play** when resume-on-connect is enabled and the new state is the
//!   kind's connected code. The previous state is ignored.
//!
//! A validated [`StateCodeTable`] never lets both rules match the same event.

use crate::types::{ConnectionEvent, PlaybackCommand, PolicyConfig};
use core_runtime::config::{StateCodeTable, StateCodes};

/// Decide which command, if any, an event calls for.
pub fn decide(
    event: &ConnectionEvent,
    config: &PolicyConfig,
    table: &StateCodeTable,
) -> Option<PlaybackCommand> {
    let codes = table.codes(event.kind);

    if config.pause_on_disconnect && should_pause(event, codes) {
        return Some(PlaybackCommand::Pause);
    }

    if config.resume_on_connect && should_resume(event, codes) {
        return Some(PlaybackCommand::Play);
    }

    None
}

fn should_pause(event: &ConnectionEvent, codes: &StateCodes) -> bool {
    (event.state == codes.disconnected || event.state == codes.disconnecting)
        && event.previous_state == codes.connected
}

fn should_resume(event: &ConnectionEvent, codes: &StateCodes) -> bool {
    event.state == codes.connected
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_runtime::config::ConnectionKind;

    const BOTH: PolicyConfig = PolicyConfig {
        pause_on_disconnect: true,
        resume_on_connect: true,
    };

    const NEITHER: PolicyConfig = PolicyConfig {
        pause_on_disconnect: false,
        resume_on_connect: false,
    };

    fn a2dp(state: i32, previous: i32) -> ConnectionEvent {
        ConnectionEvent::new(ConnectionKind::A2dpLink, state, previous)
    }

    fn headset(state: i32, previous: i32) -> ConnectionEvent {
        ConnectionEvent::new(ConnectionKind::HeadsetAudio, state, previous)
    }

    #[test]
    fn test_a2dp_disconnect_pauses() {
        let table = StateCodeTable::default();
        assert_eq!(
            decide(&a2dp(0, 2), &BOTH, &table),
            Some(PlaybackCommand::Pause)
        );
    }

    #[test]
    fn test_pause_disabled_issues_nothing() {
        let table = StateCodeTable::default();
        let config = PolicyConfig {
            pause_on_disconnect: false,
            resume_on_connect: true,
        };
        assert_eq!(decide(&a2dp(0, 2), &config, &table), None);
        assert_eq!(decide(&headset(10, 12), &config, &table), None);
    }

    #[test]
    fn test_a2dp_disconnecting_pauses() {
        let table = StateCodeTable::default();
        assert_eq!(
            decide(&a2dp(3, 2), &BOTH, &table),
            Some(PlaybackCommand::Pause)
        );
    }

    #[test]
    fn test_disconnect_without_prior_connection_does_not_pause() {
        let table = StateCodeTable::default();
        // disconnected after disconnecting
        assert_eq!(decide(&a2dp(0, 3), &BOTH, &table), None);
        // disconnected after connecting
        assert_eq!(decide(&a2dp(0, 1), &BOTH, &table), None);
        assert_eq!(decide(&headset(10, 11), &BOTH, &table), None);
    }

    #[test]
    fn test_headset_audio_disconnect_pauses() {
        let table = StateCodeTable::default();
        assert_eq!(
            decide(&headset(10, 12), &BOTH, &table),
            Some(PlaybackCommand::Pause)
        );
    }

    #[test]
    fn test_headset_audio_connected_plays_regardless_of_previous() {
        let table = StateCodeTable::default();
        for previous in [10, 11, 12, 0, -1] {
            assert_eq!(
                decide(&headset(12, previous), &BOTH, &table),
                Some(PlaybackCommand::Play),
                "previous state {previous}"
            );
        }
    }

    #[test]
    fn test_resume_disabled_issues_nothing() {
        let table = StateCodeTable::default();
        let config = PolicyConfig {
            pause_on_disconnect: true,
            resume_on_connect: false,
        };
        assert_eq!(decide(&a2dp(2, 0), &config, &table), None);
        assert_eq!(decide(&headset(12, 10), &config, &table), None);
    }

    #[test]
    fn test_both_disabled_issues_nothing() {
        let table = StateCodeTable::default();
        assert_eq!(decide(&a2dp(0, 2), &NEITHER, &table), None);
        assert_eq!(decide(&a2dp(2, 0), &NEITHER, &table), None);
    }

    #[test]
    fn test_intermediate_states_issue_nothing() {
        let table = StateCodeTable::default();
        // connecting
        assert_eq!(decide(&a2dp(1, 0), &BOTH, &table), None);
        // headset audio connecting
        assert_eq!(decide(&headset(11, 10), &BOTH, &table), None);
    }

    // The headset audio profile has no disconnecting state of its own. Only
    // the link profile's disconnecting code counts, and headset audio
    // broadcasts never report it, so a headset "disconnecting" never pauses
    // unless the host actually sends that code.
    #[test]
    fn test_headset_disconnecting_uses_link_code() {
        let table = StateCodeTable::default();
        assert_eq!(table.headset_audio.disconnecting, table.a2dp_link.disconnecting);

        assert_eq!(
            decide(&headset(3, 12), &BOTH, &table),
            Some(PlaybackCommand::Pause)
        );
        // 11 is the headset audio "connecting" code, not a disconnecting one
        assert_eq!(decide(&headset(11, 12), &BOTH, &table), None);
    }

    #[test]
    fn test_custom_state_codes() {
        let table = StateCodeTable {
            a2dp_link: StateCodes {
                connected: 20,
                disconnected: 21,
                disconnecting: 22,
            },
            ..StateCodeTable::default()
        };

        assert_eq!(
            decide(&a2dp(22, 20), &BOTH, &table),
            Some(PlaybackCommand::Pause)
        );
        assert_eq!(decide(&a2dp(20, 21), &BOTH, &table), Some(PlaybackCommand::Play));
        assert_eq!(decide(&a2dp(0, 2), &BOTH, &table), None);
    }

    #[test]
    fn test_repeated_event_repeats_command() {
        let table = StateCodeTable::default();
        let event = a2dp(0, 2);
        let first = decide(&event, &BOTH, &table);
        let second = decide(&event, &BOTH, &table);
        assert_eq!(first, second);
        assert_eq!(first, Some(PlaybackCommand::Pause));
    }
}
