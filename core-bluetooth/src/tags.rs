//! Event tags and payload keys exchanged with the host.
//!
//! Values match the Android broadcast actions and extras byte for byte so a
//! host adapter can forward intents without translation.

use core_runtime::config::ConnectionKind;

/// Remote controller asks the player for its current status.
pub const PLAY_STATUS_REQUEST: &str = "com.android.music.playstatusrequest";

/// Notification name handed to the service in answer to a status request.
pub const PLAY_STATUS_RESPONSE: &str = "com.android.music.playstatusresponse";

pub const AVRCP_PLAY_STATE_CHANGED: &str = "com.android.music.playstatechanged";

pub const AVRCP_META_CHANGED: &str = "com.android.music.metachanged";

/// `BluetoothA2dp.ACTION_CONNECTION_STATE_CHANGED`
pub const ACTION_A2DP_CONNECTION_STATE_CHANGED: &str =
    "android.bluetooth.a2dp.profile.action.CONNECTION_STATE_CHANGED";

/// `BluetoothHeadset.ACTION_AUDIO_STATE_CHANGED`
pub const ACTION_HEADSET_AUDIO_STATE_CHANGED: &str =
    "android.bluetooth.headset.profile.action.AUDIO_STATE_CHANGED";

pub const EXTRA_STATE: &str = "android.bluetooth.profile.extra.STATE";

pub const EXTRA_PREVIOUS_STATE: &str = "android.bluetooth.profile.extra.PREVIOUS_STATE";

/// Kinds the connection listener registers for.
pub const CONNECTION_EVENT_KINDS: &[&str] = &[
    ACTION_A2DP_CONNECTION_STATE_CHANGED,
    ACTION_HEADSET_AUDIO_STATE_CHANGED,
];

/// Kinds the status listener registers for.
pub const STATUS_EVENT_KINDS: &[&str] = &[PLAY_STATUS_REQUEST];

/// Map a broadcast action to the connection kind it reports.
pub fn connection_kind_for_tag(tag: &str) -> Option<ConnectionKind> {
    match tag {
        ACTION_A2DP_CONNECTION_STATE_CHANGED => Some(ConnectionKind::A2dpLink),
        ACTION_HEADSET_AUDIO_STATE_CHANGED => Some(ConnectionKind::HeadsetAudio),
        _ => None,
    }
}
