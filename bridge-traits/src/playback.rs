//! Playback bridge trait.
//!
//! The policy core never drives the audio engine directly. It only issues
//! the two transport commands below; queue handling, focus and routing stay
//! inside the host's playback service.

use crate::platform::PlatformSendSync;

/// Transport commands the host playback engine accepts from the core.
///
/// Both calls are fire-and-forget. Implementations must tolerate repeated
/// calls (pausing while paused, playing while playing) since connectivity
/// broadcasts can be delivered more than once.
pub trait PlaybackControl: PlatformSendSync {
    /// Pause playback.
    ///
    /// `from_user_action` is `false` for every pause issued by the
    /// connection policy; hosts use it to decide whether a later automatic
    /// resume is allowed.
    fn pause(&self, from_user_action: bool);

    /// Start or resume playback of the current queue.
    fn play(&self);
}
