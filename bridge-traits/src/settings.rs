//! Policy settings abstraction
//!
//! The two Bluetooth playback toggles are owned by the host's preferences
//! storage (UserDefaults, SharedPreferences, a config file). The core only
//! reads them, and reads them again on every event so a toggle flipped in the
//! settings screen applies to the very next broadcast.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::platform::PlatformSendSync;

/// Read-only view of the Bluetooth playback preferences.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::settings::PolicySettings;
///
/// fn describe(settings: &dyn PolicySettings) -> String {
///     format!(
///         "pause on disconnect: {}, resume on connect: {}",
///         settings.pause_on_disconnect(),
///         settings.resume_on_connect()
///     )
/// }
/// ```
pub trait PolicySettings: PlatformSendSync {
    /// Whether playback pauses when a connected device goes away.
    fn pause_on_disconnect(&self) -> bool;

    /// Whether playback resumes when a device (re)connects.
    fn resume_on_connect(&self) -> bool;
}

/// Atomic-backed settings for hosts without a preferences store, and for tests.
#[derive(Debug)]
pub struct InMemoryPolicySettings {
    pause_on_disconnect: AtomicBool,
    resume_on_connect: AtomicBool,
}

impl InMemoryPolicySettings {
    pub fn new(pause_on_disconnect: bool, resume_on_connect: bool) -> Self {
        Self {
            pause_on_disconnect: AtomicBool::new(pause_on_disconnect),
            resume_on_connect: AtomicBool::new(resume_on_connect),
        }
    }

    pub fn set_pause_on_disconnect(&self, enabled: bool) {
        self.pause_on_disconnect.store(enabled, Ordering::Relaxed);
    }

    pub fn set_resume_on_connect(&self, enabled: bool) {
        self.resume_on_connect.store(enabled, Ordering::Relaxed);
    }
}

impl Default for InMemoryPolicySettings {
    /// Pause on disconnect is on and resume on connect is off, matching the
    /// out-of-the-box preferences of the player.
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl PolicySettings for InMemoryPolicySettings {
    fn pause_on_disconnect(&self) -> bool {
        self.pause_on_disconnect.load(Ordering::Relaxed)
    }

    fn resume_on_connect(&self) -> bool {
        self.resume_on_connect.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_toggles() {
        let settings = InMemoryPolicySettings::default();
        assert!(settings.pause_on_disconnect());
        assert!(!settings.resume_on_connect());
    }

    #[test]
    fn test_toggles_are_observed_immediately() {
        let settings = InMemoryPolicySettings::new(false, false);

        settings.set_pause_on_disconnect(true);
        settings.set_resume_on_connect(true);
        assert!(settings.pause_on_disconnect());
        assert!(settings.resume_on_connect());

        settings.set_pause_on_disconnect(false);
        assert!(!settings.pause_on_disconnect());
        assert!(settings.resume_on_connect());
    }
}
