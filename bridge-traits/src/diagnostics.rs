//! Diagnostics and status-callback bridges.

use crate::platform::PlatformSendSync;

/// Best-effort breadcrumb trail forwarded to the host's crash/analytics
/// reporter.
///
/// Breadcrumbs never influence control flow. Implementations must not block
/// and must swallow their own failures.
pub trait DiagnosticsSink: PlatformSendSync {
    fn drop_breadcrumb(&self, tag: &str, message: &str);
}

/// Callback into the owning playback service.
///
/// The service reacts to a named status event, typically by assembling the
/// current play-state extras and broadcasting them.
pub trait StatusCallbacks: PlatformSendSync {
    fn notify_change(&self, event_tag: &str);
}
