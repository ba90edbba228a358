//! # Host Bridge Traits
//!
//! Abstraction traits that the host playback service must implement for the
//! Bluetooth policy core.
//!
//! ## Overview
//!
//! This crate defines the contract between the policy core and the
//! application around it. Each trait is a narrow window onto a collaborator
//! the core depends on but does not own: the playback engine, the user's
//! preferences, the diagnostics reporter and the broadcast channel.
//!
//! ## Traits
//!
//! ### Playback
//! - [`PlaybackControl`](playback::PlaybackControl) - Pause / play commands
//!
//! ### Preferences
//! - [`PolicySettings`](settings::PolicySettings) - Pause-on-disconnect and resume-on-connect toggles
//!
//! ### Platform Integration
//! - [`EventChannel`](channel::EventChannel) - Register, unregister and publish tagged events
//! - [`StatusCallbacks`](diagnostics::StatusCallbacks) - Notify the owning service of a status event
//!
//! ### Utilities
//! - [`DiagnosticsSink`](diagnostics::DiagnosticsSink) - Breadcrumbs for crash reports
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! Fallible bridge calls use [`BridgeError`](error::BridgeError). Command-style
//! calls (`pause`, `play`, `publish`, `notify_change`) are infallible from the
//! core's point of view; failures inside them are the host's concern.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` on native targets (see
//! [`PlatformSendSync`](platform::PlatformSendSync)) because hosts dispatch
//! broadcasts on their own threads.

pub mod channel;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod platform;
pub mod playback;
pub mod settings;

pub use error::BridgeError;

// Re-export commonly used types
pub use channel::{ChannelEvent, EventChannel, EventHandler, Payload, SubscriptionHandle};
pub use diagnostics::{DiagnosticsSink, StatusCallbacks};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use playback::PlaybackControl;
pub use settings::{InMemoryPolicySettings, PolicySettings};
