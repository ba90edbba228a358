//! Event channel abstraction
//!
//! Models the host's broadcast mechanism (Android broadcast intents, a
//! D-Bus signal bus, an in-process bus in tests): handlers register interest
//! in a set of event kinds, and anyone can publish a tagged event carrying a
//! key-value payload.
//!
//! # Example
//!
//! ```ignore
//! use bridge_traits::channel::{ChannelEvent, EventChannel};
//! use std::sync::Arc;
//!
//! fn listen(channel: &dyn EventChannel) -> bridge_traits::error::Result<()> {
//!     let handle = channel.register(
//!         &["com.android.music.playstatusrequest"],
//!         Arc::new(|event: &ChannelEvent| println!("got {}", event.tag)),
//!     )?;
//!     channel.unregister(handle)
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::{error::Result, platform::PlatformSendSync};

/// Key-value payload attached to a channel event.
///
/// The core treats payloads it publishes as opaque; payloads it receives are
/// read through the typed accessors on [`ChannelEvent`].
pub type Payload = Map<String, Value>;

/// A tagged event as carried by the host channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelEvent {
    /// Event kind, e.g. an intent action string.
    pub tag: String,
    /// Extras attached to the event.
    #[serde(default)]
    pub payload: Payload,
}

impl ChannelEvent {
    /// Create an event with an empty payload.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            payload: Payload::new(),
        }
    }

    /// Create an event carrying the given payload.
    pub fn with_payload(tag: impl Into<String>, payload: Payload) -> Self {
        Self {
            tag: tag.into(),
            payload,
        }
    }

    /// Add a single extra, builder style.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// Read an integer extra.
    ///
    /// Returns `None` when the key is absent, not an integer, or out of `i32`
    /// range.
    pub fn int_extra(&self, key: &str) -> Option<i32> {
        self.payload
            .get(key)
            .and_then(Value::as_i64)
            .and_then(|value| i32::try_from(value).ok())
    }
}

/// Opaque handle identifying one registration on an [`EventChannel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(Uuid);

impl SubscriptionHandle {
    /// Generate a new handle.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Construct a handle from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SubscriptionHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Reactive handler invoked by the channel's dispatcher.
///
/// Handlers run on the channel's dispatch thread and must return quickly.
pub trait EventHandler: PlatformSendSync {
    fn on_event(&self, event: &ChannelEvent);
}

impl<F> EventHandler for F
where
    F: Fn(&ChannelEvent) + PlatformSendSync,
{
    fn on_event(&self, event: &ChannelEvent) {
        self(event)
    }
}

/// Host broadcast channel.
pub trait EventChannel: PlatformSendSync {
    /// Register `handler` for every event whose tag is in `kinds`.
    fn register(&self, kinds: &[&str], handler: Arc<dyn EventHandler>)
        -> Result<SubscriptionHandle>;

    /// Remove a registration.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotRegistered`](crate::error::BridgeError::NotRegistered)
    /// if the handle is unknown or was already unregistered.
    fn unregister(&self, handle: SubscriptionHandle) -> Result<()>;

    /// Publish an event to every interested listener.
    fn publish(&self, event: ChannelEvent);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_int_extra() {
        let event = ChannelEvent::new("tag")
            .with_extra("state", 2)
            .with_extra("name", "headset")
            .with_extra("huge", i64::MAX);

        assert_eq!(event.int_extra("state"), Some(2));
        assert_eq!(event.int_extra("name"), None);
        assert_eq!(event.int_extra("huge"), None);
        assert_eq!(event.int_extra("missing"), None);
    }

    #[test]
    fn test_event_json_shape() {
        let event = ChannelEvent::new("com.android.music.metachanged").with_extra("track", "Intro");
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({"tag": "com.android.music.metachanged", "payload": {"track": "Intro"}})
        );

        let bare: ChannelEvent = serde_json::from_value(json!({"tag": "ping"})).unwrap();
        assert!(bare.payload.is_empty());
    }

    #[test]
    fn test_subscription_handles_are_unique() {
        let a = SubscriptionHandle::new();
        let b = SubscriptionHandle::new();
        assert_ne!(a, b);
        assert_eq!(a, SubscriptionHandle::from_uuid(*a.as_uuid()));
        assert_eq!(a.to_string(), a.as_uuid().to_string());
    }

    #[test]
    fn test_closure_handler() {
        use std::sync::Mutex;

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let handler: Arc<dyn EventHandler> =
            Arc::new(move |event: &ChannelEvent| sink.lock().unwrap().push(event.tag.clone()));

        handler.on_event(&ChannelEvent::new("a"));
        handler.on_event(&ChannelEvent::new("b"));

        assert_eq!(*seen.lock().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }
}
