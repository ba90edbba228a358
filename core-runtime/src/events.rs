//! # Event Bus System
//!
//! Provides an in-process implementation of the host broadcast channel
//! ([`EventChannel`]) for desktop hosts, demos and tests.
//!
//! ## Overview
//!
//! The event bus consists of:
//! - **Handler registry**: handlers registered against a set of event kinds,
//!   invoked synchronously on the publishing thread
//! - **Broadcast tap**: a `tokio::sync::broadcast` channel that mirrors every
//!   published event to async observers
//! - **EventStream**: wrapper for consuming the tap with filtering
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   publish    ┌───────────┐   on_event    ┌──────────────┐
//! │ Host / OS    ├─────────────>│           ├──────────────>│ Policy engine│
//! └──────────────┘              │           │               └──────────────┘
//!                               │ EventBus  │   on_event    ┌──────────────┐
//! ┌──────────────┐   publish    │           ├──────────────>│ Status resp. │
//! │ Responder    ├─────────────>│           │               └──────────────┘
//! └──────────────┘              │           │   subscribe   ┌──────────────┐
//!                               │           ├──────────────>│ Async tap    │
//!                               └───────────┘               └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use bridge_traits::channel::{ChannelEvent, EventChannel};
//! use core_runtime::events::EventBus;
//! use std::sync::Arc;
//!
//! let bus = EventBus::new(16);
//! let handle = bus
//!     .register(
//!         &["com.android.music.playstatusrequest"],
//!         Arc::new(|event: &ChannelEvent| println!("request: {}", event.tag)),
//!     )
//!     .unwrap();
//!
//! bus.publish(ChannelEvent::new("com.android.music.playstatusrequest"));
//! bus.unregister(handle).unwrap();
//! assert!(bus.unregister(handle).is_err());
//! ```
//!
//! ## Dispatch Semantics
//!
//! - Handlers run in registration order, on the publishing thread.
//! - The handler list is snapshotted before dispatch, so a handler may
//!   register or unregister from inside `on_event`. Unregistering affects
//!   only later publishes.
//! - A panicking handler propagates to the publisher; the bus does not
//!   isolate handlers from each other.
//! - Publishing with no tap subscribers is not an error.

use bridge_traits::channel::{ChannelEvent, EventChannel, EventHandler, SubscriptionHandle};
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, trace};

// Re-export commonly used types
pub use tokio::sync::broadcast::error::RecvError;
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the broadcast tap.
///
/// Tap subscribers that fall further behind than this receive
/// `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

struct Registration {
    handle: SubscriptionHandle,
    kinds: HashSet<String>,
    handler: Arc<dyn EventHandler>,
}

/// In-process broadcast channel.
///
/// Cloning the bus yields another handle onto the same registry and tap.
#[derive(Clone)]
pub struct EventBus {
    registrations: Arc<RwLock<Vec<Registration>>>,
    sender: broadcast::Sender<ChannelEvent>,
}

impl EventBus {
    /// Creates a new event bus whose tap buffers `capacity` events per
    /// subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            registrations: Arc::new(RwLock::new(Vec::new())),
            sender,
        }
    }

    /// Subscribes to the broadcast tap.
    ///
    /// Every published event is mirrored here after the registered handlers
    /// ran. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<ChannelEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active tap subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.registrations.read().len()
    }

    /// Whether `handle` is currently registered.
    pub fn is_registered(&self, handle: SubscriptionHandle) -> bool {
        self.registrations
            .read()
            .iter()
            .any(|registration| registration.handle == handle)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl EventChannel for EventBus {
    fn register(
        &self,
        kinds: &[&str],
        handler: Arc<dyn EventHandler>,
    ) -> BridgeResult<SubscriptionHandle> {
        let handle = SubscriptionHandle::new();
        let kinds: HashSet<String> = kinds.iter().map(|kind| kind.to_string()).collect();

        debug!(%handle, kinds = ?kinds, "Registering channel handler");

        self.registrations.write().push(Registration {
            handle,
            kinds,
            handler,
        });
        Ok(handle)
    }

    fn unregister(&self, handle: SubscriptionHandle) -> BridgeResult<()> {
        let mut registrations = self.registrations.write();
        let position = registrations
            .iter()
            .position(|registration| registration.handle == handle)
            .ok_or(BridgeError::NotRegistered(handle))?;

        registrations.remove(position);
        debug!(%handle, "Unregistered channel handler");
        Ok(())
    }

    fn publish(&self, event: ChannelEvent) {
        let handlers: Vec<Arc<dyn EventHandler>> = self
            .registrations
            .read()
            .iter()
            .filter(|registration| registration.kinds.contains(&event.tag))
            .map(|registration| Arc::clone(&registration.handler))
            .collect();

        trace!(tag = %event.tag, handlers = handlers.len(), "Dispatching channel event");

        for handler in &handlers {
            handler.on_event(&event);
        }

        // No tap subscribers is the common case
        let _ = self.sender.send(event);
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("handler_count", &self.handler_count())
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

/// Type alias for event filter functions.
type EventFilter = Box<dyn Fn(&ChannelEvent) -> bool + Send + Sync>;

/// A wrapper around the broadcast tap with optional filtering.
///
/// # Example
///
/// ```rust
/// use core_runtime::events::{EventBus, EventStream};
///
/// let bus = EventBus::new(16);
/// let stream = EventStream::new(bus.subscribe())
///     .filter_tags(["com.android.music.playstatechanged"]);
/// ```
pub struct EventStream {
    receiver: Receiver<ChannelEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    /// Creates a new event stream from a receiver.
    pub fn new(receiver: Receiver<ChannelEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Adds a filter function to this stream.
    ///
    /// Only events that match the filter will be returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&ChannelEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Restricts the stream to events whose tag is one of `tags`.
    pub fn filter_tags<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags: HashSet<String> = tags.into_iter().map(Into::into).collect();
        self.filter(move |event| tags.contains(&event.tag))
    }

    fn accepts(&self, event: &ChannelEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter (if any).
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<ChannelEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without blocking.
    ///
    /// Returns `None` if no matching events are currently available.
    pub fn try_recv(&mut self) -> Option<Result<ChannelEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recording_handler() -> (Arc<Mutex<Vec<String>>>, Arc<dyn EventHandler>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let handler: Arc<dyn EventHandler> =
            Arc::new(move |event: &ChannelEvent| sink.lock().unwrap().push(event.tag.clone()));
        (seen, handler)
    }

    #[test]
    fn test_event_bus_creation() {
        let bus = EventBus::new(10);
        assert_eq!(bus.handler_count(), 0);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_dispatch_by_kind() {
        let bus = EventBus::default();
        let (seen, handler) = recording_handler();
        bus.register(&["a", "b"], handler).unwrap();

        bus.publish(ChannelEvent::new("a"));
        bus.publish(ChannelEvent::new("c"));
        bus.publish(ChannelEvent::new("b"));

        assert_eq!(*seen.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let bus = EventBus::default();
        let order = Arc::new(Mutex::new(Vec::new()));

        for id in 0..3 {
            let order = Arc::clone(&order);
            bus.register(
                &["tick"],
                Arc::new(move |_: &ChannelEvent| order.lock().unwrap().push(id)),
            )
            .unwrap();
        }

        bus.publish(ChannelEvent::new("tick"));
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_unregister_stops_delivery() {
        let bus = EventBus::default();
        let (seen, handler) = recording_handler();
        let handle = bus.register(&["a"], handler).unwrap();
        assert!(bus.is_registered(handle));

        bus.publish(ChannelEvent::new("a"));
        bus.unregister(handle).unwrap();
        bus.publish(ChannelEvent::new("a"));

        assert!(!bus.is_registered(handle));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_unregister_unknown_handle_fails() {
        let bus = EventBus::default();
        let handle = SubscriptionHandle::new();

        let err = bus.unregister(handle).unwrap_err();
        assert!(matches!(err, BridgeError::NotRegistered(h) if h == handle));
    }

    #[test]
    fn test_double_unregister_fails() {
        let bus = EventBus::default();
        let (_, handler) = recording_handler();
        let handle = bus.register(&["a"], handler).unwrap();

        assert!(bus.unregister(handle).is_ok());
        assert!(bus.unregister(handle).is_err());
    }

    #[test]
    fn test_handler_can_unregister_itself() {
        let bus = EventBus::default();
        let slot: Arc<Mutex<Option<SubscriptionHandle>>> = Arc::new(Mutex::new(None));
        let calls = Arc::new(Mutex::new(0));

        let handler = {
            let bus = bus.clone();
            let slot = Arc::clone(&slot);
            let calls = Arc::clone(&calls);
            move |_: &ChannelEvent| {
                *calls.lock().unwrap() += 1;
                if let Some(handle) = slot.lock().unwrap().take() {
                    bus.unregister(handle).unwrap();
                }
            }
        };
        let handle = bus.register(&["once"], Arc::new(handler)).unwrap();
        *slot.lock().unwrap() = Some(handle);

        bus.publish(ChannelEvent::new("once"));
        bus.publish(ChannelEvent::new("once"));

        assert_eq!(*calls.lock().unwrap(), 1);
        assert_eq!(bus.handler_count(), 0);
    }

    #[test]
    fn test_publish_without_subscribers_is_ok() {
        let bus = EventBus::new(4);
        bus.publish(ChannelEvent::new("nobody-listens"));
    }

    #[tokio::test]
    async fn test_tap_receives_published_events() {
        let bus = EventBus::new(10);
        let mut tap = bus.subscribe();

        let event = ChannelEvent::new("com.android.music.metachanged").with_extra("track", "Intro");
        bus.publish(event.clone());

        assert_eq!(tap.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_event_stream_with_filter() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe()).filter_tags(["wanted"]);

        bus.publish(ChannelEvent::new("ignored"));
        bus.publish(ChannelEvent::new("wanted").with_extra("n", 1));

        let received = stream.recv().await.unwrap();
        assert_eq!(received.tag, "wanted");
        assert_eq!(received.int_extra("n"), Some(1));
    }

    #[test]
    fn test_try_recv_empty() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe());
        assert!(stream.try_recv().is_none());
    }

    #[test]
    fn test_lagged_subscriber() {
        let bus = EventBus::new(2);
        let mut stream = EventStream::new(bus.subscribe());

        for i in 0..5 {
            bus.publish(ChannelEvent::new("burst").with_extra("i", i));
        }

        assert!(matches!(stream.try_recv(), Some(Err(RecvError::Lagged(_)))));
    }
}
