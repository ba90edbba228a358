//! # Subscription Lifecycle
//!
//! A [`Subscription`] pairs one handler with a fixed set of event kinds and
//! owns its registration on the event channel. `start` and `stop` must be
//! called in matching pairs: starting twice or stopping an inactive
//! subscription is reported as an error instead of being ignored.
//!
//! A subscription that is dropped while still registered unregisters itself.

use crate::error::{BluetoothError, Result};
use bridge_traits::channel::{EventChannel, EventHandler, SubscriptionHandle};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

pub struct Subscription {
    name: &'static str,
    kinds: &'static [&'static str],
    channel: Arc<dyn EventChannel>,
    handler: Arc<dyn EventHandler>,
    handle: Mutex<Option<SubscriptionHandle>>,
}

impl Subscription {
    /// Create an inactive subscription. Nothing is registered until
    /// [`start`](Self::start).
    pub fn new(
        name: &'static str,
        kinds: &'static [&'static str],
        channel: Arc<dyn EventChannel>,
        handler: Arc<dyn EventHandler>,
    ) -> Self {
        Self {
            name,
            kinds,
            channel,
            handler,
            handle: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kinds(&self) -> &'static [&'static str] {
        self.kinds
    }

    pub fn is_active(&self) -> bool {
        self.handle.lock().is_some()
    }

    /// Handle of the current registration, if any.
    pub fn handle(&self) -> Option<SubscriptionHandle> {
        *self.handle.lock()
    }

    /// Register the handler for this subscription's kinds.
    ///
    /// # Errors
    ///
    /// - [`BluetoothError::AlreadyListening`] if already registered
    /// - [`BluetoothError::Bridge`] if the channel rejects the registration
    #[instrument(skip(self), fields(listener = self.name))]
    pub fn start(&self) -> Result<SubscriptionHandle> {
        let mut slot = self.handle.lock();
        if slot.is_some() {
            return Err(BluetoothError::AlreadyListening {
                listener: self.name,
            });
        }

        let handle = self
            .channel
            .register(self.kinds, Arc::clone(&self.handler))?;
        *slot = Some(handle);

        debug!(%handle, "Listener registered");
        Ok(handle)
    }

    /// Unregister the handler.
    ///
    /// Events already being dispatched still complete; later events are not
    /// delivered.
    ///
    /// # Errors
    ///
    /// - [`BluetoothError::NotListening`] if not registered
    /// - [`BluetoothError::Bridge`] if the channel has no such registration
    #[instrument(skip(self), fields(listener = self.name))]
    pub fn stop(&self) -> Result<()> {
        // Released before calling into the channel so a handler may stop its
        // own subscription mid-dispatch.
        let handle = self
            .handle
            .lock()
            .take()
            .ok_or(BluetoothError::NotListening {
                listener: self.name,
            })?;

        self.channel.unregister(handle)?;

        debug!(%handle, "Listener unregistered");
        Ok(())
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.get_mut().take() {
            warn!(listener = self.name, %handle, "Listener dropped while registered");
            if let Err(err) = self.channel.unregister(handle) {
                warn!(listener = self.name, error = %err, "Failed to unregister dropped listener");
            }
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("name", &self.name)
            .field("kinds", &self.kinds)
            .field("handle", &self.handle())
            .finish()
    }
}
