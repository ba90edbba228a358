//! # Bluetooth Manager
//!
//! Owns the connection policy engine, the remote status responder and the two
//! channel subscriptions that feed them. The host calls the start/stop pairs
//! from its service lifecycle and the publish methods whenever play state or
//! metadata changes.

use crate::engine::ConnectionPolicyEngine;
use crate::error::Result;
use crate::responder::RemoteStatusResponder;
use crate::subscription::Subscription;
use crate::tags::{CONNECTION_EVENT_KINDS, STATUS_EVENT_KINDS};
use bridge_traits::channel::{Payload, SubscriptionHandle};
use core_runtime::config::CoreConfig;
use std::fmt;
use std::sync::Arc;
use tracing::info;

pub struct BluetoothManager {
    engine: Arc<ConnectionPolicyEngine>,
    responder: Arc<RemoteStatusResponder>,
    connection_listener: Subscription,
    status_listener: Subscription,
}

impl BluetoothManager {
    /// Wire the engine and responder to the configured bridges.
    ///
    /// Both listeners start inactive.
    pub fn new(config: &CoreConfig) -> Self {
        let engine = Arc::new(ConnectionPolicyEngine::from_config(config));
        let responder = Arc::new(RemoteStatusResponder::from_config(config));

        let connection_listener = Subscription::new(
            "connection",
            CONNECTION_EVENT_KINDS,
            Arc::clone(&config.event_channel),
            engine.clone(),
        );
        let status_listener = Subscription::new(
            "status",
            STATUS_EVENT_KINDS,
            Arc::clone(&config.event_channel),
            responder.clone(),
        );

        Self {
            engine,
            responder,
            connection_listener,
            status_listener,
        }
    }

    /// Start reacting to A2DP link and headset audio broadcasts.
    pub fn start_connection_listener(&self) -> Result<SubscriptionHandle> {
        let handle = self.connection_listener.start()?;
        info!("Bluetooth connection listener started");
        Ok(handle)
    }

    pub fn stop_connection_listener(&self) -> Result<()> {
        self.connection_listener.stop()?;
        info!("Bluetooth connection listener stopped");
        Ok(())
    }

    /// Start answering remote play status requests.
    pub fn start_status_listener(&self) -> Result<SubscriptionHandle> {
        let handle = self.status_listener.start()?;
        info!("Remote status listener started");
        Ok(handle)
    }

    pub fn stop_status_listener(&self) -> Result<()> {
        self.status_listener.stop()?;
        info!("Remote status listener stopped");
        Ok(())
    }

    pub fn is_connection_listener_active(&self) -> bool {
        self.connection_listener.is_active()
    }

    pub fn is_status_listener_active(&self) -> bool {
        self.status_listener.is_active()
    }

    pub fn publish_play_state_changed(&self, payload: Payload) {
        self.responder.publish_play_state_changed(payload);
    }

    pub fn publish_meta_changed(&self, payload: Payload) {
        self.responder.publish_meta_changed(payload);
    }

    pub fn engine(&self) -> &ConnectionPolicyEngine {
        &self.engine
    }

    pub fn responder(&self) -> &RemoteStatusResponder {
        &self.responder
    }
}

impl fmt::Debug for BluetoothManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BluetoothManager")
            .field("connection_listener", &self.connection_listener)
            .field("status_listener", &self.status_listener)
            .finish()
    }
}
