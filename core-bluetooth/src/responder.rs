//! # Remote Status Responder
//!
//! Answers AVRCP-style "what are you playing" requests from remote
//! controllers and publishes play-state and metadata snapshots for them.
//!
//! The responder never looks inside a payload. Assembling the extras is the
//! playback service's job, and they are forwarded exactly as given.

use crate::tags::{
    AVRCP_META_CHANGED, AVRCP_PLAY_STATE_CHANGED, PLAY_STATUS_REQUEST, PLAY_STATUS_RESPONSE,
};
use bridge_traits::channel::{ChannelEvent, EventChannel, EventHandler, Payload};
use bridge_traits::diagnostics::StatusCallbacks;
use core_runtime::config::CoreConfig;
use std::sync::Arc;
use tracing::{debug, trace};

pub struct RemoteStatusResponder {
    callbacks: Arc<dyn StatusCallbacks>,
    channel: Arc<dyn EventChannel>,
}

impl RemoteStatusResponder {
    pub fn new(callbacks: Arc<dyn StatusCallbacks>, channel: Arc<dyn EventChannel>) -> Self {
        Self { callbacks, channel }
    }

    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(
            Arc::clone(&config.status_callbacks),
            Arc::clone(&config.event_channel),
        )
    }

    /// Ask the service for a status response if `event` is a status request.
    ///
    /// Returns whether a response was requested.
    pub fn on_status_request(&self, event: &ChannelEvent) -> bool {
        if event.tag != PLAY_STATUS_REQUEST {
            trace!(tag = %event.tag, "Ignoring non status-request event");
            return false;
        }

        debug!("Remote play status requested");
        self.callbacks.notify_change(PLAY_STATUS_RESPONSE);
        true
    }

    /// Broadcast a play-state snapshot to remote controllers.
    pub fn publish_play_state_changed(&self, payload: Payload) {
        self.publish(AVRCP_PLAY_STATE_CHANGED, payload);
    }

    /// Broadcast a track metadata snapshot to remote controllers.
    pub fn publish_meta_changed(&self, payload: Payload) {
        self.publish(AVRCP_META_CHANGED, payload);
    }

    fn publish(&self, tag: &'static str, payload: Payload) {
        debug!(tag, extras = payload.len(), "Publishing remote status");
        self.channel.publish(ChannelEvent::with_payload(tag, payload));
    }
}

impl EventHandler for RemoteStatusResponder {
    fn on_event(&self, event: &ChannelEvent) {
        self.on_status_request(event);
    }
}
