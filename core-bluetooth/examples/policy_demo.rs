//! Walks the Bluetooth policy through a typical headset session.
//!
//! Run with `cargo run -p core-bluetooth --example policy_demo`.

use bridge_traits::{
    channel::{ChannelEvent, EventChannel, Payload},
    diagnostics::StatusCallbacks,
    logging::{ConsoleLogger, LogLevel},
    playback::PlaybackControl,
    settings::InMemoryPolicySettings,
};
use core_bluetooth::{
    tags::{
        ACTION_A2DP_CONNECTION_STATE_CHANGED, ACTION_HEADSET_AUDIO_STATE_CHANGED,
        AVRCP_META_CHANGED, AVRCP_PLAY_STATE_CHANGED, EXTRA_PREVIOUS_STATE, EXTRA_STATE,
        PLAY_STATUS_REQUEST,
    },
    BluetoothManager,
};
use core_runtime::{
    config::CoreConfig,
    events::{EventBus, EventStream},
    logging::{init_logging, LogFormat, LoggingConfig},
};
use serde_json::json;
use std::sync::Arc;

struct ConsolePlayback;

impl PlaybackControl for ConsolePlayback {
    fn pause(&self, from_user_action: bool) {
        println!("  -> playback paused (user action: {})", from_user_action);
    }

    fn play(&self) {
        println!("  -> playback resumed");
    }
}

struct ConsoleService;

impl StatusCallbacks for ConsoleService {
    fn notify_change(&self, event_tag: &str) {
        println!("  -> service notified: {}", event_tag);
    }
}

fn connection(tag: &str, state: i32, previous: i32) -> ChannelEvent {
    ChannelEvent::new(tag)
        .with_extra(EXTRA_STATE, state)
        .with_extra(EXTRA_PREVIOUS_STATE, previous)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(
        LoggingConfig::default()
            .with_format(LogFormat::Compact)
            .with_level(LogLevel::Debug)
            .with_logger_sink(Arc::new(ConsoleLogger::default())),
    )?;

    let bus = Arc::new(EventBus::default());
    let settings = Arc::new(InMemoryPolicySettings::new(true, true));
    let mut outbound = EventStream::new(bus.subscribe())
        .filter_tags([AVRCP_PLAY_STATE_CHANGED, AVRCP_META_CHANGED]);

    let config = CoreConfig::builder()
        .playback(Arc::new(ConsolePlayback))
        .policy_settings(settings.clone())
        .status_callbacks(Arc::new(ConsoleService))
        .event_channel(bus.clone())
        .build()?;

    let manager = BluetoothManager::new(&config);
    manager.start_connection_listener()?;
    manager.start_status_listener()?;

    println!("Headset audio connects");
    bus.publish(connection(ACTION_HEADSET_AUDIO_STATE_CHANGED, 12, 10));

    println!("A2DP link drops");
    bus.publish(connection(ACTION_A2DP_CONNECTION_STATE_CHANGED, 0, 2));

    println!("User disables pause-on-disconnect, link drops again");
    settings.set_pause_on_disconnect(false);
    bus.publish(connection(ACTION_A2DP_CONNECTION_STATE_CHANGED, 0, 2));

    println!("Car stereo asks for play status");
    bus.publish(ChannelEvent::new(PLAY_STATUS_REQUEST));

    let mut extras = Payload::new();
    extras.insert("playing".to_string(), json!(true));
    extras.insert("position".to_string(), json!(42_000));
    manager.publish_play_state_changed(extras);

    let mut meta = Payload::new();
    meta.insert("track".to_string(), json!("Intro"));
    meta.insert("artist".to_string(), json!("The xx"));
    manager.publish_meta_changed(meta);

    for _ in 0..2 {
        let event = outbound.recv().await?;
        println!("Observed {} {:?}", event.tag, event.payload);
    }

    manager.stop_status_listener()?;
    manager.stop_connection_listener()?;

    // Pairing is enforced
    if let Err(err) = manager.stop_connection_listener() {
        println!("Second stop rejected: {}", err);
    }

    println!("Handlers left on bus: {}", bus.handler_count());
    Ok(())
}
