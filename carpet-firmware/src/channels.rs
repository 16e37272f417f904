//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use heapless::Vec;
use portable_atomic::AtomicBool;

use carpet_core::actuation::{Alert, ALERT_QUEUE_DEPTH};
use carpet_core::telemetry::TelemetryStore;
use carpet_protocol::{OutboundTopic, MAX_TOPIC_PAYLOAD};

/// Channel capacity for outbound publishes (one cycle publishes up to five)
const PUBLISH_CHANNEL_SIZE: usize = 8;

/// One message for the bridge to publish
pub struct PublishRequest {
    pub topic: OutboundTopic,
    pub payload: Vec<u8, MAX_TOPIC_PAYLOAD>,
}

/// Outbound publishes from the control cycle to the bridge TX task
pub static PUBLISH_CHANNEL: Channel<CriticalSectionRawMutex, PublishRequest, PUBLISH_CHANNEL_SIZE> =
    Channel::new();

/// Pad alerts from the control cycle to the buzzer task
pub static ALERT_CHANNEL: Channel<CriticalSectionRawMutex, Alert, ALERT_QUEUE_DEPTH> =
    Channel::new();

/// Signal that a PING was received from the bridge
pub static PONG_REQUEST: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Broker session state as last reported by the bridge
pub static BRIDGE_ONLINE: AtomicBool = AtomicBool::new(false);

/// Latest remote telemetry, written by bridge RX and read by the renderer
pub static TELEMETRY: TelemetryStore = TelemetryStore::new();
