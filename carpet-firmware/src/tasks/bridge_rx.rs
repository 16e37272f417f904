//! Bridge UART receive task
//!
//! Receives frames from the network bridge and feeds the telemetry store.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embassy_time::Instant;
use embedded_io_async::Read;
use portable_atomic::Ordering;

use carpet_core::telemetry::{ingest, IngestError};
use carpet_protocol::{BridgeEvent, FrameDecoder};

use crate::channels::{BRIDGE_ONLINE, PONG_REQUEST, TELEMETRY};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Bridge RX task - receives and parses frames from the bridge
#[embassy_executor::task]
pub async fn bridge_rx_task(mut rx: BufferedUartRx) {
    info!("Bridge RX task started");

    let mut decoder = FrameDecoder::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match decoder.push(byte) {
                        Ok(Some(frame)) => match BridgeEvent::from_frame(&frame) {
                            Ok(event) => handle_event(event),
                            Err(e) => warn!("Failed to parse bridge event: {:?}", e),
                        },
                        Ok(None) => {}
                        Err(e) => warn!("Frame parse error: {:?}", e),
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

fn handle_event(event: BridgeEvent) {
    match event {
        BridgeEvent::Telemetry { topic, payload } => {
            match ingest(&TELEMETRY, topic, &payload, Instant::now().as_millis()) {
                Ok(kind) => debug!("{} updated from {}", kind, topic.name()),
                Err(IngestError::MalformedSample(e)) => {
                    warn!("Malformed payload on {}: {:?}", topic.name(), e);
                }
                Err(e) => warn!("Telemetry rejected: {:?}", e),
            }
        }
        BridgeEvent::Session { online } => {
            let was = BRIDGE_ONLINE.swap(online, Ordering::Relaxed);
            if was != online {
                info!("Broker session {}", if online { "up" } else { "down" });
            }
        }
        BridgeEvent::Ping => {
            trace!("PING received");
            PONG_REQUEST.signal(());
        }
    }
}
