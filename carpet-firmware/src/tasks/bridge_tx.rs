//! Bridge UART transmit task
//!
//! Sends queued publishes and heartbeat responses to the network bridge.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use carpet_protocol::{CarpetMessage, MAX_FRAME_SIZE};

use crate::channels::{PONG_REQUEST, PUBLISH_CHANNEL};

/// Bridge TX task - sends frames to the bridge
#[embassy_executor::task]
pub async fn bridge_tx_task(mut tx: BufferedUartTx) {
    info!("Bridge TX task started");

    loop {
        match select(PONG_REQUEST.wait(), PUBLISH_CHANNEL.receive()).await {
            Either::First(()) => {
                send(&mut tx, &CarpetMessage::Pong).await;
                trace!("PONG sent");
            }
            Either::Second(request) => {
                let message = CarpetMessage::Publish {
                    topic: request.topic,
                    payload: &request.payload,
                };
                send(&mut tx, &message).await;
                trace!("Published {} bytes to {}", request.payload.len(), request.topic.name());
            }
        }
    }
}

async fn send(tx: &mut BufferedUartTx, message: &CarpetMessage<'_>) {
    let frame = match message.to_frame() {
        Ok(frame) => frame,
        Err(e) => {
            warn!("Failed to build frame: {:?}", e);
            return;
        }
    };

    let mut buf = [0u8; MAX_FRAME_SIZE];
    match frame.encode(&mut buf) {
        Ok(len) => {
            if let Err(e) = tx.write_all(&buf[..len]).await {
                warn!("UART write error: {:?}", e);
            }
        }
        Err(e) => warn!("Failed to encode frame: {:?}", e),
    }
}
