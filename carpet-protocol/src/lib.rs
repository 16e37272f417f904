//! Smart carpet telemetry protocol
//!
//! This crate defines what the carpet exchanges with the home automation
//! broker, and how it travels over the UART link to the network bridge
//! co-processor that owns the broker session.
//!
//! # Topics
//!
//! Every topic the carpet knows is listed in a static table
//! ([`InboundTopic`], [`OutboundTopic`]). On the link a topic is a single
//! byte id; the broker-facing name is only known to the table.
//!
//! # Link framing
//!
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B     │ 1B   │ 0–160B      │ 1B       │
//! └───────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! The bridge is a pass-through: it forwards subscribed broker messages as
//! telemetry frames and publishes whatever the carpet hands it.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod frame;
pub mod messages;
pub mod payload;
pub mod topics;

pub use frame::{Frame, FrameDecoder, FrameError, FRAME_START, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use messages::{BridgeEvent, CarpetMessage};
pub use payload::{PayloadError, MAX_TOPIC_PAYLOAD};
pub use topics::{InboundTopic, OutboundTopic};
