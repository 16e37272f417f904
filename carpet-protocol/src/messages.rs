//! Bridge link messages
//!
//! Message types are divided into two directions:
//! - Bridge → Carpet: broker telemetry, session status, heartbeat requests
//! - Carpet → Bridge: publications, heartbeat responses

use heapless::Vec;

use crate::frame::{Frame, FrameError};
use crate::payload::MAX_TOPIC_PAYLOAD;
use crate::topics::{InboundTopic, OutboundTopic};

// Message type IDs: Bridge → Carpet
pub const MSG_TELEMETRY: u8 = 0x01;
pub const MSG_SESSION: u8 = 0x02;
pub const MSG_PING: u8 = 0x03;

// Message type IDs: Carpet → Bridge
pub const MSG_PUBLISH: u8 = 0x20;
pub const MSG_PONG: u8 = 0x21;

/// Events delivered by the network bridge
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeEvent {
    /// A message arrived on a subscribed topic
    ///
    /// Payload: `[topic_id][bytes...]`
    Telemetry {
        topic: InboundTopic,
        payload: Vec<u8, MAX_TOPIC_PAYLOAD>,
    },
    /// Broker session came up or went down
    ///
    /// Payload: `[0 | 1]`
    Session { online: bool },
    /// Heartbeat request
    Ping,
}

impl BridgeEvent {
    /// Decode an event from a frame
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        match frame.msg_type {
            MSG_TELEMETRY => {
                let (&id, body) = frame
                    .payload
                    .split_first()
                    .ok_or(FrameError::InvalidMessage)?;
                let topic = InboundTopic::from_id(id).ok_or(FrameError::UnknownTopic)?;
                let payload = Vec::from_slice(body).map_err(|_| FrameError::PayloadTooLarge)?;
                Ok(BridgeEvent::Telemetry { topic, payload })
            }
            MSG_SESSION => match frame.payload.as_slice() {
                [0] => Ok(BridgeEvent::Session { online: false }),
                [1] => Ok(BridgeEvent::Session { online: true }),
                _ => Err(FrameError::InvalidMessage),
            },
            MSG_PING => Ok(BridgeEvent::Ping),
            _ => Err(FrameError::InvalidMessage),
        }
    }

    /// Encode this event into a frame (bridge side, and tests)
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            BridgeEvent::Telemetry { topic, payload } => {
                Frame::with_header(MSG_TELEMETRY, topic.id(), payload)
            }
            BridgeEvent::Session { online } => Frame::new(MSG_SESSION, &[u8::from(*online)]),
            BridgeEvent::Ping => Ok(Frame::empty(MSG_PING)),
        }
    }
}

/// Messages sent by the carpet to the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CarpetMessage<'a> {
    /// Publish a payload on an outbound topic
    ///
    /// Payload: `[topic_id][bytes...]`
    Publish {
        topic: OutboundTopic,
        payload: &'a [u8],
    },
    /// Heartbeat response
    Pong,
}

impl<'a> CarpetMessage<'a> {
    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            CarpetMessage::Publish { topic, payload } => {
                if payload.len() > MAX_TOPIC_PAYLOAD {
                    return Err(FrameError::PayloadTooLarge);
                }
                Frame::with_header(MSG_PUBLISH, topic.id(), payload)
            }
            CarpetMessage::Pong => Ok(Frame::empty(MSG_PONG)),
        }
    }

    /// Decode a message from a frame (bridge side, and tests)
    pub fn from_frame(frame: &'a Frame) -> Result<Self, FrameError> {
        match frame.msg_type {
            MSG_PUBLISH => {
                let (&id, payload) = frame
                    .payload
                    .split_first()
                    .ok_or(FrameError::InvalidMessage)?;
                let topic = OutboundTopic::from_id(id).ok_or(FrameError::UnknownTopic)?;
                Ok(CarpetMessage::Publish { topic, payload })
            }
            MSG_PONG => Ok(CarpetMessage::Pong),
            _ => Err(FrameError::InvalidMessage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telemetry_from_frame() {
        let frame = Frame::with_header(MSG_TELEMETRY, 0x01, b"18.5").unwrap();
        let event = BridgeEvent::from_frame(&frame).unwrap();
        match event {
            BridgeEvent::Telemetry { topic, payload } => {
                assert_eq!(topic, InboundTopic::RemoteTemperature);
                assert_eq!(payload.as_slice(), b"18.5");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_telemetry_unknown_topic() {
        let frame = Frame::with_header(MSG_TELEMETRY, 0x7F, b"x").unwrap();
        assert_eq!(BridgeEvent::from_frame(&frame), Err(FrameError::UnknownTopic));
    }

    #[test]
    fn test_telemetry_without_topic_byte() {
        let frame = Frame::empty(MSG_TELEMETRY);
        assert_eq!(
            BridgeEvent::from_frame(&frame),
            Err(FrameError::InvalidMessage)
        );
    }

    #[test]
    fn test_session_status() {
        let up = Frame::new(MSG_SESSION, &[1]).unwrap();
        let down = Frame::new(MSG_SESSION, &[0]).unwrap();
        let bad = Frame::new(MSG_SESSION, &[2]).unwrap();
        assert_eq!(
            BridgeEvent::from_frame(&up),
            Ok(BridgeEvent::Session { online: true })
        );
        assert_eq!(
            BridgeEvent::from_frame(&down),
            Ok(BridgeEvent::Session { online: false })
        );
        assert_eq!(BridgeEvent::from_frame(&bad), Err(FrameError::InvalidMessage));
    }

    #[test]
    fn test_publish_frame_layout() {
        let msg = CarpetMessage::Publish {
            topic: OutboundTopic::Status,
            payload: b"Online",
        };
        let frame = msg.to_frame().unwrap();
        assert_eq!(frame.msg_type, MSG_PUBLISH);
        assert_eq!(frame.payload[0], OutboundTopic::Status.id());
        assert_eq!(&frame.payload[1..], b"Online");
        assert_eq!(CarpetMessage::from_frame(&frame), Ok(msg));
    }

    #[test]
    fn test_publish_rejects_oversized_payload() {
        let big = [b'x'; MAX_TOPIC_PAYLOAD + 1];
        let msg = CarpetMessage::Publish {
            topic: OutboundTopic::Temperature,
            payload: &big,
        };
        assert_eq!(msg.to_frame(), Err(FrameError::PayloadTooLarge));
    }
}
