//! Outbound telemetry transport trait

use carpet_protocol::OutboundTopic;

/// Errors reported by the transport collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// No broker session
    Offline,
    /// Outbound queue is full; the message was dropped
    QueueFull,
    /// Payload does not fit a single message
    PayloadTooLarge,
}

/// Publishes the carpet's readings to the broker
///
/// Delivery is fire-and-forget. Acknowledgement, retry and QoS belong to
/// the implementation, not to the caller.
pub trait Transport {
    fn publish(&mut self, topic: OutboundTopic, payload: &[u8]) -> Result<(), TransportError>;

    /// Whether a broker session is currently up
    fn is_connected(&self) -> bool;
}
