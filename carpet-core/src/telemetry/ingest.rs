//! Inbound message dispatch
//!
//! Each subscribed topic maps to one decoder in a static table. The
//! transport receive path hands over `(topic, payload)`; a payload that
//! decodes is stored, one that does not is rejected and the previous
//! sample stays untouched.

use carpet_protocol::payload::{parse_decimal, parse_text};
use carpet_protocol::{InboundTopic, PayloadError};

use super::sample::{TelemetryKind, TelemetryValue};
use super::store::TelemetryStore;

/// Errors from [`ingest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IngestError {
    /// Payload did not have the shape the topic expects
    MalformedSample(PayloadError),
    /// Topic has no entry in the dispatch table
    UnknownTopic,
}

type Decoder = fn(&[u8]) -> Result<TelemetryValue, PayloadError>;

fn decode_temperature(payload: &[u8]) -> Result<TelemetryValue, PayloadError> {
    parse_decimal(payload).map(TelemetryValue::Temperature)
}

fn decode_transport(payload: &[u8]) -> Result<TelemetryValue, PayloadError> {
    parse_text(payload).map(TelemetryValue::TransportInfo)
}

/// Topic to decoder table
const DISPATCH: [(InboundTopic, Decoder); 2] = [
    (InboundTopic::RemoteTemperature, decode_temperature),
    (InboundTopic::TransportSchedule, decode_transport),
];

fn decoder_for(topic: InboundTopic) -> Option<Decoder> {
    DISPATCH.iter().find(|(t, _)| *t == topic).map(|(_, d)| *d)
}

/// Decode `payload` for `topic` and store it
///
/// Returns the kind that was updated.
pub fn ingest(
    store: &TelemetryStore,
    topic: InboundTopic,
    payload: &[u8],
    now_ms: u64,
) -> Result<TelemetryKind, IngestError> {
    let decode = decoder_for(topic).ok_or(IngestError::UnknownTopic)?;
    let value = decode(payload).map_err(IngestError::MalformedSample)?;
    let kind = value.kind();
    store.update(value, now_ms);
    Ok(kind)
}
