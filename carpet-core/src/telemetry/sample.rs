//! Telemetry sample types

use heapless::String;

/// Longest transport schedule message kept
pub const MAX_TRANSPORT_LEN: usize = 128;

/// Kinds of remote telemetry the carpet keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TelemetryKind {
    /// Outside temperature, degrees Celsius
    Temperature,
    /// Next public transport departure
    TransportInfo,
}

impl TelemetryKind {
    pub const COUNT: usize = 2;

    pub(crate) const fn slot(self) -> usize {
        match self {
            TelemetryKind::Temperature => 0,
            TelemetryKind::TransportInfo => 1,
        }
    }
}

/// A telemetry value of a known kind
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TelemetryValue {
    Temperature(f32),
    TransportInfo(String<MAX_TRANSPORT_LEN>),
}

impl TelemetryValue {
    pub fn kind(&self) -> TelemetryKind {
        match self {
            TelemetryValue::Temperature(_) => TelemetryKind::Temperature,
            TelemetryValue::TransportInfo(_) => TelemetryKind::TransportInfo,
        }
    }
}

/// The latest value of one kind and when it arrived
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetrySample {
    pub value: TelemetryValue,
    /// Monotonic milliseconds at arrival
    pub received_at_ms: u64,
}

impl TelemetrySample {
    pub fn kind(&self) -> TelemetryKind {
        self.value.kind()
    }
}
