//! Remote telemetry: sample types, the shared latest-value store, and the
//! topic dispatch that feeds it.

mod ingest;
mod sample;
mod store;

pub use ingest::{ingest, IngestError};
pub use sample::{TelemetryKind, TelemetrySample, TelemetryValue, MAX_TRANSPORT_LEN};
pub use store::TelemetryStore;
