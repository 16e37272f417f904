//! Latest-value telemetry store
//!
//! One slot per [`TelemetryKind`]. The transport receive path writes, the
//! render path reads. Each access swaps or clones a whole sample inside a
//! critical section, so a reader sees either the previous or the new sample
//! and never waits on a writer for longer than one copy.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::String;

use super::sample::{TelemetryKind, TelemetrySample, TelemetryValue, MAX_TRANSPORT_LEN};

type Slot = Mutex<RefCell<Option<TelemetrySample>>>;

/// Shared single-slot store, usable from a `static`
pub struct TelemetryStore {
    slots: [Slot; TelemetryKind::COUNT],
}

impl Default for TelemetryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryStore {
    pub const fn new() -> Self {
        Self {
            slots: [
                Mutex::new(RefCell::new(None)),
                Mutex::new(RefCell::new(None)),
            ],
        }
    }

    /// Overwrite the slot for the value's kind
    ///
    /// Last write wins; a value that was never read is simply replaced.
    pub fn update(&self, value: TelemetryValue, now_ms: u64) {
        let slot = &self.slots[value.kind().slot()];
        let sample = TelemetrySample {
            value,
            received_at_ms: now_ms,
        };
        critical_section::with(|cs| {
            *slot.borrow_ref_mut(cs) = Some(sample);
        });
    }

    /// Latest sample of `kind`, or `None` if nothing has arrived yet
    pub fn read(&self, kind: TelemetryKind) -> Option<TelemetrySample> {
        let slot = &self.slots[kind.slot()];
        critical_section::with(|cs| slot.borrow_ref(cs).clone())
    }

    /// Latest outside temperature
    pub fn temperature(&self) -> Option<f32> {
        match self.read(TelemetryKind::Temperature)?.value {
            TelemetryValue::Temperature(t) => Some(t),
            TelemetryValue::TransportInfo(_) => None,
        }
    }

    /// Latest transport schedule message
    pub fn transport_info(&self) -> Option<String<MAX_TRANSPORT_LEN>> {
        match self.read(TelemetryKind::TransportInfo)?.value {
            TelemetryValue::TransportInfo(info) => Some(info),
            TelemetryValue::Temperature(_) => None,
        }
    }
}
