//! Rotating information pages
//!
//! A page is an id plus a content provider. Providers read the latest
//! indoor reading and the telemetry store and always return some text:
//! missing data turns into a placeholder, never an error.

use core::fmt::Write;

use carpet_display::MAX_TEXT_LEN;
use heapless::{String, Vec};

use crate::environment::EnvironmentReading;
use crate::telemetry::TelemetryStore;

/// Above this outside temperature the page suggests sunglasses
pub const WARM_ABOVE_C: f32 = 25.0;
/// Below this outside temperature the page suggests a coat
pub const COLD_BELOW_C: f32 = 10.0;

pub const NO_TEMPERATURE_DATA: &str = "No temperature data received yet.";
pub const NO_TRANSPORT_DATA: &str = "No transport data received yet.";
pub const INSIDE_SENSOR_UNAVAILABLE: &str = "Inside sensor unavailable.";

/// Identifiers of the available pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PageId {
    InsideTemperature,
    InsideHumidity,
    InsidePressure,
    OutsideTemperature,
    NextDeparture,
}

impl PageId {
    pub const COUNT: usize = 5;

    /// Every page in the default rotation order
    pub const ALL: [PageId; Self::COUNT] = [
        PageId::InsideTemperature,
        PageId::InsideHumidity,
        PageId::InsidePressure,
        PageId::OutsideTemperature,
        PageId::NextDeparture,
    ];

    /// Configuration name
    pub const fn name(self) -> &'static str {
        match self {
            PageId::InsideTemperature => "inside_temperature",
            PageId::InsideHumidity => "inside_humidity",
            PageId::InsidePressure => "inside_pressure",
            PageId::OutsideTemperature => "outside_temperature",
            PageId::NextDeparture => "next_departure",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Produce this page's text
    pub fn render(self, ctx: &PageContext<'_>) -> String<MAX_TEXT_LEN> {
        let page = PAGES.iter().find(|p| p.id == self).unwrap_or(&PAGES[0]);
        (page.provider)(ctx)
    }
}

/// Data a page provider may draw on
#[derive(Clone, Copy)]
pub struct PageContext<'a> {
    /// Latest good indoor reading, if the sensor ever produced one
    pub environment: Option<&'a EnvironmentReading>,
    pub telemetry: &'a TelemetryStore,
}

type Provider = fn(&PageContext<'_>) -> String<MAX_TEXT_LEN>;

struct Page {
    id: PageId,
    provider: Provider,
}

const PAGES: [Page; PageId::COUNT] = [
    Page {
        id: PageId::InsideTemperature,
        provider: inside_temperature,
    },
    Page {
        id: PageId::InsideHumidity,
        provider: inside_humidity,
    },
    Page {
        id: PageId::InsidePressure,
        provider: inside_pressure,
    },
    Page {
        id: PageId::OutsideTemperature,
        provider: outside_temperature,
    },
    Page {
        id: PageId::NextDeparture,
        provider: next_departure,
    },
];

fn text(s: &str) -> String<MAX_TEXT_LEN> {
    let mut out = String::new();
    let _ = out.push_str(s);
    out
}

fn inside_value(label: &str, value: Option<&str>) -> String<MAX_TEXT_LEN> {
    let Some(value) = value else {
        return text(INSIDE_SENSOR_UNAVAILABLE);
    };
    let mut out = String::new();
    let _ = write!(out, "{}: {}", label, value);
    out
}

fn inside_temperature(ctx: &PageContext<'_>) -> String<MAX_TEXT_LEN> {
    let value = ctx.environment.map(|e| e.temperature_text());
    inside_value("Inside Temperature", value.as_deref())
}

fn inside_humidity(ctx: &PageContext<'_>) -> String<MAX_TEXT_LEN> {
    let value = ctx.environment.map(|e| e.humidity_text());
    inside_value("Inside Humidity", value.as_deref())
}

fn inside_pressure(ctx: &PageContext<'_>) -> String<MAX_TEXT_LEN> {
    let value = ctx.environment.map(|e| e.pressure_text());
    inside_value("Inside Pressure", value.as_deref())
}

fn outside_temperature(ctx: &PageContext<'_>) -> String<MAX_TEXT_LEN> {
    let Some(t) = ctx.telemetry.temperature() else {
        return text(NO_TEMPERATURE_DATA);
    };
    let mut out = String::new();
    let _ = if t > WARM_ABOVE_C {
        write!(out, "Outside Temperature: {}C It's sunny, take your sunglasses!", t)
    } else if t < COLD_BELOW_C {
        write!(out, "Outside Temperature: {}C It's a cold day, wear a warm coat!", t)
    } else {
        write!(out, "It's {}C Outside, enjoy your day!", t)
    };
    out
}

fn next_departure(ctx: &PageContext<'_>) -> String<MAX_TEXT_LEN> {
    let Some(info) = ctx.telemetry.transport_info() else {
        return text(NO_TRANSPORT_DATA);
    };
    let mut out = String::new();
    let _ = write!(out, "Next Bus: {}", info);
    out
}

/// Most pages a rotation can hold
pub const MAX_PAGES: usize = PageId::COUNT;

/// Cyclic page rotation gated by display activity
///
/// The first poll while active shows the current page. After that the
/// rotation moves one page forward each time the dwell time has passed,
/// and only while active.
#[derive(Debug, Clone)]
pub struct PageScheduler {
    order: Vec<PageId, MAX_PAGES>,
    cursor: usize,
    last_switch_at: Option<u64>,
    dwell_ms: u64,
}

impl PageScheduler {
    /// Rotate over `order`; an empty order falls back to every page
    pub fn new(order: &[PageId], dwell_ms: u64) -> Self {
        let mut pages: Vec<PageId, MAX_PAGES> = order.iter().copied().take(MAX_PAGES).collect();
        if pages.is_empty() {
            pages = PageId::ALL.into_iter().collect();
        }
        Self {
            order: pages,
            cursor: 0,
            last_switch_at: None,
            dwell_ms,
        }
    }

    /// Page due for display at `now_ms`, if any
    ///
    /// Returns `Some` when a page was just shown for the first time or the
    /// rotation advanced; the caller renders it. Returns `None` while
    /// inactive or within the dwell time.
    pub fn poll(&mut self, active: bool, now_ms: u64) -> Option<PageId> {
        if !active {
            return None;
        }
        match self.last_switch_at {
            None => {
                self.last_switch_at = Some(now_ms);
                Some(self.current())
            }
            Some(at) if now_ms.saturating_sub(at) >= self.dwell_ms => {
                self.cursor = (self.cursor + 1) % self.order.len();
                self.last_switch_at = Some(now_ms);
                Some(self.current())
            }
            Some(_) => None,
        }
    }

    pub fn current(&self) -> PageId {
        self.order[self.cursor]
    }

    pub fn index(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn pages(&self) -> &[PageId] {
        &self.order
    }

    /// Back to the first page; the next active poll shows it immediately
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.last_switch_at = None;
    }
}
