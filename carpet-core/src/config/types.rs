//! Configuration type definitions

use heapless::Vec;

use crate::actuation::DEFAULT_THRESHOLD;
use crate::gate::MotionTrigger;
use crate::pages::{PageId, MAX_PAGES};

/// Runtime configuration of the carpet
///
/// `Default` gives the reference appliance's values.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CarpetConfig {
    /// Control cycle period
    pub tick_ms: u32,
    /// Display stays on this long after the last motion
    pub display_timeout_ms: u32,
    /// Minimum time a page stays up
    pub page_dwell_ms: u32,
    /// Delay between scroll frames
    pub scroll_frame_ms: u32,
    /// Pixels moved per scroll frame
    pub scroll_step_px: u16,
    /// Pad reading at or above which a pad counts as pressed
    pub pressure_threshold: u16,
    pub motion_trigger: MotionTrigger,
    /// Page rotation order
    pub pages: Vec<PageId, MAX_PAGES>,
}

impl Default for CarpetConfig {
    fn default() -> Self {
        Self {
            tick_ms: 1000,
            display_timeout_ms: 10_000,
            page_dwell_ms: 5000,
            scroll_frame_ms: 100,
            scroll_step_px: 1,
            pressure_threshold: DEFAULT_THRESHOLD,
            motion_trigger: MotionTrigger::RisingEdge,
            pages: PageId::ALL.into_iter().collect(),
        }
    }
}

/// Why a configuration was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unknown or malformed `[section]` header
    InvalidSection,
    /// Key not valid in its section
    UnknownKey,
    /// Value has the wrong type or spelling
    InvalidValue,
    /// More list entries than fit
    TooManyItems,
    /// Value parsed but is outside the allowed range
    OutOfRange,
}

/// Largest pad reading the 10-bit converter produces
pub const MAX_PRESSURE_READING: u16 = 1023;

impl CarpetConfig {
    /// Check value ranges and cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 || self.display_timeout_ms == 0 || self.scroll_frame_ms == 0 {
            return Err(ConfigError::OutOfRange);
        }
        if self.scroll_step_px == 0 {
            return Err(ConfigError::OutOfRange);
        }
        if self.pressure_threshold > MAX_PRESSURE_READING {
            return Err(ConfigError::OutOfRange);
        }
        if self.pages.is_empty() {
            return Err(ConfigError::OutOfRange);
        }
        for (i, page) in self.pages.iter().enumerate() {
            if self.pages[..i].contains(page) {
                return Err(ConfigError::InvalidValue);
            }
        }
        Ok(())
    }
}
