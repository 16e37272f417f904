//! Indoor environment reading

use core::fmt::Write;

use carpet_protocol::payload::format_centi;
use heapless::String;

/// Longest rendering of a single value, e.g. `"-40.00C"` or `"1100.00hPa"`
pub const MAX_VALUE_TEXT: usize = 16;

/// One compensated sample from the environment sensor
///
/// Values are fixed point so they can be rendered exactly as the sensor
/// reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EnvironmentReading {
    /// Temperature in 0.01 °C
    pub temperature_centi_c: i32,
    /// Relative humidity in 0.01 %
    pub humidity_centi_pct: u32,
    /// Pressure in Pa (0.01 hPa)
    pub pressure_pa: u32,
}

impl EnvironmentReading {
    /// Temperature as decimal text, e.g. `"23.45"`
    pub fn temperature(&self) -> String<MAX_VALUE_TEXT> {
        format_centi(self.temperature_centi_c)
    }

    /// Humidity as decimal text, e.g. `"45.67"`
    pub fn humidity(&self) -> String<MAX_VALUE_TEXT> {
        format_centi(self.humidity_centi_pct.min(i32::MAX as u32) as i32)
    }

    /// Pressure in hPa as decimal text, e.g. `"1013.25"`
    pub fn pressure(&self) -> String<MAX_VALUE_TEXT> {
        format_centi(self.pressure_pa.min(i32::MAX as u32) as i32)
    }

    /// Temperature with unit, e.g. `"23.45C"`
    pub fn temperature_text(&self) -> String<MAX_VALUE_TEXT> {
        with_unit(self.temperature(), "C")
    }

    /// Humidity with unit, e.g. `"45.67%"`
    pub fn humidity_text(&self) -> String<MAX_VALUE_TEXT> {
        with_unit(self.humidity(), "%")
    }

    /// Pressure with unit, e.g. `"1013.25hPa"`
    pub fn pressure_text(&self) -> String<MAX_VALUE_TEXT> {
        with_unit(self.pressure(), "hPa")
    }
}

fn with_unit(mut value: String<MAX_VALUE_TEXT>, unit: &str) -> String<MAX_VALUE_TEXT> {
    let _ = value.write_str(unit);
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    const READING: EnvironmentReading = EnvironmentReading {
        temperature_centi_c: 2345,
        humidity_centi_pct: 4567,
        pressure_pa: 101_325,
    };

    #[test]
    fn test_rendered_values() {
        assert_eq!(READING.temperature_text().as_str(), "23.45C");
        assert_eq!(READING.humidity_text().as_str(), "45.67%");
        assert_eq!(READING.pressure_text().as_str(), "1013.25hPa");
    }

    #[test]
    fn test_published_values_have_no_unit() {
        assert_eq!(READING.temperature().as_str(), "23.45");
        assert_eq!(READING.humidity().as_str(), "45.67");
        assert_eq!(READING.pressure().as_str(), "1013.25");
    }

    #[test]
    fn test_below_freezing() {
        let cold = EnvironmentReading {
            temperature_centi_c: -405,
            ..READING
        };
        assert_eq!(cold.temperature_text().as_str(), "-4.05C");
    }
}
