//! Topic payload codecs
//!
//! Broker payloads are flat text. Numbers travel as decimal text, schedule
//! messages as free UTF-8 text. Parsing never panics; a payload that does
//! not have the expected shape is reported so the caller can drop it.

use core::fmt::Write;

use heapless::String;

/// Maximum payload carried for a single topic
pub const MAX_TOPIC_PAYLOAD: usize = 128;

/// Liveness marker published every control cycle
pub const STATUS_ONLINE: &str = "Online";

/// Announcement published once the bridge reports the broker session is up
pub const STATUS_BOOT: &str = "Smart Carpet Online";

/// Payload decoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PayloadError {
    /// Payload is empty or only whitespace
    Empty,
    /// Payload is not valid UTF-8
    InvalidUtf8,
    /// Payload is not a decimal number
    NotANumber,
    /// Payload parsed to NaN or infinity
    NotFinite,
}

fn as_trimmed_str(payload: &[u8]) -> Result<&str, PayloadError> {
    let text = core::str::from_utf8(payload).map_err(|_| PayloadError::InvalidUtf8)?;
    let text = text.trim();
    if text.is_empty() {
        return Err(PayloadError::Empty);
    }
    Ok(text)
}

/// Parse a decimal text payload such as `"18"` or `"-3.5"`
pub fn parse_decimal(payload: &[u8]) -> Result<f32, PayloadError> {
    let text = as_trimmed_str(payload)?;
    let value: f32 = text.parse().map_err(|_| PayloadError::NotANumber)?;
    if !value.is_finite() {
        return Err(PayloadError::NotFinite);
    }
    Ok(value)
}

/// Parse a free text payload
///
/// Surrounding whitespace is removed. Text longer than `N` bytes is cut at
/// the last character boundary that fits.
pub fn parse_text<const N: usize>(payload: &[u8]) -> Result<String<N>, PayloadError> {
    let text = as_trimmed_str(payload)?;
    let mut out = String::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    Ok(out)
}

/// Format a value in hundredths as decimal text, e.g. `2345` as `"23.45"`
pub fn format_centi<const N: usize>(centi: i32) -> String<N> {
    let mut out = String::new();
    let sign = if centi < 0 { "-" } else { "" };
    let magnitude = centi.unsigned_abs();
    let _ = write!(out, "{}{}.{:02}", sign, magnitude / 100, magnitude % 100);
    out
}
