//! Minimal TOML parser for the carpet configuration
//!
//! Handles only the subset `carpet.toml` uses. It does NOT support the
//! full TOML spec.
//!
//! Supported:
//! - `[section]` headers
//! - `key = value` with integers, strings and flat string arrays
//! - Comments (`# ...`), also after a value
//!
//! Keys that are missing keep their default. The result is validated
//! before it is returned.

use heapless::Vec;

use super::types::{CarpetConfig, ConfigError};
use crate::gate::MotionTrigger;
use crate::pages::{PageId, MAX_PAGES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Control,
    Display,
    Pressure,
    Motion,
}

/// Parse `carpet.toml` text into a validated [`CarpetConfig`]
pub fn parse_config(input: &str) -> Result<CarpetConfig, ConfigError> {
    let mut config = CarpetConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ConfigError::InvalidValue)?;
        apply_value(section, key, value, &mut config)?;
    }

    config.validate()?;
    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ConfigError> {
    match header.trim() {
        "control" => Ok(Section::Control),
        "display" => Ok(Section::Display),
        "pressure" => Ok(Section::Pressure),
        "motion" => Ok(Section::Motion),
        _ => Err(ConfigError::InvalidSection),
    }
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Inline comment, unless the '#' sits inside a string
    let value = match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn parse_string(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ConfigError> {
    // TOML allows `10_000`
    let mut digits: heapless::String<24> = heapless::String::new();
    for ch in value.chars().filter(|&c| c != '_') {
        digits.push(ch).map_err(|_| ConfigError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ConfigError::InvalidValue)
}

fn parse_trigger(value: &str) -> Result<MotionTrigger, ConfigError> {
    match parse_string(value) {
        "rising_edge" => Ok(MotionTrigger::RisingEdge),
        "level" => Ok(MotionTrigger::Level),
        _ => Err(ConfigError::InvalidValue),
    }
}

fn parse_pages(value: &str) -> Result<Vec<PageId, MAX_PAGES>, ConfigError> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or(ConfigError::InvalidValue)?;

    let mut pages = Vec::new();
    for item in inner.split(',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let page = PageId::from_name(parse_string(item)).ok_or(ConfigError::InvalidValue)?;
        pages.push(page).map_err(|_| ConfigError::TooManyItems)?;
    }
    Ok(pages)
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut CarpetConfig,
) -> Result<(), ConfigError> {
    match (section, key) {
        (Section::Control, "tick_ms") => config.tick_ms = parse_int(value)?,
        (Section::Display, "timeout_ms") => config.display_timeout_ms = parse_int(value)?,
        (Section::Display, "page_dwell_ms") => config.page_dwell_ms = parse_int(value)?,
        (Section::Display, "scroll_frame_ms") => config.scroll_frame_ms = parse_int(value)?,
        (Section::Display, "scroll_step_px") => config.scroll_step_px = parse_int(value)?,
        (Section::Display, "pages") => config.pages = parse_pages(value)?,
        (Section::Pressure, "threshold") => config.pressure_threshold = parse_int(value)?,
        (Section::Motion, "trigger") => config.motion_trigger = parse_trigger(value)?,
        _ => return Err(ConfigError::UnknownKey),
    }
    Ok(())
}
