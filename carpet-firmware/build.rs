//! Build script for carpet-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates carpet.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Keys accepted per section, mirrored from the firmware's parser
const SECTIONS: &[(&str, &[&str])] = &[
    ("control", &["tick_ms"]),
    (
        "display",
        &[
            "timeout_ms",
            "page_dwell_ms",
            "scroll_frame_ms",
            "scroll_step_px",
            "pages",
        ],
    ),
    ("pressure", &["threshold"]),
    ("motion", &["trigger"]),
];

const PAGES: &[&str] = &[
    "inside_temperature",
    "inside_humidity",
    "inside_pressure",
    "outside_temperature",
    "next_departure",
];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate carpet.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=carpet.toml");

    let config_path = Path::new("carpet.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: carpet.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds carpet.toml at compile time.                ║\n\
            ║  Please create one in the carpet-firmware directory.             ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read carpet.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in carpet.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_layout(&config, &mut errors);
    validate_ranges(&config, &mut errors);
    validate_pages(&config, &mut errors);
    validate_trigger(&config, &mut errors);

    // The on-target parser reads one line per key
    for line in config_content.lines() {
        let line = line.trim();
        if !line.starts_with('#') && line.contains('[') && !line.contains(']') {
            errors.push(format!("multi-line arrays are not supported: '{}'", line));
        }
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in carpet.toml                     ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=carpet.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Only known sections, each a table of known keys
fn validate_layout(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };

    for (name, section) in root {
        let Some((_, keys)) = SECTIONS.iter().find(|(s, _)| s == name) else {
            errors.push(format!("unknown section [{}]", name));
            continue;
        };
        let Some(table) = section.as_table() else {
            errors.push(format!("[{}] must be a table", name));
            continue;
        };
        for key in table.keys() {
            if !keys.contains(&key.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", name, key));
            }
        }
    }
}

fn get<'a>(config: &'a toml::Value, section: &str, key: &str) -> Option<&'a toml::Value> {
    config.get(section).and_then(|s| s.get(key))
}

fn validate_ranges(config: &toml::Value, errors: &mut Vec<String>) {
    let ranges: &[(&str, &str, i64, i64)] = &[
        ("control", "tick_ms", 1, u32::MAX as i64),
        ("display", "timeout_ms", 1, u32::MAX as i64),
        ("display", "page_dwell_ms", 0, u32::MAX as i64),
        ("display", "scroll_frame_ms", 1, u32::MAX as i64),
        ("display", "scroll_step_px", 1, u16::MAX as i64),
        ("pressure", "threshold", 0, 1023),
    ];

    for &(section, key, min, max) in ranges {
        match get(config, section, key) {
            None => {}
            Some(toml::Value::Integer(v)) if (min..=max).contains(v) => {}
            Some(toml::Value::Integer(_)) => {
                errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
            }
            Some(_) => errors.push(format!("[{}] {} must be an integer", section, key)),
        }
    }
}

fn validate_pages(config: &toml::Value, errors: &mut Vec<String>) {
    let pages = match get(config, "display", "pages") {
        None => return,
        Some(toml::Value::Array(pages)) => pages,
        Some(_) => {
            errors.push("[display] pages must be an array".to_string());
            return;
        }
    };

    if pages.is_empty() {
        errors.push("[display] pages cannot be empty".to_string());
    }

    let mut seen: Vec<&str> = Vec::new();
    for page in pages {
        match page.as_str() {
            Some(name) if !PAGES.contains(&name) => {
                errors.push(format!("[display] unknown page '{}'", name));
            }
            Some(name) if seen.contains(&name) => {
                errors.push(format!("[display] page '{}' listed twice", name));
            }
            Some(name) => seen.push(name),
            None => errors.push("[display] pages must be strings".to_string()),
        }
    }
}

fn validate_trigger(config: &toml::Value, errors: &mut Vec<String>) {
    match get(config, "motion", "trigger") {
        None => {}
        Some(toml::Value::String(t)) if t == "rising_edge" || t == "level" => {}
        Some(_) => {
            errors.push("[motion] trigger must be 'rising_edge' or 'level'".to_string());
        }
    }
}
