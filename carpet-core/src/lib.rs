//! Board-agnostic core logic for the smart carpet firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (pressure pads, environment sensor, LED,
//!   buzzer, motion detector, transport)
//! - Latest-value telemetry store and inbound topic dispatch
//! - Page set and page rotation
//! - Motion activity gate
//! - Pressure pad actuation and the non-blocking alert queue
//! - Render loop and the per-tick control cycle
//! - Configuration types and the `carpet.toml` parser

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod actuation;
pub mod config;
pub mod cycle;
pub mod environment;
pub mod gate;
pub mod pages;
pub mod render;
pub mod telemetry;
pub mod traits;
