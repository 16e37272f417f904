//! Sensor drivers

pub mod bme280;
pub mod mcp3008;
pub mod motion;

pub use bme280::{Bme280, Calibration, ADDRESS_PRIMARY, ADDRESS_SECONDARY};
pub use mcp3008::Mcp3008;
pub use motion::MotionPin;
