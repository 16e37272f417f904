//! Indicator outputs

pub mod rgb;

pub use rgb::GpioRgbLed;
