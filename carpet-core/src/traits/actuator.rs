//! RGB indicator and buzzer traits

/// Errors from output hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorError {
    /// GPIO write failed
    Gpio,
    /// PWM could not produce the requested frequency
    UnsupportedFrequency,
}

/// 8-bit per channel color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const OFF: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// RGB status indicator
pub trait LedOutput {
    fn set(&mut self, color: Rgb) -> Result<(), ActuatorError>;
}

/// Tone generator driving a passive buzzer
///
/// Both calls return immediately; timing is the caller's job.
pub trait BuzzerOutput {
    /// Start a square wave at `frequency_hz`
    fn tone_on(&mut self, frequency_hz: u16) -> Result<(), ActuatorError>;

    /// Silence the buzzer
    fn tone_off(&mut self) -> Result<(), ActuatorError>;
}
