//! GPIO motion detector

use carpet_core::traits::MotionInput;
use embedded_hal::digital::InputPin;

/// Motion detector on a digital input
///
/// PIR modules drive their output high on motion. Detectors with an open
/// collector output pull the line low instead; use [`MotionPin::active_low`].
pub struct MotionPin<P> {
    pin: P,
    active_high: bool,
}

impl<P: InputPin> MotionPin<P> {
    pub fn new(pin: P, active_high: bool) -> Self {
        Self { pin, active_high }
    }

    pub fn active_high(pin: P) -> Self {
        Self::new(pin, true)
    }

    pub fn active_low(pin: P) -> Self {
        Self::new(pin, false)
    }
}

impl<P: InputPin> MotionInput for MotionPin<P> {
    fn is_asserted(&mut self) -> bool {
        match self.pin.is_high() {
            Ok(high) => high == self.active_high,
            Err(_) => false,
        }
    }
}
