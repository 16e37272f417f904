//! Three-pin RGB LED
//!
//! Each color channel is a plain GPIO, so a channel is either fully on or
//! off. Any non-zero channel value lights it.

use carpet_core::traits::{ActuatorError, LedOutput, Rgb};
use embedded_hal::digital::{OutputPin, PinState};

pub struct GpioRgbLed<R, G, B> {
    red: R,
    green: G,
    blue: B,
    /// Common-anode LEDs light a channel by pulling it low
    inverted: bool,
    color: Rgb,
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> GpioRgbLed<R, G, B> {
    /// Create the LED and switch it off
    pub fn new(red: R, green: G, blue: B, inverted: bool) -> Self {
        let mut led = Self {
            red,
            green,
            blue,
            inverted,
            color: Rgb::OFF,
        };
        let _ = led.set(Rgb::OFF);
        led
    }

    pub fn common_cathode(red: R, green: G, blue: B) -> Self {
        Self::new(red, green, blue, false)
    }

    pub fn common_anode(red: R, green: G, blue: B) -> Self {
        Self::new(red, green, blue, true)
    }

    /// Last color set
    pub fn color(&self) -> Rgb {
        self.color
    }

    fn state(&self, value: u8) -> PinState {
        PinState::from((value > 0) != self.inverted)
    }
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> LedOutput for GpioRgbLed<R, G, B> {
    fn set(&mut self, color: Rgb) -> Result<(), ActuatorError> {
        let (r, g, b) = (self.state(color.r), self.state(color.g), self.state(color.b));
        self.red.set_state(r).map_err(|_| ActuatorError::Gpio)?;
        self.green.set_state(g).map_err(|_| ActuatorError::Gpio)?;
        self.blue.set_state(b).map_err(|_| ActuatorError::Gpio)?;
        self.color = color;
        Ok(())
    }
}
