//! Pressure pad and environment sensor traits

use crate::environment::EnvironmentReading;

/// Errors that can occur while reading a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// SPI/I2C transfer failed
    Bus,
    /// Channel index outside the converter's range
    InvalidChannel,
    /// Device did not identify as the expected part
    WrongDevice,
    /// Calibration data missing or not yet read
    NotCalibrated,
}

/// Analog pressure pad array behind a multi-channel converter
pub trait PressureBus {
    /// Raw magnitude of `channel`, 0-1023
    ///
    /// Takes `&mut self` because every conversion is a bus transaction.
    fn read_channel(&mut self, channel: u8) -> Result<u16, SensorError>;

    /// Read every pad in order
    ///
    /// Stops at the first failing channel.
    fn read_pads(&mut self) -> Result<[u16; 4], SensorError> {
        let mut out = [0u16; 4];
        for (channel, slot) in out.iter_mut().enumerate() {
            *slot = self.read_channel(channel as u8)?;
        }
        Ok(out)
    }
}

/// Indoor temperature, humidity and pressure sensor
pub trait EnvironmentSensor {
    fn read(&mut self) -> Result<EnvironmentReading, SensorError>;
}
