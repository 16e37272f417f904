//! MCP3008 10-bit ADC
//!
//! Single-ended conversions over SPI mode 0. Each conversion is one
//! three-byte full-duplex transfer with chip select held low:
//!
//! ```text
//! MOSI: 0000_0001  1CCC_xxxx  xxxx_xxxx   start bit, single-ended, channel
//! MISO: xxxx_xxxx  xxxx_x0BB  BBBB_BBBB   null bit, 10-bit result
//! ```

use carpet_core::traits::{PressureBus, SensorError};
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

/// Number of input channels
pub const CHANNELS: u8 = 8;

/// MCP3008 on a shared SPI bus with its own chip select
pub struct Mcp3008<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI: SpiBus, CS: OutputPin> Mcp3008<SPI, CS> {
    /// Take ownership of the bus and chip select; CS is driven high (idle)
    pub fn new(spi: SPI, mut cs: CS) -> Self {
        let _ = cs.set_high();
        Self { spi, cs }
    }

    /// Convert `channel` (0-7), returning 0-1023
    pub fn read(&mut self, channel: u8) -> Result<u16, SensorError> {
        if channel >= CHANNELS {
            return Err(SensorError::InvalidChannel);
        }

        let mut buf = [0x01, (0x08 | channel) << 4, 0x00];
        self.cs.set_low().map_err(|_| SensorError::Bus)?;
        let result = self
            .spi
            .transfer_in_place(&mut buf)
            .and_then(|()| self.spi.flush());
        // Always release the chip, even after a failed transfer
        let released = self.cs.set_high();
        result.map_err(|_| SensorError::Bus)?;
        released.map_err(|_| SensorError::Bus)?;

        Ok((u16::from(buf[1] & 0x03) << 8) | u16::from(buf[2]))
    }

    /// Release the bus and chip select
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }
}

impl<SPI: SpiBus, CS: OutputPin> PressureBus for Mcp3008<SPI, CS> {
    fn read_channel(&mut self, channel: u8) -> Result<u16, SensorError> {
        self.read(channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::spi::{ErrorKind, ErrorType};
    use std::vec::Vec;

    /// Answers every conversion with the channel's scripted value
    struct MockSpi {
        values: [u16; 8],
        sent: Vec<[u8; 3]>,
        fail: bool,
    }

    impl ErrorType for MockSpi {
        type Error = ErrorKind;
    }

    impl SpiBus for MockSpi {
        fn read(&mut self, _words: &mut [u8]) -> Result<(), ErrorKind> {
            unimplemented!()
        }

        fn write(&mut self, _words: &[u8]) -> Result<(), ErrorKind> {
            unimplemented!()
        }

        fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), ErrorKind> {
            unimplemented!()
        }

        fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), ErrorKind> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            let sent = [words[0], words[1], words[2]];
            self.sent.push(sent);
            let channel = ((sent[1] >> 4) & 0x07) as usize;
            let value = self.values[channel];
            // Garbage in the don't-care bits must be masked off
            words[0] = 0xFF;
            words[1] = 0xF8 | (value >> 8) as u8;
            words[2] = value as u8;
            Ok(())
        }

        fn flush(&mut self) -> Result<(), ErrorKind> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockCs {
        high: bool,
        toggles: usize,
    }

    impl embedded_hal::digital::ErrorType for MockCs {
        type Error = Infallible;
    }

    impl OutputPin for MockCs {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            self.toggles += 1;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            self.toggles += 1;
            Ok(())
        }
    }

    fn adc(values: [u16; 8]) -> Mcp3008<MockSpi, MockCs> {
        let spi = MockSpi {
            values,
            sent: Vec::new(),
            fail: false,
        };
        Mcp3008::new(spi, MockCs::default())
    }

    #[test]
    fn test_command_bytes() {
        let mut adc = adc([0; 8]);
        adc.read(0).unwrap();
        adc.read(3).unwrap();
        adc.read(7).unwrap();
        let (spi, cs) = adc.release();
        assert_eq!(spi.sent, vec![[0x01, 0x80, 0x00], [0x01, 0xB0, 0x00], [0x01, 0xF0, 0x00]]);
        assert!(cs.high);
    }

    #[test]
    fn test_ten_bit_result() {
        let mut adc = adc([0, 1, 512, 1023, 0, 0, 0, 0]);
        assert_eq!(adc.read(0), Ok(0));
        assert_eq!(adc.read(1), Ok(1));
        assert_eq!(adc.read(2), Ok(512));
        assert_eq!(adc.read(3), Ok(1023));
    }

    #[test]
    fn test_read_pads() {
        let mut adc = adc([10, 900, 20, 1000, 5, 5, 5, 5]);
        assert_eq!(adc.read_pads(), Ok([10, 900, 20, 1000]));
    }

    #[test]
    fn test_invalid_channel() {
        let mut adc = adc([0; 8]);
        assert_eq!(adc.read(8), Err(SensorError::InvalidChannel));
        let (spi, _) = adc.release();
        assert!(spi.sent.is_empty());
    }

    #[test]
    fn test_bus_failure_releases_chip_select() {
        let mut adc = adc([0; 8]);
        adc.spi.fail = true;
        assert_eq!(adc.read(0), Err(SensorError::Bus));
        assert!(adc.cs.high);
        assert_eq!(adc.cs.toggles, 3);
    }
}
