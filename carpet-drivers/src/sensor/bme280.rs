//! Bosch BME280 temperature, humidity and pressure sensor
//!
//! Runs in normal mode with 1x oversampling on every channel and a 1 s
//! standby, so a read just fetches the latest completed measurement.
//! Compensation uses the integer formulas from the datasheet: 32-bit for
//! temperature and humidity, 64-bit for pressure.

use carpet_core::environment::EnvironmentReading;
use carpet_core::traits::{EnvironmentSensor, SensorError};
use embedded_hal::i2c::I2c;

/// SDO tied low
pub const ADDRESS_PRIMARY: u8 = 0x76;
/// SDO tied high
pub const ADDRESS_SECONDARY: u8 = 0x77;

/// Value of the id register
pub const CHIP_ID: u8 = 0x60;

mod reg {
    pub const CALIB_00: u8 = 0x88;
    pub const CHIP_ID: u8 = 0xD0;
    pub const CALIB_26: u8 = 0xE1;
    pub const CTRL_HUM: u8 = 0xF2;
    pub const CTRL_MEAS: u8 = 0xF4;
    pub const CONFIG: u8 = 0xF5;
    pub const PRESS_MSB: u8 = 0xF7;
}

/// Humidity oversampling x1
const CTRL_HUM_VALUE: u8 = 0x01;
/// Temperature x1, pressure x1, normal mode
const CTRL_MEAS_VALUE: u8 = 0x27;
/// 1000 ms standby, filter off
const CONFIG_VALUE: u8 = 0xA0;

/// Factory trimming parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    pub t1: u16,
    pub t2: i16,
    pub t3: i16,
    pub p1: u16,
    pub p2: i16,
    pub p3: i16,
    pub p4: i16,
    pub p5: i16,
    pub p6: i16,
    pub p7: i16,
    pub p8: i16,
    pub p9: i16,
    pub h1: u8,
    pub h2: i16,
    pub h3: u8,
    pub h4: i16,
    pub h5: i16,
    pub h6: i8,
}

/// Uncompensated ADC values from one measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSample {
    pub temperature: i32,
    pub pressure: i32,
    pub humidity: i32,
}

impl RawSample {
    /// Decode the eight data registers starting at 0xF7
    pub fn from_registers(data: &[u8; 8]) -> Self {
        let twenty_bit = |msb: u8, lsb: u8, xlsb: u8| {
            (i32::from(msb) << 12) | (i32::from(lsb) << 4) | (i32::from(xlsb) >> 4)
        };
        Self {
            pressure: twenty_bit(data[0], data[1], data[2]),
            temperature: twenty_bit(data[3], data[4], data[5]),
            humidity: (i32::from(data[6]) << 8) | i32::from(data[7]),
        }
    }
}

impl Calibration {
    /// Decode the two calibration blocks (0x88..=0xA1 and 0xE1..=0xE7)
    pub fn from_registers(block0: &[u8; 26], block1: &[u8; 7]) -> Self {
        let u16_at = |i: usize| u16::from_le_bytes([block0[i], block0[i + 1]]);
        let i16_at = |i: usize| i16::from_le_bytes([block0[i], block0[i + 1]]);

        // H4 and H5 are 12-bit values sharing the nibbles of 0xE5
        let h4 = (i16::from(block1[3] as i8) << 4) | i16::from(block1[4] & 0x0F);
        let h5 = (i16::from(block1[5] as i8) << 4) | i16::from(block1[4] >> 4);

        Self {
            t1: u16_at(0),
            t2: i16_at(2),
            t3: i16_at(4),
            p1: u16_at(6),
            p2: i16_at(8),
            p3: i16_at(10),
            p4: i16_at(12),
            p5: i16_at(14),
            p6: i16_at(16),
            p7: i16_at(18),
            p8: i16_at(20),
            p9: i16_at(22),
            h1: block0[25],
            h2: i16::from_le_bytes([block1[0], block1[1]]),
            h3: block1[2],
            h4,
            h5,
            h6: block1[6] as i8,
        }
    }

    /// Fine temperature shared by all three compensations
    fn t_fine(&self, adc_t: i32) -> i32 {
        let t1 = i32::from(self.t1);
        let var1 = (((adc_t >> 3) - (t1 << 1)) * i32::from(self.t2)) >> 11;
        let d = (adc_t >> 4) - t1;
        let var2 = (((d * d) >> 12) * i32::from(self.t3)) >> 14;
        var1 + var2
    }

    /// Pressure in Q24.8 Pa, or 0 when the calibration would divide by zero
    fn pressure_q24_8(&self, adc_p: i32, t_fine: i32) -> u32 {
        let mut var1 = i64::from(t_fine) - 128_000;
        let mut var2 = var1 * var1 * i64::from(self.p6);
        var2 += (var1 * i64::from(self.p5)) << 17;
        var2 += i64::from(self.p4) << 35;
        var1 = ((var1 * var1 * i64::from(self.p3)) >> 8) + ((var1 * i64::from(self.p2)) << 12);
        var1 = (((1i64 << 47) + var1) * i64::from(self.p1)) >> 33;
        if var1 == 0 {
            return 0;
        }

        let mut p = 1_048_576 - i64::from(adc_p);
        p = (((p << 31) - var2) * 3125) / var1;
        let var1 = (i64::from(self.p9) * (p >> 13) * (p >> 13)) >> 25;
        let var2 = (i64::from(self.p8) * p) >> 19;
        p = ((p + var1 + var2) >> 8) + (i64::from(self.p7) << 4);
        p.clamp(0, i64::from(u32::MAX)) as u32
    }

    /// Relative humidity in Q22.10 %
    fn humidity_q22_10(&self, adc_h: i32, t_fine: i32) -> u32 {
        let adc_h = i64::from(adc_h);
        let x = i64::from(t_fine) - 76_800;
        let mut v = (((adc_h << 14) - (i64::from(self.h4) << 20) - (i64::from(self.h5) * x)
            + 16_384)
            >> 15)
            * (((((((x * i64::from(self.h6)) >> 10)
                * (((x * i64::from(self.h3)) >> 11) + 32_768))
                >> 10)
                + 2_097_152)
                * i64::from(self.h2)
                + 8192)
                >> 14);
        v -= ((((v >> 15) * (v >> 15)) >> 7) * i64::from(self.h1)) >> 4;
        (v.clamp(0, 419_430_400) >> 12) as u32
    }

    /// Turn a raw measurement into a reading
    pub fn compensate(&self, raw: RawSample) -> EnvironmentReading {
        let t_fine = self.t_fine(raw.temperature);
        let pressure = self.pressure_q24_8(raw.pressure, t_fine);
        let humidity = self.humidity_q22_10(raw.humidity, t_fine);
        EnvironmentReading {
            temperature_centi_c: (t_fine * 5 + 128) >> 8,
            humidity_centi_pct: humidity * 100 / 1024,
            pressure_pa: pressure / 256,
        }
    }
}

/// BME280 on an I2C bus
pub struct Bme280<I2C> {
    i2c: I2C,
    address: u8,
    calibration: Option<Calibration>,
}

impl<I2C: I2c> Bme280<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            calibration: None,
        }
    }

    /// Check the chip id, load calibration and start normal mode
    pub fn init(&mut self) -> Result<(), SensorError> {
        let mut id = [0u8];
        self.read_registers(reg::CHIP_ID, &mut id)?;
        if id[0] != CHIP_ID {
            return Err(SensorError::WrongDevice);
        }

        let mut block0 = [0u8; 26];
        let mut block1 = [0u8; 7];
        self.read_registers(reg::CALIB_00, &mut block0)?;
        self.read_registers(reg::CALIB_26, &mut block1)?;

        // ctrl_hum only takes effect after a write to ctrl_meas
        self.write_register(reg::CTRL_HUM, CTRL_HUM_VALUE)?;
        self.write_register(reg::CONFIG, CONFIG_VALUE)?;
        self.write_register(reg::CTRL_MEAS, CTRL_MEAS_VALUE)?;

        self.calibration = Some(Calibration::from_registers(&block0, &block1));
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.calibration.is_some()
    }

    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }

    /// Fetch and compensate the latest measurement
    pub fn measure(&mut self) -> Result<EnvironmentReading, SensorError> {
        let calibration = self.calibration.ok_or(SensorError::NotCalibrated)?;
        let mut data = [0u8; 8];
        self.read_registers(reg::PRESS_MSB, &mut data)?;
        Ok(calibration.compensate(RawSample::from_registers(&data)))
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    fn read_registers(&mut self, start: u8, buf: &mut [u8]) -> Result<(), SensorError> {
        self.i2c
            .write_read(self.address, &[start], buf)
            .map_err(|_| SensorError::Bus)
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), SensorError> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(|_| SensorError::Bus)
    }
}

impl<I2C: I2c> EnvironmentSensor for Bme280<I2C> {
    /// Initializes on first use, and retries on later reads if the sensor
    /// was absent at boot
    fn read(&mut self) -> Result<EnvironmentReading, SensorError> {
        if self.calibration.is_none() {
            self.init()?;
        }
        self.measure()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};

    /// Register-file I2C device with an auto-incrementing pointer
    struct MockBus {
        address: u8,
        regs: [u8; 256],
        pointer: usize,
        present: bool,
    }

    impl ErrorType for MockBus {
        type Error = ErrorKind;
    }

    impl I2c for MockBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), ErrorKind> {
            if !self.present || address != self.address {
                return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
            }
            for op in operations {
                match op {
                    Operation::Write(bytes) => {
                        self.pointer = bytes[0] as usize;
                        for b in &bytes[1..] {
                            self.regs[self.pointer] = *b;
                            self.pointer += 1;
                        }
                    }
                    Operation::Read(buf) => {
                        for b in buf.iter_mut() {
                            *b = self.regs[self.pointer];
                            self.pointer += 1;
                        }
                    }
                }
            }
            Ok(())
        }
    }

    // Datasheet example trimming plus a typical humidity set
    const CAL: Calibration = Calibration {
        t1: 27504,
        t2: 26435,
        t3: -1000,
        p1: 36477,
        p2: -10685,
        p3: 3024,
        p4: 2855,
        p5: 140,
        p6: -7,
        p7: 15500,
        p8: -14600,
        p9: 6000,
        h1: 75,
        h2: 362,
        h3: 0,
        h4: 324,
        h5: 0,
        h6: 30,
    };

    const RAW: RawSample = RawSample {
        temperature: 519_888,
        pressure: 415_148,
        humidity: 30_000,
    };

    fn device() -> MockBus {
        let mut regs = [0u8; 256];
        regs[0xD0] = CHIP_ID;

        let words: [u16; 12] = [
            CAL.t1,
            CAL.t2 as u16,
            CAL.t3 as u16,
            CAL.p1,
            CAL.p2 as u16,
            CAL.p3 as u16,
            CAL.p4 as u16,
            CAL.p5 as u16,
            CAL.p6 as u16,
            CAL.p7 as u16,
            CAL.p8 as u16,
            CAL.p9 as u16,
        ];
        for (i, w) in words.iter().enumerate() {
            let [lo, hi] = w.to_le_bytes();
            regs[0x88 + 2 * i] = lo;
            regs[0x89 + 2 * i] = hi;
        }
        regs[0xA1] = CAL.h1;
        let [lo, hi] = CAL.h2.to_le_bytes();
        regs[0xE1] = lo;
        regs[0xE2] = hi;
        regs[0xE3] = CAL.h3;
        regs[0xE4] = (CAL.h4 >> 4) as u8;
        regs[0xE5] = ((CAL.h5 as u8 & 0x0F) << 4) | (CAL.h4 as u8 & 0x0F);
        regs[0xE6] = (CAL.h5 >> 4) as u8;
        regs[0xE7] = CAL.h6 as u8;

        let p = RAW.pressure as u32;
        let t = RAW.temperature as u32;
        let h = RAW.humidity as u32;
        regs[0xF7..0xFF].copy_from_slice(&[
            (p >> 12) as u8,
            (p >> 4) as u8,
            ((p & 0x0F) << 4) as u8,
            (t >> 12) as u8,
            (t >> 4) as u8,
            ((t & 0x0F) << 4) as u8,
            (h >> 8) as u8,
            h as u8,
        ]);

        MockBus {
            address: ADDRESS_PRIMARY,
            regs,
            pointer: 0,
            present: true,
        }
    }

    #[test]
    fn test_compensation_reference_values() {
        let reading = CAL.compensate(RAW);
        assert_eq!(reading.temperature_centi_c, 2508);
        assert_eq!(reading.pressure_pa, 100_653);
        assert_eq!(reading.humidity_centi_pct, 5195);
    }

    #[test]
    fn test_humidity_is_clamped() {
        let dry = RawSample { humidity: 0, ..RAW };
        assert_eq!(CAL.compensate(dry).humidity_centi_pct, 0);
        let wet = RawSample { humidity: 0xFFFF, ..RAW };
        assert!(CAL.compensate(wet).humidity_centi_pct <= 10_000);
    }

    #[test]
    fn test_zero_p1_does_not_divide_by_zero() {
        let cal = Calibration { p1: 0, ..CAL };
        assert_eq!(cal.compensate(RAW).pressure_pa, 0);
    }

    #[test]
    fn test_raw_sample_decoding() {
        let data = [0x65, 0x5A, 0xC0, 0x7E, 0xED, 0x00, 0x75, 0x30];
        let raw = RawSample::from_registers(&data);
        assert_eq!(raw.pressure, 415_148);
        assert_eq!(raw.temperature, 519_888);
        assert_eq!(raw.humidity, 30_000);
    }

    #[test]
    fn test_init_reads_calibration_and_configures() {
        let mut bme = Bme280::new(device(), ADDRESS_PRIMARY);
        assert!(!bme.is_initialized());
        bme.init().unwrap();
        assert_eq!(bme.calibration(), Some(&CAL));

        let bus = bme.release();
        assert_eq!(bus.regs[0xF2], CTRL_HUM_VALUE);
        assert_eq!(bus.regs[0xF4], CTRL_MEAS_VALUE);
        assert_eq!(bus.regs[0xF5], CONFIG_VALUE);
    }

    #[test]
    fn test_read_initializes_lazily() {
        let mut bme = Bme280::new(device(), ADDRESS_PRIMARY);
        let reading = bme.read().unwrap();
        assert_eq!(reading.temperature_centi_c, 2508);
        assert_eq!(reading.temperature_text().as_str(), "25.08C");
        assert_eq!(reading.pressure_text().as_str(), "1006.53hPa");
    }

    #[test]
    fn test_wrong_chip() {
        let mut bus = device();
        bus.regs[0xD0] = 0x58; // BMP280
        let mut bme = Bme280::new(bus, ADDRESS_PRIMARY);
        assert_eq!(bme.init(), Err(SensorError::WrongDevice));
        assert_eq!(bme.measure(), Err(SensorError::NotCalibrated));
    }

    #[test]
    fn test_absent_then_present() {
        let mut bus = device();
        bus.present = false;
        let mut bme = Bme280::new(bus, ADDRESS_PRIMARY);
        assert_eq!(bme.read(), Err(SensorError::Bus));

        bme.i2c.present = true;
        assert!(bme.read().is_ok());
    }
}
