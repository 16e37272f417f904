//! SH1106 OLED display driver
//!
//! Driver for 128x64 SH1106-based OLED panels over I2C. Drawing goes to a
//! page-organized frame buffer through `embedded-graphics`; `present`
//! pushes all eight pages. The panel is initialized on the first
//! `present`, and again after any bus error, so a panel that was missing
//! at boot comes up once it answers.

use core::convert::Infallible;

use carpet_core::traits::{DisplayError, TextDisplay};
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use embedded_hal::i2c::I2c;

/// SH1106 I2C address (typically 0x3C or 0x3D)
pub const ADDRESS: u8 = 0x3C;

/// Display dimensions
pub const WIDTH: usize = 128;
pub const HEIGHT: usize = 64;
const PAGES: usize = HEIGHT / 8;

/// The 132-column RAM is centered on the 128-pixel glass
const COLUMN_OFFSET: u8 = 2;

/// 6x10 glyphs on an 8 pixel advance
const TEXT_FONT: MonoFont<'static> = MonoFont {
    character_spacing: 2,
    ..FONT_6X10
};

#[allow(dead_code)]
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

/// Power-up sequence: 64 mux, internal charge pump, flipped both ways
const INIT_SEQUENCE: [u8; 22] = [
    cmd::DISPLAY_OFF,
    cmd::SET_CLOCK_DIV,
    0x80,
    cmd::SET_MUX_RATIO,
    0x3F,
    cmd::SET_DISPLAY_OFFSET,
    0x00,
    cmd::SET_START_LINE,
    cmd::SET_CHARGE_PUMP,
    0x14,
    cmd::SET_SEG_REMAP,
    cmd::SET_COM_SCAN_DEC,
    cmd::SET_COM_PINS,
    0x12,
    cmd::SET_CONTRAST,
    0xCF,
    cmd::SET_PRECHARGE,
    0xF1,
    cmd::SET_VCOM_DETECT,
    0x40,
    cmd::SET_NORMAL,
    cmd::DISPLAY_ON,
];

/// Control byte prefixes
const CONTROL_COMMAND: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;

/// SH1106 OLED driver
pub struct Sh1106<I2C> {
    i2c: I2C,
    address: u8,
    /// Frame buffer (1 bit per pixel, LSB at the top of each page)
    buffer: [[u8; WIDTH]; PAGES],
    initialized: bool,
}

impl<I2C: I2c> Sh1106<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            buffer: [[0; WIDTH]; PAGES],
            initialized: false,
        }
    }

    /// Send the power-up sequence
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.initialized = false;
        for &c in &INIT_SEQUENCE {
            self.command(c)?;
        }
        self.initialized = true;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn command(&mut self, cmd: u8) -> Result<(), DisplayError> {
        self.i2c
            .write(self.address, &[CONTROL_COMMAND, cmd])
            .map_err(|_| DisplayError::Communication)
    }

    /// Write the frame buffer to the panel
    pub fn flush(&mut self) -> Result<(), DisplayError> {
        for page in 0..PAGES {
            self.command(cmd::SET_PAGE_ADDR | page as u8)?;
            self.command(cmd::SET_LOW_COLUMN | COLUMN_OFFSET)?;
            self.command(cmd::SET_HIGH_COLUMN)?;

            let mut data = [0u8; WIDTH + 1];
            data[0] = CONTROL_DATA;
            data[1..].copy_from_slice(&self.buffer[page]);
            self.i2c
                .write(self.address, &data)
                .map_err(|_| DisplayError::Communication)?;
        }
        Ok(())
    }

    /// Whether the pixel at (`x`, `y`) is lit in the frame buffer
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < WIDTH && y < HEIGHT && self.buffer[y / 8][x] & (1 << (y % 8)) != 0
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> OriginDimensions for Sh1106<I2C> {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl<I2C> DrawTarget for Sh1106<I2C> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Infallible>
    where
        I: IntoIterator<Item = Pixel<BinaryColor>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) else {
                continue;
            };
            if x >= WIDTH || y >= HEIGHT {
                continue;
            }
            let bit = 1u8 << (y % 8);
            match color {
                BinaryColor::On => self.buffer[y / 8][x] |= bit,
                BinaryColor::Off => self.buffer[y / 8][x] &= !bit,
            }
        }
        Ok(())
    }
}

impl<I2C: I2c> TextDisplay for Sh1106<I2C> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        for page in self.buffer.iter_mut() {
            page.fill(0);
        }
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> Result<(), DisplayError> {
        let style = MonoTextStyle::new(&TEXT_FONT, BinaryColor::On);
        Text::with_baseline(text, Point::new(x, y), style, Baseline::Top)
            .draw(self)
            .map(|_| ())
            .map_err(|e| match e {})
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        if !self.initialized {
            self.init()?;
        }
        let result = self.flush();
        if result.is_err() {
            // Panel may have browned out; redo the power-up next time
            self.initialized = false;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};
    use std::vec::Vec;

    #[derive(Default)]
    struct MockI2c {
        writes: Vec<(u8, Vec<u8>)>,
        fail: bool,
    }

    impl ErrorType for MockI2c {
        type Error = ErrorKind;
    }

    impl I2c for MockI2c {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), ErrorKind> {
            if self.fail {
                return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
            }
            for op in operations {
                if let Operation::Write(bytes) = op {
                    self.writes.push((address, bytes.to_vec()));
                }
            }
            Ok(())
        }
    }

    fn lit_columns(display: &Sh1106<MockI2c>) -> Vec<usize> {
        (0..WIDTH)
            .filter(|&x| (0..HEIGHT).any(|y| display.pixel(x, y)))
            .collect()
    }

    #[test]
    fn test_init_sequence() {
        let mut display = Sh1106::new(MockI2c::default(), ADDRESS);
        display.init().unwrap();
        assert!(display.is_initialized());

        let i2c = display.release();
        assert_eq!(i2c.writes.len(), INIT_SEQUENCE.len());
        assert_eq!(i2c.writes[0], (ADDRESS, vec![0x00, cmd::DISPLAY_OFF]));
        assert_eq!(i2c.writes[21], (ADDRESS, vec![0x00, cmd::DISPLAY_ON]));
    }

    #[test]
    fn test_present_initializes_then_flushes_pages() {
        let mut display = Sh1106::new(MockI2c::default(), ADDRESS);
        display.present().unwrap();

        let i2c = display.release();
        let flush = &i2c.writes[INIT_SEQUENCE.len()..];
        assert_eq!(flush.len(), PAGES * 4);
        assert_eq!(flush[0].1, vec![0x00, 0xB0]);
        assert_eq!(flush[1].1, vec![0x00, 0x02]);
        assert_eq!(flush[2].1, vec![0x00, 0x10]);
        assert_eq!(flush[3].1.len(), WIDTH + 1);
        assert_eq!(flush[3].1[0], 0x40);
        assert_eq!(flush[28].1, vec![0x00, 0xB7]);
    }

    #[test]
    fn test_draw_text_uses_eight_pixel_advance() {
        let mut display = Sh1106::new(MockI2c::default(), ADDRESS);
        display.draw_text("II", 0, 0).unwrap();

        let columns = lit_columns(&display);
        assert!(!columns.is_empty());
        assert!(columns.iter().any(|&x| x < 6));
        assert!(columns.iter().any(|&x| (8..14).contains(&x)));
        assert!(columns.iter().all(|&x| x < 14));
        // Glyphs stay inside a 10 pixel line
        assert!((10..HEIGHT).all(|y| (0..WIDTH).all(|x| !display.pixel(x, y))));
    }

    #[test]
    fn test_draw_text_clips_off_screen() {
        let mut display = Sh1106::new(MockI2c::default(), ADDRESS);
        display.draw_text("Next Bus", -1000, 0).unwrap();
        display.draw_text("Next Bus", 200, 0).unwrap();
        display.draw_text("Next Bus", 0, 90).unwrap();
        assert!(lit_columns(&display).is_empty());

        // Partly visible: only the tail lands on the panel
        display.draw_text("AB", -8, 0).unwrap();
        let columns = lit_columns(&display);
        assert!(!columns.is_empty());
        assert!(columns.iter().all(|&x| x < 6));
    }

    #[test]
    fn test_clear() {
        let mut display = Sh1106::new(MockI2c::default(), ADDRESS);
        display.draw_text("Hello", 0, 20).unwrap();
        assert!(!lit_columns(&display).is_empty());
        TextDisplay::clear(&mut display).unwrap();
        assert!(lit_columns(&display).is_empty());
    }

    #[test]
    fn test_bus_error_forces_reinit() {
        let mut display = Sh1106::new(MockI2c::default(), ADDRESS);
        display.present().unwrap();
        assert!(display.is_initialized());

        display.i2c.fail = true;
        assert_eq!(display.present(), Err(DisplayError::Communication));
        assert!(!display.is_initialized());

        display.i2c.fail = false;
        display.i2c.writes.clear();
        display.present().unwrap();
        assert_eq!(display.i2c.writes.len(), INIT_SEQUENCE.len() + PAGES * 4);
    }
}
