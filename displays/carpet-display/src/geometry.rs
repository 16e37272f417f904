//! Panel and font cell dimensions

/// Screen and character cell geometry in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScreenGeometry {
    pub width_px: u16,
    pub height_px: u16,
    pub char_width_px: u16,
    pub char_height_px: u16,
    /// Vertical distance between stacked static lines
    pub line_spacing_px: u16,
}

impl ScreenGeometry {
    /// 128x64 panel with an 8x8 font and 10 px line pitch
    pub const REFERENCE: Self = Self {
        width_px: 128,
        height_px: 64,
        char_width_px: 8,
        char_height_px: 8,
        line_spacing_px: 10,
    };

    /// Characters that fit on one line
    pub const fn max_chars_per_line(&self) -> usize {
        if self.char_width_px == 0 {
            return 0;
        }
        (self.width_px / self.char_width_px) as usize
    }

    /// Character rows that fit on the panel
    pub const fn rows(&self) -> usize {
        if self.char_height_px == 0 {
            return 0;
        }
        (self.height_px / self.char_height_px) as usize
    }

    /// Pixel width of `chars` character cells
    pub const fn text_width_px(&self, chars: usize) -> i32 {
        chars as i32 * self.char_width_px as i32
    }
}

impl Default for ScreenGeometry {
    fn default() -> Self {
        Self::REFERENCE
    }
}
