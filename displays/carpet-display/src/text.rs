//! Immutable page text

use heapless::String;

use crate::geometry::ScreenGeometry;
use crate::layout::{plan, LayoutPlan};

/// Maximum bytes of text a page can hand to the renderer
pub const MAX_TEXT_LEN: usize = 192;

/// Printable text plus the logical size of the screen in character cells
///
/// Built once per render and never mutated afterwards. Text beyond
/// [`MAX_TEXT_LEN`] bytes is cut at the last character boundary that fits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayText {
    text: String<MAX_TEXT_LEN>,
    columns: u8,
    rows: u8,
}

impl DisplayText {
    pub fn new(text: &str, geometry: &ScreenGeometry) -> Self {
        let mut owned = String::new();
        for ch in text.chars() {
            if owned.push(ch).is_err() {
                break;
            }
        }
        Self::from_string(owned, geometry)
    }

    pub fn from_string(text: String<MAX_TEXT_LEN>, geometry: &ScreenGeometry) -> Self {
        Self {
            text,
            columns: geometry.max_chars_per_line().min(u8::MAX as usize) as u8,
            rows: geometry.rows().min(u8::MAX as usize) as u8,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Screen width in character cells
    pub fn columns(&self) -> u8 {
        self.columns
    }

    /// Screen height in character cells
    pub fn rows(&self) -> u8 {
        self.rows
    }

    /// Lay this text out on `geometry`
    pub fn layout(&self, geometry: &ScreenGeometry) -> LayoutPlan {
        plan(&self.text, geometry)
    }
}

impl core::fmt::Display for DisplayText {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.text)
    }
}
