//! Display backend trait
//!
//! Defines the interface the renderer draws through.

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus error talking to the panel
    Communication,
    /// Panel has not been initialized
    NotInitialized,
}

/// Pixel-addressed text output
///
/// Drawing is buffered: `clear` and `draw_text` only touch the frame buffer,
/// `present` pushes it to the panel. Coordinates are the top-left corner of
/// the first character cell and may lie partly or fully off-screen;
/// implementations clip silently.
pub trait TextDisplay {
    /// Clear the frame buffer
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Draw `text` with its top-left corner at (`x`, `y`) pixels
    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> Result<(), DisplayError>;

    /// Push the frame buffer to the panel
    fn present(&mut self) -> Result<(), DisplayError>;
}

impl<T: TextDisplay + ?Sized> TextDisplay for &mut T {
    fn clear(&mut self) -> Result<(), DisplayError> {
        (**self).clear()
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) -> Result<(), DisplayError> {
        (**self).draw_text(text, x, y)
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        (**self).present()
    }
}
