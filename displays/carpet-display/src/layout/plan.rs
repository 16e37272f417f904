//! Static-or-scrolling layout plans

use heapless::{String, Vec};

use super::wrap::{wrap, MAX_LINES};
use crate::geometry::ScreenGeometry;
use crate::text::MAX_TEXT_LEN;

/// Most lines a static plan holds
pub const MAX_STATIC_LINES: usize = 4;

/// Separator placed between wrapped lines in a scroll strip
const SCROLL_SEPARATOR: &str = "  ";

/// Scroll strip capacity: wrapped words plus one extra space per line break
const MAX_SCROLL_LEN: usize = MAX_TEXT_LEN + MAX_LINES;

/// Horizontal position that centers a line on the screen
///
/// Truncates toward zero and goes negative for lines wider than the screen;
/// the display clips whatever falls outside.
pub const fn centered_x(line_width_px: i32, screen_width_px: i32) -> i32 {
    (screen_width_px - line_width_px) / 2
}

/// One positioned line of a static plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedLine {
    pub text: String<MAX_TEXT_LEN>,
    pub x: i32,
    pub y: i32,
}

/// Renderer-ready layout for one piece of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutPlan {
    /// Up to four centered lines stacked from the top
    Static(Vec<PlacedLine, MAX_STATIC_LINES>),
    /// A single strip scrolled right to left across the screen
    Scrolling(ScrollPlan),
}

impl LayoutPlan {
    pub fn is_static(&self) -> bool {
        matches!(self, LayoutPlan::Static(_))
    }
}

/// Decide how `text` is shown on `geometry`
///
/// Text that wraps to at most [`MAX_STATIC_LINES`] lines is drawn statically;
/// anything longer scrolls, so no content is ever dropped for lack of lines.
pub fn plan(text: &str, geometry: &ScreenGeometry) -> LayoutPlan {
    let wrapped = wrap(text, geometry.max_chars_per_line());

    if wrapped.len() <= MAX_STATIC_LINES {
        let screen_w = geometry.width_px as i32;
        let mut lines = Vec::new();
        for (i, line) in wrapped.lines().enumerate() {
            let width = geometry.text_width_px(line.chars().count());
            let placed = PlacedLine {
                text: String::try_from(line).unwrap_or_default(),
                x: centered_x(width, screen_w),
                y: i as i32 * geometry.line_spacing_px as i32,
            };
            // Bounded by the length check above
            let _ = lines.push(placed);
        }
        return LayoutPlan::Static(lines);
    }

    let mut strip = String::new();
    for (i, line) in wrapped.lines().enumerate() {
        if i > 0 {
            let _ = strip.push_str(SCROLL_SEPARATOR);
        }
        let _ = strip.push_str(line);
    }
    LayoutPlan::Scrolling(ScrollPlan::new(strip, geometry))
}

/// A text strip and the geometry needed to slide it across the screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollPlan {
    text: String<MAX_SCROLL_LEN>,
    char_count: usize,
    char_width: i32,
    screen_width: i32,
    y: i32,
    step_px: i32,
}

impl ScrollPlan {
    fn new(text: String<MAX_SCROLL_LEN>, geometry: &ScreenGeometry) -> Self {
        let char_count = text.chars().count();
        Self {
            text,
            char_count,
            char_width: geometry.char_width_px.max(1) as i32,
            screen_width: geometry.width_px as i32,
            y: (geometry.height_px as i32 - geometry.char_height_px as i32) / 2,
            step_px: 1,
        }
    }

    /// Advance the strip by `step_px` pixels per frame (minimum 1)
    pub fn with_step(mut self, step_px: u16) -> Self {
        self.step_px = step_px.max(1) as i32;
        self
    }

    /// The whole strip, lines joined by two spaces
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Vertical position of every frame
    pub fn y(&self) -> i32 {
        self.y
    }

    /// Strip width in pixels
    pub fn width_px(&self) -> i32 {
        self.char_count as i32 * self.char_width
    }

    /// Number of frames the scroll takes
    pub fn frame_count(&self) -> usize {
        let distance = self.width_px() + self.screen_width;
        ((distance + self.step_px - 1) / self.step_px) as usize
    }

    /// Lazily generate the frames, first to last
    pub fn frames(&self) -> ScrollFrames<'_> {
        ScrollFrames {
            plan: self,
            offset: -self.screen_width,
        }
    }
}

/// One scroll frame: the visible part of the strip and where to draw it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollFrame<'a> {
    pub text: &'a str,
    pub x: i32,
    pub y: i32,
}

/// Finite frame sequence of a [`ScrollPlan`]
///
/// The strip starts just past the right edge and moves left until its last
/// pixel column has left the screen. No frame is repeated.
#[derive(Debug, Clone)]
pub struct ScrollFrames<'a> {
    plan: &'a ScrollPlan,
    /// Pixels of the strip already scrolled past the left edge
    offset: i32,
}

impl<'a> ScrollFrames<'a> {
    fn byte_index(&self, char_index: usize) -> usize {
        self.plan
            .text
            .char_indices()
            .nth(char_index)
            .map_or(self.plan.text.len(), |(i, _)| i)
    }
}

impl<'a> Iterator for ScrollFrames<'a> {
    type Item = ScrollFrame<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let plan = self.plan;
        if self.offset >= plan.width_px() {
            return None;
        }
        let offset = self.offset;
        self.offset += plan.step_px;

        let first = offset.max(0) / plan.char_width;
        let x = first * plan.char_width - offset;
        let visible = (plan.screen_width - x + plan.char_width - 1) / plan.char_width;
        let last = (first + visible.max(0)).min(plan.char_count as i32);

        let start = self.byte_index(first as usize);
        let end = self.byte_index(last as usize);
        Some(ScrollFrame {
            text: &plan.text[start..end],
            x,
            y: plan.y,
        })
    }
}
