//! Text display abstraction and layout engine for the smart carpet
//!
//! This crate provides:
//! - `TextDisplay` trait for pixel-addressed text output (OLED, emulators, mocks)
//! - `ScreenGeometry` describing the panel and font cell size
//! - `DisplayText`, the immutable text handed from a page to the renderer
//! - The layout engine: greedy word wrap, horizontal centering, and the
//!   static-or-scrolling decision with its lazy frame sequence
//!
//! # Architecture
//!
//! Everything in `layout` is pure and allocation free. The renderer asks
//! for a [`LayoutPlan`] and replays it onto whatever implements
//! [`TextDisplay`]; the plan never touches the display itself.

#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod backend;
pub mod geometry;
pub mod layout;
pub mod text;

// Re-export key types
pub use backend::{DisplayError, TextDisplay};
pub use geometry::ScreenGeometry;
pub use layout::{
    centered_x, plan, wrap, LayoutPlan, PlacedLine, ScrollFrame, ScrollFrames, ScrollPlan,
    WrappedText, MAX_STATIC_LINES,
};
pub use text::{DisplayText, MAX_TEXT_LEN};
