//! Text layout engine
//!
//! Pure functions from text and screen geometry to a [`LayoutPlan`]:
//! - [`wrap`] breaks text into lines without splitting words
//! - [`centered_x`] places a line horizontally
//! - [`plan`] picks a static layout or a scroll strip

mod plan;
mod wrap;

pub use plan::{
    centered_x, plan, LayoutPlan, PlacedLine, ScrollFrame, ScrollFrames, ScrollPlan,
    MAX_STATIC_LINES,
};
pub use wrap::{wrap, WrappedText, MAX_LINES};
