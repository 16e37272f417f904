//! Display render loop
//!
//! Owns the display, the activity gate and the page rotation. Each tick it
//! samples motion, blanks the screen once when activity lapses (retrying on
//! later ticks if the panel rejected it), and draws a
//! page whenever the rotation hands one out. Static pages are drawn
//! directly; scrolling pages are returned as a plan so the caller can pace
//! the frames.

use carpet_display::{DisplayText, LayoutPlan, ScreenGeometry, ScrollFrame, ScrollPlan, TextDisplay};

use crate::gate::{ActivityGate, GateTransition};
use crate::pages::{PageContext, PageId, PageScheduler};
use crate::traits::DisplayError;

/// What a render tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Inactive, screen already blank
    Dark,
    /// Activity just lapsed, screen cleared
    Blanked,
    /// Active, current page stays up
    Holding(PageId),
    /// Page drawn as static lines
    Drawn(PageId),
    /// Page needs scrolling; play the plan's frames with [`RenderLoop::draw_scroll_frame`]
    Scroll(PageId, ScrollPlan),
    /// The display rejected a command
    DisplayFault(DisplayError),
}

pub struct RenderLoop<D> {
    display: D,
    geometry: ScreenGeometry,
    gate: ActivityGate,
    scheduler: PageScheduler,
    scroll_step_px: u16,
    /// Panel is known to show nothing
    blanked: bool,
}

impl<D: TextDisplay> RenderLoop<D> {
    pub fn new(display: D, geometry: ScreenGeometry, gate: ActivityGate, scheduler: PageScheduler) -> Self {
        Self {
            display,
            geometry,
            gate,
            scheduler,
            scroll_step_px: 1,
            blanked: true,
        }
    }

    /// Pixels a scrolling page moves per frame
    pub fn with_scroll_step(mut self, step_px: u16) -> Self {
        self.scroll_step_px = step_px.max(1);
        self
    }

    /// Run one render tick
    pub fn tick(&mut self, now_ms: u64, motion: bool, ctx: &PageContext<'_>) -> RenderOutcome {
        let transition = self.gate.sample(motion, now_ms);

        if !self.gate.is_active(now_ms) {
            // A failed blank is retried every inactive tick
            if self.blanked {
                return RenderOutcome::Dark;
            }
            return match self.blank() {
                Ok(()) => RenderOutcome::Blanked,
                Err(e) => RenderOutcome::DisplayFault(e),
            };
        }

        let page = match self.scheduler.poll(true, now_ms) {
            Some(page) => page,
            // Screen was blanked; bring the current page back
            None if transition == GateTransition::Activated => self.scheduler.current(),
            None => return RenderOutcome::Holding(self.scheduler.current()),
        };

        self.blanked = false;
        let text = DisplayText::from_string(page.render(ctx), &self.geometry);
        match text.layout(&self.geometry) {
            LayoutPlan::Static(lines) => {
                let drawn = self.display.clear().and_then(|()| {
                    for line in &lines {
                        self.display.draw_text(&line.text, line.x, line.y)?;
                    }
                    self.display.present()
                });
                match drawn {
                    Ok(()) => RenderOutcome::Drawn(page),
                    Err(e) => RenderOutcome::DisplayFault(e),
                }
            }
            LayoutPlan::Scrolling(scroll) => {
                RenderOutcome::Scroll(page, scroll.with_step(self.scroll_step_px))
            }
        }
    }

    /// Show one frame of a scrolling page
    pub fn draw_scroll_frame(&mut self, frame: &ScrollFrame<'_>) -> Result<(), DisplayError> {
        self.blanked = false;
        self.display.clear()?;
        self.display.draw_text(frame.text, frame.x, frame.y)?;
        self.display.present()
    }

    /// Clear the screen
    pub fn blank(&mut self) -> Result<(), DisplayError> {
        self.display.clear()?;
        self.display.present()?;
        self.blanked = true;
        Ok(())
    }

    /// Whether the panel is known to be blank
    pub fn is_blanked(&self) -> bool {
        self.blanked
    }

    pub fn is_active(&self, now_ms: u64) -> bool {
        self.gate.is_active(now_ms)
    }

    pub fn gate(&self) -> &ActivityGate {
        &self.gate
    }

    pub fn scheduler(&self) -> &PageScheduler {
        &self.scheduler
    }

    pub fn geometry(&self) -> &ScreenGeometry {
        &self.geometry
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::gate::MotionTrigger;
    use crate::telemetry::{TelemetryStore, TelemetryValue};
    use std::string::{String, ToString};
    use std::vec::Vec;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum Call {
        Clear,
        Text(String, i32, i32),
        Present,
    }

    #[derive(Default)]
    pub(crate) struct RecordingDisplay {
        pub calls: Vec<Call>,
        pub fail: bool,
    }

    impl TextDisplay for RecordingDisplay {
        fn clear(&mut self) -> Result<(), DisplayError> {
            if self.fail {
                return Err(DisplayError::Communication);
            }
            self.calls.push(Call::Clear);
            Ok(())
        }

        fn draw_text(&mut self, text: &str, x: i32, y: i32) -> Result<(), DisplayError> {
            self.calls.push(Call::Text(text.to_string(), x, y));
            Ok(())
        }

        fn present(&mut self) -> Result<(), DisplayError> {
            self.calls.push(Call::Present);
            Ok(())
        }
    }

    fn render_loop(order: &[PageId]) -> RenderLoop<RecordingDisplay> {
        RenderLoop::new(
            RecordingDisplay::default(),
            ScreenGeometry::default(),
            ActivityGate::new(10_000, MotionTrigger::RisingEdge),
            PageScheduler::new(order, 5_000),
        )
    }

    #[test]
    fn test_dark_until_motion() {
        let store = TelemetryStore::new();
        let ctx = PageContext {
            environment: None,
            telemetry: &store,
        };
        let mut rl = render_loop(&PageId::ALL);
        assert_eq!(rl.tick(0, false, &ctx), RenderOutcome::Dark);
        assert_eq!(rl.tick(1_000, false, &ctx), RenderOutcome::Dark);
        assert!(rl.display_mut().calls.is_empty());
    }

    #[test]
    fn test_static_page_is_centered() {
        let store = TelemetryStore::new();
        store.update(TelemetryValue::Temperature(18.0), 0);
        let ctx = PageContext {
            environment: None,
            telemetry: &store,
        };
        let mut rl = render_loop(&[PageId::OutsideTemperature]);

        assert_eq!(
            rl.tick(0, true, &ctx),
            RenderOutcome::Drawn(PageId::OutsideTemperature)
        );
        assert_eq!(
            rl.display_mut().calls,
            vec![
                Call::Clear,
                Call::Text("It's 18C".into(), 32, 0),
                Call::Text("Outside, enjoy".into(), 8, 10),
                Call::Text("your day!".into(), 28, 20),
                Call::Present,
            ]
        );
    }

    #[test]
    fn test_holds_between_switches() {
        let store = TelemetryStore::new();
        let ctx = PageContext {
            environment: None,
            telemetry: &store,
        };
        let mut rl = render_loop(&PageId::ALL);
        rl.tick(0, true, &ctx);
        let drawn = rl.display_mut().calls.len();

        assert_eq!(
            rl.tick(1_000, false, &ctx),
            RenderOutcome::Holding(PageId::InsideTemperature)
        );
        assert_eq!(rl.display_mut().calls.len(), drawn);
        assert_eq!(
            rl.tick(5_000, false, &ctx),
            RenderOutcome::Drawn(PageId::InsideHumidity)
        );
    }

    #[test]
    fn test_blanks_exactly_once() {
        let store = TelemetryStore::new();
        let ctx = PageContext {
            environment: None,
            telemetry: &store,
        };
        let mut rl = render_loop(&PageId::ALL);
        rl.tick(0, true, &ctx);
        rl.display_mut().calls.clear();

        assert_eq!(rl.tick(10_000, false, &ctx), RenderOutcome::Blanked);
        assert_eq!(rl.tick(11_000, false, &ctx), RenderOutcome::Dark);
        assert_eq!(rl.tick(30_000, false, &ctx), RenderOutcome::Dark);
        assert_eq!(rl.display_mut().calls, vec![Call::Clear, Call::Present]);
    }

    #[test]
    fn test_reactivation_redraws() {
        let store = TelemetryStore::new();
        let ctx = PageContext {
            environment: None,
            telemetry: &store,
        };
        let mut rl = render_loop(&PageId::ALL);
        rl.tick(0, true, &ctx);
        rl.tick(10_000, false, &ctx);

        // Dwell long passed: rotation moves on by one page and draws it
        assert_eq!(
            rl.tick(40_000, true, &ctx),
            RenderOutcome::Drawn(PageId::InsideHumidity)
        );
    }

    #[test]
    fn test_long_page_scrolls() {
        let store = TelemetryStore::new();
        let info = heapless::String::try_from("Line 42 arrives in 6 minutes at Hauptbahnhof, platform 3").unwrap();
        store.update(TelemetryValue::TransportInfo(info), 0);
        let ctx = PageContext {
            environment: None,
            telemetry: &store,
        };
        let mut rl = render_loop(&[PageId::NextDeparture]).with_scroll_step(4);

        let RenderOutcome::Scroll(page, scroll) = rl.tick(0, true, &ctx) else {
            panic!("expected a scrolling page");
        };
        assert_eq!(page, PageId::NextDeparture);
        assert!(scroll.text().starts_with("Next Bus: Line"));
        assert!(rl.display_mut().calls.is_empty());

        let first = scroll.frames().nth(1).unwrap();
        rl.draw_scroll_frame(&first).unwrap();
        assert_eq!(rl.display_mut().calls.len(), 3);
        assert_eq!(rl.display_mut().calls[1], Call::Text(first.text.to_string(), first.x, scroll.y()));
    }

    #[test]
    fn test_display_fault_is_reported() {
        let store = TelemetryStore::new();
        let ctx = PageContext {
            environment: None,
            telemetry: &store,
        };
        let mut rl = render_loop(&PageId::ALL);
        rl.display_mut().fail = true;
        assert_eq!(
            rl.tick(0, true, &ctx),
            RenderOutcome::DisplayFault(DisplayError::Communication)
        );

        // The loop carries on once the display recovers
        rl.display_mut().fail = false;
        assert_eq!(
            rl.tick(5_000, false, &ctx),
            RenderOutcome::Drawn(PageId::InsideHumidity)
        );
    }

    #[test]
    fn test_failed_blank_is_retried() {
        let store = TelemetryStore::new();
        let ctx = PageContext {
            environment: None,
            telemetry: &store,
        };
        let mut rl = render_loop(&PageId::ALL);
        rl.tick(0, true, &ctx);
        rl.display_mut().calls.clear();

        rl.display_mut().fail = true;
        assert_eq!(
            rl.tick(10_000, false, &ctx),
            RenderOutcome::DisplayFault(DisplayError::Communication)
        );
        assert!(!rl.is_blanked());

        // Panel recovers while still inactive: the blank goes through once
        rl.display_mut().fail = false;
        assert_eq!(rl.tick(11_000, false, &ctx), RenderOutcome::Blanked);
        assert!(rl.is_blanked());
        assert_eq!(rl.tick(30_000, false, &ctx), RenderOutcome::Dark);
        assert_eq!(rl.display_mut().calls, vec![Call::Clear, Call::Present]);
    }
}
