//! Control cycle task
//!
//! Runs the sense, actuate, publish and render cycle on a fixed period.
//! Scrolling pages are played out here so the frame pacing stays off the
//! core's hands. A scroll longer than the period delays the next tick; the
//! ticker restarts afterwards instead of catching up on missed periods.

use defmt::*;
use embassy_time::{Duration, Instant, Ticker, Timer};

use carpet_core::render::RenderOutcome;

use crate::board::CarpetCycle;
use crate::channels::ALERT_CHANNEL;

/// Timing for the control task
pub struct ControlTiming {
    pub tick_ms: u32,
    pub scroll_frame_ms: u32,
}

#[embassy_executor::task]
pub async fn control_task(mut cycle: CarpetCycle, timing: ControlTiming) {
    info!("Control task started ({} ms cycle)", timing.tick_ms);

    let mut ticker = Ticker::every(Duration::from_millis(u64::from(timing.tick_ms)));

    loop {
        let report = cycle.tick(Instant::now().as_millis());

        debug!(
            "Pads {:?} motion={} published={}",
            report.pads, report.motion, report.published
        );
        if let Some(env) = report.environment {
            trace!(
                "Inside {} centi-C, {} centi-%, {} Pa",
                env.temperature_centi_c,
                env.humidity_centi_pct,
                env.pressure_pa
            );
        }
        if report.faults.any() {
            warn!("Cycle faults: {:?}", report.faults);
        }

        for alert in &report.actuation.alerts {
            if ALERT_CHANNEL.try_send(*alert).is_err() {
                warn!("Alert channel full, dropping pad {} alert", alert.pad);
            }
        }

        match report.render {
            RenderOutcome::Drawn(page) => debug!("Page {} drawn", page.name()),
            RenderOutcome::Blanked => info!("Display idle, blanked"),
            RenderOutcome::DisplayFault(e) => warn!("Display fault: {:?}", e),
            RenderOutcome::Scroll(page, plan) => {
                debug!("Page {} scrolling, {} frames", page.name(), plan.frame_count());
                for frame in plan.frames() {
                    if let Err(e) = cycle.render_mut().draw_scroll_frame(&frame) {
                        warn!("Display fault while scrolling: {:?}", e);
                        break;
                    }
                    Timer::after_millis(u64::from(timing.scroll_frame_ms)).await;
                }
                // Missed periods are dropped, not replayed back to back
                ticker.reset();
            }
            RenderOutcome::Dark | RenderOutcome::Holding(_) => {}
        }

        ticker.next().await;
    }
}
