//! Buzzer task
//!
//! Owns the PWM buzzer and the alert queue. Alerts arrive from the control
//! task; tones are started and stopped against deadlines so nothing else
//! waits while a tone plays.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Instant, Timer};

use carpet_core::actuation::AlertQueue;

use crate::board::PwmBuzzer;
use crate::channels::ALERT_CHANNEL;

#[embassy_executor::task]
pub async fn buzzer_task(mut buzzer: PwmBuzzer) {
    info!("Buzzer task started");

    let mut queue = AlertQueue::new();

    loop {
        let deadline = queue.next_deadline();
        let wake = async move {
            match deadline {
                Some(at) => Timer::at(Instant::from_millis(at)).await,
                None => core::future::pending::<()>().await,
            }
        };

        match select(ALERT_CHANNEL.receive(), wake).await {
            Either::First(alert) => {
                if queue.enqueue(alert) {
                    trace!("Pad {} alert queued", alert.pad);
                }
            }
            Either::Second(()) => {}
        }

        if let Err(e) = queue.drive(&mut buzzer, Instant::now().as_millis()) {
            warn!("Buzzer error: {:?}", e);
        }
    }
}
