//! Pressure pad actuation
//!
//! [`evaluate`] maps the four pad readings to an indicator color and one
//! alert per pad at or above the threshold. It is a pure function of its
//! inputs; nothing carries over between ticks, so readings hovering around
//! the threshold make the LED and buzzer chatter.
//!
//! Alerts do not block the control tick. They are queued in an
//! [`AlertQueue`] and played one after another by whoever drains it.

use heapless::{Deque, Vec};

use crate::traits::{ActuatorError, BuzzerOutput, Rgb};

/// Number of pressure pads
pub const PAD_COUNT: usize = 4;

/// Reference activation threshold on the 10-bit ADC scale
pub const DEFAULT_THRESHOLD: u16 = 900;

/// A fixed-frequency beep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tone {
    pub frequency_hz: u16,
    pub duration_ms: u32,
}

impl Tone {
    pub const fn new(frequency_hz: u16, duration_ms: u32) -> Self {
        Self {
            frequency_hz,
            duration_ms,
        }
    }
}

/// Tone for each pad, by pad index
pub const PAD_TONES: [Tone; PAD_COUNT] = [
    Tone::new(1000, 300),
    Tone::new(1200, 300),
    Tone::new(1400, 300),
    Tone::new(1600, 300),
];

/// One pad over the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Alert {
    pub pad: u8,
    pub tone: Tone,
}

/// LED channels and alerts for one set of pad readings
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActuationVector {
    pub red: bool,
    pub green: bool,
    pub blue: bool,
    pub alerts: Vec<Alert, PAD_COUNT>,
}

impl ActuationVector {
    /// Full intensity for each lit channel, off otherwise
    pub fn color(&self) -> Rgb {
        let level = |on: bool| if on { 255 } else { 0 };
        Rgb::new(level(self.red), level(self.green), level(self.blue))
    }
}

/// Map pad readings to LED channels and alerts
///
/// Pad 3 lights red and green together (yellow).
pub fn evaluate(pads: [u16; PAD_COUNT], threshold: u16) -> ActuationVector {
    let hit = pads.map(|v| v >= threshold);

    let mut alerts = Vec::new();
    for (pad, tone) in PAD_TONES.iter().enumerate() {
        if hit[pad] {
            // At most PAD_COUNT entries
            let _ = alerts.push(Alert {
                pad: pad as u8,
                tone: *tone,
            });
        }
    }

    ActuationVector {
        red: hit[0] || hit[3],
        green: hit[1] || hit[3],
        blue: hit[2],
        alerts,
    }
}

/// Pending alerts kept by the queue
pub const ALERT_QUEUE_DEPTH: usize = 8;

/// Buzzer command produced by [`AlertQueue::poll`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BuzzerCommand {
    Start(Tone),
    Stop,
}

/// Non-blocking alert player
///
/// Alerts play in arrival order, each for its own duration. A pad that
/// already has an alert waiting is not queued again, so a pad held down
/// for many ticks does not build up a backlog.
#[derive(Debug, Clone, Default)]
pub struct AlertQueue {
    pending: Deque<Alert, ALERT_QUEUE_DEPTH>,
    playing: Option<(Alert, u64)>,
}

impl AlertQueue {
    pub const fn new() -> Self {
        Self {
            pending: Deque::new(),
            playing: None,
        }
    }

    /// Queue an alert
    ///
    /// Returns `false` if it was dropped because the same pad is already
    /// waiting or the queue is full.
    pub fn enqueue(&mut self, alert: Alert) -> bool {
        if self.pending.iter().any(|a| a.pad == alert.pad) {
            return false;
        }
        self.pending.push_back(alert).is_ok()
    }

    /// Queue every alert of an actuation result
    pub fn enqueue_all(&mut self, alerts: &[Alert]) {
        for alert in alerts {
            self.enqueue(*alert);
        }
    }

    /// Advance the player to `now_ms`
    ///
    /// Returns the buzzer command to issue, if the buzzer must change.
    pub fn poll(&mut self, now_ms: u64) -> Option<BuzzerCommand> {
        if let Some((_, until)) = self.playing {
            if now_ms < until {
                return None;
            }
            self.playing = None;
            return match self.start_next(now_ms) {
                Some(tone) => Some(BuzzerCommand::Start(tone)),
                None => Some(BuzzerCommand::Stop),
            };
        }
        self.start_next(now_ms).map(BuzzerCommand::Start)
    }

    fn start_next(&mut self, now_ms: u64) -> Option<Tone> {
        let alert = self.pending.pop_front()?;
        let until = now_ms.saturating_add(u64::from(alert.tone.duration_ms));
        self.playing = Some((alert, until));
        Some(alert.tone)
    }

    /// When the current tone ends, if one is playing
    pub fn next_deadline(&self) -> Option<u64> {
        self.playing.map(|(_, until)| until)
    }

    /// Alert currently sounding
    pub fn playing(&self) -> Option<Alert> {
        self.playing.map(|(alert, _)| alert)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.playing.is_none() && self.pending.is_empty()
    }

    /// Poll and apply the result to `buzzer`
    pub fn drive<B: BuzzerOutput>(&mut self, buzzer: &mut B, now_ms: u64) -> Result<(), ActuatorError> {
        match self.poll(now_ms) {
            Some(BuzzerCommand::Start(tone)) => buzzer.tone_on(tone.frequency_hz),
            Some(BuzzerCommand::Stop) => buzzer.tone_off(),
            None => Ok(()),
        }
    }
}
