//! Motion activity gate
//!
//! The display is active while the last motion is younger than the
//! timeout. Only timestamps are stored; `active` is recomputed from them on
//! every query so it cannot drift from its inputs.

/// How a motion sample counts as new motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionTrigger {
    /// Only a not-asserted to asserted change records motion
    #[default]
    RisingEdge,
    /// Every asserted sample records motion
    Level,
}

/// Change in gate state reported by [`ActivityGate::sample`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GateTransition {
    None,
    Activated,
    Deactivated,
}

/// Motion-derived display on/off control
#[derive(Debug, Clone)]
pub struct ActivityGate {
    timeout_ms: u64,
    trigger: MotionTrigger,
    last_motion_at: Option<u64>,
    was_asserted: bool,
    last_reported: bool,
}

impl ActivityGate {
    pub const fn new(timeout_ms: u64, trigger: MotionTrigger) -> Self {
        Self {
            timeout_ms,
            trigger,
            last_motion_at: None,
            was_asserted: false,
            last_reported: false,
        }
    }

    /// Feed one motion sample taken at `now_ms`
    ///
    /// Returns the active-state change since the previous sample.
    pub fn sample(&mut self, asserted: bool, now_ms: u64) -> GateTransition {
        let motion = match self.trigger {
            MotionTrigger::RisingEdge => asserted && !self.was_asserted,
            MotionTrigger::Level => asserted,
        };
        self.was_asserted = asserted;
        if motion {
            self.last_motion_at = Some(now_ms);
        }

        let active = self.is_active(now_ms);
        let transition = match (self.last_reported, active) {
            (false, true) => GateTransition::Activated,
            (true, false) => GateTransition::Deactivated,
            _ => GateTransition::None,
        };
        self.last_reported = active;
        transition
    }

    /// Whether motion happened within the timeout before `now_ms`
    ///
    /// Inactive until the first motion is seen.
    pub fn is_active(&self, now_ms: u64) -> bool {
        self.last_motion_at
            .is_some_and(|at| now_ms.saturating_sub(at) < self.timeout_ms)
    }

    pub fn last_motion_at(&self) -> Option<u64> {
        self.last_motion_at
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }
}
