//! Motion detector trait

/// Presence/motion detector input
pub trait MotionInput {
    /// True while the detector reports motion
    ///
    /// Implementations translate the pin's electrical polarity, so `true`
    /// always means "motion". A read failure reports no motion.
    fn is_asserted(&mut self) -> bool;
}
