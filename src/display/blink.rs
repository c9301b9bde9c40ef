// Blink scheduler - Fixed-interval on/off phase for blinking cells
//
// Elapsed time is accumulated per tick. When the accumulator reaches the
// interval the phase flips once and the accumulator restarts from zero, even if
// the step covered several intervals.

/// Default blink interval in milliseconds
pub const DEFAULT_BLINK_INTERVAL_MS: u32 = 500;

/// Current blink phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkPhase {
    /// Blinking cells are visible
    On,
    /// Blinking cells are hidden
    Off,
}

impl BlinkPhase {
    /// The opposite phase
    pub fn toggled(self) -> Self {
        match self {
            BlinkPhase::On => BlinkPhase::Off,
            BlinkPhase::Off => BlinkPhase::On,
        }
    }

    pub fn is_on(self) -> bool {
        self == BlinkPhase::On
    }
}

/// Accumulates tick time and toggles the blink phase
#[derive(Debug, Clone)]
pub struct BlinkScheduler {
    /// Milliseconds accumulated since the last toggle
    accumulated: u32,
    /// Milliseconds between toggles
    interval: u32,
    phase: BlinkPhase,
}

impl BlinkScheduler {
    /// Create a scheduler starting in the off phase
    ///
    /// An interval of 0 is treated as 1ms.
    pub fn new(interval_ms: u32) -> Self {
        Self {
            accumulated: 0,
            interval: interval_ms.max(1),
            phase: BlinkPhase::Off,
        }
    }

    /// Advance by one tick
    ///
    /// # Arguments
    /// * `elapsed_ms` - Duration of the tick
    ///
    /// # Returns
    /// `true` if the phase toggled; the caller must then redraw every
    /// blinking cell
    pub fn advance(&mut self, elapsed_ms: u32) -> bool {
        self.accumulated = self.accumulated.saturating_add(elapsed_ms);
        if self.accumulated < self.interval {
            return false;
        }

        // One toggle per call regardless of how many intervals elapsed
        self.phase = self.phase.toggled();
        self.accumulated = 0;
        log::trace!("Blink phase toggled to {:?}", self.phase);
        true
    }

    pub fn phase(&self) -> BlinkPhase {
        self.phase
    }

    /// Whether blinking cells are currently visible
    pub fn is_on(&self) -> bool {
        self.phase.is_on()
    }

    /// Milliseconds accumulated since the last toggle
    pub fn accumulated(&self) -> u32 {
        self.accumulated
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }
}

impl Default for BlinkScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_BLINK_INTERVAL_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let blink = BlinkScheduler::default();
        assert_eq!(blink.phase(), BlinkPhase::Off);
        assert_eq!(blink.accumulated(), 0);
        assert_eq!(blink.interval(), 500);
    }

    #[test]
    fn test_below_interval_only_counts() {
        let mut blink = BlinkScheduler::new(500);
        assert!(!blink.advance(499));
        assert_eq!(blink.accumulated(), 499);
        assert_eq!(blink.phase(), BlinkPhase::Off);
    }

    #[test]
    fn test_exact_interval_toggles() {
        let mut blink = BlinkScheduler::new(500);
        assert!(blink.advance(500));
        assert_eq!(blink.phase(), BlinkPhase::On);
        assert_eq!(blink.accumulated(), 0);
    }

    #[test]
    fn test_two_half_steps_toggle_on_second() {
        let mut blink = BlinkScheduler::new(500);
        assert!(!blink.advance(250));
        assert!(blink.advance(250));
        assert!(blink.is_on());
    }

    #[test]
    fn test_large_step_toggles_once() {
        let mut blink = BlinkScheduler::new(500);
        assert!(blink.advance(1300));
        assert_eq!(blink.phase(), BlinkPhase::On);
        assert_eq!(blink.accumulated(), 0);

        assert!(blink.advance(1300));
        assert_eq!(blink.phase(), BlinkPhase::Off);
    }

    #[test]
    fn test_zero_interval_clamped() {
        let mut blink = BlinkScheduler::new(0);
        assert_eq!(blink.interval(), 1);
        assert!(blink.advance(1));
    }

    #[test]
    fn test_accumulator_saturates() {
        let mut blink = BlinkScheduler::new(u32::MAX);
        assert!(!blink.advance(u32::MAX - 1));
        assert!(blink.advance(10));
    }
}
