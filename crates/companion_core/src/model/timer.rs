//! Countdown timer state.

/// Remaining countdown time plus the running flag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimerState {
    /// Seconds left, never negative.
    pub remaining_secs: f64,
    pub is_running: bool,
}

impl TimerState {
    /// Advances one second. Returns `false` when the timer was not running.
    ///
    /// Reaching zero stops the timer.
    pub fn tick(&mut self) -> bool {
        if !self.is_running {
            return false;
        }
        if self.remaining_secs > 0.0 {
            self.remaining_secs = (self.remaining_secs - 1.0).max(0.0);
        }
        if self.remaining_secs <= 0.0 {
            self.is_running = false;
        }
        true
    }

    /// `MM:SS`; minutes are not wrapped into hours.
    pub fn display(&self) -> String {
        let total = self.remaining_secs.max(0.0) as u64;
        format!("{:02}:{:02}", total / 60, total % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::TimerState;

    #[test]
    fn tick_counts_down_and_stops_at_zero() {
        let mut state = TimerState {
            remaining_secs: 2.0,
            is_running: true,
        };
        assert!(state.tick());
        assert_eq!(state.remaining_secs, 1.0);
        assert!(state.is_running);
        assert!(state.tick());
        assert_eq!(state.remaining_secs, 0.0);
        assert!(!state.is_running);
        assert!(!state.tick());
    }

    #[test]
    fn display_pads_minutes_and_seconds() {
        let state = TimerState {
            remaining_secs: 125.7,
            is_running: false,
        };
        assert_eq!(state.display(), "02:05");
        assert_eq!(TimerState::default().display(), "00:00");
    }
}
