//src/timer.rs

/// Countdown state of the rest timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running { remaining: u32 },
}

/// Identifies one started countdown. Ticks carrying a stale handle are
/// ignored, so a tick scheduled before `stop()` or a restart can never
/// resurrect a cancelled countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle(u64);

/// Result of applying one scheduled tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Countdown continues with this many seconds left.
    Running(u32),
    /// Final tick; the timer is now idle and the completion side effect
    /// should fire exactly once.
    Finished,
    /// The handle no longer matches the live countdown; drop the tick.
    Stale,
}

/// Single-instance rest-timer state machine. At most one countdown is live;
/// starting a new one replaces any existing countdown (no extend semantics).
/// The host schedules the actual one-second ticks and feeds them back in
/// through [`RestTimer::tick`].
#[derive(Debug, Default)]
pub struct RestTimer {
    generation: u64,
    state: TimerState,
}

impl Default for TimerState {
    fn default() -> Self {
        Self::Idle
    }
}

impl RestTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a countdown of `seconds`, cancelling any running one.
    pub fn start(&mut self, seconds: u32) -> TimerHandle {
        self.generation += 1;
        self.state = TimerState::Running { remaining: seconds };
        TimerHandle(self.generation)
    }

    /// Stops the countdown immediately. No completion effect fires.
    pub fn stop(&mut self) {
        self.generation += 1;
        self.state = TimerState::Idle;
    }

    /// Applies one scheduled one-second tick for the given handle.
    pub fn tick(&mut self, handle: TimerHandle) -> Tick {
        if handle.0 != self.generation {
            return Tick::Stale;
        }
        match self.state {
            TimerState::Idle => Tick::Stale,
            TimerState::Running { remaining } if remaining <= 1 => {
                self.state = TimerState::Idle;
                Tick::Finished
            }
            TimerState::Running { remaining } => {
                self.state = TimerState::Running {
                    remaining: remaining - 1,
                };
                Tick::Running(remaining - 1)
            }
        }
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    #[must_use]
    pub const fn remaining_seconds(&self) -> u32 {
        match self.state {
            TimerState::Idle => 0,
            TimerState::Running { remaining } => remaining,
        }
    }

    #[must_use]
    pub const fn state(&self) -> TimerState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_down_to_idle_with_one_completion() {
        let mut timer = RestTimer::new();
        let handle = timer.start(5);
        for expected in (1..=4).rev() {
            assert_eq!(timer.tick(handle), Tick::Running(expected));
        }
        assert_eq!(timer.tick(handle), Tick::Finished);
        assert!(!timer.is_active());
        assert_eq!(timer.remaining_seconds(), 0);
        // A tick scheduled after completion is stale, not a second finish.
        assert_eq!(timer.tick(handle), Tick::Stale);
    }

    #[test]
    fn test_stop_resets_without_completion() {
        let mut timer = RestTimer::new();
        let handle = timer.start(5);
        assert_eq!(timer.tick(handle), Tick::Running(4));
        assert_eq!(timer.tick(handle), Tick::Running(3));
        timer.stop();
        assert!(!timer.is_active());
        assert_eq!(timer.remaining_seconds(), 0);
        assert_eq!(timer.tick(handle), Tick::Stale);
    }

    #[test]
    fn test_restart_replaces_countdown() {
        let mut timer = RestTimer::new();
        let first = timer.start(120);
        let second = timer.start(60);
        assert_eq!(timer.remaining_seconds(), 60);
        assert_eq!(timer.tick(first), Tick::Stale);
        assert_eq!(timer.tick(second), Tick::Running(59));
    }

    #[test]
    fn test_start_one_second_finishes_on_first_tick() {
        let mut timer = RestTimer::new();
        let handle = timer.start(1);
        assert_eq!(timer.tick(handle), Tick::Finished);
    }
}
