//! Software 16th-note clock: converts elapsed wall time and a BPM into a
//! monotonically increasing tick counter via a fractional accumulator.

use std::time::Duration;

/// 16th notes per quarter-note beat.
pub const TICKS_PER_BEAT: u32 = 4;

#[derive(Debug, Clone)]
pub struct TickClock {
    accumulator: f64,
    counter: u32,
}

impl TickClock {
    pub fn new() -> Self {
        Self {
            accumulator: 0.0,
            counter: 0,
        }
    }

    /// The next tick counter that will fire.
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Advance by elapsed wall time; returns the tick counters that fired,
    /// in order. Normally zero or one per call when polled faster than the
    /// tick rate; more after a stall.
    pub fn advance(&mut self, elapsed: Duration, bpm: f32) -> Vec<u32> {
        let ticks_per_second = bpm as f64 / 60.0 * TICKS_PER_BEAT as f64;
        self.accumulator += elapsed.as_secs_f64() * ticks_per_second;

        let mut fired = Vec::new();
        while self.accumulator >= 1.0 {
            self.accumulator -= 1.0;
            fired.push(self.counter);
            self.counter = self.counter.wrapping_add(1);
        }
        fired
    }

    /// Whether a tick counter lands on a quarter-note beat boundary.
    pub fn is_beat(counter: u32) -> bool {
        counter % TICKS_PER_BEAT == 0
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_ticks_before_first_interval() {
        let mut clock = TickClock::new();
        // At 120 BPM a 16th lasts 125ms
        assert!(clock.advance(Duration::from_millis(100), 120.0).is_empty());
    }

    #[test]
    fn one_second_at_120_bpm_is_8_ticks() {
        let mut clock = TickClock::new();
        let fired = clock.advance(Duration::from_secs(1), 120.0);
        assert_eq!(fired, vec![0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn counter_is_monotonic_across_calls() {
        let mut clock = TickClock::new();
        let mut all = Vec::new();
        for _ in 0..40 {
            all.extend(clock.advance(Duration::from_millis(50), 120.0));
        }
        assert_eq!(all, (0..all.len() as u32).collect::<Vec<_>>());
    }

    #[test]
    fn fractional_remainder_carries_over() {
        let mut clock = TickClock::new();
        // 0.8 of a tick, then another 0.8: second call fires one
        assert!(clock.advance(Duration::from_millis(100), 120.0).is_empty());
        assert_eq!(clock.advance(Duration::from_millis(100), 120.0).len(), 1);
    }

    #[test]
    fn beat_boundaries_every_4_ticks() {
        assert!(TickClock::is_beat(0));
        assert!(!TickClock::is_beat(1));
        assert!(!TickClock::is_beat(3));
        assert!(TickClock::is_beat(4));
        assert!(TickClock::is_beat(16));
    }
}
