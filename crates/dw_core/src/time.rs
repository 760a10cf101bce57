//! Fixed-tick simulation clock.
//!
//! The game simulates at a fixed 30 ticks per second regardless of render
//! rate. `begin_frame` feeds a wall-clock accumulator (with a spiral-of-death
//! cap), `should_step` consumes fixed slices, and `pace` sleeps off the
//! remainder of the frame for real-time runs. Headless replay runs skip
//! pacing entirely and drive ticks as fast as they will go.

use std::time::{Duration, Instant};

pub const TICK_RATE: u32 = 30;

pub struct TickClock {
    pub fixed_dt: f64,
    pub max_accumulator: f64,
    accumulator: f64,
    tick_count: u64,
    last_instant: Instant,
    pub real_dt: f64,
}

impl TickClock {
    pub fn new(tick_rate: u32) -> Self {
        Self {
            fixed_dt: 1.0 / f64::from(tick_rate.max(1)),
            max_accumulator: 0.25,
            accumulator: 0.0,
            tick_count: 0,
            last_instant: Instant::now(),
            real_dt: 0.0,
        }
    }

    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        self.real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;

        // Spiral-of-death cap
        if self.real_dt > self.max_accumulator {
            log::warn!(
                "Frame took {:.1}ms -- capping accumulator to {}ms",
                self.real_dt * 1000.0,
                self.max_accumulator * 1000.0
            );
            self.real_dt = self.max_accumulator;
        }
        self.accumulator += self.real_dt;
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.tick_count += 1;
            true
        } else {
            false
        }
    }

    /// Monotonic count of fixed steps taken so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Sleep off the remainder of the current frame.
    pub fn pace(&self) {
        let remaining = self.fixed_dt - self.accumulator;
        if remaining > 0.0 {
            std::thread::sleep(Duration::from_secs_f64(remaining));
        }
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(TICK_RATE)
    }
}
