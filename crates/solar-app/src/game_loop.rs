//! Fixed-timestep frame loop.
//!
//! The simulation advances in whole [`FIXED_DT`] steps drawn from an
//! accumulator of wall-clock time; rendering happens once per frame.

use std::time::Instant;

use solar_sim::FIXED_DT;
use tracing::warn;

/// Longest frame fed to the accumulator. Longer stalls (window drags, a
/// debugger break) are dropped instead of replayed.
pub const MAX_FRAME_TIME: f64 = 0.25;

pub struct GameLoop {
    previous_time: Instant,
    accumulator: f64,
    total_sim_time: f64,
    frame_count: u64,
    update_count: u64,
}

impl GameLoop {
    pub fn new() -> Self {
        Self {
            previous_time: Instant::now(),
            accumulator: 0.0,
            total_sim_time: 0.0,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Run one frame against the wall clock.
    ///
    /// `update_fn(dt)` runs zero or more times at the fixed rate, then
    /// `render_fn(alpha)` runs once with the leftover fraction of a step.
    pub fn tick(&mut self, update_fn: impl FnMut(f64), render_fn: impl FnMut(f64)) {
        let now = Instant::now();
        let frame_time = now.duration_since(self.previous_time).as_secs_f64();
        self.previous_time = now;
        self.advance(frame_time, update_fn, render_fn);
    }

    /// Same as [`tick`](Self::tick) with an explicit frame time.
    pub fn advance(
        &mut self,
        frame_time: f64,
        mut update_fn: impl FnMut(f64),
        mut render_fn: impl FnMut(f64),
    ) {
        let frame_time = if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            MAX_FRAME_TIME
        } else {
            frame_time.max(0.0)
        };

        self.accumulator += frame_time;
        while self.accumulator >= FIXED_DT {
            update_fn(FIXED_DT);
            self.total_sim_time += FIXED_DT;
            self.accumulator -= FIXED_DT;
            self.update_count += 1;
        }

        render_fn(self.alpha());
        self.frame_count += 1;
    }

    /// Fraction of a step left in the accumulator, in `[0, 1)`.
    pub fn alpha(&self) -> f64 {
        if self.accumulator > 0.0 {
            self.accumulator / FIXED_DT
        } else {
            0.0
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    pub fn total_sim_time(&self) -> f64 {
        self.total_sim_time
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_step() {
        let mut lp = GameLoop::new();
        let mut updates = 0u32;
        lp.advance(FIXED_DT, |_| updates += 1, |_| {});
        assert_eq!(updates, 1);
        assert!(lp.alpha() < 1e-9);
    }

    #[test]
    fn test_partial_step_renders_without_update() {
        let mut lp = GameLoop::new();
        let mut updates = 0u32;
        let mut rendered = false;
        lp.advance(0.5 * FIXED_DT, |_| updates += 1, |_| rendered = true);
        assert_eq!(updates, 0);
        assert!(rendered);
        assert!((lp.alpha() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_steps_use_fixed_dt() {
        let mut lp = GameLoop::new();
        let mut seen = Vec::new();
        lp.advance(3.5 * FIXED_DT, |dt| seen.push(dt), |_| {});
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|&dt| dt == FIXED_DT));
    }

    #[test]
    fn test_long_frame_clamped() {
        let mut lp = GameLoop::new();
        let mut updates = 0u32;
        lp.advance(5.0, |_| updates += 1, |_| {});
        let max_updates = (MAX_FRAME_TIME / FIXED_DT).ceil() as u32;
        assert!(updates > 0 && updates <= max_updates);
    }

    #[test]
    fn test_negative_frame_time_ignored() {
        let mut lp = GameLoop::new();
        let mut updates = 0u32;
        lp.advance(-1.0, |_| updates += 1, |_| {});
        assert_eq!(updates, 0);
        assert_eq!(lp.alpha(), 0.0);
    }

    #[test]
    fn test_counters() {
        let mut lp = GameLoop::default();
        for _ in 0..10 {
            lp.advance(FIXED_DT * 2.0, |_| {}, |_| {});
        }
        assert_eq!(lp.frame_count(), 10);
        let expected = lp.update_count() as f64 * FIXED_DT;
        assert!((lp.total_sim_time() - expected).abs() < 1e-10);
    }
}
