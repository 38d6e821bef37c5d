//! Fixed-timestep frame pacing.
//!
//! Camera damping and planet spin advance in fixed 1/60 s steps; rendering
//! runs once per redraw at whatever rate the display allows.

use std::time::Instant;
use tracing::warn;

/// Simulation step: 60 Hz.
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// Longer frames are clamped, trading slowdown for a bounded step count.
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

    /// Measure wall time since the previous tick and [`advance`](Self::advance) by it.
    pub fn tick(&mut self, update_fn: impl FnMut(f64, f64), render_fn: impl FnMut(f64)) {
        let now = Instant::now();
        let frame_time = now.duration_since(self.previous_time).as_secs_f64();
        self.previous_time = now;
        self.advance(frame_time, update_fn, render_fn);
    }

    /// Run as many `update_fn(FIXED_DT, sim_time)` steps as `frame_time`
    /// covers, then `render_fn(alpha)` once with the leftover fraction of a
    /// step in `[0, 1)`.
    pub fn advance(
        &mut self,
        frame_time: f64,
        mut update_fn: impl FnMut(f64, f64),
        mut render_fn: impl FnMut(f64),
    ) {
        let mut frame_time = frame_time.max(0.0);
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.accumulator += frame_time;
        while self.accumulator >= FIXED_DT {
            update_fn(FIXED_DT, self.total_sim_time);
            self.total_sim_time += FIXED_DT;
            self.accumulator -= FIXED_DT;
            self.update_count += 1;
        }

        render_fn(self.alpha());
        self.frame_count += 1;
    }

    pub fn alpha(&self) -> f64 {
        (self.accumulator / FIXED_DT).max(0.0)
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
    fn test_exact_step_runs_one_update() {
        let mut game_loop = GameLoop::new();
        let mut updates = 0u32;
        game_loop.advance(FIXED_DT, |_, _| updates += 1, |_| {});
        assert_eq!(updates, 1);
        assert!(game_loop.alpha() < 1e-9);
    }

    #[test]
    fn test_partial_step_only_renders() {
        let mut game_loop = GameLoop::new();
        let mut updates = 0u32;
        let mut alpha = -1.0;
        game_loop.advance(0.25 * FIXED_DT, |_, _| updates += 1, |a| alpha = a);
        assert_eq!(updates, 0);
        assert!((alpha - 0.25).abs() < 1e-9);
        assert_eq!(game_loop.frame_count(), 1);
    }

    #[test]
    fn test_leftover_carries_into_next_frame() {
        let mut game_loop = GameLoop::new();
        let mut updates = 0u32;
        game_loop.advance(0.6 * FIXED_DT, |_, _| updates += 1, |_| {});
        game_loop.advance(0.6 * FIXED_DT, |_, _| updates += 1, |_| {});
        assert_eq!(updates, 1);
        assert!((game_loop.alpha() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_sim_time_passed_to_updates() {
        let mut game_loop = GameLoop::new();
        let mut times = Vec::new();
        game_loop.advance(3.0 * FIXED_DT + 1e-9, |_, t| times.push(t), |_| {});
        assert_eq!(times.len(), 3);
        assert!((times[2] - 2.0 * FIXED_DT).abs() < 1e-12);
        assert!((game_loop.total_sim_time() - 3.0 * FIXED_DT).abs() < 1e-12);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut game_loop = GameLoop::new();
        let mut updates = 0u32;
        game_loop.advance(5.0, |_, _| updates += 1, |_| {});
        let max_updates = (MAX_FRAME_TIME / FIXED_DT).ceil() as u32;
        assert!(updates > 0 && updates <= max_updates);
    }

    #[test]
    fn test_negative_frame_time_is_ignored() {
        let mut game_loop = GameLoop::new();
        let mut updates = 0u32;
        game_loop.advance(-1.0, |_, _| updates += 1, |_| {});
        assert_eq!(updates, 0);
        assert_eq!(game_loop.update_count(), 0);
    }
}
