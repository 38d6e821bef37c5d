//! Window-title HUD: smoothed frame rate, planet parameters and load status.

use std::time::{Duration, Instant};

/// How often the title is rewritten.
pub const TITLE_REFRESH: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct HudState {
    /// Smoothed frames per second.
    pub fps: f64,
    frame_time_ema: f64,
    last_frame: Instant,
    last_title: Option<Instant>,
}

impl Default for HudState {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl HudState {
    pub fn new(now: Instant) -> Self {
        Self {
            fps: 0.0,
            frame_time_ema: 1.0 / 60.0,
            last_frame: now,
            last_title: None,
        }
    }

    /// Record a frame presented at `now`.
    pub fn on_frame(&mut self, now: Instant) {
        let dt = now.saturating_duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;
        if dt > 0.0 {
            self.frame_time_ema = self.frame_time_ema * 0.9 + dt * 0.1;
            self.fps = 1.0 / self.frame_time_ema;
        }
    }

    /// Whether the title is due for a refresh; marks it refreshed if so.
    pub fn title_due(&mut self, now: Instant) -> bool {
        match self.last_title {
            Some(last) if now.saturating_duration_since(last) < TITLE_REFRESH => false,
            _ => {
                self.last_title = Some(now);
                true
            }
        }
    }
}

/// `Topo Globe | rot 0.10 | disp 0.050 | bump 0.25 | 60 fps`, with `status`
/// (e.g. a loading message) in place of the parameters when given.
pub fn format_title(base: &str, hud: &HudState, summary: &str, status: Option<&str>) -> String {
    let middle = status.unwrap_or(summary);
    format!("{base} | {middle} | {:.0} fps", hud.fps)
}
