//! HUD shown in the window title: view mode or selection, tour progress and
//! an optional smoothed FPS counter.

use std::time::Instant;

/// Weight of the newest frame in the frame-time average.
const EMA_WEIGHT: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct HudState {
    pub show_fps: bool,
    fps: f64,
    last_frame: Instant,
    frame_time_ema: f64,
}

impl HudState {
    pub fn new(show_fps: bool) -> Self {
        Self {
            show_fps,
            fps: 0.0,
            last_frame: Instant::now(),
            frame_time_ema: 1.0 / 60.0,
        }
    }

    /// Record a presented frame.
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;
        self.record_frame_time(dt);
    }

    fn record_frame_time(&mut self, dt: f64) {
        if dt > 0.0 {
            self.frame_time_ema = self.frame_time_ema * (1.0 - EMA_WEIGHT) + dt * EMA_WEIGHT;
            self.fps = 1.0 / self.frame_time_ema;
        }
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn toggle_fps(&mut self) {
        self.show_fps = !self.show_fps;
    }

    /// Window title for the given status line.
    pub fn title(&self, app_title: &str, status: &str) -> String {
        format_title(app_title, status, self.show_fps.then_some(self.fps))
    }
}

/// `"<title> | <status>"`, with ` | <fps> FPS` appended when given.
pub fn format_title(app_title: &str, status: &str, fps: Option<f64>) -> String {
    let mut title = format!("{app_title} | {status}");
    if let Some(fps) = fps {
        title.push_str(&format!(" | {fps:.0} FPS"));
    }
    title
}
