//! Top-level view sequencing: loading screen, landing page, simulation.

use std::fmt;

/// Which screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Loading,
    Landing,
    Simulation,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViewMode::Loading => "Loading",
            ViewMode::Landing => "Welcome",
            ViewMode::Simulation => "Simulation",
        })
    }
}

/// Drives `Loading -> Landing -> Simulation`.
///
/// Loading ends when its timer runs out or the user skips ahead. Landing waits
/// for the user. Simulation is final.
#[derive(Debug, Clone)]
pub struct ViewSequencer {
    mode: ViewMode,
    loading_elapsed: f64,
    loading_duration: f64,
}

impl ViewSequencer {
    /// Start in `Loading`, or straight in `Simulation` when `skip_intro` is set.
    pub fn new(loading_seconds: f64, skip_intro: bool) -> Self {
        Self {
            mode: if skip_intro {
                ViewMode::Simulation
            } else {
                ViewMode::Loading
            },
            loading_elapsed: 0.0,
            loading_duration: loading_seconds.max(0.0),
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Loading progress in `[0, 1]`. 1 once loading is over.
    pub fn loading_progress(&self) -> f32 {
        match self.mode {
            ViewMode::Loading if self.loading_duration > 0.0 => {
                (self.loading_elapsed / self.loading_duration).min(1.0) as f32
            }
            _ => 1.0,
        }
    }

    /// Advance the loading timer by `dt` seconds. Returns the new mode on a
    /// transition.
    pub fn tick(&mut self, dt: f64) -> Option<ViewMode> {
        if self.mode != ViewMode::Loading {
            return None;
        }
        self.loading_elapsed += dt;
        if self.loading_elapsed >= self.loading_duration {
            return self.transition(ViewMode::Landing);
        }
        None
    }

    /// User asked to move on: skips loading, or enters the simulation from
    /// the landing page. Returns the new mode on a transition.
    pub fn proceed(&mut self) -> Option<ViewMode> {
        match self.mode {
            ViewMode::Loading => self.transition(ViewMode::Landing),
            ViewMode::Landing => self.transition(ViewMode::Simulation),
            ViewMode::Simulation => None,
        }
    }

    fn transition(&mut self, to: ViewMode) -> Option<ViewMode> {
        tracing::info!("View mode {} -> {}", self.mode, to);
        self.mode = to;
        Some(to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_times_out_to_landing() {
        let mut seq = ViewSequencer::new(3.5, false);
        assert_eq!(seq.mode(), ViewMode::Loading);
        for _ in 0..6 {
            assert_eq!(seq.tick(0.5), None);
        }
        assert!((seq.loading_progress() - 3.0 / 3.5).abs() < 1e-6);
        assert_eq!(seq.tick(0.5), Some(ViewMode::Landing));
        assert_eq!(seq.loading_progress(), 1.0);
    }

    #[test]
    fn test_landing_waits_for_user() {
        let mut seq = ViewSequencer::new(0.5, false);
        seq.tick(1.0);
        assert_eq!(seq.mode(), ViewMode::Landing);
        for _ in 0..100 {
            assert_eq!(seq.tick(1.0), None);
        }
        assert_eq!(seq.proceed(), Some(ViewMode::Simulation));
        assert_eq!(seq.proceed(), None);
    }

    #[test]
    fn test_skip_supersedes_timer() {
        let mut seq = ViewSequencer::new(3.5, false);
        seq.tick(0.1);
        assert_eq!(seq.proceed(), Some(ViewMode::Landing));
        // The old timer no longer fires.
        assert_eq!(seq.tick(10.0), None);
        assert_eq!(seq.mode(), ViewMode::Landing);
    }

    #[test]
    fn test_skip_intro_starts_in_simulation() {
        let seq = ViewSequencer::new(3.5, true);
        assert_eq!(seq.mode(), ViewMode::Simulation);
    }

    #[test]
    fn test_progress_half_way() {
        let mut seq = ViewSequencer::new(2.0, false);
        seq.tick(1.0);
        assert!((seq.loading_progress() - 0.5).abs() < 1e-6);
    }
}
