//! Guided tour: steps the selection through the catalog in order.
//!
//! Transitions are pure functions of the current state and the catalog size.
//! Wrap-around is circular in both directions.

/// Tour mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TourState {
    #[default]
    Inactive,
    /// Touring, with `index` always in `[0, n)`.
    Active { index: usize },
}

impl TourState {
    pub fn is_active(self) -> bool {
        matches!(self, TourState::Active { .. })
    }

    /// Current stop, if touring.
    pub fn index(self) -> Option<usize> {
        match self {
            TourState::Active { index } => Some(index),
            TourState::Inactive => None,
        }
    }

    /// Begin (or restart) at the first body.
    pub fn start(self) -> Self {
        TourState::Active { index: 0 }
    }

    pub fn stop(self) -> Self {
        TourState::Inactive
    }

    /// `(index + 1) mod n`. No-op while inactive.
    pub fn next(self, n: usize) -> Self {
        match self {
            TourState::Active { index } if n > 0 => TourState::Active {
                index: (index + 1) % n,
            },
            other => other,
        }
    }

    /// `(index - 1 + n) mod n`. No-op while inactive.
    pub fn prev(self, n: usize) -> Self {
        match self {
            TourState::Active { index } if n > 0 => TourState::Active {
                index: (index + n - 1) % n,
            },
            other => other,
        }
    }

    /// Jump to `index` while touring. No-op while inactive.
    pub fn seek(self, index: usize) -> Self {
        match self {
            TourState::Active { .. } => TourState::Active { index },
            other => other,
        }
    }

    /// Fraction of the tour covered, `index / (n - 1)`.
    ///
    /// A single-body tour counts as complete.
    pub fn progress(self, n: usize) -> Option<f64> {
        let index = self.index()?;
        if n <= 1 {
            return Some(1.0);
        }
        Some(index as f64 / (n - 1) as f64)
    }
}
