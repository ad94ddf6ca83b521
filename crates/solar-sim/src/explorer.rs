//! Explorer state and its reducer.
//!
//! [`ExplorerState`] bundles the catalog, selection, tour and display settings.
//! Every user command goes through [`ExplorerState::apply`], which performs the
//! transition synchronously and reports what changed so the renderer and the
//! info panel can react on the next frame.

use crate::catalog::{BodyId, Catalog};
use crate::selection::Selection;
use crate::settings::{DisplaySettings, SettingsStore};
use crate::tour::TourState;

/// User-level operations on the explorer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExplorerCommand {
    /// Replace the selection (`None` clears it).
    Select(Option<BodyId>),
    Clear,
    StartTour,
    StopTour,
    /// Start when inactive, stop when active.
    ToggleTour,
    NextTour,
    PrevTour,
    /// Replace the whole settings record.
    UpdateSettings(DisplaySettings),
}

/// Observable consequences of a command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExplorerEvent {
    SelectionChanged(Option<BodyId>),
    TourStarted,
    TourStopped,
    /// The tour moved to the given catalog index.
    TourMoved(usize),
    SettingsChanged(DisplaySettings),
}

/// Application state for the simulation view.
#[derive(Debug, Clone)]
pub struct ExplorerState {
    catalog: Catalog,
    selection: Selection,
    tour: TourState,
    settings: SettingsStore,
}

impl ExplorerState {
    pub fn new(catalog: Catalog, settings: DisplaySettings) -> Self {
        Self {
            catalog,
            selection: Selection::default(),
            tour: TourState::Inactive,
            settings: SettingsStore::new(settings),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selection(&self) -> Option<BodyId> {
        self.selection.current()
    }

    pub fn tour(&self) -> TourState {
        self.tour
    }

    pub fn settings(&self) -> DisplaySettings {
        self.settings.current()
    }

    /// Fraction of the tour covered, if touring.
    pub fn tour_progress(&self) -> Option<f64> {
        self.tour.progress(self.catalog.len())
    }

    /// Apply one command and return the resulting events in order.
    pub fn apply(&mut self, command: ExplorerCommand) -> Vec<ExplorerEvent> {
        let mut events = Vec::new();
        let n = self.catalog.len();

        match command {
            ExplorerCommand::Select(None) | ExplorerCommand::Clear => {
                if self.tour.is_active() {
                    self.tour = self.tour.stop();
                    events.push(ExplorerEvent::TourStopped);
                }
                self.set_selection(None, &mut events);
            }
            ExplorerCommand::Select(Some(id)) => {
                if self.tour.is_active() {
                    self.tour = self.tour.seek(id.index());
                    events.push(ExplorerEvent::TourMoved(id.index()));
                }
                self.set_selection(Some(id), &mut events);
            }
            ExplorerCommand::StartTour => {
                self.tour = self.tour.start();
                events.push(ExplorerEvent::TourStarted);
                self.select_tour_stop(&mut events);
            }
            ExplorerCommand::StopTour => {
                if self.tour.is_active() {
                    self.tour = self.tour.stop();
                    events.push(ExplorerEvent::TourStopped);
                    self.set_selection(None, &mut events);
                }
            }
            ExplorerCommand::ToggleTour => {
                let next = if self.tour.is_active() {
                    ExplorerCommand::StopTour
                } else {
                    ExplorerCommand::StartTour
                };
                return self.apply(next);
            }
            ExplorerCommand::NextTour => {
                if self.tour.is_active() {
                    self.tour = self.tour.next(n);
                    self.select_tour_stop(&mut events);
                }
            }
            ExplorerCommand::PrevTour => {
                if self.tour.is_active() {
                    self.tour = self.tour.prev(n);
                    self.select_tour_stop(&mut events);
                }
            }
            ExplorerCommand::UpdateSettings(settings) => {
                let stored = self.settings.update(settings);
                events.push(ExplorerEvent::SettingsChanged(stored));
            }
        }

        events
    }

    fn select_tour_stop(&mut self, events: &mut Vec<ExplorerEvent>) {
        if let Some(index) = self.tour.index() {
            events.push(ExplorerEvent::TourMoved(index));
            self.set_selection(self.catalog.id_at(index), events);
        }
    }

    fn set_selection(&mut self, body: Option<BodyId>, events: &mut Vec<ExplorerEvent>) {
        let selected = self.selection.select(body);
        events.push(ExplorerEvent::SelectionChanged(selected));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn explorer() -> ExplorerState {
        ExplorerState::new(Catalog::builtin().unwrap(), DisplaySettings::default())
    }

    #[test]
    fn test_select_emits_change() {
        let mut state = explorer();
        let mars = state.catalog().find("mars").unwrap();
        let events = state.apply(ExplorerCommand::Select(Some(mars)));
        assert_eq!(events, vec![ExplorerEvent::SelectionChanged(Some(mars))]);
        assert_eq!(state.selection(), Some(mars));
        assert!(!state.tour().is_active());
    }

    #[test]
    fn test_reselecting_same_body_still_emits() {
        let mut state = explorer();
        let mars = state.catalog().find("mars").unwrap();
        state.apply(ExplorerCommand::Select(Some(mars)));
        let events = state.apply(ExplorerCommand::Select(Some(mars)));
        assert_eq!(events, vec![ExplorerEvent::SelectionChanged(Some(mars))]);
    }

    #[test]
    fn test_start_selects_first_regardless_of_selection() {
        let mut state = explorer();
        let saturn = state.catalog().find("saturn").unwrap();
        state.apply(ExplorerCommand::Select(Some(saturn)));
        let events = state.apply(ExplorerCommand::StartTour);
        assert_eq!(
            events,
            vec![
                ExplorerEvent::TourStarted,
                ExplorerEvent::TourMoved(0),
                ExplorerEvent::SelectionChanged(Some(state.catalog().first())),
            ]
        );
        assert_eq!(state.tour(), TourState::Active { index: 0 });
    }

    #[test]
    fn test_stop_clears_selection() {
        let mut state = explorer();
        state.apply(ExplorerCommand::StartTour);
        state.apply(ExplorerCommand::NextTour);
        state.apply(ExplorerCommand::StopTour);
        assert_eq!(state.selection(), None);
        assert_eq!(state.tour(), TourState::Inactive);
    }

    #[test]
    fn test_navigation_while_inactive_is_noop() {
        let mut state = explorer();
        let earth = state.catalog().find("earth").unwrap();
        state.apply(ExplorerCommand::Select(Some(earth)));
        assert!(state.apply(ExplorerCommand::NextTour).is_empty());
        assert!(state.apply(ExplorerCommand::PrevTour).is_empty());
        assert!(state.apply(ExplorerCommand::StopTour).is_empty());
        assert_eq!(state.selection(), Some(earth));
    }

    #[test]
    fn test_direct_select_moves_tour_index() {
        let mut state = explorer();
        state.apply(ExplorerCommand::StartTour);
        let jupiter = state.catalog().find("jupiter").unwrap();
        state.apply(ExplorerCommand::Select(Some(jupiter)));
        assert_eq!(state.tour(), TourState::Active { index: jupiter.index() });

        state.apply(ExplorerCommand::NextTour);
        assert_eq!(state.selection(), state.catalog().find("saturn"));
    }

    #[test]
    fn test_clear_during_tour_stops_it() {
        let mut state = explorer();
        state.apply(ExplorerCommand::StartTour);
        let events = state.apply(ExplorerCommand::Clear);
        assert_eq!(
            events,
            vec![
                ExplorerEvent::TourStopped,
                ExplorerEvent::SelectionChanged(None)
            ]
        );
        assert!(!state.tour().is_active());
    }

    #[test]
    fn test_toggle_tour() {
        let mut state = explorer();
        state.apply(ExplorerCommand::ToggleTour);
        assert!(state.tour().is_active());
        state.apply(ExplorerCommand::ToggleTour);
        assert!(!state.tour().is_active());
        assert_eq!(state.selection(), None);
    }

    #[test]
    fn test_update_settings_clamps_and_reports() {
        let mut state = explorer();
        let requested = DisplaySettings {
            ambient_light_intensity: 1.7,
            show_orbits: false,
            ..state.settings()
        };
        let events = state.apply(ExplorerCommand::UpdateSettings(requested));
        let stored = state.settings();
        assert_eq!(stored.ambient_light_intensity, 1.0);
        assert!(!stored.show_orbits);
        assert_eq!(events, vec![ExplorerEvent::SettingsChanged(stored)]);
    }

    #[test]
    fn test_tour_progress() {
        let mut state = explorer();
        assert_eq!(state.tour_progress(), None);
        state.apply(ExplorerCommand::StartTour);
        state.apply(ExplorerCommand::PrevTour);
        assert_eq!(state.tour_progress(), Some(1.0));
    }
}
