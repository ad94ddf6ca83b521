//! End-to-end checks of the explorer reducer on a three-body system.

use solar_sim::{
    Catalog, DisplaySettings, ExplorerCommand, ExplorerState, OrbitalPhase, SettingToggle,
    TourState, advance, orbital_position,
};

const THREE_BODIES: &str = r#"[
    (id: "sun", name: "Sun", category: Star, radius: 2.5, distance: 0.0, speed: 0.0),
    (id: "mercury", name: "Mercury", category: TerrestrialPlanet, radius: 0.4, distance: 5.0, speed: 2.0),
    (id: "venus", name: "Venus", category: TerrestrialPlanet, radius: 0.6, distance: 8.0, speed: 1.0),
]"#;

fn explorer() -> ExplorerState {
    let catalog = Catalog::from_ron(THREE_BODIES).unwrap();
    ExplorerState::new(catalog, DisplaySettings::default())
}

fn selected_name(state: &ExplorerState) -> Option<&str> {
    state
        .selection()
        .map(|id| state.catalog().get(id).name.as_str())
}

fn assert_stop(state: &ExplorerState, name: &str, index: usize) {
    assert_eq!(selected_name(state), Some(name));
    assert_eq!(state.tour(), TourState::Active { index });
}

#[test]
fn test_three_body_tour() {
    let mut state = explorer();

    state.apply(ExplorerCommand::StartTour);
    assert_stop(&state, "Sun", 0);
    state.apply(ExplorerCommand::NextTour);
    assert_stop(&state, "Mercury", 1);
    state.apply(ExplorerCommand::NextTour);
    assert_stop(&state, "Venus", 2);
    state.apply(ExplorerCommand::NextTour);
    assert_stop(&state, "Sun", 0);
    state.apply(ExplorerCommand::PrevTour);
    assert_stop(&state, "Venus", 2);
}

#[test]
fn test_selection_tracks_tour_index() {
    let mut state = explorer();
    state.apply(ExplorerCommand::StartTour);
    let commands = [
        ExplorerCommand::NextTour,
        ExplorerCommand::NextTour,
        ExplorerCommand::PrevTour,
        ExplorerCommand::NextTour,
        ExplorerCommand::NextTour,
        ExplorerCommand::PrevTour,
        ExplorerCommand::PrevTour,
        ExplorerCommand::PrevTour,
    ];
    for command in commands {
        state.apply(command);
        let index = state.tour().index().unwrap();
        assert_eq!(state.selection(), state.catalog().id_at(index));
    }
}

#[test]
fn test_next_n_times_returns_home() {
    let mut state = ExplorerState::new(Catalog::builtin().unwrap(), DisplaySettings::default());
    state.apply(ExplorerCommand::StartTour);
    let catalog_len = state.catalog().len();
    for start in 0..catalog_len {
        for _ in 0..catalog_len {
            state.apply(ExplorerCommand::NextTour);
        }
        assert_eq!(state.tour().index(), Some(start));
        state.apply(ExplorerCommand::NextTour);
    }
}

#[test]
fn test_prev_undoes_next_everywhere() {
    let mut state = explorer();
    state.apply(ExplorerCommand::StartTour);
    for _ in 0..state.catalog().len() {
        let before = state.tour();
        state.apply(ExplorerCommand::NextTour);
        state.apply(ExplorerCommand::PrevTour);
        assert_eq!(state.tour(), before);
        state.apply(ExplorerCommand::NextTour);
    }
}

#[test]
fn test_start_ignores_prior_selection() {
    for prior in ["sun", "mercury", "venus"] {
        let mut state = explorer();
        let id = state.catalog().find(prior).unwrap();
        state.apply(ExplorerCommand::Select(Some(id)));
        state.apply(ExplorerCommand::StartTour);
        assert_stop(&state, "Sun", 0);
    }
}

#[test]
fn test_stop_always_clears() {
    for steps in 0..5 {
        let mut state = explorer();
        state.apply(ExplorerCommand::StartTour);
        for _ in 0..steps {
            state.apply(ExplorerCommand::NextTour);
        }
        state.apply(ExplorerCommand::StopTour);
        assert_eq!(state.selection(), None);
        assert!(!state.tour().is_active());
    }
}

#[test]
fn test_one_setting_change_leaves_others() {
    let mut state = explorer();
    let before = state.settings();

    let toggles = [
        SettingToggle::Orbits,
        SettingToggle::Labels,
        SettingToggle::DistanceLines,
        SettingToggle::AutoRotate,
    ];
    for toggle in toggles {
        state.apply(ExplorerCommand::UpdateSettings(before.toggled(toggle)));
        let after = state.settings();
        let restored = after.toggled(toggle);
        assert_eq!(restored, before, "{toggle:?} touched another field");
    }

    state.apply(ExplorerCommand::UpdateSettings(DisplaySettings {
        ambient_light_intensity: 0.8,
        ..before
    }));
    let after = state.settings();
    assert_eq!(
        DisplaySettings {
            ambient_light_intensity: before.ambient_light_intensity,
            ..after
        },
        before
    );
}

#[test]
fn test_orbiting_bodies_move_between_times() {
    let catalog = Catalog::from_ron(THREE_BODIES).unwrap();
    let phases = [OrbitalPhase(0.0), OrbitalPhase(1.0), OrbitalPhase(2.0)];
    let early = advance(&catalog, &phases, 0.25);
    let late = advance(&catalog, &phases, 1.75);

    assert_eq!(early[0], late[0]);
    assert!((early[1] - late[1]).length() > 1e-6);
    assert!((early[2] - late[2]).length() > 1e-6);

    // Mercury's speed is 2, so a time step of π is one full revolution.
    let a = orbital_position(5.0, 2.0, phases[1], 0.25);
    let b = orbital_position(5.0, 2.0, phases[1], 0.25 + std::f64::consts::PI);
    assert!((a - b).length() < 1e-9);
}
