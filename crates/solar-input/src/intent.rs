//! Turns bound actions into what the application should do.

use solar_sim::{AMBIENT_STEP, DisplaySettings, ExplorerCommand, SettingToggle};

use crate::bindings::InputAction;

/// Resolved meaning of an [`InputAction`] in the current context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Feed to the explorer reducer.
    Explorer(ExplorerCommand),
    /// Advance the view sequence.
    Proceed,
    ResetCamera,
    ToggleFps,
    ReloadConfig,
}

impl Intent {
    /// Resolve `action` against the current settings.
    ///
    /// Settings actions produce a full replacement record derived from
    /// `settings`, so the reducer sees a single whole-record update.
    pub fn resolve(action: InputAction, settings: DisplaySettings) -> Self {
        let update = |s: DisplaySettings| Intent::Explorer(ExplorerCommand::UpdateSettings(s));
        match action {
            InputAction::Proceed => Intent::Proceed,
            InputAction::ClearSelection => Intent::Explorer(ExplorerCommand::Clear),
            InputAction::ToggleTour => Intent::Explorer(ExplorerCommand::ToggleTour),
            InputAction::NextStop => Intent::Explorer(ExplorerCommand::NextTour),
            InputAction::PrevStop => Intent::Explorer(ExplorerCommand::PrevTour),
            InputAction::ToggleOrbits => update(settings.toggled(SettingToggle::Orbits)),
            InputAction::ToggleLabels => update(settings.toggled(SettingToggle::Labels)),
            InputAction::ToggleDistanceLines => {
                update(settings.toggled(SettingToggle::DistanceLines))
            }
            InputAction::ToggleAutoRotate => update(settings.toggled(SettingToggle::AutoRotate)),
            InputAction::AmbientDown => update(settings.with_ambient_delta(-AMBIENT_STEP)),
            InputAction::AmbientUp => update(settings.with_ambient_delta(AMBIENT_STEP)),
            InputAction::ResetCamera => Intent::ResetCamera,
            InputAction::ToggleFps => Intent::ToggleFps,
            InputAction::ReloadConfig => Intent::ReloadConfig,
        }
    }
}
