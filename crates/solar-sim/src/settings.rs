//! Display settings consumed by the renderer every frame.

use solar_config::DisplayConfig;

/// Step applied by the ambient light keys.
pub const AMBIENT_STEP: f32 = 0.1;

/// Independent display toggles. No cross-field invariants apart from the
/// ambient level being clamped to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplaySettings {
    pub show_orbits: bool,
    pub show_labels: bool,
    pub show_distance_lines: bool,
    pub ambient_light_intensity: f32,
    pub auto_rotate: bool,
}

/// Boolean fields of [`DisplaySettings`], for key-driven toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingToggle {
    Orbits,
    Labels,
    DistanceLines,
    AutoRotate,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self::from(&DisplayConfig::default())
    }
}

impl From<&DisplayConfig> for DisplaySettings {
    fn from(config: &DisplayConfig) -> Self {
        Self {
            show_orbits: config.show_orbits,
            show_labels: config.show_labels,
            show_distance_lines: config.show_distance_lines,
            ambient_light_intensity: config.ambient_light_intensity,
            auto_rotate: config.auto_rotate,
        }
        .clamped()
    }
}

impl DisplaySettings {
    /// Copy with the ambient level forced into `[0, 1]`. NaN becomes 0.
    pub fn clamped(mut self) -> Self {
        let ambient = self.ambient_light_intensity;
        self.ambient_light_intensity = if ambient.is_nan() {
            0.0
        } else {
            ambient.clamp(0.0, 1.0)
        };
        self
    }

    /// Copy with one boolean flipped.
    pub fn toggled(mut self, toggle: SettingToggle) -> Self {
        let field = match toggle {
            SettingToggle::Orbits => &mut self.show_orbits,
            SettingToggle::Labels => &mut self.show_labels,
            SettingToggle::DistanceLines => &mut self.show_distance_lines,
            SettingToggle::AutoRotate => &mut self.auto_rotate,
        };
        *field = !*field;
        self
    }

    /// Copy with the ambient level shifted by `delta`, clamped.
    pub fn with_ambient_delta(mut self, delta: f32) -> Self {
        self.ambient_light_intensity += delta;
        self.clamped()
    }
}

/// Holds the current settings. Updates replace the whole record.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SettingsStore {
    current: DisplaySettings,
}

impl SettingsStore {
    pub fn new(initial: DisplaySettings) -> Self {
        Self {
            current: initial.clamped(),
        }
    }

    pub fn current(&self) -> DisplaySettings {
        self.current
    }

    /// Replace every field. Returns the stored (clamped) record.
    pub fn update(&mut self, settings: DisplaySettings) -> DisplaySettings {
        self.current = settings.clamped();
        self.current
    }
}
