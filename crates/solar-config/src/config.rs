//! Configuration structs with defaults matching the explorer's stock look, plus
//! RON persistence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the persisted configuration inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Display toggles applied when the simulation view opens.
    pub display: DisplayConfig,
    /// Orbit camera behaviour.
    pub camera: CameraConfig,
    /// Scene content: starfield, intro timing, phase seeding.
    pub scene: SceneConfig,
    /// Key binding overrides.
    pub input: InputConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Start in borderless fullscreen.
    pub fullscreen: bool,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Base window title. The HUD appends to it.
    pub title: String,
}

/// Initial values of the display toggles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Draw orbit path rings.
    pub show_orbits: bool,
    /// Draw label markers above each body.
    pub show_labels: bool,
    /// Draw lines from the star to every planet.
    pub show_distance_lines: bool,
    /// Ambient light level in `[0, 1]`.
    pub ambient_light_intensity: f32,
    /// Keep the system moving and the camera slowly orbiting.
    pub auto_rotate: bool,
}

/// Orbit camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Initial camera position in scene units.
    pub start_position: [f32; 3],
    /// Closest allowed distance to the orbit target.
    pub min_distance: f32,
    /// Farthest allowed distance to the orbit target.
    pub max_distance: f32,
    /// Auto-rotation speed. 1.0 is one revolution per 30 s at 60 Hz.
    pub auto_rotate_speed: f32,
    /// Radians of orbit per pixel of mouse drag.
    pub orbit_sensitivity: f32,
    /// Fractional zoom per wheel line.
    pub zoom_sensitivity: f32,
    /// Invert vertical drag.
    pub invert_y: bool,
}

/// Scene content configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Number of background stars.
    pub star_count: u32,
    /// Inner radius of the star shell.
    pub star_radius: f32,
    /// Thickness of the star shell.
    pub star_depth: f32,
    /// Seed for the starfield layout.
    pub star_seed: u64,
    /// Duration of the loading screen in seconds.
    pub loading_seconds: f64,
    /// Fixed seed for orbital phases. `None` draws fresh phases every run.
    pub phase_seed: Option<u64>,
    /// Go straight to the simulation view.
    pub skip_intro: bool,
}

/// Input configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Key binding overrides (action name -> key name), e.g.
    /// `{"ToggleTour": "KeyG"}`.
    pub keybindings: HashMap<String, String>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Show FPS in the HUD.
    pub show_fps: bool,
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
            title: "Solar System Explorer".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_orbits: true,
            show_labels: true,
            show_distance_lines: false,
            ambient_light_intensity: 0.5,
            auto_rotate: true,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            start_position: [0.0, 20.0, 45.0],
            min_distance: 5.0,
            max_distance: 100.0,
            auto_rotate_speed: 0.5,
            orbit_sensitivity: 0.005,
            zoom_sensitivity: 0.1,
            invert_y: false,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            star_count: 5000,
            star_radius: 100.0,
            star_depth: 50.0,
            star_seed: 0x5EED_57A2,
            loading_seconds: 3.5,
            phase_seed: None,
            skip_intro: false,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            show_fps: false,
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Path of `config.ron` inside `config_dir`.
    pub fn path_in(config_dir: &Path) -> PathBuf {
        config_dir.join(CONFIG_FILE_NAME)
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = Self::path_in(config_dir);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = Self::path_in(config_dir);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path.clone(),
            source,
        })?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&Self::path_in(config_dir))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
