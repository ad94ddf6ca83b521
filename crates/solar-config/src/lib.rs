//! Configuration system for Solar Explorer.
//!
//! Runtime-configurable settings persisted to disk as RON. Supports CLI
//! overrides via clap, hot-reload detection, and forward/backward compatible
//! serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CameraConfig, Config, DebugConfig, DisplayConfig, InputConfig, SceneConfig, WindowConfig,
};
pub use error::ConfigError;
