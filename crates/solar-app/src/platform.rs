//! OS directory resolution for config and log files.

use std::io;
use std::path::{Path, PathBuf};

/// Errors resolving or creating the application directories.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("could not determine OS configuration directory")]
    NoConfigDir,

    #[error("platform I/O error: {0}")]
    Io(#[from] io::Error),
}

const APP_NAME: &str = "solar-explorer";

/// Where `config.ron` and the log file live.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformDirs {
    pub config_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl PlatformDirs {
    /// Resolve platform directories without touching the disk.
    pub fn resolve() -> Result<Self, PlatformError> {
        let base = dirs::config_dir().ok_or(PlatformError::NoConfigDir)?;
        Ok(Self::resolve_with_root(&base))
    }

    /// Directories rooted under `root` instead of the OS location.
    pub fn resolve_with_root(root: &Path) -> Self {
        let app_dir = root.join(APP_NAME);
        Self {
            config_dir: app_dir.join("config"),
            log_dir: app_dir.join("logs"),
        }
    }

    /// Resolve, honoring a `--config` override, and create the directories.
    pub fn resolve_and_create(config_override: Option<&Path>) -> Result<Self, PlatformError> {
        let mut dirs = Self::resolve()?;
        if let Some(dir) = config_override {
            dirs.config_dir = dir.to_path_buf();
        }
        dirs.create_dirs()?;
        Ok(dirs)
    }

    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}
