//! Command-line argument parsing for Solar Explorer.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Solar Explorer command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "solar-explorer", about = "Interactive 3D solar system explorer")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Start in fullscreen.
    #[arg(long)]
    pub fullscreen: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Fixed seed for orbital phases (reproducible layouts).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip the loading screen and landing page.
    #[arg(long)]
    pub skip_intro: bool,

    /// Number of background stars.
    #[arg(long)]
    pub stars: Option<u32>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(fs) = args.fullscreen {
            self.window.fullscreen = fs;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(seed) = args.seed {
            self.scene.phase_seed = Some(seed);
        }
        if args.skip_intro {
            self.scene.skip_intro = true;
        }
        if let Some(stars) = args.stars {
            self.scene.star_count = stars;
        }
    }
}
