//! `solar-explorer`: interactive 3D solar system explorer.

use std::process::ExitCode;

use clap::Parser;
use solar_app::platform::PlatformDirs;
use solar_config::{CliArgs, Config};
use solar_sim::Catalog;
use tracing::{error, info};

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let debug_build = cfg!(debug_assertions);

    let dirs = match PlatformDirs::resolve_and_create(args.config.as_deref()) {
        Ok(dirs) => dirs,
        Err(e) => {
            solar_log::init_logging(None, debug_build, None);
            error!("Failed to initialize platform directories: {e}");
            return ExitCode::FAILURE;
        }
    };

    let disk_config = match Config::load_or_create(&dirs.config_dir) {
        Ok(config) => config,
        Err(e) => {
            solar_log::init_logging(Some(&dirs.log_dir), debug_build, None);
            error!("Failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut config = disk_config.clone();
    config.apply_cli_overrides(&args);

    solar_log::init_logging(Some(&dirs.log_dir), debug_build, Some(&config));
    info!("Solar Explorer {}", env!("CARGO_PKG_VERSION"));
    info!("Config: {}", Config::path_in(&dirs.config_dir).display());
    info!(
        "Window: {}x{} | fullscreen: {} | vsync: {}",
        config.window.width, config.window.height, config.window.fullscreen, config.window.vsync
    );

    let catalog = match Catalog::builtin() {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Invalid body catalog: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!("Catalog: {} bodies", catalog.len());

    if let Err(e) = solar_app::window::run(disk_config, args, dirs.config_dir, catalog) {
        error!("Event loop failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
