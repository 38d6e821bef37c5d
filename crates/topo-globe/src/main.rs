//! Topo Globe: a heightmap-displaced planet under a starfield.
//!
//! Run with: `cargo run -p topo-globe -- --procedural`

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use topo_app::platform::PlatformDirs;
use topo_config::{CliArgs, Config, ConfigError};
use tracing::{error, info, warn};

/// Load `config.ron` from `--config` or the platform directory and apply
/// command-line overrides.
fn load_config(args: &CliArgs, dirs: Option<&PlatformDirs>) -> Result<Config, ConfigError> {
    let config_dir: Option<PathBuf> = args
        .config
        .clone()
        .or_else(|| dirs.map(|d| d.config_dir.clone()));

    let mut config = match config_dir {
        Some(dir) => Config::load_or_create(&dir)?,
        None => Config::default(),
    };
    config.apply_cli_overrides(args);
    config.planet.validate()?;
    Ok(config)
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let dirs = match PlatformDirs::resolve_and_create() {
        Ok(dirs) => Some(dirs),
        Err(e) => {
            eprintln!("Warning: {e}; using default settings");
            None
        }
    };

    let config = match load_config(&args, dirs.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let log_dir = dirs
        .as_ref()
        .map(|d| d.log_dir_or(&config.debug.log_dir).to_path_buf());
    topo_log::init_logging(log_dir.as_deref(), cfg!(debug_assertions), Some(&config));

    if dirs.is_none() {
        warn!("No platform config directory; settings will not persist");
    }
    info!(
        "Window: {}x{} | planet radius {} | resolution {}",
        config.window.width, config.window.height, config.planet.radius, config.planet.resolution
    );

    match topo_app::run_with_config(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
