//! Per-user directories for config, cache and logs.

use std::io;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "topo-globe";

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("could not determine OS configuration directory")]
    NoConfigDir,

    #[error("platform I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Platform-appropriate locations (XDG on Linux, Known Folders on Windows,
/// Library on macOS).
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformDirs {
    /// Holds `config.ron`.
    pub config_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl PlatformDirs {
    /// Resolve without touching the filesystem.
    pub fn resolve() -> Result<Self, PlatformError> {
        let config_dir = dirs::config_dir()
            .ok_or(PlatformError::NoConfigDir)?
            .join(APP_NAME);
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| config_dir.clone())
            .join(APP_NAME);
        let log_dir = dirs::data_local_dir()
            .map(|d| d.join(APP_NAME))
            .unwrap_or_else(|| config_dir.clone())
            .join("logs");

        Ok(Self {
            config_dir,
            cache_dir,
            log_dir,
        })
    }

    pub fn resolve_and_create() -> Result<Self, PlatformError> {
        let dirs = Self::resolve()?;
        dirs.create_dirs()?;
        Ok(dirs)
    }

    /// Everything under `root`, for tests and portable installs.
    pub fn resolve_with_root(root: &Path) -> Self {
        let app_dir = root.join(APP_NAME);
        Self {
            config_dir: app_dir.join("config"),
            cache_dir: app_dir.join("cache"),
            log_dir: app_dir.join("logs"),
        }
    }

    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        for dir in [&self.config_dir, &self.cache_dir, &self.log_dir] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// The configured log directory, or the platform one when unset.
    pub fn log_dir_or<'a>(&'a self, configured: &'a Path) -> &'a Path {
        if configured.as_os_str().is_empty() {
            &self.log_dir
        } else {
            configured
        }
    }
}
