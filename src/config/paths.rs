//! Location of the settings file.
//!
//! The settings file lives next to the running executable so a portable
//! install keeps its configuration with it:
//!
//!   <exe dir>\config.toml
//!   <exe dir>\captures\          (only when `save_temp_images = true`)
//!
//! If the executable path cannot be resolved the per-user config directory
//! from the `dirs` crate is used instead
//! (`%APPDATA%\clipboard-ocr\` on Windows).

use std::path::{Path, PathBuf};

/// Resolved application file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory holding `config.toml`.
    pub config_dir: PathBuf,
    /// Full path to `config.toml`.
    pub settings_file: PathBuf,
    /// Directory that receives retained capture images.
    pub captures_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "clipboard-ocr";
    const SETTINGS_FILE: &'static str = "config.toml";

    /// Resolves paths relative to the current executable.
    pub fn new() -> Self {
        let config_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| {
                dirs::config_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(Self::APP_NAME)
            });

        Self::in_dir(config_dir)
    }

    /// Lays the files out inside an explicit directory (used by tests).
    pub fn in_dir(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        let settings_file = config_dir.join(Self::SETTINGS_FILE);
        let captures_dir = config_dir.join("captures");

        Self {
            config_dir,
            settings_file,
            captures_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
