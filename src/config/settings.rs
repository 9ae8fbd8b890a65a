//! Settings structs, defaults and TOML persistence.
//!
//! The file is split in two sections that mirror what users edit by hand:
//!
//! ```toml
//! [General]
//! hotkey = "ctrl+alt+v"
//! admin_mode = "ask"
//! language = "eng"
//! timeout = 3000
//!
//! [Advanced]
//! save_temp_images = false
//! tesseract_path = ""
//! ```
//!
//! Every field carries `#[serde(default)]`, so a file that only sets a few
//! keys is merged over the built-in defaults.  An existing file is never
//! rewritten; only a missing one is created.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Problems encountered while loading or creating the settings file.
///
/// None of these are fatal: the caller reports them and carries on with the
/// in-memory defaults.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but is not valid TOML for [`Settings`].
    #[error("could not parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The defaults could not be serialised.
    #[error("could not serialise settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The file (or its parent directory) could not be created.
    #[error("could not create {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// AdminMode
// ---------------------------------------------------------------------------

/// What to do about elevation when the process starts unelevated.
///
/// Stored as a plain string; anything other than `ask` or `always` means
/// "never elevate".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AdminMode {
    /// Ask once at startup whether to relaunch elevated.
    Ask,
    /// Relaunch elevated without asking.
    Always,
    /// Stay unelevated and use the window-only shortcut.
    Never,
}

impl Default for AdminMode {
    fn default() -> Self {
        Self::Ask
    }
}

impl From<String> for AdminMode {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "ask" => Self::Ask,
            "always" => Self::Always,
            _ => Self::Never,
        }
    }
}

impl From<AdminMode> for String {
    fn from(mode: AdminMode) -> Self {
        match mode {
            AdminMode::Ask => "ask",
            AdminMode::Always => "always",
            AdminMode::Never => "never",
        }
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// GeneralSettings
// ---------------------------------------------------------------------------

/// The `[General]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Key combination that triggers a conversion (e.g. `"ctrl+alt+v"`).
    pub hotkey: String,
    /// Elevation policy.
    pub admin_mode: AdminMode,
    /// Tesseract language code(s), e.g. `"eng"` or `"eng+deu"`.
    pub language: String,
    /// Milliseconds the success message stays up before reverting to "Ready".
    pub timeout: u64,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            hotkey: "ctrl+alt+v".into(),
            admin_mode: AdminMode::default(),
            language: "eng".into(),
            timeout: 3000,
        }
    }
}

// ---------------------------------------------------------------------------
// AdvancedSettings
// ---------------------------------------------------------------------------

/// The `[Advanced]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedSettings {
    /// Keep a copy of every image handed to the OCR engine.
    pub save_temp_images: bool,
    /// Explicit path to the `tesseract` executable; empty means "use PATH".
    pub tesseract_path: String,
}

// ---------------------------------------------------------------------------
// Settings  (top-level)
// ---------------------------------------------------------------------------

/// Top-level settings, serialised as `config.toml`.
///
/// Loaded once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "General")]
    pub general: GeneralSettings,
    #[serde(rename = "Advanced")]
    pub advanced: AdvancedSettings,
}

/// Result of [`Settings::load_or_create`]: the settings to run with plus the
/// problem to report, if any.
#[derive(Debug)]
pub struct LoadedSettings {
    pub settings: Settings,
    pub issue: Option<ConfigError>,
}

impl Settings {
    /// Load `path`, or create it with defaults when it does not exist.
    ///
    /// Never fails: read/parse/write problems are returned in
    /// [`LoadedSettings::issue`] alongside the defaults.
    pub fn load_or_create(path: &Path) -> LoadedSettings {
        if path.exists() {
            return match Self::load_from(path) {
                Ok(settings) => LoadedSettings {
                    settings,
                    issue: None,
                },
                Err(e) => LoadedSettings {
                    settings: Self::default(),
                    issue: Some(e),
                },
            };
        }

        let settings = Self::default();
        let issue = settings.save_to(path).err();
        if issue.is_none() {
            log::info!("created default settings at {}", path.display());
        }
        LoadedSettings { settings, issue }
    }

    /// Load from an existing file, merging missing keys with defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source: std::io::Error| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(write_err)
    }

    /// Delay before the success message reverts to "Ready".
    pub fn status_reset_delay(&self) -> Duration {
        Duration::from_millis(self.general.timeout)
    }

    /// Explicit OCR engine executable, if one is configured.
    pub fn tesseract_path(&self) -> Option<&Path> {
        let raw = self.advanced.tesseract_path.trim();
        (!raw.is_empty()).then(|| Path::new(raw))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
