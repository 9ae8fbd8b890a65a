//! Startup decisions that run before the window exists.
//!
//! Each step is a small function so `main` reads as a straight sequence:
//! platform gate, settings, elevation, OCR probe.  The functions that only
//! decide (no dialogs, no process control) are unit tested here.

use thiserror::Error;

use crate::config::{AdminMode, ConfigError};
use crate::ocr::{OcrEngine, OcrError};

pub const UNSUPPORTED_PLATFORM_TITLE: &str = "Unsupported Platform";
pub const UNSUPPORTED_PLATFORM_MESSAGE: &str = "This application only supports Windows";

pub const CONFIG_ERROR_TITLE: &str = "Config Error";

pub const ELEVATION_TITLE: &str = "Admin Rights";
pub const ELEVATION_PROMPT: &str =
    "Run with admin privileges for system-wide shortcuts?\n(Cancel will use window-only shortcuts)";

pub const ENGINE_MISSING_TITLE: &str = "OCR Engine Missing";
pub const ENGINE_MISSING_MESSAGE: &str = "Tesseract OCR not found.\n\
     1. Install from https://github.com/UB-Mannheim/tesseract/wiki\n\
     2. Set tesseract_path in config.toml if needed";

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("This application only supports Windows")]
    UnsupportedPlatform,

    #[error(transparent)]
    EngineMissing(OcrError),
}

impl BootstrapError {
    /// Process exit code for a startup that stops here.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnsupportedPlatform => 1,
            Self::EngineMissing(_) => 0,
        }
    }

    /// Title and body of the dialog shown before exiting.
    pub fn dialog(&self) -> (&'static str, &'static str) {
        match self {
            Self::UnsupportedPlatform => (UNSUPPORTED_PLATFORM_TITLE, UNSUPPORTED_PLATFORM_MESSAGE),
            Self::EngineMissing(_) => (ENGINE_MISSING_TITLE, ENGINE_MISSING_MESSAGE),
        }
    }
}

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

pub fn check_platform() -> Result<(), BootstrapError> {
    if cfg!(windows) {
        Ok(())
    } else {
        Err(BootstrapError::UnsupportedPlatform)
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Body of the "Config Error" dialog for a settings problem.
pub fn config_issue_message(issue: &ConfigError) -> String {
    match issue {
        ConfigError::Write { source, .. } => format!("Could not create config.toml:\n{source}"),
        other => format!("{other}\nUsing default settings"),
    }
}

// ---------------------------------------------------------------------------
// Elevation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevationDecision {
    /// Keep running in this process.
    Continue,
    /// Start an elevated copy and exit.
    Relaunch,
}

/// Decide whether to relaunch elevated.
///
/// `ask` is only called for an unelevated process under [`AdminMode::Ask`].
pub fn decide_elevation(
    elevated: bool,
    mode: AdminMode,
    ask: impl FnOnce() -> bool,
) -> ElevationDecision {
    if elevated {
        return ElevationDecision::Continue;
    }
    match mode {
        AdminMode::Always => ElevationDecision::Relaunch,
        AdminMode::Ask if ask() => ElevationDecision::Relaunch,
        AdminMode::Ask | AdminMode::Never => ElevationDecision::Continue,
    }
}

// ---------------------------------------------------------------------------
// OCR probe
// ---------------------------------------------------------------------------

/// Check that the OCR engine can be started.
///
/// Only a missing engine stops startup.  Any other probe failure is logged
/// and left for the first conversion to report.
pub fn probe_engine(engine: &dyn OcrEngine) -> Result<(), BootstrapError> {
    match engine.version() {
        Ok(version) => {
            log::info!("OCR engine: {version}");
            Ok(())
        }
        Err(e @ OcrError::EngineMissing { .. }) => Err(BootstrapError::EngineMissing(e)),
        Err(e) => {
            log::warn!("OCR engine probe failed: {e}");
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
