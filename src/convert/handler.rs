//! The single-flight conversion handler.
//!
//! [`ConversionHandler::attempt_conversion`] may be called from the UI thread
//! (button, window shortcut) and from the hotkey-dispatch thread at the same
//! time.  A non-blocking `try_lock` on the busy flag lets exactly one of them
//! through; the others return [`AttemptOutcome::Dropped`] without touching
//! anything.
//!
//! The handler never touches egui directly.  Every visible change goes
//! through the [`UiSink`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tempfile::TempDir;

use crate::clipboard::ClipboardAccess;
use crate::config::{AppPaths, Settings};
use crate::ocr::OcrEngine;
use crate::ui::{UiCommand, UiSink, READY};

use super::bitmap::{encode_png, normalize};
use super::{AttemptOutcome, ConversionError, ConversionState, PROCESSING, SUCCESS, TEMP_IMAGE_NAME};

// ---------------------------------------------------------------------------
// ConversionOptions
// ---------------------------------------------------------------------------

/// The slice of [`Settings`] the handler needs.
#[derive(Debug, Clone)]
pub struct ConversionOptions {
    /// Tesseract language code passed on every call.
    pub language: String,
    /// How long the success message stays before reverting to "Ready".
    pub status_reset_delay: Duration,
    /// Where to keep a copy of each encoded image; `None` keeps nothing.
    pub retain_dir: Option<PathBuf>,
    /// Parent for the scoped temp dir; `None` uses the system temp dir.
    pub temp_root: Option<PathBuf>,
}

impl ConversionOptions {
    pub fn from_settings(settings: &Settings, paths: &AppPaths) -> Self {
        Self {
            language: settings.general.language.clone(),
            status_reset_delay: settings.status_reset_delay(),
            retain_dir: settings
                .advanced
                .save_temp_images
                .then(|| paths.captures_dir.clone()),
            temp_root: None,
        }
    }
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default(), &AppPaths::new())
    }
}

// ---------------------------------------------------------------------------
// BusyGuard
// ---------------------------------------------------------------------------

/// Holds the busy lock for the duration of one conversion.
///
/// Dropping it (on success, error or unwind) flips the state back to
/// `Idle`, re-enables the button and then releases the lock.
struct BusyGuard<'a> {
    state: MutexGuard<'a, ConversionState>,
    ui: &'a dyn UiSink,
}

impl<'a> BusyGuard<'a> {
    fn enter(mut state: MutexGuard<'a, ConversionState>, ui: &'a dyn UiSink) -> Self {
        *state = ConversionState::Busy;
        ui.post(UiCommand::SetBusy(true));
        Self { state, ui }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        *self.state = ConversionState::Idle;
        self.ui.post(UiCommand::SetBusy(false));
    }
}

// ---------------------------------------------------------------------------
// ConversionHandler
// ---------------------------------------------------------------------------

/// Clipboard image → OCR → clipboard text, at most one at a time.
///
/// Share it as `Arc<ConversionHandler>` between the UI and the hotkey
/// binding.
pub struct ConversionHandler {
    state: Mutex<ConversionState>,
    ocr: Arc<dyn OcrEngine>,
    clipboard: Arc<dyn ClipboardAccess>,
    ui: Arc<dyn UiSink>,
    options: ConversionOptions,
}

impl ConversionHandler {
    pub fn new(
        ocr: Arc<dyn OcrEngine>,
        clipboard: Arc<dyn ClipboardAccess>,
        ui: Arc<dyn UiSink>,
        options: ConversionOptions,
    ) -> Self {
        Self {
            state: Mutex::new(ConversionState::Idle),
            ocr,
            clipboard,
            ui,
            options,
        }
    }

    /// Current busy flag.  A lock held by a running conversion reads `Busy`.
    pub fn state(&self) -> ConversionState {
        match self.state.try_lock() {
            Ok(state) => *state,
            Err(TryLockError::Poisoned(poisoned)) => *poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => ConversionState::Busy,
        }
    }

    /// Run one conversion, unless one is already in progress.
    ///
    /// Never panics on conversion failure and never propagates an error:
    /// failures are logged and shown to the user as an error dialog.
    pub fn attempt_conversion(&self) -> AttemptOutcome {
        let state = match self.state.try_lock() {
            Ok(state) => state,
            // Poisoned only by a panic outside `convert`; the guard reset it to Idle.
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => {
                log::debug!("convert: busy, trigger dropped");
                return AttemptOutcome::Dropped;
            }
        };

        let _busy = BusyGuard::enter(state, self.ui.as_ref());
        self.ui.post(UiCommand::status(PROCESSING));

        // A panicking collaborator is reported like any other failure.
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.convert()))
            .unwrap_or_else(|payload| Err(ConversionError::Internal(panic_message(payload.as_ref()))));

        match result {
            Ok(text) => {
                log::info!("convert: copied {} chars to clipboard", text.chars().count());
                self.ui.post(UiCommand::status(SUCCESS));
                self.ui.post(UiCommand::ResetStatusAfter {
                    text: READY.to_string(),
                    delay: self.options.status_reset_delay,
                });
                AttemptOutcome::Converted(text)
            }
            Err(e) => {
                log::error!("convert: {e}");
                self.ui.post(UiCommand::status(READY));
                self.ui.post(UiCommand::error("Error", e.to_string()));
                AttemptOutcome::Failed(e)
            }
        }
    }

    /// The work performed while `Busy`.
    fn convert(&self) -> Result<String, ConversionError> {
        // Removed when it goes out of scope, whichever way this returns.
        let scratch = self.scratch_dir()?;

        let image = self
            .clipboard
            .read_image()?
            .ok_or(ConversionError::NoImage)?;

        let rgb = normalize(image);
        let image_path = scratch.path().join(TEMP_IMAGE_NAME);
        encode_png(&rgb, &image_path)?;
        self.retain_copy(&image_path);

        let text = self
            .ocr
            .recognize(&image_path, &self.options.language)?
            .trim()
            .to_string();
        if text.is_empty() {
            return Err(ConversionError::NoText);
        }

        self.clipboard.write_text(&text)?;
        Ok(text)
    }

    fn scratch_dir(&self) -> std::io::Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("clipboard-ocr-");
        match &self.options.temp_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
    }

    /// Copy the encoded image into the captures dir when retention is on.
    /// Failures are logged and never fail the conversion.
    fn retain_copy(&self, image_path: &std::path::Path) {
        let Some(dir) = &self.options.retain_dir else {
            return;
        };

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let target = dir.join(format!("capture-{millis}.png"));

        let result = std::fs::create_dir_all(dir).and_then(|_| std::fs::copy(image_path, &target));
        match result {
            Ok(_) => log::debug!("convert: kept {}", target.display()),
            Err(e) => log::warn!("convert: could not keep {}: {e}", target.display()),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
