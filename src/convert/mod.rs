//! Clipboard image → text conversion.
//!
//! # Flow
//!
//! ```text
//! attempt_conversion()
//!   ├─ try_lock busy flag ── held? ──▶ Dropped (no side effects)
//!   └─ Busy
//!        ├─ TempDir (removed on every exit path)
//!        ├─ clipboard.read_image()      ── None ──▶ NoImage
//!        ├─ normalize → RGB, encode PNG
//!        ├─ ocr.recognize(path, lang)   ── ""   ──▶ NoText
//!        ├─ clipboard.write_text()
//!        └─ success status + timed reset to "Ready"
//!      Idle (button re-enabled, lock released), always exactly once
//! ```

pub mod bitmap;
pub mod handler;

pub use handler::{ConversionHandler, ConversionOptions};

use thiserror::Error;

use crate::clipboard::ClipboardError;
use crate::ocr::OcrError;

/// Status shown while a conversion runs.
pub const PROCESSING: &str = "Processing...";
/// Status shown after the text has been placed on the clipboard.
pub const SUCCESS: &str = "Text copied to clipboard!";
/// File name of the bitmap handed to the OCR engine.
pub const TEMP_IMAGE_NAME: &str = "clipboard_image.png";

// ---------------------------------------------------------------------------
// ConversionState
// ---------------------------------------------------------------------------

/// The process-wide busy flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversionState {
    #[default]
    Idle,
    Busy,
}

// ---------------------------------------------------------------------------
// ConversionError
// ---------------------------------------------------------------------------

/// Everything that can go wrong inside a single conversion.
///
/// The display text is shown to the user verbatim.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("No image in clipboard")]
    NoImage,

    #[error("No text extracted")]
    NoText,

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    #[error(transparent)]
    Ocr(#[from] OcrError),

    #[error("could not encode clipboard image: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A collaborator panicked mid-conversion.
    #[error("internal error: {0}")]
    Internal(String),
}

// ---------------------------------------------------------------------------
// AttemptOutcome
// ---------------------------------------------------------------------------

/// What a single call to
/// [`ConversionHandler::attempt_conversion`] ended up doing.
///
/// Trigger sites ignore it; failures have already been shown to the user.
#[derive(Debug)]
pub enum AttemptOutcome {
    /// Another conversion was running; this trigger was discarded.
    Dropped,
    /// The recognised text is now on the clipboard.
    Converted(String),
    /// The conversion failed and an error dialog was queued.
    Failed(ConversionError),
}

impl AttemptOutcome {
    pub fn is_dropped(&self) -> bool {
        matches!(self, Self::Dropped)
    }
}
