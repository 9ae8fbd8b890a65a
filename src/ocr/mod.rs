//! OCR engine interface.
//!
//! [`OcrEngine`] is object-safe and `Send + Sync` so the conversion handler
//! can hold it behind an `Arc<dyn OcrEngine>`.  The production
//! implementation, [`TesseractCli`], drives the `tesseract` executable.

pub mod tesseract;

pub use tesseract::TesseractCli;

use std::path::{Path, PathBuf};

use thiserror::Error;

// ---------------------------------------------------------------------------
// OcrError
// ---------------------------------------------------------------------------

/// Errors from the OCR subsystem.
///
/// [`OcrError::EngineMissing`] is kept apart from recognition failures: it
/// means the app cannot work at all and the user has to install something.
#[derive(Debug, Error)]
pub enum OcrError {
    /// The engine executable could not be found.
    #[error("Tesseract OCR not found at '{}'", program.display())]
    EngineMissing { program: PathBuf },

    /// The engine could not be started for a reason other than being absent.
    #[error("could not start Tesseract: {0}")]
    Spawn(#[source] std::io::Error),

    /// The engine ran but reported a failure.
    #[error("{0}")]
    Recognition(String),
}

// ---------------------------------------------------------------------------
// OcrEngine trait
// ---------------------------------------------------------------------------

/// Converts a bitmap on disk into text.
pub trait OcrEngine: Send + Sync {
    /// Recognise the text in the image at `image` using `language`
    /// (a Tesseract language code such as `"eng"`).
    ///
    /// The returned text is untrimmed.
    fn recognize(&self, image: &Path, language: &str) -> Result<String, OcrError>;

    /// Report the engine version; used once at startup as a presence probe.
    fn version(&self) -> Result<String, OcrError>;
}

// Compile-time assertion: Box<dyn OcrEngine> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn OcrEngine>) {}
};
