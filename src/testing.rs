//! Test doubles shared by the unit tests of several modules.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;
use std::time::Duration;

use image::ColorType;

use crate::clipboard::{ClipboardAccess, ClipboardError, ClipboardImage};
use crate::ocr::{OcrEngine, OcrError};
use crate::ui::{UiCommand, UiSink};

// ---------------------------------------------------------------------------
// MockOcr
// ---------------------------------------------------------------------------

enum Response {
    Text(String),
    Error(Box<dyn Fn() -> OcrError + Send + Sync>),
    Panic,
    Missing,
}

/// Engine double: returns a canned response and records what it was given.
pub struct MockOcr {
    response: Response,
    gate: Option<(Mutex<Sender<()>>, Mutex<Receiver<()>>)>,
    calls: AtomicUsize,
    languages: Mutex<Vec<String>>,
    color_types: Mutex<Vec<ColorType>>,
}

/// Test-side handle of a gated [`MockOcr`].
pub struct OcrGate {
    entered: Mutex<Receiver<()>>,
    release: Mutex<Sender<()>>,
}

impl OcrGate {
    /// Block until the engine has been entered.
    pub fn wait_entered(&self) {
        self.entered
            .lock()
            .unwrap()
            .recv_timeout(Duration::from_secs(5))
            .expect("engine was never entered");
    }

    /// Let the blocked recognition finish.
    pub fn release(&self) {
        self.release.lock().unwrap().send(()).expect("engine gone");
    }
}

impl MockOcr {
    fn with(response: Response) -> Self {
        Self {
            response,
            gate: None,
            calls: AtomicUsize::new(0),
            languages: Mutex::new(Vec::new()),
            color_types: Mutex::new(Vec::new()),
        }
    }

    pub fn ok(text: impl Into<String>) -> Self {
        Self::with(Response::Text(text.into()))
    }

    pub fn err(make: impl Fn() -> OcrError + Send + Sync + 'static) -> Self {
        Self::with(Response::Error(Box::new(make)))
    }

    pub fn panicking() -> Self {
        Self::with(Response::Panic)
    }

    /// Both `recognize` and `version` report a missing engine.
    pub fn missing() -> Self {
        Self::with(Response::Missing)
    }

    /// An engine that blocks inside `recognize` until released.
    pub fn gated(text: impl Into<String>) -> (Self, OcrGate) {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let mut ocr = Self::ok(text);
        ocr.gate = Some((Mutex::new(entered_tx), Mutex::new(release_rx)));
        let gate = OcrGate {
            entered: Mutex::new(entered_rx),
            release: Mutex::new(release_tx),
        };
        (ocr, gate)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn languages(&self) -> Vec<String> {
        self.languages.lock().unwrap().clone()
    }

    /// Colour type of every image file handed to `recognize`.
    pub fn seen_color_types(&self) -> Vec<ColorType> {
        self.color_types.lock().unwrap().clone()
    }

    fn missing_error() -> OcrError {
        OcrError::EngineMissing {
            program: PathBuf::from("tesseract"),
        }
    }
}

impl OcrEngine for MockOcr {
    fn recognize(&self, image: &Path, language: &str) -> Result<String, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.languages.lock().unwrap().push(language.to_string());
        if let Ok(decoded) = image::open(image) {
            self.color_types.lock().unwrap().push(decoded.color());
        }

        if let Some((entered, release)) = &self.gate {
            entered.lock().unwrap().send(()).unwrap();
            release.lock().unwrap().recv().unwrap();
        }

        match &self.response {
            Response::Text(text) => Ok(text.clone()),
            Response::Error(make) => Err(make()),
            Response::Panic => panic!("engine crashed"),
            Response::Missing => Err(Self::missing_error()),
        }
    }

    fn version(&self) -> Result<String, OcrError> {
        match self.response {
            Response::Missing => Err(Self::missing_error()),
            _ => Ok("tesseract 5.3.0".into()),
        }
    }
}

// ---------------------------------------------------------------------------
// MockClipboard
// ---------------------------------------------------------------------------

/// In-memory clipboard.
#[derive(Default)]
pub struct MockClipboard {
    image: Mutex<Option<ClipboardImage>>,
    written: Mutex<Vec<String>>,
    fail_writes: bool,
}

impl MockClipboard {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_image(image: ClipboardImage) -> Self {
        let clipboard = Self::default();
        clipboard.set_image(image);
        clipboard
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn set_image(&self, image: ClipboardImage) {
        *self.image.lock().unwrap() = Some(image);
    }

    pub fn written(&self) -> Vec<String> {
        self.written.lock().unwrap().clone()
    }
}

impl ClipboardAccess for MockClipboard {
    fn read_image(&self) -> Result<Option<ClipboardImage>, ClipboardError> {
        Ok(self.image.lock().unwrap().clone())
    }

    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.fail_writes {
            return Err(ClipboardError::SetText("clipboard locked".into()));
        }
        self.written.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RecordingSink
// ---------------------------------------------------------------------------

/// [`UiSink`] that remembers every command.
#[derive(Default)]
pub struct RecordingSink {
    commands: Mutex<Vec<UiCommand>>,
}

impl RecordingSink {
    pub fn commands(&self) -> Vec<UiCommand> {
        self.commands.lock().unwrap().clone()
    }

    pub fn last_busy(&self) -> Option<bool> {
        self.commands().into_iter().rev().find_map(|c| match c {
            UiCommand::SetBusy(busy) => Some(busy),
            _ => None,
        })
    }

    pub fn last_status(&self) -> Option<String> {
        self.commands().into_iter().rev().find_map(|c| match c {
            UiCommand::SetStatus(text) => Some(text),
            _ => None,
        })
    }

    pub fn warnings(&self) -> Vec<String> {
        self.commands()
            .into_iter()
            .filter_map(|c| match c {
                UiCommand::ShowWarning { message, .. } => Some(message),
                _ => None,
            })
            .collect()
    }
}

impl UiSink for RecordingSink {
    fn post(&self, command: UiCommand) {
        self.commands.lock().unwrap().push(command);
    }
}
