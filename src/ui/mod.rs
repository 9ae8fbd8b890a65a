//! Cross-thread UI command queue.
//!
//! egui state may only be touched from the UI thread, but conversions can
//! run on the hotkey-dispatch thread.  Everything that wants to change what
//! the window shows posts a [`UiCommand`] through a [`UiSink`]; the eframe
//! app drains the queue at the start of every frame.
//!
//! ```text
//! ConversionHandler ──post()──▶ UiHandle ──mpsc──▶ ClipboardOcrApp::update()
//!                                  └── ctx.request_repaint()
//! ```

pub mod status;

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;

pub use status::{StatusLine, READY};

// ---------------------------------------------------------------------------
// UiCommand
// ---------------------------------------------------------------------------

/// A single UI mutation, applied on the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    /// Disable (`true`) or re-enable (`false`) the convert button.
    SetBusy(bool),
    /// Replace the status text, cancelling any pending reset.
    SetStatus(String),
    /// Replace the status text with `text` once `delay` has elapsed.
    ResetStatusAfter { text: String, delay: Duration },
    /// Queue a modal error dialog.
    ShowError { title: String, message: String },
    /// Queue a modal warning dialog.
    ShowWarning { title: String, message: String },
}

impl UiCommand {
    pub fn status(text: impl Into<String>) -> Self {
        Self::SetStatus(text.into())
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ShowError {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ShowWarning {
            title: title.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// UiSink
// ---------------------------------------------------------------------------

/// Anything that accepts [`UiCommand`]s from an arbitrary thread.
pub trait UiSink: Send + Sync {
    fn post(&self, command: UiCommand);
}

// ---------------------------------------------------------------------------
// UiHandle
// ---------------------------------------------------------------------------

/// Production [`UiSink`]: an unbounded channel into the eframe app.
///
/// The egui context is attached once the window exists; until then commands
/// are simply buffered and picked up on the first frame.
#[derive(Clone)]
pub struct UiHandle {
    tx: mpsc::UnboundedSender<UiCommand>,
    ctx: Arc<OnceLock<egui::Context>>,
}

impl UiHandle {
    /// Create a handle and the receiver the app drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<UiCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = Self {
            tx,
            ctx: Arc::new(OnceLock::new()),
        };
        (handle, rx)
    }

    /// Attach the egui context so posts from other threads wake the UI.
    pub fn attach(&self, ctx: egui::Context) {
        let _ = self.ctx.set(ctx);
    }
}

impl UiSink for UiHandle {
    fn post(&self, command: UiCommand) {
        if self.tx.send(command).is_err() {
            // Window already closed; nothing left to update.
            log::debug!("ui: dropped command, receiver gone");
            return;
        }
        if let Some(ctx) = self.ctx.get() {
            ctx.request_repaint();
        }
    }
}
