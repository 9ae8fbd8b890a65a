//! Clipboard OCR window, an egui/eframe application.
//!
//! # Architecture
//!
//! [`ClipboardOcrApp`] is the top-level [`eframe::App`].  It owns:
//!
//! * `ui_rx`: receives [`UiCommand`]s posted by the conversion handler,
//!   from this thread or from the hotkey-dispatch thread.
//! * `handler`: shared with the global hotkey; the button and the window
//!   shortcut call it directly on the UI thread.
//! * `hotkey`: the installed binding, kept alive for the app's lifetime.
//!
//! # Layout
//!
//! | Element | Behaviour |
//! |---------|-----------|
//! | Convert button | Disabled while a conversion runs |
//! | Status label | "Ready", "Processing...", result or error text |
//! | Dialog | One queued error/warning at a time, modal, OK to dismiss |

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use eframe::egui;
use tokio::sync::mpsc;

use crate::convert::ConversionHandler;
use crate::hotkey::BoundHotkey;
use crate::ui::{StatusLine, UiCommand};

/// Window title.
pub const WINDOW_TITLE: &str = "Clipboard OCR Tool";
/// Initial inner size of the window.
pub const WINDOW_SIZE: [f32; 2] = [400.0, 140.0];

// ---------------------------------------------------------------------------
// Dialog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Error,
    Warning,
}

/// A queued modal message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// ClipboardOcrApp
// ---------------------------------------------------------------------------

pub struct ClipboardOcrApp {
    // ── Channels / collaborators ─────────────────────────────────────────
    ui_rx: mpsc::UnboundedReceiver<UiCommand>,
    handler: Arc<ConversionHandler>,
    hotkey: BoundHotkey,

    // ── View state ───────────────────────────────────────────────────────
    status: StatusLine,
    /// Mirrors the handler's busy flag; disables the button.
    busy: bool,
    dialogs: VecDeque<Dialog>,
    button_label: String,
}

impl ClipboardOcrApp {
    pub fn new(
        ui_rx: mpsc::UnboundedReceiver<UiCommand>,
        handler: Arc<ConversionHandler>,
        hotkey: BoundHotkey,
    ) -> Self {
        let button_label = hotkey.button_label();
        Self {
            ui_rx,
            handler,
            hotkey,
            status: StatusLine::new(),
            busy: false,
            dialogs: VecDeque::new(),
            button_label,
        }
    }

    pub fn status_text(&self) -> &str {
        self.status.text()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// The dialog currently shown, if any.
    pub fn current_dialog(&self) -> Option<&Dialog> {
        self.dialogs.front()
    }

    pub fn button_label(&self) -> &str {
        &self.button_label
    }

    // ── Command handling ─────────────────────────────────────────────────

    /// Apply a single command to the view state.
    pub fn apply(&mut self, command: UiCommand, now: Instant) {
        match command {
            UiCommand::SetBusy(busy) => self.busy = busy,
            UiCommand::SetStatus(text) => self.status.set(text),
            UiCommand::ResetStatusAfter { text, delay } => self.status.schedule(text, delay, now),
            UiCommand::ShowError { title, message } => self.dialogs.push_back(Dialog {
                kind: DialogKind::Error,
                title,
                message,
            }),
            UiCommand::ShowWarning { title, message } => self.dialogs.push_back(Dialog {
                kind: DialogKind::Warning,
                title,
                message,
            }),
        }
    }

    /// Drain every pending command, then advance the status timer.
    pub fn drain(&mut self, now: Instant) {
        while let Ok(command) = self.ui_rx.try_recv() {
            self.apply(command, now);
        }
        if self.status.tick(now) {
            log::debug!("ui: status reset to '{}'", self.status.text());
        }
    }

    /// Start a conversion from the button or the window shortcut.
    pub fn trigger(&self) {
        let outcome = self.handler.attempt_conversion();
        log::debug!("ui: conversion outcome {:?}", outcome);
    }

    /// Close the current dialog and reveal the next one.
    pub fn dismiss_dialog(&mut self) {
        self.dialogs.pop_front();
    }

    // ── Rendering ────────────────────────────────────────────────────────

    /// One frame: commands, shortcut, layout, dialogs.
    pub fn show(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        self.drain(now);

        if let Some(delay) = self.status.time_until_reset(now) {
            ctx.request_repaint_after(delay);
        }

        if let Some(shortcut) = self.hotkey.window_shortcut() {
            if ctx.input_mut(|i| i.consume_shortcut(&shortcut)) {
                self.trigger();
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);
                let button = egui::Button::new(self.button_label.as_str())
                    .min_size(egui::vec2(300.0, 36.0));
                if ui.add_enabled(!self.busy, button).clicked() {
                    self.trigger();
                }
                ui.add_space(12.0);
                ui.label(self.status.text());
            });
        });

        self.draw_dialog(ctx);
    }

    fn draw_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = self.dialogs.front() else {
            return;
        };

        let accent = match dialog.kind {
            DialogKind::Error => egui::Color32::from_rgb(220, 80, 80),
            DialogKind::Warning => egui::Color32::from_rgb(230, 160, 60),
        };

        let mut ok = false;
        let response = egui::Modal::new(egui::Id::new("clipboard-ocr-dialog")).show(ctx, |ui| {
            ui.set_min_width(260.0);
            ui.label(egui::RichText::new(dialog.title.as_str()).strong().color(accent));
            ui.add_space(6.0);
            ui.label(dialog.message.as_str());
            ui.add_space(10.0);
            ui.vertical_centered(|ui| {
                ok = ui.button("OK").clicked();
            });
        });

        if ok || response.should_close() {
            self.dismiss_dialog();
        }
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for ClipboardOcrApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("Clipboard OCR Tool closing");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
