//! Clipboard OCR Tool: turn the image on the clipboard into text on the
//! clipboard, from a button or a hotkey.

pub mod app;
pub mod bootstrap;
pub mod clipboard;
pub mod config;
pub mod convert;
pub mod dialog;
pub mod hotkey;
pub mod ocr;
pub mod privilege;
pub mod ui;

#[cfg(test)]
pub mod testing;
