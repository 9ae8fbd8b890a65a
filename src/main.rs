//! Application entry point: Clipboard OCR Tool.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Refuse to run anywhere but Windows (exit 1).
//! 3. Load [`Settings`], creating `config.toml` on first run.
//! 4. Offer or force an elevated relaunch, per `admin_mode`.
//! 5. Probe the OCR engine; if Tesseract is missing, explain and exit.
//! 6. Build the UI queue, the [`ConversionHandler`] and the hotkey binding.
//! 7. Run [`eframe::run_native`]; blocks until the window is closed.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use eframe::egui;

use clipboard_ocr::{
    app::{ClipboardOcrApp, WINDOW_SIZE, WINDOW_TITLE},
    bootstrap::{self, ElevationDecision},
    clipboard::SystemClipboard,
    config::{AppPaths, Settings},
    convert::{ConversionHandler, ConversionOptions},
    dialog,
    hotkey::{self, HotkeyScope},
    ocr::{OcrEngine, TesseractCli},
    privilege,
    ui::UiHandle,
};

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options() -> eframe::NativeOptions {
    let vp = egui::ViewportBuilder::default()
        .with_title(WINDOW_TITLE)
        .with_inner_size(WINDOW_SIZE)
        .with_resizable(false);

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Clipboard OCR Tool starting up");

    match run() {
        Ok(code) => code,
        Err(e) => {
            log::error!("fatal: {e:#}");
            dialog::show_error("Error", &format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    // 2. Platform gate
    if let Err(e) = bootstrap::check_platform() {
        let (title, message) = e.dialog();
        dialog::show_error(title, message);
        return Ok(ExitCode::from(e.exit_code() as u8));
    }

    // 3. Configuration
    let paths = AppPaths::new();
    let loaded = Settings::load_or_create(&paths.settings_file);
    if let Some(issue) = &loaded.issue {
        log::warn!("settings: {issue}; using defaults");
        dialog::show_error(
            bootstrap::CONFIG_ERROR_TITLE,
            &bootstrap::config_issue_message(issue),
        );
    }
    let settings = loaded.settings;

    // 4. Elevation
    let elevated = privilege::is_elevated();
    let decision = bootstrap::decide_elevation(elevated, settings.general.admin_mode, || {
        dialog::ask_yes_no(bootstrap::ELEVATION_TITLE, bootstrap::ELEVATION_PROMPT)
    });
    if decision == ElevationDecision::Relaunch {
        match privilege::relaunch_elevated(std::env::args_os().skip(1)) {
            Ok(()) => {
                log::info!("elevated instance requested, exiting");
                return Ok(ExitCode::SUCCESS);
            }
            Err(e) => log::warn!("elevated relaunch failed ({e:#}); continuing unelevated"),
        }
    }
    let scope = if elevated {
        HotkeyScope::Global
    } else {
        HotkeyScope::Window
    };

    // 5. OCR engine
    let ocr = TesseractCli::new(settings.tesseract_path());
    if let Err(e) = bootstrap::probe_engine(&ocr) {
        log::error!("{e}");
        let (title, message) = e.dialog();
        dialog::show_error(title, message);
        return Ok(ExitCode::from(e.exit_code() as u8));
    }
    let ocr: Arc<dyn OcrEngine> = Arc::new(ocr);

    // 6. Handler and hotkey
    let (ui, ui_rx) = UiHandle::channel();
    let handler = Arc::new(ConversionHandler::new(
        ocr,
        Arc::new(SystemClipboard::new()),
        Arc::new(ui.clone()),
        ConversionOptions::from_settings(&settings, &paths),
    ));

    let trigger_handler = Arc::clone(&handler);
    let trigger: hotkey::Trigger = Arc::new(move || {
        trigger_handler.attempt_conversion();
    });
    let bound = hotkey::bind(&settings.general.hotkey, scope, trigger, &ui);

    // 7. Window (blocks until closed)
    let app = ClipboardOcrApp::new(ui_rx, handler, bound);
    eframe::run_native(
        WINDOW_TITLE,
        native_options(),
        Box::new(move |cc| {
            ui.attach(cc.egui_ctx.clone());
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
    .context("window loop failed")?;

    Ok(ExitCode::SUCCESS)
}
