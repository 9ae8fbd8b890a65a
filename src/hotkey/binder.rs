//! Choose and install the hotkey binding at startup.

use std::sync::Arc;

use eframe::egui;

use super::{GlobalHotkey, Hotkey, HotkeyError, DEFAULT_HOTKEY};
use crate::ui::{UiCommand, UiSink};

/// Callback run on every hotkey match; starts a conversion attempt.
pub type Trigger = Arc<dyn Fn() + Send + Sync>;

/// Title of the warning shown when the configured combination is unusable.
pub const INVALID_HOTKEY_TITLE: &str = "Hotkey Error";

/// How far the hotkey reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyScope {
    /// System-wide; requires elevation.
    Global,
    /// Only while the app window has focus.
    Window,
}

pub enum HotkeyBinding {
    Global(GlobalHotkey),
    /// Consumed by the window's update loop.
    Window(egui::KeyboardShortcut),
    /// Even the default combination could not be installed.
    Unbound,
}

/// The installed binding plus the combination it actually uses.
pub struct BoundHotkey {
    pub hotkey: Hotkey,
    pub binding: HotkeyBinding,
}

impl BoundHotkey {
    pub fn window_shortcut(&self) -> Option<egui::KeyboardShortcut> {
        match &self.binding {
            HotkeyBinding::Window(shortcut) => Some(*shortcut),
            _ => None,
        }
    }

    /// Button caption, e.g. `"Convert Image to Text (CTRL+ALT+V)"`.
    pub fn button_label(&self) -> String {
        format!("Convert Image to Text ({})", self.hotkey.label())
    }
}

/// Message of the invalid-hotkey warning.
pub fn invalid_hotkey_message(combo: &str) -> String {
    format!("Invalid hotkey '{combo}'\nUsing default Ctrl+Alt+V")
}

/// Parse `combo` and check that it can be bound in `scope`.
///
/// On failure the default combination is returned together with the reason.
pub fn resolve(combo: &str, scope: HotkeyScope) -> (Hotkey, Option<HotkeyError>) {
    let checked = Hotkey::parse(combo).and_then(|hotkey| {
        if scope == HotkeyScope::Window {
            hotkey.egui_shortcut()?;
        }
        Ok(hotkey)
    });

    match checked {
        Ok(hotkey) => (hotkey, None),
        Err(e) => (Hotkey::default(), Some(e)),
    }
}

/// Install `combo` in `scope`, falling back to Ctrl+Alt+V with a single
/// warning posted to `ui` if the combination is malformed or cannot be
/// registered.
pub fn bind(combo: &str, scope: HotkeyScope, trigger: Trigger, ui: &dyn UiSink) -> BoundHotkey {
    let (hotkey, problem) = resolve(combo, scope);
    let mut warned = false;
    let mut warn = |reason: String| {
        log::warn!("hotkey '{combo}' unusable ({reason}); falling back to {DEFAULT_HOTKEY}");
        if !warned {
            warned = true;
            ui.post(UiCommand::warning(
                INVALID_HOTKEY_TITLE,
                invalid_hotkey_message(combo),
            ));
        }
    };

    if let Some(e) = &problem {
        warn(e.to_string());
    }

    match install(hotkey, scope, Arc::clone(&trigger)) {
        Ok(binding) => BoundHotkey { hotkey, binding },
        Err(e) if hotkey != Hotkey::default() => {
            warn(e.to_string());
            let fallback = Hotkey::default();
            let binding = install(fallback, scope, trigger).unwrap_or_else(|e| {
                log::error!("default hotkey could not be installed: {e}");
                HotkeyBinding::Unbound
            });
            BoundHotkey {
                hotkey: fallback,
                binding,
            }
        }
        Err(e) => {
            log::error!("default hotkey could not be installed: {e}");
            BoundHotkey {
                hotkey,
                binding: HotkeyBinding::Unbound,
            }
        }
    }
}

fn install(hotkey: Hotkey, scope: HotkeyScope, trigger: Trigger) -> Result<HotkeyBinding, BindError> {
    match scope {
        HotkeyScope::Global => Ok(HotkeyBinding::Global(GlobalHotkey::start(hotkey, trigger)?)),
        HotkeyScope::Window => {
            let shortcut = hotkey.egui_shortcut()?;
            log::info!("window hotkey {hotkey} registered");
            Ok(HotkeyBinding::Window(shortcut))
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum BindError {
    #[error(transparent)]
    Hotkey(#[from] HotkeyError),
    #[error("could not start hotkey listener: {0}")]
    Listener(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingSink;

    fn noop() -> Trigger {
        Arc::new(|| {})
    }

    #[test]
    fn valid_combo_binds_without_warning() {
        let ui = RecordingSink::default();
        let bound = bind("ctrl+shift+o", HotkeyScope::Window, noop(), &ui);

        assert_eq!(bound.hotkey, Hotkey::parse("ctrl+shift+o").unwrap());
        let shortcut = bound.window_shortcut().unwrap();
        assert_eq!(shortcut.logical_key, egui::Key::O);
        assert!(ui.warnings().is_empty());
        assert_eq!(bound.button_label(), "Convert Image to Text (CTRL+SHIFT+O)");
    }

    #[test]
    fn malformed_combo_falls_back_with_one_warning() {
        let ui = RecordingSink::default();
        let bound = bind("ctrl+alt+nope", HotkeyScope::Window, noop(), &ui);

        assert_eq!(bound.hotkey, Hotkey::default());
        assert!(bound.window_shortcut().is_some());
        assert_eq!(
            ui.warnings(),
            vec!["Invalid hotkey 'ctrl+alt+nope'\nUsing default Ctrl+Alt+V".to_string()]
        );
        assert_eq!(
            ui.commands(),
            vec![UiCommand::warning(
                INVALID_HOTKEY_TITLE,
                invalid_hotkey_message("ctrl+alt+nope")
            )]
        );
    }

    #[test]
    fn win_key_in_window_scope_falls_back() {
        let ui = RecordingSink::default();
        let bound = bind("win+o", HotkeyScope::Window, noop(), &ui);

        assert_eq!(bound.hotkey, Hotkey::default());
        assert_eq!(ui.warnings().len(), 1);
        assert_eq!(bound.button_label(), "Convert Image to Text (CTRL+ALT+V)");
    }

    #[test]
    fn resolve_accepts_win_key_globally() {
        let (hotkey, problem) = resolve("win+o", HotkeyScope::Global);
        assert!(problem.is_none());
        assert!(hotkey.modifiers.meta);
    }

    #[test]
    fn resolve_reports_reason() {
        let (hotkey, problem) = resolve("", HotkeyScope::Global);
        assert_eq!(hotkey, Hotkey::default());
        assert_eq!(problem, Some(HotkeyError::Empty));
    }
}
