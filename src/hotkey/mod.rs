//! Hotkey combinations and their two bindings.
//!
//! # Design
//!
//! A [`Hotkey`] is parsed once from the `hotkey` setting
//! (`"ctrl+alt+v"`-style) and then bound in one of two ways, chosen at
//! startup by [`binder::bind`]:
//!
//! * **Elevated**: a system-wide `rdev` hook on a dedicated OS thread
//!   ([`GlobalHotkey`]).  Fires whichever window has focus.
//! * **Unelevated**: an [`egui::KeyboardShortcut`] that the window consumes
//!   in its update loop.  Fires only while the window has focus.
//!
//! # Usage
//!
//! ```
//! use clipboard_ocr::hotkey::Hotkey;
//!
//! let hk = Hotkey::parse("Ctrl + Alt + V").unwrap();
//! assert_eq!(hk.to_string(), "ctrl+alt+v");
//! assert!(Hotkey::parse("ctrl+alt").is_err());
//! ```

pub mod binder;
pub mod listener;

pub use binder::{bind, BoundHotkey, HotkeyBinding, HotkeyScope, Trigger};
pub use listener::{ComboMatcher, GlobalHotkey};

use std::fmt;

use eframe::egui;
use thiserror::Error;

/// Combination used when the configured one is malformed.
pub const DEFAULT_HOTKEY: &str = "ctrl+alt+v";

// ---------------------------------------------------------------------------
// HotkeyError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HotkeyError {
    #[error("hotkey is empty")]
    Empty,

    #[error("empty key name in '{0}'")]
    EmptyToken(String),

    #[error("unknown key '{0}'")]
    UnknownKey(String),

    #[error("no main key, only modifiers")]
    MissingKey,

    #[error("more than one main key: '{0}' and '{1}'")]
    MultipleKeys(String, String),

    #[error("the Win key only works as a system-wide hotkey")]
    WindowsKeyUnsupported,
}

// ---------------------------------------------------------------------------
// Modifiers / KeyCode
// ---------------------------------------------------------------------------

/// Which modifiers must be held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    /// The Windows / Super key.
    pub meta: bool,
}

/// The non-modifier key of a combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// `'a'..='z'`
    Letter(char),
    /// `0..=9`
    Digit(u8),
    /// `1..=12`
    Function(u8),
    Space,
    Enter,
    Tab,
    Escape,
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
}

impl KeyCode {
    fn parse(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return match c {
                'a'..='z' => Some(Self::Letter(c)),
                '0'..='9' => Some(Self::Digit(c as u8 - b'0')),
                _ => None,
            };
        }

        if let Some(n) = token.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
            return (1..=12).contains(&n).then_some(Self::Function(n));
        }

        match token {
            "space" => Some(Self::Space),
            "enter" | "return" => Some(Self::Enter),
            "tab" => Some(Self::Tab),
            "esc" | "escape" => Some(Self::Escape),
            "insert" | "ins" => Some(Self::Insert),
            "delete" | "del" => Some(Self::Delete),
            "home" => Some(Self::Home),
            "end" => Some(Self::End),
            "pageup" | "page_up" => Some(Self::PageUp),
            "pagedown" | "page_down" => Some(Self::PageDown),
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    fn name(&self) -> String {
        match self {
            Self::Letter(c) => c.to_string(),
            Self::Digit(d) => d.to_string(),
            Self::Function(n) => format!("f{n}"),
            Self::Space => "space".into(),
            Self::Enter => "enter".into(),
            Self::Tab => "tab".into(),
            Self::Escape => "esc".into(),
            Self::Insert => "insert".into(),
            Self::Delete => "delete".into(),
            Self::Home => "home".into(),
            Self::End => "end".into(),
            Self::PageUp => "pageup".into(),
            Self::PageDown => "pagedown".into(),
            Self::Up => "up".into(),
            Self::Down => "down".into(),
            Self::Left => "left".into(),
            Self::Right => "right".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Hotkey
// ---------------------------------------------------------------------------

/// A parsed key combination: modifiers plus exactly one main key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotkey {
    pub modifiers: Modifiers,
    pub key: KeyCode,
}

impl Default for Hotkey {
    /// Ctrl+Alt+V.
    fn default() -> Self {
        Self {
            modifiers: Modifiers {
                ctrl: true,
                alt: true,
                ..Modifiers::default()
            },
            key: KeyCode::Letter('v'),
        }
    }
}

impl Hotkey {
    /// Parse a `+`-separated combination.  Case and surrounding whitespace
    /// are ignored.
    pub fn parse(combo: &str) -> Result<Self, HotkeyError> {
        let normalized = combo.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(HotkeyError::Empty);
        }

        let mut modifiers = Modifiers::default();
        let mut key: Option<(KeyCode, String)> = None;

        for token in normalized.split('+').map(str::trim) {
            match token {
                "" => return Err(HotkeyError::EmptyToken(combo.to_string())),
                "ctrl" | "control" => modifiers.ctrl = true,
                "alt" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                "win" | "windows" | "meta" | "super" | "cmd" => modifiers.meta = true,
                other => {
                    let code = KeyCode::parse(other)
                        .ok_or_else(|| HotkeyError::UnknownKey(other.to_string()))?;
                    if let Some((_, first)) = &key {
                        return Err(HotkeyError::MultipleKeys(first.clone(), other.to_string()));
                    }
                    key = Some((code, other.to_string()));
                }
            }
        }

        let (key, _) = key.ok_or(HotkeyError::MissingKey)?;
        Ok(Self { modifiers, key })
    }

    /// Upper-case form for labels, e.g. `"CTRL+ALT+V"`.
    pub fn label(&self) -> String {
        self.to_string().to_uppercase()
    }

    /// The main key as an `rdev` key.
    pub fn rdev_key(&self) -> rdev::Key {
        use rdev::Key as K;
        const LETTERS: [K; 26] = [
            K::KeyA, K::KeyB, K::KeyC, K::KeyD, K::KeyE, K::KeyF, K::KeyG, K::KeyH, K::KeyI,
            K::KeyJ, K::KeyK, K::KeyL, K::KeyM, K::KeyN, K::KeyO, K::KeyP, K::KeyQ, K::KeyR,
            K::KeyS, K::KeyT, K::KeyU, K::KeyV, K::KeyW, K::KeyX, K::KeyY, K::KeyZ,
        ];
        const DIGITS: [K; 10] = [
            K::Num0, K::Num1, K::Num2, K::Num3, K::Num4, K::Num5, K::Num6, K::Num7, K::Num8,
            K::Num9,
        ];
        const FUNCTION: [K; 12] = [
            K::F1, K::F2, K::F3, K::F4, K::F5, K::F6, K::F7, K::F8, K::F9, K::F10, K::F11, K::F12,
        ];

        match self.key {
            KeyCode::Letter(c) => LETTERS[(c as u8 - b'a') as usize],
            KeyCode::Digit(d) => DIGITS[d as usize],
            KeyCode::Function(n) => FUNCTION[(n - 1) as usize],
            KeyCode::Space => K::Space,
            KeyCode::Enter => K::Return,
            KeyCode::Tab => K::Tab,
            KeyCode::Escape => K::Escape,
            KeyCode::Insert => K::Insert,
            KeyCode::Delete => K::Delete,
            KeyCode::Home => K::Home,
            KeyCode::End => K::End,
            KeyCode::PageUp => K::PageUp,
            KeyCode::PageDown => K::PageDown,
            KeyCode::Up => K::UpArrow,
            KeyCode::Down => K::DownArrow,
            KeyCode::Left => K::LeftArrow,
            KeyCode::Right => K::RightArrow,
        }
    }

    /// The combination as a window-local egui shortcut.
    ///
    /// egui has no portable Win-key modifier, so combinations using it are
    /// rejected here.
    pub fn egui_shortcut(&self) -> Result<egui::KeyboardShortcut, HotkeyError> {
        if self.modifiers.meta {
            return Err(HotkeyError::WindowsKeyUnsupported);
        }

        use egui::Key as K;
        const LETTERS: [K; 26] = [
            K::A, K::B, K::C, K::D, K::E, K::F, K::G, K::H, K::I, K::J, K::K, K::L, K::M, K::N,
            K::O, K::P, K::Q, K::R, K::S, K::T, K::U, K::V, K::W, K::X, K::Y, K::Z,
        ];
        const DIGITS: [K; 10] = [
            K::Num0, K::Num1, K::Num2, K::Num3, K::Num4, K::Num5, K::Num6, K::Num7, K::Num8,
            K::Num9,
        ];
        const FUNCTION: [K; 12] = [
            K::F1, K::F2, K::F3, K::F4, K::F5, K::F6, K::F7, K::F8, K::F9, K::F10, K::F11, K::F12,
        ];

        let key = match self.key {
            KeyCode::Letter(c) => LETTERS[(c as u8 - b'a') as usize],
            KeyCode::Digit(d) => DIGITS[d as usize],
            KeyCode::Function(n) => FUNCTION[(n - 1) as usize],
            KeyCode::Space => K::Space,
            KeyCode::Enter => K::Enter,
            KeyCode::Tab => K::Tab,
            KeyCode::Escape => K::Escape,
            KeyCode::Insert => K::Insert,
            KeyCode::Delete => K::Delete,
            KeyCode::Home => K::Home,
            KeyCode::End => K::End,
            KeyCode::PageUp => K::PageUp,
            KeyCode::PageDown => K::PageDown,
            KeyCode::Up => K::ArrowUp,
            KeyCode::Down => K::ArrowDown,
            KeyCode::Left => K::ArrowLeft,
            KeyCode::Right => K::ArrowRight,
        };

        let modifiers = egui::Modifiers {
            alt: self.modifiers.alt,
            ctrl: self.modifiers.ctrl,
            shift: self.modifiers.shift,
            mac_cmd: false,
            command: self.modifiers.ctrl,
        };
        Ok(egui::KeyboardShortcut::new(modifiers, key))
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.modifiers;
        for (held, name) in [(m.ctrl, "ctrl"), (m.alt, "alt"), (m.shift, "shift"), (m.meta, "win")] {
            if held {
                write!(f, "{name}+")?;
            }
        }
        f.write_str(&self.key.name())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_combo() {
        let hk = Hotkey::parse(DEFAULT_HOTKEY).unwrap();
        assert_eq!(hk, Hotkey::default());
        assert_eq!(hk.rdev_key(), rdev::Key::KeyV);
    }

    #[test]
    fn parse_is_case_and_space_insensitive() {
        let hk = Hotkey::parse("  Shift + CTRL +f5 ").unwrap();
        assert!(hk.modifiers.ctrl && hk.modifiers.shift && !hk.modifiers.alt);
        assert_eq!(hk.key, KeyCode::Function(5));
        assert_eq!(hk.to_string(), "ctrl+shift+f5");
    }

    #[test]
    fn parse_named_and_digit_keys() {
        assert_eq!(Hotkey::parse("alt+space").unwrap().key, KeyCode::Space);
        assert_eq!(Hotkey::parse("ctrl+return").unwrap().key, KeyCode::Enter);
        assert_eq!(Hotkey::parse("ctrl+7").unwrap().key, KeyCode::Digit(7));
        assert_eq!(Hotkey::parse("f12").unwrap().rdev_key(), rdev::Key::F12);
        assert_eq!(Hotkey::parse("win+pagedown").unwrap().rdev_key(), rdev::Key::PageDown);
    }

    #[test]
    fn malformed_combos_are_rejected() {
        assert_eq!(Hotkey::parse(""), Err(HotkeyError::Empty));
        assert_eq!(Hotkey::parse("   "), Err(HotkeyError::Empty));
        assert!(matches!(Hotkey::parse("ctrl++v"), Err(HotkeyError::EmptyToken(_))));
        assert!(matches!(Hotkey::parse("ctrl+alt+"), Err(HotkeyError::EmptyToken(_))));
        assert_eq!(
            Hotkey::parse("ctrl+banana"),
            Err(HotkeyError::UnknownKey("banana".into()))
        );
        assert_eq!(Hotkey::parse("ctrl+alt"), Err(HotkeyError::MissingKey));
        assert_eq!(
            Hotkey::parse("a+b"),
            Err(HotkeyError::MultipleKeys("a".into(), "b".into()))
        );
        assert!(matches!(Hotkey::parse("ctrl+f13"), Err(HotkeyError::UnknownKey(_))));
        assert!(matches!(Hotkey::parse("<Control-v>"), Err(_)));
    }

    #[test]
    fn label_is_upper_case() {
        assert_eq!(Hotkey::default().label(), "CTRL+ALT+V");
    }

    #[test]
    fn egui_shortcut_matches_combo() {
        let shortcut = Hotkey::default().egui_shortcut().unwrap();
        assert_eq!(shortcut.logical_key, egui::Key::V);
        assert!(shortcut.modifiers.ctrl && shortcut.modifiers.alt && !shortcut.modifiers.shift);
    }

    #[test]
    fn egui_shortcut_rejects_win_key() {
        let hk = Hotkey::parse("win+o").unwrap();
        assert_eq!(hk.egui_shortcut(), Err(HotkeyError::WindowsKeyUnsupported));
    }
}
