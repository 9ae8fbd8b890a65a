//! System-wide hotkey built on `rdev::listen`.
//!
//! Two dedicated OS threads:
//!
//! * `hotkey-listener` runs the blocking `rdev::listen` hook and feeds every
//!   key event to a [`ComboMatcher`].
//! * `hotkey-dispatch` waits for matches and runs the trigger (a conversion)
//!   synchronously.
//!
//! They are joined by a zero-capacity channel used with `try_send`: a match
//! only gets through while the dispatch thread is idle in `recv`, so presses
//! during a running conversion are dropped rather than queued.
//!
//! # Shutdown caveat
//!
//! `rdev::listen` has **no graceful shutdown API**.  Dropping
//! [`GlobalHotkey`] sets a stop flag so further events are ignored, but the
//! listener thread stays blocked in the hook until the process exits.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc, Arc,
};

use super::{Hotkey, Trigger};

// ---------------------------------------------------------------------------
// ComboMatcher
// ---------------------------------------------------------------------------

/// Tracks held modifier keys and recognises the configured combination.
///
/// Fires once per physical press of the main key; auto-repeat while it is
/// held does not fire again.
#[derive(Debug, Clone)]
pub struct ComboMatcher {
    hotkey: Hotkey,
    main: rdev::Key,
    /// Bit per physical modifier key, see [`modifier_bit`].
    held: u8,
    main_down: bool,
}

const CTRL_BITS: u8 = 0b0000_0011;
const ALT_BITS: u8 = 0b0000_1100;
const SHIFT_BITS: u8 = 0b0011_0000;
const META_BITS: u8 = 0b1100_0000;

fn modifier_bit(key: rdev::Key) -> Option<u8> {
    use rdev::Key as K;
    match key {
        K::ControlLeft => Some(0b0000_0001),
        K::ControlRight => Some(0b0000_0010),
        K::Alt => Some(0b0000_0100),
        K::AltGr => Some(0b0000_1000),
        K::ShiftLeft => Some(0b0001_0000),
        K::ShiftRight => Some(0b0010_0000),
        K::MetaLeft => Some(0b0100_0000),
        K::MetaRight => Some(0b1000_0000),
        _ => None,
    }
}

impl ComboMatcher {
    pub fn new(hotkey: Hotkey) -> Self {
        Self {
            hotkey,
            main: hotkey.rdev_key(),
            held: 0,
            main_down: false,
        }
    }

    fn modifiers_match(&self) -> bool {
        let m = &self.hotkey.modifiers;
        (self.held & CTRL_BITS != 0) == m.ctrl
            && (self.held & ALT_BITS != 0) == m.alt
            && (self.held & SHIFT_BITS != 0) == m.shift
            && (self.held & META_BITS != 0) == m.meta
    }

    /// Feed one event; returns `true` when the combination was just pressed.
    pub fn on_event(&mut self, event: &rdev::EventType) -> bool {
        match *event {
            rdev::EventType::KeyPress(key) => {
                if let Some(bit) = modifier_bit(key) {
                    self.held |= bit;
                    return false;
                }
                if key != self.main || self.main_down {
                    return false;
                }
                self.main_down = true;
                self.modifiers_match()
            }
            rdev::EventType::KeyRelease(key) => {
                if let Some(bit) = modifier_bit(key) {
                    self.held &= !bit;
                } else if key == self.main {
                    self.main_down = false;
                }
                false
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// GlobalHotkey
// ---------------------------------------------------------------------------

/// Handle to a running system-wide hotkey.
///
/// Drop it to stop reacting to the combination.
pub struct GlobalHotkey {
    /// Shared stop flag, set `true` on [`Drop`].
    stop: Arc<AtomicBool>,
    /// Kept so the threads are not detached prematurely; never joined because
    /// `rdev::listen` never returns.
    _listener: std::thread::JoinHandle<()>,
    _dispatch: std::thread::JoinHandle<()>,
}

impl GlobalHotkey {
    /// Spawn the listener and dispatch threads for `hotkey`.
    ///
    /// # Errors
    ///
    /// Returns the OS error if either thread cannot be created.  A hook that
    /// fails later (e.g. missing privileges) is logged by the listener thread.
    pub fn start(hotkey: Hotkey, trigger: Trigger) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::sync_channel::<()>(0);

        let dispatch = std::thread::Builder::new()
            .name("hotkey-dispatch".into())
            .spawn(move || {
                // Ends when the listener side (and its sender) goes away.
                while rx.recv().is_ok() {
                    trigger();
                }
            })?;

        let stop_flag = Arc::clone(&stop);
        let listener = std::thread::Builder::new()
            .name("hotkey-listener".into())
            .spawn(move || {
                let mut matcher = ComboMatcher::new(hotkey);
                let result = rdev::listen(move |event| {
                    if stop_flag.load(Ordering::Relaxed) {
                        return;
                    }
                    if matcher.on_event(&event.event_type) {
                        match tx.try_send(()) {
                            Ok(()) => {}
                            Err(mpsc::TrySendError::Full(())) => {
                                log::debug!("hotkey-listener: conversion running, press dropped");
                            }
                            Err(mpsc::TrySendError::Disconnected(())) => {}
                        }
                    }
                });

                if let Err(e) = result {
                    log::error!("hotkey-listener: rdev::listen exited with error: {:?}", e);
                }
            })?;

        log::info!("global hotkey {hotkey} registered");
        Ok(Self {
            stop,
            _listener: listener,
            _dispatch: dispatch,
        })
    }
}

impl Drop for GlobalHotkey {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rdev::EventType::{KeyPress, KeyRelease};
    use rdev::Key;

    fn default_matcher() -> ComboMatcher {
        ComboMatcher::new(Hotkey::default())
    }

    #[test]
    fn fires_on_full_combo() {
        let mut m = default_matcher();
        assert!(!m.on_event(&KeyPress(Key::ControlLeft)));
        assert!(!m.on_event(&KeyPress(Key::Alt)));
        assert!(m.on_event(&KeyPress(Key::KeyV)));
    }

    #[test]
    fn does_not_fire_without_all_modifiers() {
        let mut m = default_matcher();
        m.on_event(&KeyPress(Key::ControlLeft));
        assert!(!m.on_event(&KeyPress(Key::KeyV)));
    }

    #[test]
    fn extra_modifier_blocks_match() {
        let mut m = default_matcher();
        m.on_event(&KeyPress(Key::ControlLeft));
        m.on_event(&KeyPress(Key::Alt));
        m.on_event(&KeyPress(Key::ShiftLeft));
        assert!(!m.on_event(&KeyPress(Key::KeyV)));
    }

    #[test]
    fn auto_repeat_fires_once() {
        let mut m = default_matcher();
        m.on_event(&KeyPress(Key::ControlRight));
        m.on_event(&KeyPress(Key::Alt));
        assert!(m.on_event(&KeyPress(Key::KeyV)));
        assert!(!m.on_event(&KeyPress(Key::KeyV)));
        assert!(!m.on_event(&KeyPress(Key::KeyV)));

        m.on_event(&KeyRelease(Key::KeyV));
        assert!(m.on_event(&KeyPress(Key::KeyV)));
    }

    #[test]
    fn releasing_one_of_two_ctrl_keys_keeps_ctrl_held() {
        let mut m = default_matcher();
        m.on_event(&KeyPress(Key::ControlLeft));
        m.on_event(&KeyPress(Key::ControlRight));
        m.on_event(&KeyPress(Key::Alt));
        m.on_event(&KeyRelease(Key::ControlLeft));
        assert!(m.on_event(&KeyPress(Key::KeyV)));
    }

    #[test]
    fn released_modifier_no_longer_counts() {
        let mut m = default_matcher();
        m.on_event(&KeyPress(Key::ControlLeft));
        m.on_event(&KeyPress(Key::Alt));
        m.on_event(&KeyRelease(Key::Alt));
        assert!(!m.on_event(&KeyPress(Key::KeyV)));
    }

    #[test]
    fn plain_function_key() {
        let mut m = ComboMatcher::new(Hotkey::parse("f9").unwrap());
        assert!(m.on_event(&KeyPress(Key::F9)));
        assert!(!m.on_event(&KeyPress(Key::F10)));
    }
}
