//! Native message boxes for startup, before the window exists.
//!
//! Once eframe runs, dialogs go through [`crate::ui::UiCommand`] instead.
//! Off Windows these only log.

#[cfg(windows)]
mod native {
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;

    use windows::core::PCWSTR;
    use windows::Win32::UI::WindowsAndMessaging::{
        MessageBoxW, IDYES, MB_ICONERROR, MB_ICONQUESTION, MB_OK, MB_SETFOREGROUND,
        MB_YESNO, MESSAGEBOX_RESULT, MESSAGEBOX_STYLE,
    };

    fn wide(s: &str) -> Vec<u16> {
        OsStr::new(s).encode_wide().chain(std::iter::once(0)).collect()
    }

    fn message_box(title: &str, text: &str, style: MESSAGEBOX_STYLE) -> MESSAGEBOX_RESULT {
        let text = wide(text);
        let title = wide(title);
        // SAFETY: both buffers are NUL-terminated and live across the call.
        unsafe {
            MessageBoxW(
                None,
                PCWSTR(text.as_ptr()),
                PCWSTR(title.as_ptr()),
                style | MB_SETFOREGROUND,
            )
        }
    }

    pub fn show_error(title: &str, text: &str) {
        message_box(title, text, MB_OK | MB_ICONERROR);
    }

    pub fn ask_yes_no(title: &str, text: &str) -> bool {
        message_box(title, text, MB_YESNO | MB_ICONQUESTION) == IDYES
    }
}

#[cfg(not(windows))]
mod native {
    pub fn show_error(title: &str, text: &str) {
        log::error!("{title}: {text}");
    }

    /// No way to ask; treated as "no".
    pub fn ask_yes_no(title: &str, text: &str) -> bool {
        log::info!("{title}: {text} (answered no)");
        false
    }
}

pub use native::{ask_yes_no, show_error};
