//! Elevation check and relaunch.
//!
//! A system-wide keyboard hook needs administrator rights on Windows.  The
//! process can only ask for them by starting a new copy of itself through
//! the `runas` shell verb; the caller then exits.

use std::ffi::{OsStr, OsString};

/// Whether the current process runs with administrator rights.
#[cfg(windows)]
pub fn is_elevated() -> bool {
    // SAFETY: no arguments, only reads the process token.
    unsafe { windows::Win32::UI::Shell::IsUserAnAdmin().as_bool() }
}

#[cfg(not(windows))]
pub fn is_elevated() -> bool {
    false
}

/// Join the forwarded arguments into one parameter string.
///
/// Arguments are separated by single spaces without quoting, so an argument
/// that itself contains a space arrives split in two.  Arguments that are
/// not valid Unicode are passed through unchanged.
pub fn join_args<I, S>(args: I) -> OsString
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut joined = OsString::new();
    for (i, arg) in args.into_iter().enumerate() {
        if i > 0 {
            joined.push(" ");
        }
        joined.push(arg);
    }
    joined
}

/// Start an elevated copy of this executable with `args`.
///
/// Returns once the request has been handed to the shell; the UAC prompt and
/// the new process are out of our hands from then on.
#[cfg(windows)]
pub fn relaunch_elevated<I, S>(args: I) -> anyhow::Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    use std::os::windows::ffi::OsStrExt;

    use anyhow::Context;
    use windows::core::PCWSTR;
    use windows::Win32::UI::Shell::ShellExecuteW;
    use windows::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;

    fn wide(s: &OsStr) -> Vec<u16> {
        s.encode_wide().chain(std::iter::once(0)).collect()
    }

    let exe = std::env::current_exe().context("could not locate own executable")?;
    let params = join_args(args);
    log::info!(
        "relaunching elevated: {} {}",
        exe.display(),
        params.to_string_lossy()
    );

    let verb = wide(OsStr::new("runas"));
    let file = wide(exe.as_os_str());
    let params = wide(&params);

    // SAFETY: every string is NUL-terminated and outlives the call.
    let instance = unsafe {
        ShellExecuteW(
            None,
            PCWSTR(verb.as_ptr()),
            PCWSTR(file.as_ptr()),
            PCWSTR(params.as_ptr()),
            PCWSTR::null(),
            SW_SHOWNORMAL,
        )
    };

    // Values up to 32 are error codes (including a cancelled UAC prompt).
    let code = instance.0 as isize;
    if code <= 32 {
        anyhow::bail!("ShellExecuteW(runas) failed with code {code}");
    }
    Ok(())
}

#[cfg(not(windows))]
pub fn relaunch_elevated<I, S>(args: I) -> anyhow::Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let _ = join_args(args);
    anyhow::bail!("elevated relaunch is only available on Windows")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_joined_with_single_spaces() {
        assert_eq!(join_args(["--verbose", "extra"]), "--verbose extra");
        assert_eq!(join_args(Vec::<String>::new()), "");
    }

    #[test]
    fn spaces_inside_arguments_are_not_quoted() {
        assert_eq!(join_args(["a b", "c"]), "a b c");
    }

    #[cfg(unix)]
    #[test]
    fn non_unicode_arguments_are_forwarded() {
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"caf\xff");
        let joined = join_args([OsStr::new("--name"), raw]);
        assert_eq!(joined.as_bytes(), b"--name caf\xff");
    }

    #[cfg(not(windows))]
    #[test]
    fn never_elevated_off_windows() {
        assert!(!is_elevated());
        assert!(relaunch_elevated(["x"]).is_err());
    }
}
