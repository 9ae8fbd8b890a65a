//! [`OcrEngine`] implementation that shells out to the `tesseract` CLI.
//!
//! Recognition runs `tesseract <image> stdout -l <language>` and reads the
//! text from stdout.  The executable is either taken from `PATH` or from the
//! `tesseract_path` setting.

use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use super::{OcrEngine, OcrError};

/// Program name looked up on `PATH` when no override is configured.
const DEFAULT_PROGRAM: &str = "tesseract";

/// Production OCR engine backed by the Tesseract command-line tool.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    program: PathBuf,
}

impl TesseractCli {
    /// Use `program` when given, otherwise `tesseract` from `PATH`.
    pub fn new(program: Option<&Path>) -> Self {
        Self {
            program: program
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PROGRAM)),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run the engine with `args` and collect its output.
    fn run<I, S>(&self, args: I) -> Result<Output, OcrError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            // CREATE_NO_WINDOW: no console flashes up for each conversion.
            cmd.creation_flags(0x0800_0000);
        }

        cmd.output().map_err(|e| match e.kind() {
            ErrorKind::NotFound => OcrError::EngineMissing {
                program: self.program.clone(),
            },
            _ => OcrError::Spawn(e),
        })
    }
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new(None)
    }
}

impl OcrEngine for TesseractCli {
    fn recognize(&self, image: &Path, language: &str) -> Result<String, OcrError> {
        let output = self.run([
            image.as_os_str(),
            OsStr::new("stdout"),
            OsStr::new("-l"),
            OsStr::new(language),
        ])?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(OcrError::Recognition(if stderr.is_empty() {
                format!("tesseract exited with {}", output.status)
            } else {
                stderr
            }));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn version(&self) -> Result<String, OcrError> {
        let output = self.run(["--version"])?;

        // Older releases print the banner on stderr.
        let first_line = |bytes: &[u8]| {
            String::from_utf8_lossy(bytes)
                .lines()
                .map(str::trim)
                .find(|l| !l.is_empty())
                .map(str::to_string)
        };

        first_line(&output.stdout)
            .or_else(|| first_line(&output.stderr))
            .ok_or_else(|| OcrError::Recognition("tesseract printed no version".into()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_program_on_path() {
        assert_eq!(TesseractCli::default().program(), Path::new("tesseract"));
    }

    #[test]
    fn override_path_is_used() {
        let cli = TesseractCli::new(Some(Path::new("/opt/tess/bin/tesseract")));
        assert_eq!(cli.program(), Path::new("/opt/tess/bin/tesseract"));
    }

    #[test]
    fn missing_program_is_engine_missing() {
        let cli = TesseractCli::new(Some(Path::new("/nonexistent/dir/tesseract")));

        let err = cli.version().unwrap_err();
        assert!(
            matches!(err, OcrError::EngineMissing { .. }),
            "expected EngineMissing, got: {err:?}"
        );

        let err = cli
            .recognize(Path::new("/nonexistent/image.png"), "eng")
            .unwrap_err();
        assert!(matches!(err, OcrError::EngineMissing { .. }));
    }

    #[test]
    fn engine_missing_display_names_the_program() {
        let e = OcrError::EngineMissing {
            program: PathBuf::from("C:\\Tesseract-OCR\\tesseract.exe"),
        };
        assert!(e.to_string().contains("tesseract.exe"));
    }
}
