//! [`ClipboardAccess`] backed by the `arboard` crate.
//!
//! Every call opens a short-lived [`arboard::Clipboard`] handle instead of
//! sharing one, because the handle is not `Send` on all platforms and is
//! cheap to create.

use arboard::Clipboard;
use image::{DynamicImage, RgbaImage};

use super::{ClipboardAccess, ClipboardError, ClipboardImage};

/// The OS clipboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl ClipboardAccess for SystemClipboard {
    /// arboard always hands images over as 8-bit RGBA.
    fn read_image(&self) -> Result<Option<ClipboardImage>, ClipboardError> {
        let mut clipboard = open_clipboard()?;
        let data = match clipboard.get_image() {
            Ok(data) => data,
            // Empty, text-only or otherwise non-image clipboard.
            Err(arboard::Error::ContentNotAvailable) => return Ok(None),
            Err(e) => return Err(ClipboardError::Access(e.to_string())),
        };

        let (width, height) = (data.width as u32, data.height as u32);
        let rgba = RgbaImage::from_raw(width, height, data.bytes.into_owned()).ok_or_else(|| {
            ClipboardError::MalformedImage(format!("buffer does not fit {width}x{height} RGBA"))
        })?;

        Ok(Some(ClipboardImage::Pixels(DynamicImage::ImageRgba8(rgba))))
    }

    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = open_clipboard()?;
        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::SetText(e.to_string()))
    }
}

/// Open an `arboard::Clipboard` handle, mapping the error to [`ClipboardError`].
fn open_clipboard() -> Result<Clipboard, ClipboardError> {
    Clipboard::new().map_err(|e| ClipboardError::Access(e.to_string()))
}
