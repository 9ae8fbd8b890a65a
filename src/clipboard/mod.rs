//! Clipboard access: read the current image, write plain text back.
//!
//! [`ClipboardAccess`] is the seam the conversion handler depends on.
//! [`SystemClipboard`] is the `arboard`-backed implementation; tests use an
//! in-memory double.

pub mod system;

pub use system::SystemClipboard;

use image::{DynamicImage, Rgb, RgbImage};
use thiserror::Error;

// ---------------------------------------------------------------------------
// ClipboardError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ClipboardError {
    /// Could not open or read the system clipboard.
    #[error("cannot access clipboard: {0}")]
    Access(String),

    /// Could not write text to the system clipboard.
    #[error("cannot set clipboard text: {0}")]
    SetText(String),

    /// The clipboard reported an image whose buffer does not match its size.
    #[error("clipboard image is malformed: {0}")]
    MalformedImage(String),
}

// ---------------------------------------------------------------------------
// ClipboardImage
// ---------------------------------------------------------------------------

/// An image taken from the clipboard, before pixel-format normalisation.
#[derive(Debug, Clone)]
pub enum ClipboardImage {
    /// Decoded pixels in whatever layout the source provided.
    Pixels(DynamicImage),
    /// Palette-indexed pixels.
    Indexed(IndexedImage),
}

/// A palette-indexed bitmap: one palette index per pixel, row-major.
///
/// Palette entries are RGBA; the alpha channel carries per-entry
/// transparency and is discarded on conversion to RGB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    width: u32,
    height: u32,
    palette: Vec<[u8; 4]>,
    indices: Vec<u8>,
}

impl IndexedImage {
    /// Build an indexed image, validating the buffer length and every index.
    pub fn new(
        width: u32,
        height: u32,
        palette: Vec<[u8; 4]>,
        indices: Vec<u8>,
    ) -> Result<Self, ClipboardError> {
        let expected = width as usize * height as usize;
        if indices.len() != expected {
            return Err(ClipboardError::MalformedImage(format!(
                "{} indices for a {width}x{height} image",
                indices.len()
            )));
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= palette.len()) {
            return Err(ClipboardError::MalformedImage(format!(
                "palette index {bad} out of range ({} entries)",
                palette.len()
            )));
        }
        Ok(Self {
            width,
            height,
            palette,
            indices,
        })
    }

    /// Expand the palette into a plain 3-channel image.
    pub fn to_rgb(&self) -> RgbImage {
        let width = self.width as usize;
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let idx = self.indices[y as usize * width + x as usize] as usize;
            let [r, g, b, _] = self.palette[idx];
            Rgb([r, g, b])
        })
    }
}

// ---------------------------------------------------------------------------
// ClipboardAccess
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe clipboard interface.
pub trait ClipboardAccess: Send + Sync {
    /// The current clipboard image, or `Ok(None)` when it holds no image.
    fn read_image(&self) -> Result<Option<ClipboardImage>, ClipboardError>;

    /// Replace the clipboard contents with `text`.
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    const PALETTE: [[u8; 4]; 2] = [[255, 0, 0, 255], [0, 0, 255, 0]];

    #[test]
    fn indexed_expands_to_rgb() {
        let img = IndexedImage::new(2, 1, PALETTE.to_vec(), vec![0, 1]).unwrap();
        let rgb = img.to_rgb();

        assert_eq!(rgb.dimensions(), (2, 1));
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([255, 0, 0]));
        // Transparent palette entry keeps its colour, loses its alpha.
        assert_eq!(rgb.get_pixel(1, 0), &Rgb([0, 0, 255]));
    }

    #[test]
    fn indexed_rows_are_laid_out_by_width() {
        let palette = vec![[0, 0, 0, 255], [10, 20, 30, 255], [40, 50, 60, 255]];
        let img = IndexedImage::new(3, 2, palette, vec![0, 0, 0, 0, 2, 1]).unwrap();
        let rgb = img.to_rgb();

        assert_eq!(rgb.get_pixel(0, 1), &Rgb([0, 0, 0]));
        assert_eq!(rgb.get_pixel(1, 1), &Rgb([40, 50, 60]));
        assert_eq!(rgb.get_pixel(2, 1), &Rgb([10, 20, 30]));
    }

    #[test]
    fn indexed_rejects_wrong_length() {
        let err = IndexedImage::new(2, 2, PALETTE.to_vec(), vec![0, 1, 0]).unwrap_err();
        assert!(matches!(err, ClipboardError::MalformedImage(_)));
    }

    #[test]
    fn indexed_rejects_out_of_range_index() {
        let err = IndexedImage::new(1, 1, PALETTE.to_vec(), vec![7]).unwrap_err();
        assert!(err.to_string().contains("palette index 7"));
    }

    #[test]
    fn box_dyn_clipboard_access_compiles() {
        fn _takes(_: Box<dyn ClipboardAccess>) {}
    }
}
