//! Pixel-format normalisation and PNG encoding for the OCR hand-off.

use std::path::Path;

use image::{DynamicImage, ImageFormat, ImageResult, RgbImage};

use crate::clipboard::ClipboardImage;

/// Flatten any clipboard image to 8-bit, 3-channel RGB.
///
/// Alpha and palette layouts are converted; alpha is dropped rather than
/// composited.  Images that are already RGB8 pass through untouched.
pub fn normalize(image: ClipboardImage) -> RgbImage {
    match image {
        ClipboardImage::Indexed(indexed) => indexed.to_rgb(),
        ClipboardImage::Pixels(DynamicImage::ImageRgb8(rgb)) => rgb,
        ClipboardImage::Pixels(other) => other.to_rgb8(),
    }
}

/// Write `image` to `path` as a lossless PNG.
pub fn encode_png(image: &RgbImage, path: &Path) -> ImageResult<()> {
    image.save_with_format(path, ImageFormat::Png)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::IndexedImage;
    use image::{ColorType, GrayAlphaImage, LumaA, Rgb, Rgba, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn rgba_loses_alpha() {
        let rgba = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 0]));
        let rgb = normalize(ClipboardImage::Pixels(DynamicImage::ImageRgba8(rgba)));

        assert_eq!(rgb.dimensions(), (3, 2));
        assert_eq!(rgb.get_pixel(2, 1), &Rgb([10, 20, 30]));
    }

    #[test]
    fn luma_alpha_becomes_grey_rgb() {
        let la = GrayAlphaImage::from_pixel(1, 1, LumaA([128, 40]));
        let rgb = normalize(ClipboardImage::Pixels(DynamicImage::ImageLumaA8(la)));
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([128, 128, 128]));
    }

    #[test]
    fn rgb_passes_through() {
        let src = RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]));
        let rgb = normalize(ClipboardImage::Pixels(DynamicImage::ImageRgb8(src.clone())));
        assert_eq!(rgb, src);
    }

    /// A palette image on disk must come back as plain 3-channel RGB.
    #[test]
    fn indexed_image_is_encoded_as_three_channel_png() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("out.png");

        let palette = vec![[0, 0, 0, 255], [255, 255, 255, 0]];
        let indexed = IndexedImage::new(2, 2, palette, vec![0, 1, 1, 0]).unwrap();

        encode_png(&normalize(ClipboardImage::Indexed(indexed)), &path).expect("encode");

        let decoded = image::open(&path).expect("decode");
        assert_eq!(decoded.color(), ColorType::Rgb8);
        assert!(!decoded.color().has_alpha());
        assert_eq!(decoded.to_rgb8().get_pixel(1, 0), &Rgb([255, 255, 255]));
    }
}
