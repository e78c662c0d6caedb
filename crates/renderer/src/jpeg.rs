//! JPEG output.
//!
//! JPEG has no alpha channel, so the image is flattened onto the figure
//! background before encoding.

use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, RgbImage, RgbaImage};
use tracing::debug;

use crate::colormap::Color;
use crate::error::{RenderError, RenderResult};

/// Composite `img` over an opaque `background`.
pub fn flatten(img: &RgbaImage, background: Color) -> RgbImage {
    let mut out = RgbImage::new(img.width(), img.height());
    let bg = [background.r, background.g, background.b];
    for (dst, src) in out.pixels_mut().zip(img.pixels()) {
        let a = src[3] as u32;
        for c in 0..3 {
            dst[c] = ((src[c] as u32 * a + bg[c] as u32 * (255 - a) + 127) / 255) as u8;
        }
    }
    out
}

/// Encode to JPEG bytes at `quality` (1-100).
pub fn encode_jpeg(img: &RgbaImage, quality: u8, background: Color) -> RenderResult<Vec<u8>> {
    let rgb = flatten(img, background);
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100)).encode(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ColorType::Rgb8,
    )?;
    Ok(buf)
}

/// Encode and write a JPEG file.
pub fn save_jpeg(path: &Path, img: &RgbaImage, quality: u8, background: Color) -> RenderResult<()> {
    let bytes = encode_jpeg(img, quality, background)?;
    std::fs::write(path, &bytes).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "Wrote JPEG");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_flatten_transparent_takes_background() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0]));
        let rgb = flatten(&img, Color::WHITE);
        assert_eq!(rgb.get_pixel(0, 0).0, [255, 255, 255]);
    }

    #[test]
    fn test_encode_has_jpeg_magic() {
        let img = RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 255]));
        let bytes = encode_jpeg(&img, 90, Color::WHITE).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }
}
