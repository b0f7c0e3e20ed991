use std::path::Path;
use std::sync::Arc;

use image::imageops::FilterType;

use crate::foundation::error::{ReelError, ReelResult};

/// Source image rescaled to the canvas height.
///
/// Pixels are opaque RGB8, row-major, tightly packed. The buffer is shared so the strip, the
/// entry animation and the scroll phase can all hold the same image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedImage {
    /// Width in canvas pixels.
    pub width: u32,
    /// Always the canvas height.
    pub height: u32,
    /// RGB8 pixels.
    pub rgb8: Arc<Vec<u8>>,
}

impl NormalizedImage {
    /// Wrap an already-normalized RGB buffer.
    pub fn from_rgb8(width: u32, height: u32, rgb8: Vec<u8>) -> ReelResult<Self> {
        if width == 0 || height == 0 {
            return Err(ReelError::config("image width/height must be non-zero"));
        }
        if rgb8.len() != width as usize * height as usize * 3 {
            return Err(ReelError::config(format!(
                "rgb8 buffer length {} does not match {width}x{height}",
                rgb8.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgb8: Arc::new(rgb8),
        })
    }

    /// One row of pixels.
    pub(crate) fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * 3;
        let start = y as usize * stride;
        &self.rgb8[start..start + stride]
    }
}

/// Width after scaling `natural_w x natural_h` to `target_h`, rounded to nearest (min 1).
pub fn scaled_width(natural_w: u32, natural_h: u32, target_h: u32) -> u32 {
    if natural_h == 0 {
        return 1;
    }
    let num = u64::from(natural_w) * u64::from(target_h);
    let den = u64::from(natural_h);
    let w = (2 * num + den) / (2 * den);
    w.clamp(1, u64::from(u32::MAX)) as u32
}

/// Decode encoded image bytes and rescale to `target_h`, preserving aspect ratio.
///
/// Any alpha channel is dropped; the strip is opaque RGB.
pub fn decode_image(bytes: &[u8], target_h: u32) -> ReelResult<NormalizedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| ReelError::decode("", format!("decode image from memory: {e}")))?;
    normalize_rgb(dyn_img.to_rgb8(), target_h)
}

/// Read and decode an image file. IO and decoder failures both map to
/// [`ReelError::Decode`] carrying `path`.
pub fn decode_image_file(path: &Path, target_h: u32) -> ReelResult<NormalizedImage> {
    let bytes = std::fs::read(path)
        .map_err(|e| ReelError::decode(path, format!("read image bytes: {e}")))?;
    decode_image(&bytes, target_h).map_err(|e| match e {
        ReelError::Decode { message, .. } => ReelError::decode(path, message),
        other => other,
    })
}

fn normalize_rgb(rgb: image::RgbImage, target_h: u32) -> ReelResult<NormalizedImage> {
    if target_h == 0 {
        return Err(ReelError::config("target height must be non-zero"));
    }
    let (w, h) = rgb.dimensions();
    if w == 0 || h == 0 {
        return Err(ReelError::decode("", "image has zero width or height"));
    }

    let new_w = scaled_width(w, h, target_h);
    let scaled = if new_w == w && h == target_h {
        rgb
    } else {
        image::imageops::resize(&rgb, new_w, target_h, FilterType::CatmullRom)
    };

    NormalizedImage::from_rgb8(new_w, target_h, scaled.into_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
