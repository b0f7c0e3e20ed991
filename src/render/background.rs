use crate::assets::decode::NormalizedImage;
use crate::foundation::core::{Canvas, Rgb8};

use super::frame::FrameRgb;

/// Canvas holding every entry image that has finished sliding in.
///
/// Baking consumes the accumulator and returns the grown one, so an image can only be added
/// after its own slide is complete.
#[derive(Clone, Debug)]
pub struct BackgroundAccumulator {
    frame: FrameRgb,
    baked: usize,
}

impl BackgroundAccumulator {
    /// Empty canvas in the background color.
    pub fn new(canvas: Canvas, background: Rgb8) -> Self {
        Self {
            frame: FrameRgb::filled(canvas.width, canvas.height, background),
            baked: 0,
        }
    }

    /// Draw `image` at its resting position `(x, 0)` followed by its separator.
    pub fn bake(mut self, image: &NormalizedImage, x: i64, padding: u32, pad_color: Rgb8) -> Self {
        self.frame.blit(image, x, 0);
        self.frame
            .fill_columns(x + i64::from(image.width), i64::from(padding), pad_color);
        self.baked += 1;
        self
    }

    /// Accumulated pixels.
    pub fn frame(&self) -> &FrameRgb {
        &self.frame
    }

    /// Number of images baked so far.
    pub fn baked(&self) -> usize {
        self.baked
    }
}
