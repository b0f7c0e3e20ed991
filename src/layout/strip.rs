use crate::assets::decode::NormalizedImage;
use crate::foundation::error::{ReelError, ReelResult};

/// One image placed on the strip.
#[derive(Clone, Debug)]
pub struct StripItem {
    /// The normalized image.
    pub image: NormalizedImage,
    /// Left edge relative to the strip origin.
    pub x_offset: i64,
}

impl StripItem {
    /// Image width in pixels.
    pub fn width(&self) -> i64 {
        i64::from(self.image.width)
    }
}

/// Images arranged left to right with a fixed separator between neighbours.
///
/// `x_offset[0] = 0`, `x_offset[i] = x_offset[i-1] + width[i-1] + padding`, and
/// `total_width = sum(width) + padding * (n - 1)` (no trailing separator).
#[derive(Clone, Debug)]
pub struct StripLayout {
    items: Vec<StripItem>,
    padding: u32,
    height: u32,
    total_width: i64,
}

impl StripLayout {
    /// Lay out `images` in the given order.
    ///
    /// All images must share one height (the canvas height).
    pub fn new(images: Vec<NormalizedImage>, padding: u32) -> ReelResult<Self> {
        let Some(first) = images.first() else {
            return Err(ReelError::InsufficientInput {
                found: 0,
                required: 1,
            });
        };
        let height = first.height;
        if let Some(bad) = images.iter().find(|img| img.height != height) {
            return Err(ReelError::config(format!(
                "strip images must share one height: got {} and {height}",
                bad.height
            )));
        }

        let pad = i64::from(padding);
        let mut items = Vec::with_capacity(images.len());
        let mut cursor = 0i64;
        for image in images {
            let w = i64::from(image.width);
            items.push(StripItem {
                image,
                x_offset: cursor,
            });
            cursor += w + pad;
        }
        let total_width = cursor - pad;

        Ok(Self {
            items,
            padding,
            height,
            total_width,
        })
    }

    /// Placed images in strip order.
    pub fn items(&self) -> &[StripItem] {
        &self.items
    }

    /// Number of images.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false`; a layout holds at least one image.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Separator width.
    pub fn padding(&self) -> u32 {
        self.padding
    }

    /// Common image height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Strip width without a trailing separator.
    pub fn total_width(&self) -> i64 {
        self.total_width
    }

    /// Width of the first `n` images including one separator after each.
    pub fn padded_prefix_width(&self, n: usize) -> i64 {
        let pad = i64::from(self.padding);
        self.items.iter().take(n).map(|it| it.width() + pad).sum()
    }

    /// Fail with [`ReelError::InsufficientInput`] when fewer than `required` images are laid out.
    pub fn ensure_at_least(&self, required: usize) -> ReelResult<()> {
        if self.items.len() < required {
            return Err(ReelError::InsufficientInput {
                found: self.items.len(),
                required,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/strip.rs"]
mod tests;
