use crate::assets::decode::NormalizedImage;
use crate::foundation::core::Rgb8;
use crate::foundation::math::{Fnv1a64, over_premul};

/// One output frame: opaque RGB8, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRgb {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 3` bytes.
    pub data: Vec<u8>,
}

impl FrameRgb {
    /// Allocate a black frame.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; width as usize * height as usize * 3],
        }
    }

    /// Allocate a frame filled with `color`.
    pub fn filled(width: u32, height: u32, color: Rgb8) -> Self {
        let mut f = Self::new(width, height);
        f.fill(color);
        f
    }

    fn stride(&self) -> usize {
        self.width as usize * 3
    }

    /// Paint every pixel with `color`.
    pub fn fill(&mut self, color: Rgb8) {
        let stride = self.stride();
        if stride == 0 || self.height == 0 {
            return;
        }
        for px in self.data[..stride].chunks_exact_mut(3) {
            px.copy_from_slice(&color.to_array());
        }
        for y in 1..self.height as usize {
            self.data.copy_within(0..stride, y * stride);
        }
    }

    /// Paint the full-height column band `[x, x + w)`, clipped to the frame.
    pub fn fill_columns(&mut self, x: i64, w: i64, color: Rgb8) {
        let x0 = x.max(0);
        let x1 = (x + w).min(i64::from(self.width));
        if x0 >= x1 {
            return;
        }
        let (x0, x1) = (x0 as usize * 3, x1 as usize * 3);
        let stride = self.stride();
        let rgb = color.to_array();
        for row in self.data.chunks_exact_mut(stride) {
            for px in row[x0..x1].chunks_exact_mut(3) {
                px.copy_from_slice(&rgb);
            }
        }
    }

    /// Copy `img` with its top-left corner at `(x, y)`. Parts outside the frame are clipped.
    pub fn blit(&mut self, img: &NormalizedImage, x: i64, y: i64) {
        let fw = i64::from(self.width);
        let fh = i64::from(self.height);
        let x0 = x.max(0);
        let x1 = (x + i64::from(img.width)).min(fw);
        let y0 = y.max(0);
        let y1 = (y + i64::from(img.height)).min(fh);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let stride = self.stride();
        let src_x0 = (x0 - x) as usize * 3;
        let src_x1 = (x1 - x) as usize * 3;
        let dst_x0 = x0 as usize * 3;
        let dst_x1 = x1 as usize * 3;
        for dy in y0..y1 {
            let src = img.row((dy - y) as u32);
            let row_start = dy as usize * stride;
            self.data[row_start + dst_x0..row_start + dst_x1]
                .copy_from_slice(&src[src_x0..src_x1]);
        }
    }

    /// Composite a premultiplied RGBA8 layer of `w x h` with its top-left at `(x, y)`.
    pub fn blend_premul_rgba(&mut self, rgba8_premul: &[u8], w: u32, h: u32, x: i64, y: i64) {
        debug_assert_eq!(rgba8_premul.len(), w as usize * h as usize * 4);
        let x0 = x.max(0);
        let x1 = (x + i64::from(w)).min(i64::from(self.width));
        let y0 = y.max(0);
        let y1 = (y + i64::from(h)).min(i64::from(self.height));
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let stride = self.stride();
        let src_stride = w as usize * 4;
        for dy in y0..y1 {
            let src_row = &rgba8_premul[(dy - y) as usize * src_stride..][..src_stride];
            let dst_row = &mut self.data[dy as usize * stride..][..stride];
            for dx in x0..x1 {
                let s = &src_row[(dx - x) as usize * 4..][..4];
                let a = s[3];
                if a == 0 {
                    continue;
                }
                let d = &mut dst_row[dx as usize * 3..][..3];
                d[0] = over_premul(d[0], s[0], a);
                d[1] = over_premul(d[1], s[1], a);
                d[2] = over_premul(d[2], s[2], a);
            }
        }
    }

    /// Overwrite this frame with `other` (same dimensions).
    pub fn copy_from(&mut self, other: &FrameRgb) {
        self.width = other.width;
        self.height = other.height;
        self.data.clear();
        self.data.extend_from_slice(&other.data);
    }

    /// Pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = (y as usize * self.width as usize + x as usize) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Stable 64-bit digest of dimensions and pixels.
    pub fn digest(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_u32(self.width);
        h.write_u32(self.height);
        h.write_bytes(&self.data);
        h.finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
