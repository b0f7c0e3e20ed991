use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use image::imageops::FilterType;

use crate::config::model::{LogoConfig, TextOverlayConfig};
use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult, ReelWarning};
use crate::foundation::math::{mul_div255_u8, premul};
use crate::timeline::scheduler::OutroOverlay;

/// Canvas-sized premultiplied RGBA8 layer composited over the outro background.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayLayer {
    /// Layer width (canvas width).
    pub width: u32,
    /// Layer height (canvas height).
    pub height: u32,
    /// Premultiplied RGBA8 pixels.
    pub rgba8_premul: Vec<u8>,
}

impl OverlayLayer {
    fn transparent(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            rgba8_premul: vec![0u8; canvas.width as usize * canvas.height as usize * 4],
        }
    }

    /// `true` when no pixel has any coverage.
    pub fn is_transparent(&self) -> bool {
        self.rgba8_premul.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Premultiplied source-over of a `w x h` layer placed at `(x, y)`, clipped.
    fn composite(&mut self, src: &[u8], w: u32, h: u32, x: i64, y: i64) {
        let x0 = x.max(0);
        let x1 = (x + i64::from(w)).min(i64::from(self.width));
        let y0 = y.max(0);
        let y1 = (y + i64::from(h)).min(i64::from(self.height));
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let stride = self.width as usize * 4;
        let src_stride = w as usize * 4;
        for dy in y0..y1 {
            let src_row = &src[(dy - y) as usize * src_stride..][..src_stride];
            let dst_row = &mut self.rgba8_premul[dy as usize * stride..][..stride];
            for dx in x0..x1 {
                let s = &src_row[(dx - x) as usize * 4..][..4];
                if s[3] == 0 {
                    continue;
                }
                let inv = 255u16 - u16::from(s[3]);
                let d = &mut dst_row[dx as usize * 4..][..4];
                for c in 0..4 {
                    d[c] = s[c].saturating_add(mul_div255_u8(u16::from(d[c]), inv));
                }
            }
        }
    }
}

/// Outro decoration rasterized once, plus the warnings produced while preparing it.
#[derive(Clone, Debug, Default)]
pub struct PreparedOverlay {
    /// `None` when nothing visible was configured or rendered.
    pub layer: Option<OverlayLayer>,
    /// Non-fatal problems (for example a missing logo).
    pub warnings: Vec<ReelWarning>,
}

/// Rasterize the outro caption and logo into one layer.
///
/// The caption is drawn first and the logo on top of it, both centered on the canvas.
#[tracing::instrument(skip_all, fields(text = overlay.text.is_some(), logo = overlay.logo.is_some()))]
pub fn prepare_overlay(canvas: Canvas, overlay: &OutroOverlay) -> ReelResult<PreparedOverlay> {
    let mut out = PreparedOverlay::default();
    if overlay.is_empty() {
        return Ok(out);
    }

    let mut layer = OverlayLayer::transparent(canvas);

    if let Some(text) = &overlay.text {
        let rgba = rasterize_text(canvas, text)?;
        layer.composite(&rgba, canvas.width, canvas.height, 0, 0);
    }

    if let Some(logo) = &overlay.logo {
        match load_logo(logo) {
            Ok((w, h, rgba)) => {
                let x = (i64::from(canvas.width) - i64::from(w)) / 2;
                let y = (i64::from(canvas.height) - i64::from(h)) / 2;
                layer.composite(&rgba, w, h, x, y);
            }
            Err(e) => {
                let warning = ReelWarning::MissingLogo {
                    path: logo.path.clone(),
                    reason: e.to_string(),
                };
                tracing::warn!("{warning}");
                out.warnings.push(warning);
            }
        }
    }

    if !layer.is_transparent() {
        out.layer = Some(layer);
    }
    Ok(out)
}

/// Centered single-line caption as canvas-sized premultiplied RGBA8.
pub fn rasterize_text(canvas: Canvas, text: &TextOverlayConfig) -> ReelResult<Vec<u8>> {
    let svg = text_svg(canvas, text);
    let opts = usvg::Options {
        fontdb: build_fontdb(text.font_file.as_deref()),
        ..Default::default()
    };
    let tree = usvg::Tree::from_data(svg.as_bytes(), &opts).context("parse outro text svg")?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(canvas.width, canvas.height)
        .ok_or_else(|| ReelError::config("failed to allocate outro text pixmap"))?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::identity(),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap.take())
}

fn text_svg(canvas: Canvas, text: &TextOverlayConfig) -> String {
    let c = text.color;
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            r#"<text x="{cx}" y="{cy}" text-anchor="middle" dominant-baseline="central" "#,
            r##"font-family="sans-serif" font-size="{size}" fill="#{r:02x}{g:02x}{b:02x}">{body}</text>"##,
            "</svg>"
        ),
        w = canvas.width,
        h = canvas.height,
        cx = f64::from(canvas.width) / 2.0,
        cy = f64::from(canvas.height) / 2.0,
        size = text.font_size,
        r = c.r,
        g = c.g,
        b = c.b,
        body = xml_escape(&text.text),
    )
}

fn build_fontdb(font_file: Option<&Path>) -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    if let Some(path) = font_file
        && let Err(e) = db.load_font_file(path)
    {
        tracing::warn!(path = %path.display(), error = %e, "failed to load outro font file");
    }
    db.load_system_fonts();
    Arc::new(db)
}

pub(crate) fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Decode, scale and premultiply the logo. Returns `(width, height, rgba8_premul)`.
fn load_logo(cfg: &LogoConfig) -> ReelResult<(u32, u32, Vec<u8>)> {
    let img = image::open(&cfg.path)
        .map_err(|e| ReelError::decode(&cfg.path, e.to_string()))?
        .to_rgba8();
    let (w, h) = img.dimensions();
    let sw = ((f64::from(w) * cfg.scale).round() as u32).max(1);
    let sh = ((f64::from(h) * cfg.scale).round() as u32).max(1);
    let scaled = if (sw, sh) == (w, h) {
        img
    } else {
        image::imageops::resize(&img, sw, sh, FilterType::CatmullRom)
    };

    let mut rgba = scaled.into_raw();
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3];
        px[0] = premul(px[0], a);
        px[1] = premul(px[1], a);
        px[2] = premul(px[2], a);
    }
    Ok((sw, sh, rgba))
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
