use crate::foundation::core::Rgb8;
use crate::layout::strip::StripLayout;
use crate::timeline::scheduler::{ENTRY_IMAGES, EntryDirection, FramePosition, Timeline};

use super::background::BackgroundAccumulator;
use super::frame::FrameRgb;
use super::overlay::OverlayLayer;

/// Colors the compositor paints with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameStyle {
    /// Uncovered canvas pixels.
    pub background: Rgb8,
    /// Separator columns.
    pub pad_color: Rgb8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cursor {
    Intro { frame: u64 },
    Entry { image: usize, frame: u64 },
    Scroll { step: u64 },
    Outro { frame: u64 },
    Done,
}

/// Vertical offset of an entry image on `frame` of its slide.
///
/// Frame 0 sits fully off-canvas (`+H` from the bottom, `-H` from the top) and the last frame
/// rests at `y = 0`, so baking the image in leaves it where the slide ended.
pub fn entry_offset_y(
    direction: EntryDirection,
    frame: u64,
    frames_per_image: u64,
    height: u32,
) -> i64 {
    let h = i64::from(height);
    let progress = if frames_per_image <= 1 {
        0.0
    } else {
        (frame as f64 / (frames_per_image - 1) as f64).min(1.0)
    };
    let travel = (progress * h as f64).floor() as i64;
    match direction {
        EntryDirection::Bottom => h - travel,
        EntryDirection::Top => travel - h,
    }
}

/// Left edge of the strip on scroll step `step`.
pub fn scroll_origin_x(x_base: i64, step: u64, pixels_per_frame: f64) -> i64 {
    (x_base as f64 - step as f64 * pixels_per_frame).floor() as i64
}

/// Phase state machine producing the frames of one timeline in order.
///
/// Transitions always run `Intro -> Entry -> Scroll -> Outro`; a phase with zero frames is
/// passed through but still performs its setup (entry images are baked even when no entry
/// frame is emitted).
pub struct Compositor<'a> {
    layout: &'a StripLayout,
    timeline: &'a Timeline,
    style: FrameStyle,
    overlay: Option<&'a OverlayLayer>,
    cursor: Cursor,
    accumulator: Option<BackgroundAccumulator>,
    outro_frame: Option<FrameRgb>,
    emitted: u64,
}

impl<'a> Compositor<'a> {
    /// Start at the first intro frame.
    pub fn new(
        layout: &'a StripLayout,
        timeline: &'a Timeline,
        style: FrameStyle,
        overlay: Option<&'a OverlayLayer>,
    ) -> Self {
        Self {
            layout,
            timeline,
            style,
            overlay,
            cursor: Cursor::Intro { frame: 0 },
            accumulator: None,
            outro_frame: None,
            emitted: 0,
        }
    }

    /// Frames produced so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// `true` once the last outro frame has been produced.
    pub fn is_done(&self) -> bool {
        self.cursor == Cursor::Done
    }

    /// Render the next frame into `dst`. Returns `None` after the final frame.
    pub fn render_next(&mut self, dst: &mut FrameRgb) -> Option<FramePosition> {
        loop {
            match self.cursor {
                Cursor::Intro { frame } => {
                    if frame < self.timeline.intro_frames() {
                        self.render_intro(dst);
                        self.cursor = Cursor::Intro { frame: frame + 1 };
                        return self.emit(FramePosition::Intro { frame });
                    }
                    tracing::debug!(stage = "entry", "phase started");
                    self.accumulator = Some(BackgroundAccumulator::new(
                        self.timeline.canvas,
                        self.style.background,
                    ));
                    self.cursor = Cursor::Entry { image: 0, frame: 0 };
                }
                Cursor::Entry { image, frame } => {
                    if image >= ENTRY_IMAGES {
                        // The scroll phase redraws the strip from the layout.
                        self.accumulator = None;
                        tracing::debug!(stage = "scroll", "phase started");
                        self.cursor = Cursor::Scroll { step: 0 };
                        continue;
                    }
                    if frame < self.timeline.entry_frames_per_image() {
                        if let Some(acc) = &self.accumulator {
                            self.render_entry(acc, image, frame, dst);
                        }
                        self.cursor = Cursor::Entry {
                            image,
                            frame: frame + 1,
                        };
                        return self.emit(FramePosition::Entry { image, frame });
                    }
                    if let Some(acc) = self.accumulator.take() {
                        self.accumulator = Some(self.bake(acc, image));
                    }
                    self.cursor = Cursor::Entry {
                        image: image + 1,
                        frame: 0,
                    };
                }
                Cursor::Scroll { step } => {
                    if step <= self.timeline.scroll_frames() {
                        self.render_scroll(step, dst);
                        self.cursor = Cursor::Scroll { step: step + 1 };
                        return self.emit(FramePosition::Scroll { step });
                    }
                    tracing::debug!(stage = "outro", "phase started");
                    self.cursor = Cursor::Outro { frame: 0 };
                }
                Cursor::Outro { frame } => {
                    if frame < self.timeline.outro_frames() {
                        let cached = match self.outro_frame.take() {
                            Some(f) => f,
                            None => {
                                let mut f = FrameRgb::new(dst.width, dst.height);
                                self.render_outro(&mut f);
                                f
                            }
                        };
                        dst.copy_from(&cached);
                        self.outro_frame = Some(cached);
                        self.cursor = Cursor::Outro { frame: frame + 1 };
                        return self.emit(FramePosition::Outro { frame });
                    }
                    self.outro_frame = None;
                    self.cursor = Cursor::Done;
                }
                Cursor::Done => return None,
            }
        }
    }

    /// Render the frame at `pos` without touching the sequential state.
    ///
    /// Entry frames replay the bakes of every earlier entry image.
    pub fn render_at(&self, pos: FramePosition, dst: &mut FrameRgb) {
        match pos {
            FramePosition::Intro { .. } => self.render_intro(dst),
            FramePosition::Entry { image, frame } => {
                let mut acc =
                    BackgroundAccumulator::new(self.timeline.canvas, self.style.background);
                for i in 0..image.min(ENTRY_IMAGES) {
                    acc = self.bake(acc, i);
                }
                self.render_entry(&acc, image, frame, dst);
            }
            FramePosition::Scroll { step } => self.render_scroll(step, dst),
            FramePosition::Outro { .. } => self.render_outro(dst),
        }
    }

    fn emit(&mut self, pos: FramePosition) -> Option<FramePosition> {
        self.emitted += 1;
        Some(pos)
    }

    fn entry_x(&self, image: usize) -> i64 {
        self.timeline.x_base + self.layout.items()[image].x_offset
    }

    fn bake(&self, acc: BackgroundAccumulator, image: usize) -> BackgroundAccumulator {
        let item = &self.layout.items()[image];
        acc.bake(
            &item.image,
            self.entry_x(image),
            self.layout.padding(),
            self.style.pad_color,
        )
    }

    fn render_intro(&self, dst: &mut FrameRgb) {
        dst.fill(self.style.background);
    }

    fn render_entry(
        &self,
        acc: &BackgroundAccumulator,
        image: usize,
        frame: u64,
        dst: &mut FrameRgb,
    ) {
        dst.copy_from(acc.frame());
        let Some(item) = self.layout.items().get(image) else {
            return;
        };
        let direction = self.timeline.entry_directions()[image];
        let y = entry_offset_y(
            direction,
            frame,
            self.timeline.entry_frames_per_image(),
            self.timeline.canvas.height,
        );
        dst.blit(&item.image, self.entry_x(image), y);
    }

    fn render_scroll(&self, step: u64, dst: &mut FrameRgb) {
        dst.fill(self.style.background);
        let origin = scroll_origin_x(self.timeline.x_base, step, self.timeline.pixels_per_frame());
        let canvas_w = i64::from(self.timeline.canvas.width);
        let pad = i64::from(self.layout.padding());
        for item in self.layout.items() {
            let x = origin + item.x_offset;
            let w = item.width();
            if x + w < 0 {
                continue;
            }
            if x >= canvas_w {
                // Offsets only grow from here.
                break;
            }
            dst.blit(&item.image, x, 0);
            dst.fill_columns(x + w, pad, self.style.pad_color);
        }
    }

    fn render_outro(&self, dst: &mut FrameRgb) {
        dst.fill(self.style.background);
        if let Some(layer) = self.overlay {
            dst.blend_premul_rgba(&layer.rgba8_premul, layer.width, layer.height, 0, 0);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
