use serde::{Deserialize, Serialize};

use crate::config::model::{LogoConfig, ReelConfig, TextOverlayConfig};
use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange};
use crate::foundation::error::{ReelError, ReelResult};
use crate::layout::strip::StripLayout;

/// Number of images animated by the entry phase.
pub const ENTRY_IMAGES: usize = 3;

/// Where an entry image slides in from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryDirection {
    /// Starts below the canvas and slides up.
    Bottom,
    /// Starts above the canvas and slides down.
    Top,
}

/// Static outro decoration.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct OutroOverlay {
    /// Centered caption.
    pub text: Option<TextOverlayConfig>,
    /// Centered logo.
    pub logo: Option<LogoConfig>,
}

impl OutroOverlay {
    /// `true` when neither text nor logo is configured.
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.logo.is_none()
    }
}

/// One segment of the animation.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// Background-only frames.
    Intro {
        /// Frame count.
        frames: u64,
    },
    /// The first three images slide in one after another.
    Entry {
        /// Frames spent on each image.
        frames_per_image: u64,
        /// Slide direction per image.
        directions: [EntryDirection; ENTRY_IMAGES],
    },
    /// Constant-velocity pan across the whole strip.
    Scroll {
        /// Steps needed to move the strip fully past the left edge. One extra landing frame
        /// is emitted after them.
        frames: u64,
        /// Horizontal displacement per frame.
        pixels_per_frame: f64,
    },
    /// Static closing frames.
    Outro {
        /// Frame count.
        frames: u64,
        /// Optional caption and logo.
        overlay: OutroOverlay,
    },
}

impl Phase {
    /// Frames this phase contributes to the video.
    pub fn emitted_frames(&self) -> u64 {
        match self {
            Self::Intro { frames } | Self::Outro { frames, .. } => *frames,
            Self::Entry {
                frames_per_image, ..
            } => frames_per_image * ENTRY_IMAGES as u64,
            Self::Scroll { frames, .. } => frames + 1,
        }
    }

    /// Stage name used in logs and progress events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Intro { .. } => "intro",
            Self::Entry { .. } => "entry",
            Self::Scroll { .. } => "scroll",
            Self::Outro { .. } => "outro",
        }
    }
}

/// Phase-local address of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FramePosition {
    /// `frame` within the intro.
    Intro {
        /// Intro-local frame.
        frame: u64,
    },
    /// `frame` of entry image `image`.
    Entry {
        /// Entry image index (0..3).
        image: usize,
        /// Frame within that image's slide.
        frame: u64,
    },
    /// Scroll step `step` (0..=scroll frames).
    Scroll {
        /// Scroll step.
        step: u64,
    },
    /// `frame` within the outro.
    Outro {
        /// Outro-local frame.
        frame: u64,
    },
}

/// Complete frame budget for one run, derived once from configuration and layout.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Timeline {
    /// Output frame rate.
    pub fps: Fps,
    /// Output canvas.
    pub canvas: Canvas,
    /// Left edge of the centered entry group (may be negative).
    pub x_base: i64,
    /// Pixels the strip travels during the scroll phase.
    pub scroll_distance: i64,
    /// Phases in emission order: intro, entry, scroll, outro.
    pub phases: [Phase; 4],
    /// Exact number of frames the compositor emits.
    pub total_frames: u64,
}

impl Timeline {
    /// Derive the phase list and frame budget.
    #[tracing::instrument(skip_all, fields(images = layout.len()))]
    pub fn plan(cfg: &ReelConfig, layout: &StripLayout) -> ReelResult<Self> {
        layout.ensure_at_least(ENTRY_IMAGES)?;
        let fps = cfg.fps()?;
        if !cfg.scroll_px_per_frame.is_finite() || cfg.scroll_px_per_frame <= 0.0 {
            return Err(ReelError::config("scroll_px_per_frame must be > 0"));
        }

        let intro = fps.secs_to_frames_floor(cfg.intro_secs);
        let frames_per_image = fps.secs_to_frames_floor(cfg.entry_secs);
        let outro = fps.secs_to_frames_floor(cfg.outro_secs);

        let x_base = i64::from(cfg.canvas.width) / 2 - layout.padded_prefix_width(ENTRY_IMAGES) / 2;
        let scroll_distance = x_base + layout.total_width();
        let scroll = scroll_steps(scroll_distance, cfg.scroll_px_per_frame);

        let phases = [
            Phase::Intro { frames: intro },
            Phase::Entry {
                frames_per_image,
                directions: cfg.entry_directions,
            },
            Phase::Scroll {
                frames: scroll,
                pixels_per_frame: cfg.scroll_px_per_frame,
            },
            Phase::Outro {
                frames: outro,
                overlay: OutroOverlay {
                    text: cfg.outro_text.clone(),
                    logo: cfg.logo.clone(),
                },
            },
        ];
        let total_frames = phases.iter().map(Phase::emitted_frames).sum();

        tracing::debug!(
            intro,
            frames_per_image,
            scroll,
            outro,
            x_base,
            scroll_distance,
            total_frames,
            "timeline planned"
        );

        Ok(Self {
            fps,
            canvas: cfg.canvas,
            x_base,
            scroll_distance,
            phases,
            total_frames,
        })
    }

    /// Intro frame count.
    pub fn intro_frames(&self) -> u64 {
        match &self.phases[0] {
            Phase::Intro { frames } => *frames,
            _ => 0,
        }
    }

    /// Frames per entry image.
    pub fn entry_frames_per_image(&self) -> u64 {
        match &self.phases[1] {
            Phase::Entry {
                frames_per_image, ..
            } => *frames_per_image,
            _ => 0,
        }
    }

    /// Entry slide directions.
    pub fn entry_directions(&self) -> [EntryDirection; ENTRY_IMAGES] {
        match &self.phases[1] {
            Phase::Entry { directions, .. } => *directions,
            _ => [EntryDirection::Bottom; ENTRY_IMAGES],
        }
    }

    /// Scroll step count (the phase emits one more landing frame).
    pub fn scroll_frames(&self) -> u64 {
        match &self.phases[2] {
            Phase::Scroll { frames, .. } => *frames,
            _ => 0,
        }
    }

    /// Scroll velocity.
    pub fn pixels_per_frame(&self) -> f64 {
        match &self.phases[2] {
            Phase::Scroll {
                pixels_per_frame, ..
            } => *pixels_per_frame,
            _ => 0.0,
        }
    }

    /// Outro frame count.
    pub fn outro_frames(&self) -> u64 {
        match &self.phases[3] {
            Phase::Outro { frames, .. } => *frames,
            _ => 0,
        }
    }

    /// Outro decoration.
    pub fn outro_overlay(&self) -> OutroOverlay {
        match &self.phases[3] {
            Phase::Outro { overlay, .. } => overlay.clone(),
            _ => OutroOverlay::default(),
        }
    }

    /// Global frame ranges of the four phases, in order.
    pub fn phase_ranges(&self) -> [FrameRange; 4] {
        let mut start = 0u64;
        self.phases.each_ref().map(|p| {
            let end = start + p.emitted_frames();
            let r = FrameRange {
                start: FrameIndex(start),
                end: FrameIndex(end),
            };
            start = end;
            r
        })
    }

    /// Map a global frame index to its phase-local position.
    pub fn locate(&self, idx: FrameIndex) -> ReelResult<FramePosition> {
        if idx.0 >= self.total_frames {
            return Err(ReelError::config(format!(
                "frame {} is outside the timeline (total {})",
                idx.0, self.total_frames
            )));
        }
        let [intro, entry, scroll, _] = self.phase_ranges();
        let f = idx.0;
        let pos = if intro.contains(idx) {
            FramePosition::Intro { frame: f }
        } else if entry.contains(idx) {
            let local = f - entry.start.0;
            let per = self.entry_frames_per_image();
            FramePosition::Entry {
                image: (local / per) as usize,
                frame: local % per,
            }
        } else if scroll.contains(idx) {
            FramePosition::Scroll {
                step: f - scroll.start.0,
            }
        } else {
            FramePosition::Outro {
                frame: f - scroll.end.0,
            }
        };
        Ok(pos)
    }

    /// Video duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.total_frames)
    }
}

/// `ceil(distance / speed)`, or 0 when the strip is already past the left edge.
pub fn scroll_steps(distance: i64, pixels_per_frame: f64) -> u64 {
    if distance <= 0 {
        return 0;
    }
    let steps = (distance as f64) / pixels_per_frame;
    // Exact multiples must not gain a step from float error.
    (steps - 1e-9).ceil().max(0.0) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/scheduler.rs"]
mod tests;
