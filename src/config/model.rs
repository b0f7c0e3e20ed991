use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Canvas, Fps, Rgb8};
use crate::foundation::error::{ReelError, ReelResult};
use crate::timeline::scheduler::EntryDirection;

/// Immutable run configuration. Every field has a default; JSON files may override any subset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReelConfig {
    /// Output canvas size. Both dimensions must be even (yuv420p).
    pub canvas: Canvas,
    /// Separator width between images, in pixels.
    pub padding: u32,
    /// Separator color.
    pub pad_color: Rgb8,
    /// Color of every pixel not covered by an image or separator.
    pub background: Rgb8,
    /// Frames per second.
    pub fps: u32,
    /// Background-only lead-in.
    pub intro_secs: f64,
    /// Slide-in duration of each of the first three images.
    pub entry_secs: f64,
    /// Horizontal pan velocity during the scroll phase.
    pub scroll_px_per_frame: f64,
    /// Static closing frames.
    pub outro_secs: f64,
    /// Slide direction for the first three images.
    pub entry_directions: [EntryDirection; 3],
    /// Fewest usable images a run accepts (never below 3).
    pub min_images: usize,
    /// Output directory, relative to the input folder.
    pub output_dir: String,
    /// Output file stem; the timestamp is appended.
    pub output_name: String,
    /// Fixed timestamp for the output file name. Local time is used when unset.
    pub timestamp: Option<String>,
    /// Bounded queue depth between the compositor and the encoder thread.
    pub channel_capacity: usize,
    /// Optional soundtrack muxed after the video is written.
    pub audio: Option<AudioConfig>,
    /// Optional centered outro caption.
    pub outro_text: Option<TextOverlayConfig>,
    /// Optional centered outro logo.
    pub logo: Option<LogoConfig>,
}

impl Default for ReelConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            padding: 2,
            pad_color: Rgb8::WHITE,
            background: Rgb8::BLACK,
            fps: 30,
            intro_secs: 0.0,
            entry_secs: 3.5,
            scroll_px_per_frame: 3.0,
            outro_secs: 10.0,
            entry_directions: [
                EntryDirection::Bottom,
                EntryDirection::Top,
                EntryDirection::Bottom,
            ],
            min_images: 3,
            output_dir: "video".to_owned(),
            output_name: "output".to_owned(),
            timestamp: None,
            channel_capacity: 4,
            audio: None,
            outro_text: None,
            logo: None,
        }
    }
}

/// Soundtrack settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AudioConfig {
    /// Any audio file ffmpeg can decode.
    pub path: PathBuf,
    /// Linear fade-out applied to the tail of the fitted track.
    #[serde(default = "default_fade_out_secs")]
    pub fade_out_secs: f64,
}

fn default_fade_out_secs() -> f64 {
    2.0
}

/// Outro caption settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextOverlayConfig {
    /// Caption string, rendered on one line.
    pub text: String,
    /// Font size in pixels.
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    /// Fill color.
    #[serde(default = "default_text_color")]
    pub color: Rgb8,
    /// Extra font file loaded ahead of the system fonts.
    #[serde(default)]
    pub font_file: Option<PathBuf>,
}

fn default_font_size() -> f32 {
    64.0
}

fn default_text_color() -> Rgb8 {
    Rgb8::WHITE
}

/// Outro logo settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogoConfig {
    /// PNG (or any decodable image); alpha is honored.
    pub path: PathBuf,
    /// Uniform scale applied to the logo's natural size.
    #[serde(default = "default_logo_scale")]
    pub scale: f64,
}

fn default_logo_scale() -> f64 {
    1.0
}

impl ReelConfig {
    /// Load a JSON configuration file. Missing fields take their defaults.
    pub fn from_path(path: &Path) -> ReelResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            ReelError::config(format!("failed to read config '{}': {e}", path.display()))
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            ReelError::config(format!("failed to parse config '{}': {e}", path.display()))
        })
    }

    /// Frame rate as a rational.
    pub fn fps(&self) -> ReelResult<Fps> {
        Fps::new(self.fps, 1)
    }

    /// Effective minimum image count (the entry animation always needs three).
    pub fn required_images(&self) -> usize {
        self.min_images.max(3)
    }

    /// Reject values no run could honor.
    pub fn validate(&self) -> ReelResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ReelError::config("canvas width/height must be non-zero"));
        }
        if !self.canvas.width.is_multiple_of(2) || !self.canvas.height.is_multiple_of(2) {
            return Err(ReelError::config(
                "canvas width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        if self.fps == 0 {
            return Err(ReelError::config("fps must be non-zero"));
        }
        for (name, secs) in [
            ("intro_secs", self.intro_secs),
            ("entry_secs", self.entry_secs),
            ("outro_secs", self.outro_secs),
        ] {
            if !secs.is_finite() || secs < 0.0 {
                return Err(ReelError::config(format!(
                    "{name} must be a finite, non-negative number of seconds"
                )));
            }
        }
        if !self.scroll_px_per_frame.is_finite() || self.scroll_px_per_frame <= 0.0 {
            return Err(ReelError::config("scroll_px_per_frame must be > 0"));
        }
        if self.min_images < 3 {
            return Err(ReelError::config(
                "min_images must be >= 3 (the entry animation uses three images)",
            ));
        }
        if self.output_dir.trim().is_empty() {
            return Err(ReelError::config("output_dir must not be empty"));
        }
        if self.output_name.trim().is_empty()
            || self.output_name.contains(['/', '\\'])
        {
            return Err(ReelError::config(
                "output_name must be a non-empty file stem without path separators",
            ));
        }
        if let Some(audio) = &self.audio
            && (!audio.fade_out_secs.is_finite() || audio.fade_out_secs < 0.0)
        {
            return Err(ReelError::config("audio fade_out_secs must be >= 0"));
        }
        if let Some(text) = &self.outro_text
            && (!text.font_size.is_finite() || text.font_size <= 0.0)
        {
            return Err(ReelError::config("outro_text font_size must be > 0"));
        }
        if let Some(logo) = &self.logo
            && (!logo.scale.is_finite() || logo.scale <= 0.0)
        {
            return Err(ReelError::config("logo scale must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
