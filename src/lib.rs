//! panreel turns a folder of still images into a scrolling panorama video.
//!
//! Images are scaled to the canvas height and laid out as one horizontal strip. The first three
//! slide in one after another, the whole strip then pans left at a constant speed, and the video
//! closes on a static outro with an optional caption and logo. Every phase has an exact frame
//! count fixed up front, so the same inputs always produce the same frames.
//!
//! - Prepare a run with [`PreparedReel::from_dir`] or [`PreparedReel::from_images`]
//! - Stream every frame into a [`FrameSink`] with [`PreparedReel::render_to_sink`], or render
//!   one frame with [`PreparedReel::render_frame_at`]
//! - Or call [`render_reel`] to write the MP4 (and optional soundtrack) in one step
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

pub(crate) mod audio;
pub(crate) mod config;
/// Frame sinks.
pub mod encode;
pub(crate) mod layout;
pub(crate) mod render;
pub(crate) mod session;
pub(crate) mod timeline;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange, Rgb8};
pub use crate::foundation::error::{ReelError, ReelResult, ReelWarning};

pub use crate::assets::decode::{NormalizedImage, decode_image, decode_image_file, scaled_width};
pub use crate::assets::source::{
    IMAGE_EXTENSIONS, LoadedImages, SourcedImage, list_images, load_images,
};
pub use crate::audio::mux::{attach_audio, audio_output_path};
pub use crate::audio::pcm::{AudioPcm, MIX_SAMPLE_RATE, decode_audio_f32_stereo};
pub use crate::audio::track::{fit_track, secs_to_sample_frames};
pub use crate::config::model::{AudioConfig, LogoConfig, ReelConfig, TextOverlayConfig};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::layout::strip::{StripItem, StripLayout};
pub use crate::render::background::BackgroundAccumulator;
pub use crate::render::compositor::{Compositor, FrameStyle, entry_offset_y, scroll_origin_x};
pub use crate::render::frame::FrameRgb;
pub use crate::render::overlay::{OverlayLayer, PreparedOverlay, prepare_overlay};
pub use crate::session::cancel::CancelToken;
pub use crate::session::progress::{
    ChannelProgress, LogProgress, NoProgress, ProgressEvent, ProgressReporter, Stage,
};
pub use crate::session::reel::{PreparedReel, RenderReport, RenderStats, output_path, render_reel};
pub use crate::timeline::scheduler::{
    ENTRY_IMAGES, EntryDirection, FramePosition, OutroOverlay, Phase, Timeline, scroll_steps,
};
