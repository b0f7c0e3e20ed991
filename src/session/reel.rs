use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender};

use serde::Serialize;

use super::cancel::CancelToken;
use super::progress::{ProgressReporter, Stage};
use crate::assets::decode::NormalizedImage;
use crate::assets::source::{list_images, load_images};
use crate::audio::mux::{attach_audio, audio_output_path};
use crate::config::model::ReelConfig;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult, ReelWarning};
use crate::layout::strip::StripLayout;
use crate::render::compositor::{Compositor, FrameStyle};
use crate::render::frame::FrameRgb;
use crate::render::overlay::{PreparedOverlay, prepare_overlay};
use crate::render::pool::{FramePool, FramePoolOpts, FramePoolStats};
use crate::timeline::scheduler::{FramePosition, Timeline};

/// Counters from one [`PreparedReel::render_to_sink`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RenderStats {
    /// Frame budget of the timeline.
    pub frames_total: u64,
    /// Frames the sink accepted.
    pub frames_written: u64,
    /// Canvas buffers allocated (the rest were recycled).
    pub pool_allocations: u64,
}

/// Outcome of [`render_reel`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderReport {
    /// Final file: the muxed video when audio was attached, else the silent video.
    pub output: PathBuf,
    /// Silent video.
    pub video_path: PathBuf,
    /// Video with soundtrack, when muxing succeeded.
    pub audio_path: Option<PathBuf>,
    /// Frames written.
    pub frames: u64,
    /// Non-fatal problems, in the order they happened.
    pub warnings: Vec<ReelWarning>,
}

/// Images, layout, timeline and outro overlay ready to render.
#[derive(Debug)]
pub struct PreparedReel {
    cfg: ReelConfig,
    layout: StripLayout,
    timeline: Timeline,
    overlay: PreparedOverlay,
    warnings: Vec<ReelWarning>,
}

enum EncoderMsg {
    Frame(FrameIndex, FrameRgb),
    Finish,
}

impl PreparedReel {
    /// Load every image in `dir` and plan the run.
    ///
    /// Undecodable files are skipped with a warning; too few survivors is a config error.
    #[tracing::instrument(skip_all, fields(dir = %dir.display()))]
    pub fn from_dir(dir: &Path, cfg: ReelConfig) -> ReelResult<Self> {
        cfg.validate()?;
        let paths = list_images(dir)?;
        if paths.is_empty() {
            return Err(ReelError::config(format!(
                "no images found in '{}'",
                dir.display()
            )));
        }

        let loaded = load_images(&paths, cfg.canvas.height);
        tracing::info!(
            listed = paths.len(),
            loaded = loaded.images.len(),
            skipped = loaded.skipped.len(),
            "images loaded"
        );
        let images = loaded.images.into_iter().map(|s| s.image).collect();
        Self::build(images, cfg, loaded.skipped)
    }

    /// Plan a run over already-normalized images.
    ///
    /// Every image must already be at the canvas height.
    pub fn from_images(images: Vec<NormalizedImage>, cfg: ReelConfig) -> ReelResult<Self> {
        cfg.validate()?;
        if let Some(bad) = images.iter().find(|i| i.height != cfg.canvas.height) {
            return Err(ReelError::config(format!(
                "image height {} does not match canvas height {}",
                bad.height, cfg.canvas.height
            )));
        }
        Self::build(images, cfg, Vec::new())
    }

    fn build(
        images: Vec<NormalizedImage>,
        cfg: ReelConfig,
        mut warnings: Vec<ReelWarning>,
    ) -> ReelResult<Self> {
        let required = cfg.required_images();
        if images.len() < required {
            return Err(ReelError::InsufficientInput {
                found: images.len(),
                required,
            });
        }

        let layout = StripLayout::new(images, cfg.padding)?;
        let timeline = Timeline::plan(&cfg, &layout)?;
        let overlay = prepare_overlay(cfg.canvas, &timeline.outro_overlay())?;
        warnings.extend(overlay.warnings.iter().cloned());

        Ok(Self {
            cfg,
            layout,
            timeline,
            overlay,
            warnings,
        })
    }

    /// Run configuration.
    pub fn config(&self) -> &ReelConfig {
        &self.cfg
    }

    /// Strip layout.
    pub fn layout(&self) -> &StripLayout {
        &self.layout
    }

    /// Frame budget and phases.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Warnings collected while preparing (skipped images, missing logo).
    pub fn warnings(&self) -> &[ReelWarning] {
        &self.warnings
    }

    fn style(&self) -> FrameStyle {
        FrameStyle {
            background: self.cfg.background,
            pad_color: self.cfg.pad_color,
        }
    }

    /// Render the frame at `idx` without rendering the frames before it.
    pub fn render_frame_at(&self, idx: FrameIndex) -> ReelResult<FrameRgb> {
        let pos = self.timeline.locate(idx)?;
        let compositor = Compositor::new(
            &self.layout,
            &self.timeline,
            self.style(),
            self.overlay.layer.as_ref(),
        );
        let mut frame = FrameRgb::new(self.cfg.canvas.width, self.cfg.canvas.height);
        compositor.render_at(pos, &mut frame);
        Ok(frame)
    }

    /// Render every frame into `sink`.
    ///
    /// Frames are composited on the calling thread and handed to the sink on a scoped encoder
    /// thread through a bounded channel. The sink sees `end` only after the full frame budget
    /// was delivered; on cancellation or any failure it sees `abort` instead.
    #[tracing::instrument(skip_all, fields(frames = self.timeline.total_frames))]
    pub fn render_to_sink(
        &self,
        sink: &mut dyn FrameSink,
        progress: &dyn ProgressReporter,
        cancel: &CancelToken,
    ) -> ReelResult<RenderStats> {
        let cfg = SinkConfig {
            width: self.cfg.canvas.width,
            height: self.cfg.canvas.height,
            fps: self.timeline.fps,
            total_frames: self.timeline.total_frames,
        };
        let cap = self.cfg.channel_capacity.max(1);

        std::thread::scope(|scope| -> ReelResult<RenderStats> {
            let (tx, rx) = mpsc::sync_channel::<EncoderMsg>(cap);
            let (recycle_tx, recycle_rx) = mpsc::channel::<FrameRgb>();
            let sink_ref: &mut dyn FrameSink = sink;

            let enc = scope.spawn(move || -> ReelResult<u64> {
                let res = run_encoder(&mut *sink_ref, cfg, &rx, &recycle_tx);
                if res.is_err() {
                    sink_ref.abort();
                }
                res
            });

            let produced = self.produce(&tx, &recycle_rx, cap, progress, cancel);
            drop(tx);

            let encoded = enc
                .join()
                .map_err(|_| ReelError::encode("encoder thread panicked"))?;

            match produced {
                Ok(pool_stats) => {
                    let frames_written = encoded?;
                    if frames_written != self.timeline.total_frames {
                        return Err(ReelError::encode(format!(
                            "sink accepted {frames_written} frames, timeline budget is {}",
                            self.timeline.total_frames
                        )));
                    }
                    Ok(RenderStats {
                        frames_total: self.timeline.total_frames,
                        frames_written,
                        pool_allocations: pool_stats.allocations,
                    })
                }
                Err(ReelError::Cancelled) => Err(ReelError::Cancelled),
                // A failing sink closes the channel; its error is the root cause.
                Err(e) => match encoded {
                    Err(enc_err) if !matches!(enc_err, ReelError::Cancelled) => Err(enc_err),
                    _ => Err(e),
                },
            }
        })
    }

    fn produce(
        &self,
        tx: &SyncSender<EncoderMsg>,
        recycle_rx: &Receiver<FrameRgb>,
        cap: usize,
        progress: &dyn ProgressReporter,
        cancel: &CancelToken,
    ) -> ReelResult<FramePoolStats> {
        let total = self.timeline.total_frames;
        let mut pool = FramePool::new(
            self.cfg.canvas.width,
            self.cfg.canvas.height,
            FramePoolOpts {
                max_retained: cap + 2,
            },
        );
        let mut compositor = Compositor::new(
            &self.layout,
            &self.timeline,
            self.style(),
            self.overlay.layer.as_ref(),
        );

        let mut stages_reported = 0usize;
        let mut idx = 0u64;
        loop {
            if cancel.is_cancelled() {
                tracing::info!(frame = idx, "render cancelled");
                return Err(ReelError::Cancelled);
            }
            while let Ok(f) = recycle_rx.try_recv() {
                pool.release(f);
            }

            let mut frame = pool.borrow();
            let Some(pos) = compositor.render_next(&mut frame) else {
                pool.release(frame);
                break;
            };
            report_stages_through(progress, &mut stages_reported, phase_stage(pos));

            tx.send(EncoderMsg::Frame(FrameIndex(idx), frame))
                .map_err(|_| ReelError::encode("encoder thread is not accepting frames"))?;
            idx += 1;
            progress.frame_done(idx, total);
        }
        report_stages_through(progress, &mut stages_reported, Stage::Outro);

        if idx != total {
            return Err(ReelError::encode(format!(
                "compositor emitted {idx} frames, timeline budget is {total}"
            )));
        }
        tx.send(EncoderMsg::Finish)
            .map_err(|_| ReelError::encode("encoder thread is not accepting frames"))?;

        let stats = pool.stats();
        tracing::debug!(
            allocations = stats.allocations,
            retained = stats.retained,
            dropped = stats.dropped_on_release,
            "frame pool"
        );
        Ok(stats)
    }
}

fn run_encoder(
    sink: &mut dyn FrameSink,
    cfg: SinkConfig,
    rx: &Receiver<EncoderMsg>,
    recycle_tx: &Sender<FrameRgb>,
) -> ReelResult<u64> {
    sink.begin(cfg)?;
    let mut written = 0u64;
    loop {
        match rx.recv() {
            Ok(EncoderMsg::Frame(idx, frame)) => {
                sink.push_frame(idx, &frame)?;
                written += 1;
                let _ = recycle_tx.send(frame);
            }
            Ok(EncoderMsg::Finish) => {
                sink.end()?;
                return Ok(written);
            }
            // The producer stopped before finishing.
            Err(_) => return Err(ReelError::Cancelled),
        }
    }
}

fn phase_stage(pos: FramePosition) -> Stage {
    match pos {
        FramePosition::Intro { .. } => Stage::Intro,
        FramePosition::Entry { .. } => Stage::Entry,
        FramePosition::Scroll { .. } => Stage::Scroll,
        FramePosition::Outro { .. } => Stage::Outro,
    }
}

/// Report every render phase up to and including `target` that was not reported yet, so phases
/// with zero frames still announce themselves in order.
fn report_stages_through(progress: &dyn ProgressReporter, reported: &mut usize, target: Stage) {
    let Some(end) = Stage::PHASES.iter().position(|s| *s == target) else {
        return;
    };
    while *reported <= end {
        progress.stage(Stage::PHASES[*reported]);
        *reported += 1;
    }
}

/// `<dir>/<output_dir>/<output_name>_<timestamp>.mp4`.
pub fn output_path(dir: &Path, cfg: &ReelConfig) -> PathBuf {
    let ts = cfg
        .timestamp
        .clone()
        .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string());
    dir.join(&cfg.output_dir)
        .join(format!("{}_{ts}.mp4", cfg.output_name))
}

/// Render the images in `dir` to an MP4, then attach the soundtrack if one is configured.
///
/// Audio problems never fail the run; they become [`ReelWarning::AudioMuxFailed`] and the
/// silent video is the result.
#[tracing::instrument(skip_all, fields(dir = %dir.display()))]
pub fn render_reel(
    dir: &Path,
    cfg: ReelConfig,
    progress: &dyn ProgressReporter,
    cancel: &CancelToken,
) -> ReelResult<RenderReport> {
    let reel = PreparedReel::from_dir(dir, cfg)?;
    for w in reel.warnings() {
        progress.warning(w);
    }
    let mut warnings = reel.warnings().to_vec();

    let video_path = output_path(dir, reel.config());
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&video_path));
    let stats = reel.render_to_sink(&mut sink, progress, cancel)?;
    tracing::info!(
        path = %video_path.display(),
        frames = stats.frames_written,
        "video written"
    );

    let mut audio_path = None;
    if let Some(audio) = &reel.config().audio {
        progress.stage(Stage::Audio);
        let out = audio_output_path(&video_path);
        match attach_audio(&video_path, audio, reel.timeline().duration_secs(), &out) {
            Ok(()) => audio_path = Some(out),
            Err(e) => {
                let warning = ReelWarning::AudioMuxFailed {
                    reason: e.to_string(),
                };
                progress.warning(&warning);
                warnings.push(warning);
            }
        }
    }
    progress.stage(Stage::Done);

    Ok(RenderReport {
        output: audio_path.clone().unwrap_or_else(|| video_path.clone()),
        video_path,
        audio_path,
        frames: stats.frames_written,
        warnings,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/session/reel.rs"]
mod tests;
