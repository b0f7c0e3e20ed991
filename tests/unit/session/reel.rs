use super::*;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::{Canvas, Rgb8};
use crate::session::progress::{ChannelProgress, NoProgress, ProgressEvent};

fn solid(w: u32, h: u32, c: Rgb8) -> NormalizedImage {
    let mut data = Vec::with_capacity(w as usize * h as usize * 3);
    for _ in 0..w * h {
        data.extend_from_slice(&c.to_array());
    }
    NormalizedImage::from_rgb8(w, h, data).unwrap()
}

fn small_cfg() -> ReelConfig {
    ReelConfig {
        canvas: Canvas {
            width: 20,
            height: 6,
        },
        padding: 1,
        fps: 2,
        intro_secs: 1.0,
        entry_secs: 1.0,
        outro_secs: 1.0,
        scroll_px_per_frame: 10.0,
        channel_capacity: 2,
        ..ReelConfig::default()
    }
}

fn reel() -> PreparedReel {
    let images = (0..3).map(|i| solid(6, 6, Rgb8::new(i * 80, 0, 0))).collect();
    PreparedReel::from_images(images, small_cfg()).unwrap()
}

struct FailingSink {
    fail_at: u64,
    aborted: bool,
    ended: bool,
}

impl FrameSink for FailingSink {
    fn begin(&mut self, _cfg: SinkConfig) -> ReelResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, _frame: &FrameRgb) -> ReelResult<()> {
        if idx.0 == self.fail_at {
            return Err(ReelError::encode("disk full"));
        }
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        self.ended = true;
        Ok(())
    }

    fn abort(&mut self) {
        self.aborted = true;
    }
}

#[test]
fn output_path_uses_fixed_timestamp() {
    let cfg = ReelConfig {
        timestamp: Some("2024-05-06_07-08-09".to_owned()),
        ..ReelConfig::default()
    };
    assert_eq!(
        output_path(Path::new("/in"), &cfg),
        PathBuf::from("/in/video/output_2024-05-06_07-08-09.mp4")
    );
}

#[test]
fn output_path_defaults_to_local_time() {
    let p = output_path(Path::new("/in"), &ReelConfig::default());
    let name = p.file_name().unwrap().to_string_lossy().into_owned();
    // output_YYYY-MM-DD_HH-MM-SS.mp4
    assert!(name.starts_with("output_"));
    assert!(name.ends_with(".mp4"));
    assert_eq!(name.len(), "output_".len() + 19 + ".mp4".len());
}

#[test]
fn images_must_match_canvas_height() {
    let images = (0..3).map(|_| solid(6, 4, Rgb8::BLACK)).collect();
    let err = PreparedReel::from_images(images, small_cfg()).unwrap_err();
    assert!(err.is_config());
}

#[test]
fn too_few_images_is_insufficient_input() {
    let images = (0..2).map(|_| solid(6, 6, Rgb8::BLACK)).collect();
    let err = PreparedReel::from_images(images, small_cfg()).unwrap_err();
    assert!(matches!(
        err,
        ReelError::InsufficientInput {
            found: 2,
            required: 3
        }
    ));
}

#[test]
fn sink_receives_full_budget_and_end() {
    let reel = reel();
    let mut sink = InMemorySink::new();
    let stats = reel
        .render_to_sink(&mut sink, &NoProgress, &CancelToken::new())
        .unwrap();
    assert_eq!(stats.frames_total, 13);
    assert_eq!(stats.frames_written, 13);
    assert!(stats.pool_allocations <= 13);
    assert!(sink.ended());
    assert!(!sink.aborted());
    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height, cfg.total_frames), (20, 6, 13));
}

#[test]
fn stages_are_reported_in_order() {
    let reel = reel();
    let (tx, rx) = std::sync::mpsc::channel();
    reel.render_to_sink(
        &mut InMemorySink::new(),
        &ChannelProgress::new(tx),
        &CancelToken::new(),
    )
    .unwrap();
    let events: Vec<_> = rx.try_iter().collect();
    let stages: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            ProgressEvent::Stage(s) => Some(*s),
            _ => None,
        })
        .collect();
    assert_eq!(stages, Stage::PHASES);
    let frames = events
        .iter()
        .filter(|e| matches!(e, ProgressEvent::Frame { .. }))
        .count();
    assert_eq!(frames, 13);
    assert_eq!(
        events.last(),
        Some(&ProgressEvent::Frame {
            done: 13,
            total: 13
        })
    );
}

#[test]
fn zero_length_phases_are_still_announced() {
    let images = (0..3).map(|_| solid(6, 6, Rgb8::BLACK)).collect();
    let cfg = ReelConfig {
        intro_secs: 0.0,
        entry_secs: 0.0,
        outro_secs: 0.0,
        ..small_cfg()
    };
    let reel = PreparedReel::from_images(images, cfg).unwrap();
    let (tx, rx) = std::sync::mpsc::channel();
    reel.render_to_sink(
        &mut InMemorySink::new(),
        &ChannelProgress::new(tx),
        &CancelToken::new(),
    )
    .unwrap();
    let stages: Vec<_> = rx
        .try_iter()
        .filter_map(|e| match e {
            ProgressEvent::Stage(s) => Some(s),
            _ => None,
        })
        .collect();
    assert_eq!(stages, Stage::PHASES);
}

#[test]
fn failing_sink_aborts_and_surfaces_its_error() {
    let reel = reel();
    let mut sink = FailingSink {
        fail_at: 4,
        aborted: false,
        ended: false,
    };
    let err = reel
        .render_to_sink(&mut sink, &NoProgress, &CancelToken::new())
        .unwrap_err();
    assert!(err.to_string().contains("disk full"), "{err}");
    assert!(sink.aborted);
    assert!(!sink.ended);
}

#[test]
fn cancelled_token_aborts_the_sink() {
    let reel = reel();
    let cancel = CancelToken::new();
    cancel.cancel();
    let mut sink = InMemorySink::new();
    let err = reel
        .render_to_sink(&mut sink, &NoProgress, &cancel)
        .unwrap_err();
    assert!(matches!(err, ReelError::Cancelled));
    assert!(sink.aborted());
    assert!(!sink.ended());
    assert!(sink.frames().is_empty());
}

#[test]
fn random_access_matches_sink_output() {
    let reel = reel();
    let mut sink = InMemorySink::new();
    reel.render_to_sink(&mut sink, &NoProgress, &CancelToken::new())
        .unwrap();
    for (idx, frame) in sink.frames() {
        assert_eq!(reel.render_frame_at(*idx).unwrap(), *frame);
    }
    assert!(reel.render_frame_at(FrameIndex(13)).is_err());
}
