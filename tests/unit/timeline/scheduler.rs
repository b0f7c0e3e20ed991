use super::*;
use crate::assets::decode::NormalizedImage;

fn img(w: u32, h: u32) -> NormalizedImage {
    NormalizedImage::from_rgb8(w, h, vec![0; w as usize * h as usize * 3]).unwrap()
}

fn layout(widths: &[u32], h: u32, padding: u32) -> StripLayout {
    StripLayout::new(widths.iter().map(|&w| img(w, h)).collect(), padding).unwrap()
}

#[test]
fn scenario_three_landscape_images_at_1080p() {
    let cfg = ReelConfig {
        canvas: Canvas {
            width: 1920,
            height: 1080,
        },
        ..ReelConfig::default()
    };
    // 800x600 sources scale to 1440 wide at H=1080.
    let l = layout(&[1440, 1440, 1440], 1080, 2);
    let t = Timeline::plan(&cfg, &l).unwrap();

    assert_eq!(t.x_base, 960 - (3 * (1440 + 2)) / 2);
    assert_eq!(t.scroll_distance, t.x_base + 3 * 1440 + 2 * 2);
    assert_eq!(t.intro_frames(), 0);
    assert_eq!(t.entry_frames_per_image(), 105);
    assert_eq!(t.outro_frames(), 300);
    assert_eq!(
        t.scroll_frames(),
        (t.scroll_distance as u64).div_ceil(3)
    );
}

#[test]
fn scenario_four_canvas_wide_images() {
    let cfg = ReelConfig {
        canvas: Canvas {
            width: 64,
            height: 16,
        },
        scroll_px_per_frame: 5.0,
        ..ReelConfig::default()
    };
    let w = 64;
    let l = layout(&[w, w, w, w], 16, 2);
    let t = Timeline::plan(&cfg, &l).unwrap();

    let x_base = 32 - (3 * (64 + 2)) / 2;
    assert_eq!(t.x_base, x_base);
    let distance = x_base + 4 * (64 + 2) - 2;
    assert_eq!(t.scroll_frames(), (distance as u64).div_ceil(5));
}

#[test]
fn total_frames_matches_closed_form() {
    let cfg = ReelConfig {
        canvas: Canvas {
            width: 100,
            height: 20,
        },
        fps: 24,
        intro_secs: 1.5,
        entry_secs: 0.5,
        outro_secs: 2.0,
        scroll_px_per_frame: 7.0,
        ..ReelConfig::default()
    };
    let l = layout(&[30, 40, 50, 60, 70], 20, 4);
    let t = Timeline::plan(&cfg, &l).unwrap();

    assert_eq!(t.intro_frames(), 36);
    assert_eq!(t.entry_frames_per_image(), 12);
    assert_eq!(t.outro_frames(), 48);
    assert_eq!(
        t.total_frames,
        36 + 3 * 12 + t.scroll_frames() + 1 + 48
    );
    assert_eq!(
        t.total_frames,
        t.phases.iter().map(Phase::emitted_frames).sum::<u64>()
    );
}

#[test]
fn faster_scroll_only_changes_scroll_frames() {
    let l = layout(&[300, 300, 300, 300, 300, 300], 50, 2);
    let mut last: Option<Timeline> = None;
    for speed in [1.0, 2.0, 3.5, 8.0, 40.0] {
        let cfg = ReelConfig {
            canvas: Canvas {
                width: 200,
                height: 50,
            },
            scroll_px_per_frame: speed,
            ..ReelConfig::default()
        };
        let t = Timeline::plan(&cfg, &l).unwrap();
        if let Some(prev) = &last {
            assert!(t.scroll_frames() < prev.scroll_frames());
            assert_eq!(t.intro_frames(), prev.intro_frames());
            assert_eq!(t.entry_frames_per_image(), prev.entry_frames_per_image());
            assert_eq!(t.outro_frames(), prev.outro_frames());
            assert_eq!(
                prev.total_frames - t.total_frames,
                prev.scroll_frames() - t.scroll_frames()
            );
        }
        last = Some(t);
    }
}

#[test]
fn scroll_steps_rounds_up_and_clamps() {
    assert_eq!(scroll_steps(9, 3.0), 3);
    assert_eq!(scroll_steps(10, 3.0), 4);
    assert_eq!(scroll_steps(0, 3.0), 0);
    assert_eq!(scroll_steps(-50, 3.0), 0);
    assert_eq!(scroll_steps(5, 2.5), 2);
}

#[test]
fn fewer_than_three_images_is_insufficient_input() {
    let l = layout(&[10, 10], 4, 2);
    let err = Timeline::plan(&ReelConfig::default(), &l).unwrap_err();
    assert!(matches!(
        err,
        ReelError::InsufficientInput {
            found: 2,
            required: 3
        }
    ));
}

#[test]
fn locate_walks_every_phase() {
    let cfg = ReelConfig {
        canvas: Canvas {
            width: 20,
            height: 4,
        },
        fps: 2,
        intro_secs: 1.0,
        entry_secs: 1.0,
        outro_secs: 1.0,
        scroll_px_per_frame: 10.0,
        ..ReelConfig::default()
    };
    let l = layout(&[6, 6, 6], 4, 1);
    let t = Timeline::plan(&cfg, &l).unwrap();
    // intro 2, entry 3*2, scroll (x_base=10-10=0, distance 20 -> 2 steps) + 1, outro 2.
    assert_eq!(t.scroll_frames(), 2);
    assert_eq!(t.total_frames, 2 + 6 + 3 + 2);

    assert_eq!(
        t.locate(FrameIndex(1)).unwrap(),
        FramePosition::Intro { frame: 1 }
    );
    assert_eq!(
        t.locate(FrameIndex(5)).unwrap(),
        FramePosition::Entry { image: 1, frame: 1 }
    );
    assert_eq!(
        t.locate(FrameIndex(10)).unwrap(),
        FramePosition::Scroll { step: 2 }
    );
    assert_eq!(
        t.locate(FrameIndex(12)).unwrap(),
        FramePosition::Outro { frame: 1 }
    );
    assert!(t.locate(FrameIndex(13)).is_err());
}

#[test]
fn zero_length_phases_still_plan() {
    let cfg = ReelConfig {
        canvas: Canvas {
            width: 20,
            height: 4,
        },
        intro_secs: 0.0,
        entry_secs: 0.0,
        outro_secs: 0.0,
        ..ReelConfig::default()
    };
    let l = layout(&[6, 6, 6], 4, 1);
    let t = Timeline::plan(&cfg, &l).unwrap();
    assert_eq!(t.total_frames, t.scroll_frames() + 1);
    assert_eq!(
        t.locate(FrameIndex(0)).unwrap(),
        FramePosition::Scroll { step: 0 }
    );
}
