use super::*;

fn ones(sample_rate: u32, frames: usize) -> AudioPcm {
    AudioPcm {
        sample_rate,
        channels: 2,
        interleaved_f32: vec![1.0; frames * 2],
    }
}

#[test]
fn ten_second_clip_fits_thirty_second_video() {
    let rate = 100;
    let src = ones(rate, 10 * rate as usize);
    let target = secs_to_sample_frames(30.0, rate);
    let fade = secs_to_sample_frames(5.0, rate);
    let out = fit_track(&src, target, fade).unwrap();

    assert_eq!(out.frames(), 3000);
    assert!((out.duration_secs() - 30.0).abs() < 1e-9);
    // Before the fade: untouched.
    assert_eq!(out.interleaved_f32[2 * 2499], 1.0);
    // Last frame is silent on both channels.
    assert_eq!(out.interleaved_f32[2 * 2999], 0.0);
    assert_eq!(out.interleaved_f32[2 * 2999 + 1], 0.0);

    let tail: Vec<f32> = out.interleaved_f32[2 * 2500..].iter().step_by(2).copied().collect();
    assert!(tail.windows(2).all(|w| w[1] < w[0]));
}

#[test]
fn loops_the_source_content() {
    let src = AudioPcm {
        sample_rate: 10,
        channels: 2,
        interleaved_f32: vec![0.1, -0.1, 0.2, -0.2, 0.3, -0.3],
    };
    let out = fit_track(&src, 7, 0).unwrap();
    assert_eq!(
        out.interleaved_f32,
        vec![0.1, -0.1, 0.2, -0.2, 0.3, -0.3, 0.1, -0.1, 0.2, -0.2, 0.3, -0.3, 0.1, -0.1]
    );
}

#[test]
fn longer_source_is_trimmed() {
    let out = fit_track(&ones(10, 100), 25, 0).unwrap();
    assert_eq!(out.frames(), 25);
}

#[test]
fn fade_longer_than_track_covers_whole_track() {
    let out = fit_track(&ones(10, 4), 4, 100).unwrap();
    let left: Vec<f32> = out.interleaved_f32.iter().step_by(2).copied().collect();
    assert_eq!(left, vec![0.75, 0.5, 0.25, 0.0]);
}

#[test]
fn empty_source_is_an_audio_error() {
    let err = fit_track(&ones(10, 0), 10, 0).unwrap_err();
    assert!(matches!(err, ReelError::AudioMux(_)));
}
