use super::pcm::AudioPcm;
use crate::foundation::error::{ReelError, ReelResult};

/// Sample frames covering `secs` at `sample_rate`, rounded to nearest.
pub fn secs_to_sample_frames(secs: f64, sample_rate: u32) -> u64 {
    (secs.max(0.0) * f64::from(sample_rate)).round() as u64
}

/// Fit a soundtrack to an exact length.
///
/// The source is looped until it covers `target_frames`, trimmed to exactly that length, and
/// the last `fade_frames` sample frames ramp linearly down to silence on the final frame.
pub fn fit_track(pcm: &AudioPcm, target_frames: u64, fade_frames: u64) -> ReelResult<AudioPcm> {
    let channels = usize::from(pcm.channels);
    if channels == 0 || pcm.interleaved_f32.len() < channels {
        return Err(ReelError::audio_mux("soundtrack decoded to no samples"));
    }

    let target_len = target_frames as usize * channels;
    let out: Vec<f32> = pcm
        .interleaved_f32
        .iter()
        .copied()
        .cycle()
        .take(target_len)
        .collect();
    let mut out = AudioPcm {
        sample_rate: pcm.sample_rate,
        channels: pcm.channels,
        interleaved_f32: out,
    };
    apply_fade_out(&mut out, fade_frames);
    Ok(out)
}

fn apply_fade_out(pcm: &mut AudioPcm, fade_frames: u64) {
    let channels = usize::from(pcm.channels);
    let total = pcm.frames();
    let fade = fade_frames.min(total);
    if fade == 0 {
        return;
    }
    let start = total - fade;
    for (i, frame) in pcm
        .interleaved_f32
        .chunks_exact_mut(channels)
        .enumerate()
        .skip(start as usize)
    {
        let gain = (total - 1 - i as u64) as f32 / fade as f32;
        for s in frame {
            *s *= gain;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/track.rs"]
mod tests;
