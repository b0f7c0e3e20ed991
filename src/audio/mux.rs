use std::path::{Path, PathBuf};
use std::process::Command;

use super::pcm::{MIX_CHANNELS, MIX_SAMPLE_RATE, decode_audio_f32_stereo, write_pcm_f32le};
use super::track::{fit_track, secs_to_sample_frames};
use crate::config::model::AudioConfig;
use crate::foundation::error::{ReelError, ReelResult};

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

/// Decode the soundtrack, fit it to `duration_secs`, and mux it with `video` into `out`.
///
/// The video stream is copied, not re-encoded.
#[tracing::instrument(skip_all, fields(audio = %audio.path.display(), duration_secs = duration_secs))]
pub fn attach_audio(
    video: &Path,
    audio: &AudioConfig,
    duration_secs: f64,
    out: &Path,
) -> ReelResult<()> {
    if !audio.path.is_file() {
        return Err(ReelError::audio_mux(format!(
            "audio file '{}' does not exist",
            audio.path.display()
        )));
    }

    let pcm = decode_audio_f32_stereo(&audio.path, MIX_SAMPLE_RATE)?;
    tracing::debug!(source_secs = pcm.duration_secs(), "soundtrack decoded");
    let fitted = fit_track(
        &pcm,
        secs_to_sample_frames(duration_secs, MIX_SAMPLE_RATE),
        secs_to_sample_frames(audio.fade_out_secs, MIX_SAMPLE_RATE),
    )?;

    let tmp = std::env::temp_dir().join(format!(
        "panreel_audio_{}_{}.f32le",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    ));
    let _guard = TempFileGuard(Some(tmp.clone()));
    write_pcm_f32le(&fitted.interleaved_f32, &tmp)
        .map_err(|e| ReelError::audio_mux(e.to_string()))?;

    mux_pcm(video, &tmp, out)
}

fn mux_pcm(video: &Path, pcm_f32le: &Path, out: &Path) -> ReelResult<()> {
    let output = Command::new("ffmpeg")
        .args(["-y", "-loglevel", "error", "-i"])
        .arg(video)
        .args([
            "-f",
            "f32le",
            "-ar",
            &MIX_SAMPLE_RATE.to_string(),
            "-ac",
            &MIX_CHANNELS.to_string(),
            "-i",
        ])
        .arg(pcm_f32le)
        .args([
            "-map",
            "0:v:0",
            "-map",
            "1:a:0",
            "-c:v",
            "copy",
            "-c:a",
            "aac",
            "-shortest",
            "-movflags",
            "+faststart",
        ])
        .arg(out)
        .output()
        .map_err(|e| ReelError::audio_mux(format!("failed to run ffmpeg for audio mux: {e}")))?;

    if !output.status.success() {
        let _ = std::fs::remove_file(out);
        return Err(ReelError::audio_mux(format!(
            "ffmpeg exited with status {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(())
}

/// `<stem>_audio.<ext>` next to `video`.
pub fn audio_output_path(video: &Path) -> PathBuf {
    let stem = video
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = video
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mp4".to_owned());
    video.with_file_name(format!("{stem}_audio.{ext}"))
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mux.rs"]
mod tests;
