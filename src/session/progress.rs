use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;

use serde::Serialize;

use crate::foundation::error::ReelWarning;

/// Named pipeline stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Background-only lead-in.
    Intro,
    /// Entry slides.
    Entry,
    /// Horizontal pan.
    Scroll,
    /// Static closing frames.
    Outro,
    /// Soundtrack fitting and muxing.
    Audio,
    /// Run finished.
    Done,
}

impl Stage {
    /// Render phases in emission order.
    pub const PHASES: [Stage; 4] = [Stage::Intro, Stage::Entry, Stage::Scroll, Stage::Outro];

    /// Lowercase stage name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::Entry => "entry",
            Self::Scroll => "scroll",
            Self::Outro => "outro",
            Self::Audio => "audio",
            Self::Done => "done",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receiver of progress notifications. Called from the rendering thread.
pub trait ProgressReporter {
    /// `done` of `total` frames have been handed to the encoder.
    fn frame_done(&self, done: u64, total: u64);
    /// A named stage started.
    fn stage(&self, stage: Stage);
    /// A non-fatal problem was recorded.
    fn warning(&self, warning: &ReelWarning);
}

/// Ignores every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn frame_done(&self, _done: u64, _total: u64) {}
    fn stage(&self, _stage: Stage) {}
    fn warning(&self, _warning: &ReelWarning) {}
}

/// Reports through `tracing`: stages and warnings as they happen, frames every 10%.
#[derive(Debug, Default)]
pub struct LogProgress {
    last_decile: AtomicU64,
}

impl LogProgress {
    /// Create a reporter.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressReporter for LogProgress {
    fn frame_done(&self, done: u64, total: u64) {
        if total == 0 {
            return;
        }
        let decile = done * 10 / total;
        if decile > self.last_decile.swap(decile, Ordering::Relaxed) {
            tracing::info!(done, total, "{}% rendered", decile * 10);
        }
    }

    fn stage(&self, stage: Stage) {
        tracing::info!(stage = stage.as_str(), "stage");
    }

    fn warning(&self, warning: &ReelWarning) {
        tracing::warn!("{warning}");
    }
}

/// Event forwarded by [`ChannelProgress`].
#[derive(Clone, Debug, PartialEq)]
pub enum ProgressEvent {
    /// See [`ProgressReporter::frame_done`].
    Frame {
        /// Frames done.
        done: u64,
        /// Frame budget.
        total: u64,
    },
    /// See [`ProgressReporter::stage`].
    Stage(Stage),
    /// See [`ProgressReporter::warning`].
    Warning(ReelWarning),
}

/// Forwards events to an unbounded channel. A dropped receiver is ignored; rendering never
/// blocks on the listener.
#[derive(Clone, Debug)]
pub struct ChannelProgress {
    tx: Sender<ProgressEvent>,
}

impl ChannelProgress {
    /// Forward to `tx`.
    pub fn new(tx: Sender<ProgressEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressReporter for ChannelProgress {
    fn frame_done(&self, done: u64, total: u64) {
        let _ = self.tx.send(ProgressEvent::Frame { done, total });
    }

    fn stage(&self, stage: Stage) {
        let _ = self.tx.send(ProgressEvent::Stage(stage));
    }

    fn warning(&self, warning: &ReelWarning) {
        let _ = self.tx.send(ProgressEvent::Warning(warning.clone()));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/progress.rs"]
mod tests;
