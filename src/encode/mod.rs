//! Frame sinks.
//!
//! Sinks consume rendered frames in timeline order; `PreparedReel::render_to_sink` drives them
//! from a dedicated encoder thread.

/// `ffmpeg`-based MP4 sink.
pub mod ffmpeg;
/// Sink trait and the in-memory sink.
pub mod sink;
