use std::path::PathBuf;

/// Convenience result type used across panreel.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid configuration, missing input folder, or too few usable images.
    #[error("config error: {0}")]
    Config(String),

    /// The strip has fewer images than the entry animation (or the configured minimum) needs.
    #[error("config error: found {found} usable images, need at least {required}")]
    InsufficientInput {
        /// Number of images available.
        found: usize,
        /// Minimum number required.
        required: usize,
    },

    /// A single source image could not be decoded.
    ///
    /// Folder-level loading absorbs this into a [`crate::ReelWarning`]; it only surfaces when
    /// decoding one image directly.
    #[error("decode error: '{}': {message}", path.display())]
    Decode {
        /// Offending source path (empty for in-memory bytes).
        path: PathBuf,
        /// Decoder message.
        message: String,
    },

    /// The video sink could not be opened, written, or finalized.
    #[error("encode error: {0}")]
    Encode(String),

    /// Attaching the audio track failed.
    #[error("audio mux error: {0}")]
    AudioMux(String),

    /// Cooperative cancellation was observed between frames.
    #[error("render cancelled")]
    Cancelled,

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`ReelError::Decode`] value.
    pub fn decode(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Build a [`ReelError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`ReelError::AudioMux`] value.
    pub fn audio_mux(msg: impl Into<String>) -> Self {
        Self::AudioMux(msg.into())
    }

    /// `true` for errors in the configuration class (including insufficient input).
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::InsufficientInput { .. })
    }
}

/// Non-fatal outcome reported alongside a successful run.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReelWarning {
    /// A source image failed to decode and was left out of the strip.
    SkippedImage {
        /// Offending file.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },
    /// The configured logo could not be loaded; the outro renders without it.
    MissingLogo {
        /// Configured logo path.
        path: PathBuf,
        /// Loader message.
        reason: String,
    },
    /// Audio muxing failed; the silent video is the final result.
    AudioMuxFailed {
        /// Mux failure message.
        reason: String,
    },
}

impl std::fmt::Display for ReelWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SkippedImage { path, reason } => {
                write!(f, "skipped image '{}': {reason}", path.display())
            }
            Self::MissingLogo { path, reason } => {
                write!(f, "logo '{}' not rendered: {reason}", path.display())
            }
            Self::AudioMuxFailed { reason } => {
                write!(f, "audio not attached, keeping silent video: {reason}")
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
