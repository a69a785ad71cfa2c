//! Error types for gesture loading and playback.

use std::path::PathBuf;

/// Error type covering library loading, trajectory validation, and playback.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum GestureError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A channel-level error, qualified with the gesture it came from.
    #[error("gesture '{gesture}': {source}")]
    InGesture {
        gesture: String,
        #[source]
        source: Box<GestureError>,
    },

    #[error("channel '{channel}' is missing required field '{field}'")]
    MissingField {
        channel: String,
        field: &'static str,
    },

    #[error("channel '{channel}' has no keyframes")]
    EmptyKeyframes { channel: String },

    #[error("channel '{channel}' has {positions} positions but {times} times")]
    MismatchedLengths {
        channel: String,
        positions: usize,
        times: usize,
    },

    #[error("channel '{channel}': keyframe times must be strictly increasing and non-negative")]
    NonMonotonicTimes { channel: String },

    #[error("channel '{channel}': keyframe data must be finite")]
    NonFinite { channel: String },

    #[error("channel '{channel}': speed bounds must be positive and finite")]
    InvalidSpeedBound { channel: String },

    /// A segment covers a nonzero displacement in zero time. The benign
    /// zero-over-zero case is folded to zero velocity instead.
    #[error("channel '{channel}': segment {index} moves {displacement} units in zero time")]
    ZeroDurationSegment {
        channel: String,
        index: usize,
        displacement: f32,
    },

    #[error("unknown channel '{channel}'")]
    UnknownChannel { channel: String },

    #[error("channel '{channel}' is not a {expected} channel")]
    ChannelKindMismatch {
        channel: String,
        expected: &'static str,
    },

    #[error("gesture queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },
}

impl GestureError {
    /// Qualify a channel-level error with the owning gesture's name.
    pub(crate) fn in_gesture(self, gesture: &str) -> Self {
        GestureError::InGesture {
            gesture: gesture.to_string(),
            source: Box::new(self),
        }
    }
}
