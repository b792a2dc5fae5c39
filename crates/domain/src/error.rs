use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }
}

/// Malformed or empty input series. The run aborts before any output is
/// written.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("input series contains no beat rows")]
    EmptySeries,
    #[error("invalid beat timestamp {0} (must be finite and non-negative)")]
    InvalidTimestamp(f64),
    #[error("invalid beat label {0:?}, should be '1', '2', '3' or '4'")]
    InvalidLabel(String),
    #[error("malformed input row at line {line}: {message}")]
    MalformedRow { line: usize, message: String },
}

/// An invariant required for tempo computation does not hold. Fatal to the
/// current run; no partial tempo map is produced.
#[derive(Debug, Error)]
pub enum SegmentationError {
    #[error("need at least 2 beats to derive a tempo, got {count}")]
    InsufficientBeats { count: usize },
    #[error("timestamp unit was never resolved to samples or seconds")]
    UnresolvedUnit,
    #[error("timestamps are in samples but no sampling rate was supplied")]
    MissingSamplingRate,
    #[error(
        "beat timestamps must be strictly increasing: beat {beat_index} at {current} \
         does not follow {previous}"
    )]
    NonPositiveInterval {
        beat_index: u32,
        previous: f64,
        current: f64,
    },
}
