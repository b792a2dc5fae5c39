pub mod beats;
pub mod error;
pub mod tempo;

pub use crate::beats::{BeatEvent, BeatLabel, TimestampSeries, TimestampUnit};
pub use crate::error::{DomainError, InputError, SegmentationError};
pub use crate::tempo::{TempoMap, TempoSegment};
