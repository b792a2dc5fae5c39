use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::InputError;

/// Beat-in-measure marker emitted by bar/beat trackers. `One` is a
/// downbeat. Informational only; tempo arithmetic never reads it.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BeatLabel {
    One,
    Two,
    Three,
    Four,
}

impl BeatLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            BeatLabel::One => "1",
            BeatLabel::Two => "2",
            BeatLabel::Three => "3",
            BeatLabel::Four => "4",
        }
    }

    pub fn is_downbeat(&self) -> bool {
        matches!(self, BeatLabel::One)
    }
}

impl FromStr for BeatLabel {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(BeatLabel::One),
            "2" => Ok(BeatLabel::Two),
            "3" => Ok(BeatLabel::Three),
            "4" => Ok(BeatLabel::Four),
            other => Err(InputError::InvalidLabel(other.to_string())),
        }
    }
}

impl fmt::Display for BeatLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single detected (or externally specified) beat instant.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct BeatEvent {
    /// Position of the beat, in the owning series' unit.
    pub timestamp: f64,
    pub label: Option<BeatLabel>,
}

impl BeatEvent {
    pub fn new(timestamp: f64, label: Option<BeatLabel>) -> Result<Self, InputError> {
        if !timestamp.is_finite() || timestamp < 0.0 {
            return Err(InputError::InvalidTimestamp(timestamp));
        }
        Ok(Self { timestamp, label })
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimestampUnit {
    #[default]
    Unset,
    Samples,
    Seconds,
}

/// An ordered run of beat events with a declared unit. Events must already
/// be sorted ascending by timestamp; a non-increasing pair is caught during
/// segmentation, not here.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TimestampSeries {
    events: Vec<BeatEvent>,
    unit: TimestampUnit,
}

impl TimestampSeries {
    pub fn new(events: Vec<BeatEvent>, unit: TimestampUnit) -> Self {
        Self { events, unit }
    }

    /// Series sourced from a beat detector, whose timestamps are always
    /// seconds. Skips unit resolution entirely.
    pub fn from_detector(events: Vec<BeatEvent>) -> Self {
        Self::new(events, TimestampUnit::Seconds)
    }

    pub fn events(&self) -> &[BeatEvent] {
        &self.events
    }

    pub fn unit(&self) -> TimestampUnit {
        self.unit
    }

    pub fn first_timestamp(&self) -> Option<f64> {
        self.events.first().map(|event| event.timestamp)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
