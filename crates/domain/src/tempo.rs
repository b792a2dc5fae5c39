use serde::{Deserialize, Serialize};

use crate::DomainError;

/// One run-length-encoded tempo change: "starting at this beat, tempo is
/// this BPM until the next segment".
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct TempoSegment {
    /// 0-based index of the beat the tempo takes effect on.
    pub beat_index: u32,
    /// Beats per minute.
    pub bpm: f64,
}

impl TempoSegment {
    pub fn new(beat_index: u32, bpm: f64) -> Result<Self, DomainError> {
        if !bpm.is_finite() || bpm <= 0.0 {
            return Err(DomainError::validation(format!(
                "segment bpm must be finite and positive, got {bpm}"
            )));
        }
        Ok(Self { beat_index, bpm })
    }

    pub fn seconds_per_beat(&self) -> f64 {
        60.0 / self.bpm
    }
}

/// The result of a conversion run: a starting offset plus an ordered,
/// deduplicated list of tempo segments. Immutable once built; every output
/// writer reads the same instance.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TempoMap {
    offset: f64,
    segments: Vec<TempoSegment>,
}

impl TempoMap {
    pub fn new(offset: f64, segments: Vec<TempoSegment>) -> Result<Self, DomainError> {
        if !offset.is_finite() {
            return Err(DomainError::validation(format!(
                "offset must be finite, got {offset}"
            )));
        }
        if segments.is_empty() {
            return Err(DomainError::validation(
                "tempo map requires at least one segment",
            ));
        }
        for segment in &segments {
            if !segment.bpm.is_finite() || segment.bpm <= 0.0 {
                return Err(DomainError::validation(format!(
                    "segment bpm must be finite and positive, got {}",
                    segment.bpm
                )));
            }
        }
        for pair in segments.windows(2) {
            if pair[1].beat_index <= pair[0].beat_index {
                return Err(DomainError::validation(format!(
                    "segment beat indices must be strictly increasing: {} then {}",
                    pair[0].beat_index, pair[1].beat_index
                )));
            }
            if pair[1].bpm == pair[0].bpm {
                return Err(DomainError::validation(format!(
                    "adjacent segments at beats {} and {} encode the same bpm {}",
                    pair[0].beat_index, pair[1].beat_index, pair[0].bpm
                )));
            }
        }
        Ok(Self { offset, segments })
    }

    /// Seconds to subtract from the playback clock so that the first
    /// detected beat lands on beat 0. Negative in the common case.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn segments(&self) -> &[TempoSegment] {
        &self.segments
    }

    /// Tempo in effect at the given beat. Beats before the first segment
    /// report the first segment's bpm.
    pub fn bpm_at_beat(&self, beat: u32) -> f64 {
        let mut current = self.segments[0];
        for segment in &self.segments {
            if segment.beat_index <= beat {
                current = *segment;
            } else {
                break;
            }
        }
        current.bpm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_validation() {
        assert!(TempoSegment::new(0, 0.0).is_err());
        assert!(TempoSegment::new(0, -120.0).is_err());
        assert!(TempoSegment::new(0, f64::INFINITY).is_err());
        assert!(TempoSegment::new(0, 132.0).is_ok());
    }

    #[test]
    fn map_rejects_unordered_or_duplicate_segments() {
        let seg = |beat_index, bpm| TempoSegment { beat_index, bpm };
        assert!(TempoMap::new(0.0, vec![]).is_err());
        assert!(TempoMap::new(0.0, vec![seg(4, 120.0), seg(4, 90.0)]).is_err());
        assert!(TempoMap::new(0.0, vec![seg(0, 120.0), seg(8, 120.0)]).is_err());
        assert!(TempoMap::new(f64::NAN, vec![seg(0, 120.0)]).is_err());
        assert!(TempoMap::new(-2.0, vec![seg(0, 120.0), seg(8, 90.0)]).is_ok());
    }

    #[test]
    fn bpm_queries() {
        let map = TempoMap::new(
            -0.5,
            vec![
                TempoSegment::new(0, 132.0).unwrap(),
                TempoSegment::new(149, 66.0).unwrap(),
                TempoSegment::new(173, 132.0).unwrap(),
            ],
        )
        .unwrap();
        assert_eq!(map.bpm_at_beat(0), 132.0);
        assert_eq!(map.bpm_at_beat(148), 132.0);
        assert_eq!(map.bpm_at_beat(149), 66.0);
        assert_eq!(map.bpm_at_beat(200), 132.0);
        assert_eq!(map.offset(), -0.5);
    }
}
