use tracing::debug;

use stepbeat_domain::{
    BeatEvent, SegmentationError, TempoMap, TempoSegment, TimestampSeries, TimestampUnit,
};

use crate::config::ConvertConfig;

/// Run-length encodes instantaneous tempo: one segment per change in the
/// inter-beat interval, instead of one BPM per beat. Beat trackers produce
/// near-constant but not bit-identical intervals, so the seconds path
/// compares with a tolerance while the samples path compares integers
/// exactly.
pub struct TempoSegmenter {
    sampling_rate: Option<u32>,
    sec_tolerance: f64,
}

impl TempoSegmenter {
    pub fn new(config: &ConvertConfig) -> Self {
        Self {
            sampling_rate: config.sampling_rate,
            sec_tolerance: config.sec_tolerance,
        }
    }

    pub fn segment(&self, series: &TimestampSeries) -> Result<TempoMap, SegmentationError> {
        if series.len() < 2 {
            return Err(SegmentationError::InsufficientBeats {
                count: series.len(),
            });
        }
        let events = series.events();
        let (offset, segments) = match series.unit() {
            TimestampUnit::Unset => return Err(SegmentationError::UnresolvedUnit),
            TimestampUnit::Samples => {
                let rate = self
                    .sampling_rate
                    .ok_or(SegmentationError::MissingSamplingRate)?;
                segment_samples(events, rate)?
            }
            TimestampUnit::Seconds => self.segment_seconds(events)?,
        };
        debug!(segment_count = segments.len(), offset, "run-length encoded tempo");
        Ok(TempoMap::new(offset, segments)
            .expect("segmenter emits strictly increasing segments with distinct adjacent bpms"))
    }

    fn segment_seconds(
        &self,
        events: &[BeatEvent],
    ) -> Result<(f64, Vec<TempoSegment>), SegmentationError> {
        let mut previous = events[0].timestamp;
        let offset = -previous;
        let mut previous_interval = 0.0_f64;
        let mut segments: Vec<TempoSegment> = Vec::new();
        let mut beat_index: u32 = 0;
        for event in &events[1..] {
            let current = event.timestamp;
            let interval = current - previous;
            // An interval inside the tolerance is indistinguishable from
            // zero, so it cannot yield a meaningful tempo.
            if interval <= self.sec_tolerance {
                return Err(SegmentationError::NonPositiveInterval {
                    beat_index,
                    previous,
                    current,
                });
            }
            if (previous_interval - interval).abs() > self.sec_tolerance {
                let bpm = 60.0 / interval;
                push_if_changed(&mut segments, beat_index, bpm);
            }
            previous = current;
            previous_interval = interval;
            beat_index += 1;
        }
        Ok((offset, segments))
    }
}

fn segment_samples(
    events: &[BeatEvent],
    rate: u32,
) -> Result<(f64, Vec<TempoSegment>), SegmentationError> {
    let mut previous = events[0].timestamp as i64;
    let offset = -(previous as f64) / rate as f64;
    let mut previous_interval: i64 = 0;
    let mut segments: Vec<TempoSegment> = Vec::new();
    let mut beat_index: u32 = 0;
    for event in &events[1..] {
        let current = event.timestamp as i64;
        let interval = current - previous;
        if interval <= 0 {
            return Err(SegmentationError::NonPositiveInterval {
                beat_index,
                previous: previous as f64,
                current: current as f64,
            });
        }
        if interval != previous_interval {
            let bpm = rate as f64 / interval as f64 * 60.0;
            push_if_changed(&mut segments, beat_index, bpm);
        }
        previous = current;
        previous_interval = interval;
        beat_index += 1;
    }
    Ok((offset, segments))
}

/// Distinct intervals can round-divide to the same f64 bpm; a segment that
/// repeats the previous bpm would be redundant, so it is dropped.
fn push_if_changed(segments: &mut Vec<TempoSegment>, beat_index: u32, bpm: f64) {
    if segments.last().map_or(true, |last| last.bpm != bpm) {
        segments.push(TempoSegment { beat_index, bpm });
    }
}
