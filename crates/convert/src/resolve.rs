use std::fmt;

use stepbeat_domain::{BeatEvent, InputError, TimestampSeries, TimestampUnit};

use crate::config::ConvertConfig;

/// Non-fatal unit-resolution diagnostics. These are user-facing messages,
/// not log records; the caller decides where to print them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UnitWarning {
    AmbiguousFirstTimestamp { first: f64, threshold: f64 },
    SamplingRateIgnored { first: f64, rate: u32 },
}

impl fmt::Display for UnitWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitWarning::AmbiguousFirstTimestamp { first, threshold } => write!(
                f,
                "the first timestamp {first} is greater than {threshold} seconds; if these \
                 are sample positions, supply the sampling rate (e.g. --samples 48000) or \
                 the computed BPMs will be very inaccurate"
            ),
            UnitWarning::SamplingRateIgnored { first, rate } => write!(
                f,
                "the first timestamp {first} looks like seconds, so the supplied sampling \
                 rate {rate} Hz will not be used in the computation"
            ),
        }
    }
}

/// Decides whether file-sourced timestamps are sample positions or seconds.
/// Detector output is always seconds and never passes through here.
pub struct UnitResolver {
    sampling_rate: Option<u32>,
    warn_threshold_secs: f64,
}

impl UnitResolver {
    pub fn new(config: &ConvertConfig) -> Self {
        Self {
            sampling_rate: config.sampling_rate,
            warn_threshold_secs: config.warn_threshold_secs,
        }
    }

    pub fn resolve(
        &self,
        events: Vec<BeatEvent>,
    ) -> Result<(TimestampSeries, Vec<UnitWarning>), InputError> {
        let first = events
            .first()
            .ok_or(InputError::EmptySeries)?
            .timestamp;
        let mut warnings = Vec::new();
        let unit = match self.sampling_rate {
            None => {
                // File input without a rate historically means samples, but
                // a large first value suggests mislabelled seconds.
                if first > self.warn_threshold_secs {
                    warnings.push(UnitWarning::AmbiguousFirstTimestamp {
                        first,
                        threshold: self.warn_threshold_secs,
                    });
                }
                TimestampUnit::Samples
            }
            Some(rate) => {
                if first.fract() != 0.0 {
                    warnings.push(UnitWarning::SamplingRateIgnored { first, rate });
                    TimestampUnit::Seconds
                } else {
                    TimestampUnit::Samples
                }
            }
        };
        Ok((TimestampSeries::new(events, unit), warnings))
    }
}
