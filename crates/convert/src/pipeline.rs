use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use stepbeat_domain::{BeatEvent, TempoMap, TimestampSeries};

use crate::config::ConvertConfig;
use crate::input;
use crate::resolve::{UnitResolver, UnitWarning};
use crate::segment::TempoSegmenter;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionJob {
    pub input_beats_csv: PathBuf,
}

/// One run's artifact plus the resolver's non-fatal diagnostics.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub map: TempoMap,
    pub warnings: Vec<UnitWarning>,
}

pub struct ConversionPipeline {
    config: ConvertConfig,
}

impl ConversionPipeline {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    #[instrument(skip(self))]
    pub fn convert_csv(&self, job: &ConversionJob) -> Result<Conversion> {
        info!("reading beat timestamps from {}", job.input_beats_csv.display());
        let file = File::open(&job.input_beats_csv)
            .with_context(|| format!("open beats csv {:?}", job.input_beats_csv))?;
        let events = input::read_beats(BufReader::new(file))?;
        info!(beat_count = events.len(), "parsed beat rows");

        let (series, warnings) = UnitResolver::new(&self.config).resolve(events)?;
        let map = TempoSegmenter::new(&self.config).segment(&series)?;
        info!(segment_count = map.segments().len(), "derived tempo map");
        Ok(Conversion { map, warnings })
    }

    /// Detector-sourced beats are already in seconds, so they skip unit
    /// resolution entirely.
    #[instrument(skip(self, events))]
    pub fn convert_detector(&self, events: Vec<BeatEvent>) -> Result<TempoMap> {
        let series = TimestampSeries::from_detector(events);
        let map = TempoSegmenter::new(&self.config).segment(&series)?;
        Ok(map)
    }
}

impl Default for ConversionPipeline {
    fn default() -> Self {
        Self::new(ConvertConfig::default())
    }
}
