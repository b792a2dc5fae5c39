use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_WARN_THRESHOLD_SECS: f64 = 10.0;
pub const DEFAULT_SEC_TOLERANCE: f64 = 1e-8;

/// Knobs consumed by the conversion engine itself. Output routing lives in
/// [`OutputRouting`] and never reaches the core.
#[derive(Clone, Copy, Debug)]
pub struct ConvertConfig {
    /// Sampling rate in Hz, when the input timestamps are sample positions.
    pub sampling_rate: Option<u32>,
    /// First timestamps above this many seconds trigger an ambiguity
    /// warning when no sampling rate was supplied.
    pub warn_threshold_secs: f64,
    /// Consecutive seconds-unit intervals within this tolerance are treated
    /// as the same tempo.
    pub sec_tolerance: f64,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            sampling_rate: None,
            warn_threshold_secs: DEFAULT_WARN_THRESHOLD_SECS,
            sec_tolerance: DEFAULT_SEC_TOLERANCE,
        }
    }
}

/// Contradictory output destinations, detected before any computation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot overwrite the input simfile without an input simfile path")]
    OverwriteWithoutInputSimfile,
    #[error(
        "cannot request both overwriting the input simfile and a different \
         output simfile path"
    )]
    ConflictingSimfileDestinations,
    #[error("an output simfile path requires an input simfile path")]
    OutputSimfileWithoutInput,
    #[error("output simfile {0:?} already exists; pass --allow-overwrite to replace it")]
    RefusingToOverwrite(PathBuf),
}

/// A validated simfile update: read `source`, splice the tempo fields,
/// write `destination`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimfilePlan {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Where the run's artifacts go. The simfile portion is resolved to a
/// [`SimfilePlan`] up front so that no writer ever has to stop and ask.
#[derive(Clone, Debug, Default)]
pub struct OutputRouting {
    pub output_txt: Option<PathBuf>,
    pub output_csv: Option<PathBuf>,
    pub output_json: Option<PathBuf>,
    pub input_simfile: Option<PathBuf>,
    pub output_simfile: Option<PathBuf>,
    pub overwrite_input_simfile: bool,
    pub allow_overwrite: bool,
}

impl OutputRouting {
    pub fn resolve_simfile_plan(&self) -> Result<Option<SimfilePlan>, ConfigError> {
        if self.overwrite_input_simfile {
            let input = self
                .input_simfile
                .as_ref()
                .ok_or(ConfigError::OverwriteWithoutInputSimfile)?;
            if let Some(output) = &self.output_simfile {
                if output != input {
                    return Err(ConfigError::ConflictingSimfileDestinations);
                }
            }
            return Ok(Some(SimfilePlan {
                source: input.clone(),
                destination: input.clone(),
            }));
        }
        let Some(output) = &self.output_simfile else {
            return Ok(None);
        };
        let input = self
            .input_simfile
            .as_ref()
            .ok_or(ConfigError::OutputSimfileWithoutInput)?;
        if output.exists() && !self.allow_overwrite {
            return Err(ConfigError::RefusingToOverwrite(output.clone()));
        }
        Ok(Some(SimfilePlan {
            source: input.clone(),
            destination: output.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_simfile_request_resolves_to_none() {
        let routing = OutputRouting::default();
        assert_eq!(routing.resolve_simfile_plan().unwrap(), None);
    }

    #[test]
    fn overwrite_requires_input_simfile() {
        let routing = OutputRouting {
            overwrite_input_simfile: true,
            ..OutputRouting::default()
        };
        assert!(matches!(
            routing.resolve_simfile_plan(),
            Err(ConfigError::OverwriteWithoutInputSimfile)
        ));
    }

    #[test]
    fn overwrite_conflicts_with_different_output() {
        let routing = OutputRouting {
            overwrite_input_simfile: true,
            input_simfile: Some(PathBuf::from("song.sm")),
            output_simfile: Some(PathBuf::from("other.sm")),
            ..OutputRouting::default()
        };
        assert!(matches!(
            routing.resolve_simfile_plan(),
            Err(ConfigError::ConflictingSimfileDestinations)
        ));
    }

    #[test]
    fn overwrite_with_matching_output_targets_the_input() {
        let routing = OutputRouting {
            overwrite_input_simfile: true,
            input_simfile: Some(PathBuf::from("song.sm")),
            output_simfile: Some(PathBuf::from("song.sm")),
            ..OutputRouting::default()
        };
        let plan = routing.resolve_simfile_plan().unwrap().unwrap();
        assert_eq!(plan.source, PathBuf::from("song.sm"));
        assert_eq!(plan.destination, PathBuf::from("song.sm"));
    }

    #[test]
    fn output_simfile_requires_input() {
        let routing = OutputRouting {
            output_simfile: Some(PathBuf::from("out.sm")),
            ..OutputRouting::default()
        };
        assert!(matches!(
            routing.resolve_simfile_plan(),
            Err(ConfigError::OutputSimfileWithoutInput)
        ));
    }

    #[test]
    fn existing_output_needs_allow_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("out.sm");
        std::fs::write(&existing, "#TITLE:x;\n").unwrap();

        let mut routing = OutputRouting {
            input_simfile: Some(dir.path().join("in.sm")),
            output_simfile: Some(existing.clone()),
            ..OutputRouting::default()
        };
        assert!(matches!(
            routing.resolve_simfile_plan(),
            Err(ConfigError::RefusingToOverwrite(_))
        ));

        routing.allow_overwrite = true;
        let plan = routing.resolve_simfile_plan().unwrap().unwrap();
        assert_eq!(plan.destination, existing);
    }
}
