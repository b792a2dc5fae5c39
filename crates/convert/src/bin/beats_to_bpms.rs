use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use stepbeat_convert::config::{
    ConvertConfig, OutputRouting, DEFAULT_SEC_TOLERANCE, DEFAULT_WARN_THRESHOLD_SECS,
};
use stepbeat_convert::pipeline::{ConversionJob, ConversionPipeline};
use stepbeat_convert::serialize::{chart_fragment, write_marker_csv};
use stepbeat_convert::simfile::splice_tempo_fields;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Convert detected beat timestamps into #OFFSET/#BPMS tempo fields",
    long_about = None
)]
struct Cli {
    /// Path to a CSV of beat markers, one `timestamp[,label]` row per beat
    input_beats_csv: PathBuf,

    /// Sampling rate in Hz, when the CSV's beat locations are sample positions
    #[arg(long = "samples")]
    sampling_rate: Option<u32>,

    /// Write the #OFFSET/#BPMS chart fragment to this text file
    #[arg(long)]
    output_txt: Option<PathBuf>,

    /// Write a headerless beat_marker,bpm CSV to this path
    #[arg(long)]
    output_csv: Option<PathBuf>,

    /// Write the tempo map as JSON to this path
    #[arg(long)]
    output_json: Option<PathBuf>,

    /// Simfile whose OFFSET and BPMS fields should be updated
    #[arg(long)]
    input_simfile: Option<PathBuf>,

    /// Where to write the updated simfile
    #[arg(long)]
    output_simfile: Option<PathBuf>,

    /// Write the updated fields back into the input simfile itself
    #[arg(long)]
    overwrite_input_simfile: bool,

    /// Allow replacing an output simfile that already exists
    #[arg(long)]
    allow_overwrite: bool,

    /// Tolerance in seconds for treating consecutive intervals as equal
    #[arg(long, default_value_t = DEFAULT_SEC_TOLERANCE)]
    tolerance: f64,

    /// First-timestamp threshold (seconds) above which unit ambiguity is reported
    #[arg(long, default_value_t = DEFAULT_WARN_THRESHOLD_SECS)]
    warn_threshold: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let routing = OutputRouting {
        output_txt: cli.output_txt,
        output_csv: cli.output_csv,
        output_json: cli.output_json,
        input_simfile: cli.input_simfile,
        output_simfile: cli.output_simfile,
        overwrite_input_simfile: cli.overwrite_input_simfile,
        allow_overwrite: cli.allow_overwrite,
    };
    // Routing conflicts surface before any computation or output.
    let simfile_plan = routing.resolve_simfile_plan()?;

    let pipeline = ConversionPipeline::new(ConvertConfig {
        sampling_rate: cli.sampling_rate,
        warn_threshold_secs: cli.warn_threshold,
        sec_tolerance: cli.tolerance,
    });
    let conversion = pipeline.convert_csv(&ConversionJob {
        input_beats_csv: cli.input_beats_csv,
    })?;
    for warning in &conversion.warnings {
        eprintln!("WARNING: {warning}");
    }
    let map = &conversion.map;
    let fragment = chart_fragment(map);

    let mut wrote_anything = false;
    if let Some(path) = &routing.output_txt {
        fs::write(path, format!("{fragment}\n"))
            .with_context(|| format!("write chart fragment to {path:?}"))?;
        wrote_anything = true;
    }
    if let Some(path) = &routing.output_csv {
        let file =
            fs::File::create(path).with_context(|| format!("create marker csv {path:?}"))?;
        write_marker_csv(map, file)
            .with_context(|| format!("write marker csv to {path:?}"))?;
        wrote_anything = true;
    }
    if let Some(path) = &routing.output_json {
        let json = serde_json::to_string_pretty(map)?;
        fs::write(path, format!("{json}\n"))
            .with_context(|| format!("write tempo map json to {path:?}"))?;
        wrote_anything = true;
    }
    if let Some(plan) = &simfile_plan {
        let contents = fs::read_to_string(&plan.source)
            .with_context(|| format!("read simfile {:?}", plan.source))?;
        fs::write(&plan.destination, splice_tempo_fields(&contents, map))
            .with_context(|| format!("write simfile {:?}", plan.destination))?;
        wrote_anything = true;
    }
    if !wrote_anything {
        println!("{fragment}");
    }
    Ok(())
}
