use std::io::Write;

use stepbeat_domain::{InputError, TempoMap, TempoSegment};

/// Shared numeric rendering for every output writer. Integral values keep
/// one decimal place so charts read `132.0` rather than `132`; everything
/// else uses the shortest representation that round-trips. Both forms are
/// locale-independent, which keeps serialization idempotent.
pub fn format_real(value: f64) -> String {
    // -0.0 renders as 0.0
    let value = if value == 0.0 { 0.0 } else { value };
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// The comma-joined `<beat_index>=<bpm>` list forming the BPMS field value.
pub fn bpms_value(map: &TempoMap) -> String {
    map.segments()
        .iter()
        .map(|segment| format!("{}={}", segment.beat_index, format_real(segment.bpm)))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn offset_value(map: &TempoMap) -> String {
    format_real(map.offset())
}

/// The two-line chart fragment:
/// `#OFFSET:<offset>;\n#BPMS:<idx>=<bpm>,...;`
pub fn chart_fragment(map: &TempoMap) -> String {
    format!(
        "#OFFSET:{};\n#BPMS:{};",
        offset_value(map),
        bpms_value(map)
    )
}

/// Headerless `beat_index,bpm` rows, one per tempo segment.
pub fn write_marker_csv<W: Write>(map: &TempoMap, writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for segment in map.segments() {
        csv_writer.write_record([
            segment.beat_index.to_string(),
            format_real(segment.bpm),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Inverse of [`bpms_value`]: parse a BPMS field value back into segments.
pub fn parse_bpms_value(value: &str) -> Result<Vec<TempoSegment>, InputError> {
    let mut segments = Vec::new();
    for (index, entry) in value.split(',').enumerate() {
        let malformed = |message: String| InputError::MalformedRow {
            line: index + 1,
            message,
        };
        let (beat, bpm) = entry
            .split_once('=')
            .ok_or_else(|| malformed(format!("expected <beat>=<bpm>, got {entry:?}")))?;
        let beat_index: u32 = beat
            .trim()
            .parse()
            .map_err(|_| malformed(format!("beat index {beat:?} is not an integer")))?;
        let bpm: f64 = bpm
            .trim()
            .parse()
            .map_err(|_| malformed(format!("bpm {bpm:?} is not a number")))?;
        segments.push(TempoSegment { beat_index, bpm });
    }
    Ok(segments)
}
