use std::io::Read;

use csv::ReaderBuilder;

use stepbeat_domain::{BeatEvent, BeatLabel, InputError};

/// Parse a headerless `(timestamp, label)` beat table. The label column is
/// optional per row; the timestamp column is not.
pub fn read_beats<R: Read>(reader: R) -> Result<Vec<BeatEvent>, InputError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut events = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let line = index + 1;
        let record = record.map_err(|err| InputError::MalformedRow {
            line,
            message: err.to_string(),
        })?;
        let raw_timestamp = record.get(0).filter(|s| !s.is_empty()).ok_or_else(|| {
            InputError::MalformedRow {
                line,
                message: "missing timestamp column".to_string(),
            }
        })?;
        let timestamp: f64 = raw_timestamp
            .parse()
            .map_err(|_| InputError::MalformedRow {
                line,
                message: format!("timestamp {raw_timestamp:?} is not a number"),
            })?;
        let label = match record.get(1) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<BeatLabel>()?),
        };
        events.push(BeatEvent::new(timestamp, label)?);
    }
    if events.is_empty() {
        return Err(InputError::EmptySeries);
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_timestamp_and_label_rows() {
        let events = read_beats("0,1\n21818,2\n43636,3\n".as_bytes()).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].timestamp, 0.0);
        assert_eq!(events[1].label, Some(BeatLabel::Two));
    }

    #[test]
    fn label_column_is_optional() {
        let events = read_beats("2.0\n2.4545\n".as_bytes()).unwrap();
        assert_eq!(events[0].label, None);
        assert_eq!(events[1].timestamp, 2.4545);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            read_beats("".as_bytes()),
            Err(InputError::EmptySeries)
        ));
    }

    #[test]
    fn non_numeric_timestamp_reports_the_line() {
        let err = read_beats("1.0,1\nabc,2\n".as_bytes()).unwrap_err();
        match err {
            InputError::MalformedRow { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("abc"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_label_is_rejected() {
        assert!(matches!(
            read_beats("1.0,9\n".as_bytes()),
            Err(InputError::InvalidLabel(_))
        ));
    }

    #[test]
    fn negative_timestamp_is_rejected() {
        assert!(matches!(
            read_beats("-4.0,1\n".as_bytes()),
            Err(InputError::InvalidTimestamp(_))
        ));
    }
}
