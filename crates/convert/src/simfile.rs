use stepbeat_domain::TempoMap;

use crate::serialize::{bpms_value, offset_value};

/// Replace the values of the first `#OFFSET:...;` and `#BPMS:...;` fields
/// in simfile text with the tempo map's values, appending either field when
/// it is absent. Field values may span lines; everything outside the two
/// fields is preserved byte-for-byte. This deliberately stops short of a
/// full simfile parse: the conversion engine only supplies the two field
/// values.
pub fn splice_tempo_fields(contents: &str, map: &TempoMap) -> String {
    let with_offset = replace_field(contents, "#OFFSET:", &offset_value(map));
    replace_field(&with_offset, "#BPMS:", &bpms_value(map))
}

fn replace_field(contents: &str, tag: &str, value: &str) -> String {
    match contents.find(tag) {
        Some(start) => {
            let value_start = start + tag.len();
            match contents[value_start..].find(';') {
                Some(end) => format!(
                    "{}{}{}",
                    &contents[..value_start],
                    value,
                    &contents[value_start + end..]
                ),
                // Unterminated field: replace the rest and close it.
                None => format!("{}{};", &contents[..value_start], value),
            }
        }
        None => {
            let mut out = contents.to_string();
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(tag);
            out.push_str(value);
            out.push_str(";\n");
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use stepbeat_domain::{TempoMap, TempoSegment};

    use super::*;

    fn map() -> TempoMap {
        TempoMap::new(
            -0.0234,
            vec![
                TempoSegment {
                    beat_index: 0,
                    bpm: 132.0,
                },
                TempoSegment {
                    beat_index: 149,
                    bpm: 66.0,
                },
            ],
        )
        .unwrap()
    }

    #[test]
    fn replaces_existing_fields_and_preserves_the_rest() {
        let simfile = "#TITLE:Magellan;\n#OFFSET:0.5;\n#BPMS:0=120.0;\n#NOTES:...;\n";
        assert_eq!(
            splice_tempo_fields(simfile, &map()),
            "#TITLE:Magellan;\n#OFFSET:-0.0234;\n#BPMS:0=132.0,149=66.0;\n#NOTES:...;\n"
        );
    }

    #[test]
    fn handles_multiline_field_values() {
        let simfile = "#BPMS:0=120.0,\n4=90.0,\n8=120.0\n;\n#TITLE:x;\n";
        assert_eq!(
            splice_tempo_fields(simfile, &map()),
            "#BPMS:0=132.0,149=66.0;\n#TITLE:x;\n#OFFSET:-0.0234;\n"
        );
    }

    #[test]
    fn appends_missing_fields() {
        let simfile = "#TITLE:x;";
        assert_eq!(
            splice_tempo_fields(simfile, &map()),
            "#TITLE:x;\n#OFFSET:-0.0234;\n#BPMS:0=132.0,149=66.0;\n"
        );
    }

    #[test]
    fn splicing_is_idempotent_on_its_own_output() {
        let once = splice_tempo_fields("#OFFSET:1.0;\n#BPMS:0=60.0;\n", &map());
        assert_eq!(splice_tempo_fields(&once, &map()), once);
    }
}
