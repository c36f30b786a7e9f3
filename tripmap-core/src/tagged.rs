//! Decoder for the `data=!<tag><value>!<tag><value>...` path segment that
//! maps URLs use to carry coordinates and metadata.
//!
//! The producer nests tag groups (`4m6` means "the next six entries belong
//! to group 4"), but the consumers here only need leaf values, so the
//! decoder stays flat and simply yields every `(tag, value)` pair in order.

use crate::error::ExtractError;
use once_cell::sync::Lazy;
use regex::Regex;

const DATA_MARKER: &str = "data=!";

// One digit, one lowercase letter, then everything up to the next '!'.
static TAGGED_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!([0-9][a-z])([^!]*)").expect("valid tagged entry pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedDatum {
    pub tag: String,
    pub value: String,
}

impl TaggedDatum {
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
        }
    }
}

/// Split a tagged-data segment into its `(tag, value)` pairs, in order.
///
/// Entries whose tag is not exactly digit + lowercase letter (for example the
/// two-digit `!16z...` entries) are skipped.
pub fn decode(segment: &str) -> Result<Vec<TaggedDatum>, ExtractError> {
    if !segment.starts_with(DATA_MARKER) {
        return Err(ExtractError::Format(format!(
            "expected '{}' at the start of {:?}",
            DATA_MARKER, segment
        )));
    }

    // Keep the leading '!' so the first entry matches like every other one.
    let body = &segment[DATA_MARKER.len() - 1..];

    Ok(TAGGED_ENTRY
        .captures_iter(body)
        .map(|caps| TaggedDatum::new(&caps[1], &caps[2]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_place_segment() {
        let data = decode(
            "data=!3m1!4b1!4m6!3m5!1s0x1:0x2!8m2!3d34.839449!4d134.6939047!16zXYZ",
        )
        .unwrap();

        let pairs: Vec<(&str, &str)> = data
            .iter()
            .map(|d| (d.tag.as_str(), d.value.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("3m", "1"),
                ("4b", "1"),
                ("4m", "6"),
                ("3m", "5"),
                ("1s", "0x1:0x2"),
                ("8m", "2"),
                ("3d", "34.839449"),
                ("4d", "134.6939047"),
            ]
        );
    }

    #[test]
    fn test_repeated_tags_each_yield_a_pair() {
        let data = decode("data=!1d1.5!2d2.5!1d3.5!2d4.5").unwrap();
        let tags: Vec<&str> = data.iter().map(|d| d.tag.as_str()).collect();
        assert_eq!(tags, vec!["1d", "2d", "1d", "2d"]);
        assert_eq!(data[2].value, "3.5");
    }

    #[test]
    fn test_empty_values_are_kept() {
        let data = decode("data=!4m!3d").unwrap();
        assert_eq!(data, vec![TaggedDatum::new("4m", ""), TaggedDatum::new("3d", "")]);
    }

    #[test]
    fn test_missing_marker_is_a_format_error() {
        for bad in ["", "data=", "!3d1!4d2", "@34.8,134.6,17z", "data=3d1"] {
            let err = decode(bad).unwrap_err();
            assert!(matches!(err, ExtractError::Format(_)), "{:?}", bad);
        }
    }

    #[test]
    fn test_marker_only_decodes_to_nothing() {
        assert!(decode("data=!").unwrap().is_empty());
    }

    #[test]
    fn test_decode_is_idempotent() {
        let segment = "data=!4m14!4m13!1m5!1m1!1s0x1:0x2!2m2!1d137.5717516!2d35.5315174!3e2";
        assert_eq!(decode(segment).unwrap(), decode(segment).unwrap());
    }
}
