//! Decoder for tag-encoded measurement topics.
//!
//! Topics follow the grammar
//! `influx/<measurement>/(<tagKey>/<tagValue>/)*<field>/state`
//! and carry the field value as numeric text in the payload.

use crate::error::DecodeError;
use crate::record::Record;

/// First topic segment that routes to this decoder.
pub const PREFIX: &str = "influx";

/// Literal last segment required by the grammar.
const SUFFIX: &str = "state";

/// Decode a tagged topic plus numeric payload into a record.
///
/// Tag pairing is strictly positional: after the prefix, measurement, field,
/// and suffix are removed, the remaining segments are read pairwise in
/// left-to-right order, and that order is retained in the output.
pub fn decode(topic: &str, payload: &[u8]) -> Result<Record, DecodeError> {
    let mut segments: Vec<&str> = topic.split('/').collect();

    if segments.len() % 2 != 0 {
        return Err(DecodeError::MalformedTopicShape(format!(
            "odd segment count in '{}'",
            topic
        )));
    }

    // Even count means at least prefix + suffix are present.
    let first = segments.remove(0);
    let last = segments.pop().unwrap_or_default();
    if first != PREFIX || last != SUFFIX {
        return Err(DecodeError::MalformedTopicShape(format!(
            "'{}' does not start with '{}' and end with '{}'",
            topic, PREFIX, SUFFIX
        )));
    }

    if segments.len() < 2 {
        return Err(DecodeError::MalformedTopicShape(format!(
            "'{}' is missing measurement and field segments",
            topic
        )));
    }

    let measurement = segments.remove(0);
    let field = segments.pop().unwrap_or_default();
    if measurement.is_empty() || field.is_empty() {
        return Err(DecodeError::MalformedTopicShape(format!(
            "empty measurement or field segment in '{}'",
            topic
        )));
    }

    // Remaining length is even, so chunking cannot leave an unpaired tag.
    let tags = segments
        .chunks_exact(2)
        .map(|pair| (pair[0].to_string(), pair[1].to_string()))
        .collect();

    let value = parse_value(payload)?;

    Ok(Record {
        measurement: measurement.to_string(),
        tags,
        field: field.to_string(),
        value,
        timestamp: None,
    })
}

/// Parse the payload bytes as a float.
///
/// Characters other than digits, `.` and `-` are stripped before parsing to
/// tolerate stray whitespace and unit suffixes. The stripping does not mask
/// true parse errors (e.g. multiple embedded minus signs still fail), and is
/// deliberately no stricter than that.
fn parse_value(payload: &[u8]) -> Result<f64, DecodeError> {
    let text = std::str::from_utf8(payload)
        .map_err(|_| DecodeError::InvalidPayload("payload is not valid UTF-8".to_string()))?;

    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "nan" {
        return Err(DecodeError::InvalidPayload(format!(
            "non-numeric sentinel '{}'",
            trimmed
        )));
    }

    let stripped: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    let value: f64 = stripped.parse().map_err(|_| {
        DecodeError::InvalidPayload(format!("cannot parse '{}' as a number", trimmed))
    })?;

    if !value.is_finite() {
        return Err(DecodeError::InvalidPayload(format!(
            "'{}' is not a finite number",
            trimmed
        )));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_without_tags() {
        let record = decode("influx/environ/pm25/state", b"23.5").unwrap();

        assert_eq!(record.measurement, "environ");
        assert!(record.tags.is_empty());
        assert_eq!(record.field, "pm25");
        assert_eq!(record.value, 23.5);
        assert_eq!(record.timestamp, None);
    }

    #[test]
    fn test_decode_with_one_tag_pair() {
        let record = decode("influx/environ/sensor/kitchen/pm25/state", b"12.3").unwrap();

        assert_eq!(record.measurement, "environ");
        assert_eq!(
            record.tags,
            vec![("sensor".to_string(), "kitchen".to_string())]
        );
        assert_eq!(record.field, "pm25");
        assert_eq!(record.value, 12.3);
    }

    #[test]
    fn test_decode_preserves_tag_order() {
        let record = decode(
            "influx/power/room/living/device/heater/watts/state",
            b"1500",
        )
        .unwrap();

        assert_eq!(
            record.tags,
            vec![
                ("room".to_string(), "living".to_string()),
                ("device".to_string(), "heater".to_string()),
            ]
        );
    }

    #[test]
    fn test_odd_segment_count_rejected() {
        let err = decode("influx/temp/room/living/state", b"1").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedTopicShape(_)));

        let err = decode("influx/a/b/state/x", b"1").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedTopicShape(_)));
    }

    #[test]
    fn test_wrong_affixes_rejected() {
        let err = decode("influx/temp/value/status", b"1").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedTopicShape(_)));

        let err = decode("influxdb/temp/value/state", b"1").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedTopicShape(_)));
    }

    #[test]
    fn test_missing_measurement_and_field_rejected() {
        let err = decode("influx/state", b"1").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedTopicShape(_)));
    }

    #[test]
    fn test_empty_segments_rejected() {
        let err = decode("influx///state", b"1").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedTopicShape(_)));
    }

    #[test]
    fn test_nan_sentinel_rejected() {
        let err = decode("influx/environ/pm25/state", b"nan").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidPayload(_)));
    }

    #[test]
    fn test_empty_payload_rejected() {
        let err = decode("influx/environ/pm25/state", b"").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidPayload(_)));

        let err = decode("influx/environ/pm25/state", b"   ").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidPayload(_)));
    }

    #[test]
    fn test_unit_suffix_noise_stripped() {
        let record = decode("influx/environ/pm25/state", b"  17.2W ").unwrap();
        assert_eq!(record.value, 17.2);
    }

    #[test]
    fn test_negative_value_accepted() {
        let record = decode("influx/environ/temp/state", b"-3.5").unwrap();
        assert_eq!(record.value, -3.5);
    }

    #[test]
    fn test_embedded_minus_signs_still_fail() {
        let err = decode("influx/environ/temp/state", b"1-2-3").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidPayload(_)));
    }

    #[test]
    fn test_multiple_decimal_points_rejected() {
        let err = decode("influx/environ/temp/state", b"1.2.3").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidPayload(_)));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let err = decode("influx/environ/temp/state", &[0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidPayload(_)));
    }
}
