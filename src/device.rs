//! Decoder for device energy events.
//!
//! Devices publish cumulative energy readings as JSON under
//! `plugwise2mqtt/state/energy/<deviceId>`. The payload carries the hardware
//! identifier, a cumulative watt-hour counter, and an explicit timestamp.
//! Readings are converted to joules and attributed to a human-readable
//! source label via a static lookup table.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::DecodeError;
use crate::record::Record;

/// First topic segment that routes to this decoder.
pub const PREFIX: &str = "plugwise2mqtt";

/// Measurement name for all device energy records.
const MEASUREMENT: &str = "energyv3";

/// Number of trailing identifier characters used as the lookup key.
const SUFFIX_LEN: usize = 5;

/// Built-in mapping from device-id suffix to source label.
///
/// Keys are the last five characters of the lower-cased hardware id.
const BUILTIN_LABELS: &[(&str, &str)] = &[
    ("88e41", "thermomix"),
    ("8c2fa", "dishwasher"),
    ("85f13", "washing_machine"),
    ("8a0c4", "dryer"),
    ("87b56", "fridge"),
    ("89d2e", "tv"),
];

/// Immutable device-id-suffix to label mapping, loaded once at startup.
#[derive(Debug, Clone)]
pub struct DeviceLabelTable {
    labels: HashMap<String, String>,
}

impl DeviceLabelTable {
    /// Table containing only the built-in labels.
    pub fn builtin() -> Self {
        let labels = BUILTIN_LABELS
            .iter()
            .map(|(suffix, label)| (suffix.to_string(), label.to_string()))
            .collect();
        Self { labels }
    }

    /// Built-in labels extended (and overridden) by configured entries.
    ///
    /// Configured keys are lower-cased so lookups stay case-insensitive on
    /// the identifier side.
    pub fn with_entries(entries: &HashMap<String, String>) -> Self {
        let mut table = Self::builtin();
        for (suffix, label) in entries {
            table.labels.insert(suffix.to_lowercase(), label.clone());
        }
        table
    }

    /// Look up the label for a device-id suffix.
    pub fn get(&self, suffix: &str) -> Option<&str> {
        self.labels.get(suffix).map(String::as_str)
    }

    /// Number of configured labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Wire shape of a device energy event. Additional JSON fields are ignored.
#[derive(Debug, Deserialize)]
struct DeviceEvent {
    /// Hardware identifier.
    mac: String,
    /// Cumulative energy in watt-hours.
    cum_energy: f64,
    /// Reading timestamp in epoch seconds.
    ts: i64,
}

/// Decode a device energy event payload into a record.
///
/// The tag order in the output is fixed (`quantity`, `type`, `uniqueid`,
/// `source`): it is a contract of the output format, not incidental.
pub fn decode(payload: &[u8], labels: &DeviceLabelTable) -> Result<Record, DecodeError> {
    let event: DeviceEvent = serde_json::from_slice(payload)
        .map_err(|e| DecodeError::InvalidPayload(format!("bad device event JSON: {}", e)))?;

    let unique_id = event.mac.to_lowercase();
    let suffix = id_suffix(&unique_id);
    let source = labels
        .get(suffix)
        .ok_or_else(|| DecodeError::UnknownDevice(unique_id.clone()))?
        .to_string();

    // Wh -> J. Truncation matches the unit convention of the target store.
    let joules = (event.cum_energy * 3600.0).trunc();
    if !joules.is_finite() {
        return Err(DecodeError::InvalidPayload(format!(
            "cum_energy {} does not convert to a finite joule value",
            event.cum_energy
        )));
    }

    Ok(Record {
        measurement: MEASUREMENT.to_string(),
        tags: vec![
            ("quantity".to_string(), "electricity".to_string()),
            ("type".to_string(), "consumption".to_string()),
            ("uniqueid".to_string(), unique_id),
            ("source".to_string(), source),
        ],
        field: "value".to_string(),
        value: joules,
        timestamp: Some(event.ts),
    })
}

/// Last [`SUFFIX_LEN`] characters of an identifier, or the whole identifier
/// when it is shorter.
fn id_suffix(id: &str) -> &str {
    match id.char_indices().rev().nth(SUFFIX_LEN - 1) {
        Some((start, _)) => &id[start..],
        None => id,
    }
}
