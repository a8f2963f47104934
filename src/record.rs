//! Canonical metric record and its InfluxDB line-protocol form.

/// A single inbound pub/sub message, as handed to the router.
///
/// Transient: exists only for the duration of one dispatch.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Full topic / key expression the message arrived on.
    pub topic: String,
    /// Opaque payload bytes.
    pub payload: Vec<u8>,
}

impl InboundMessage {
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }
}

/// Canonical output of both decoders.
///
/// Invariants upheld by the decoders: `measurement` and `field` are
/// non-empty, `value` is finite, tag keys are unique, and tag order is
/// deterministic (it is part of the output contract).
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Measurement name.
    pub measurement: String,
    /// Tag key/value pairs, serialized in this exact order.
    pub tags: Vec<(String, String)>,
    /// Field name.
    pub field: String,
    /// Field value.
    pub value: f64,
    /// Explicit timestamp in epoch seconds; `None` means "now" (the store
    /// assigns the receive time).
    pub timestamp: Option<i64>,
}

impl Record {
    /// Serialize into the line-protocol text form:
    ///
    /// `measurement[,tagKey=tagValue]* field=value[ timestamp]`
    ///
    /// Tags are appended in stored order; the timestamp segment is present
    /// only when an explicit timestamp is set.
    pub fn to_line(&self) -> String {
        let mut line = String::with_capacity(self.measurement.len() + self.field.len() + 32);
        line.push_str(&self.measurement);

        for (key, value) in &self.tags {
            line.push(',');
            line.push_str(key);
            line.push('=');
            line.push_str(value);
        }

        line.push(' ');
        line.push_str(&self.field);
        line.push('=');
        line.push_str(&self.value.to_string());

        if let Some(ts) = self.timestamp {
            line.push(' ');
            line.push_str(&ts.to_string());
        }

        line
    }
}
