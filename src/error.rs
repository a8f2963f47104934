use thiserror::Error;

/// Reasons a single inbound message fails to decode into a record.
///
/// Every variant is terminal for that one message: the pipeline logs it
/// together with the offending topic and payload, then moves on. None of
/// these may escalate past the dispatch boundary.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The topic does not match the expected grammar (segment count or
    /// literal prefix/suffix).
    #[error("malformed topic shape: {0}")]
    MalformedTopicShape(String),

    /// The payload cannot be decoded/parsed into the required type, or is
    /// an explicit non-numeric sentinel.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// Structurally valid device event whose identifier has no configured
    /// label.
    #[error("unknown device: no label configured for id '{0}'")]
    UnknownDevice(String),
}

/// Failure of an outbound write to the InfluxDB endpoint.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("write endpoint returned status {0}")]
    Status(reqwest::StatusCode),
}
