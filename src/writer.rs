//! HTTP writer for the InfluxDB line-protocol endpoint.

use std::time::Duration;

use crate::config::InfluxConfig;
use crate::error::WriteError;

/// Writer that POSTs line-protocol records to a configured write endpoint.
///
/// Keeps no retry state: a failed write is reported once to the caller and
/// forgotten. The request timeout bounds the only blocking call in the
/// message-handling path.
#[derive(Debug, Clone)]
pub struct InfluxWriter {
    client: reqwest::Client,
    write_url: String,
    username: Option<String>,
    password: Option<String>,
}

impl InfluxWriter {
    /// Create a writer from configuration.
    pub fn new(config: &InfluxConfig) -> Result<Self, WriteError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            write_url: config.write_url.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// Write one serialized record.
    ///
    /// A non-success response status is a [`WriteError::Status`]; transport
    /// errors (including the request timeout) surface as
    /// [`WriteError::Http`].
    pub async fn write(&self, line: &str) -> Result<(), WriteError> {
        let mut request = self.client.post(&self.write_url).body(line.to_string());

        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_deref());
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(WriteError::Status(response.status()));
        }

        Ok(())
    }

    /// The configured write endpoint.
    pub fn write_url(&self) -> &str {
        &self.write_url
    }
}
