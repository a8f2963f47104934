//! Per-message processing pipeline: route, decode, serialize, write.

use tracing::{debug, trace, warn};

use crate::device::DeviceLabelTable;
use crate::record::InboundMessage;
use crate::router;
use crate::writer::InfluxWriter;

/// Stateless-per-message pipeline shared by the subscriber loop.
///
/// The label table is read-only after construction, so handling is safe to
/// run concurrently even though the subscriber invokes it serially.
pub struct Pipeline {
    labels: DeviceLabelTable,
    writer: InfluxWriter,
}

impl Pipeline {
    /// Create a pipeline over a label table and a write endpoint.
    pub fn new(labels: DeviceLabelTable, writer: InfluxWriter) -> Self {
        Self { labels, writer }
    }

    /// Process one inbound message end to end.
    ///
    /// Decode failures and sink failures are logged here and absorbed: one
    /// malformed message or failed write never affects processing of
    /// subsequent messages, and nothing propagates back to the subscriber.
    pub async fn handle(&self, msg: InboundMessage) {
        let record = match router::decode(&msg, &self.labels) {
            // Unrecognized prefix: not ours, drop without logging.
            None => return,
            Some(Err(e)) => {
                warn!(
                    topic = %msg.topic,
                    payload = %String::from_utf8_lossy(&msg.payload),
                    error = %e,
                    "Dropping undecodable message"
                );
                return;
            }
            Some(Ok(record)) => record,
        };

        let line = record.to_line();
        trace!(line = %line, "Writing record");

        match self.writer.write(&line).await {
            Ok(()) => {
                debug!(line = %line, "Record written");
            }
            Err(e) => {
                warn!(line = %line, error = %e, "InfluxDB write failed, dropping record");
            }
        }
    }
}
