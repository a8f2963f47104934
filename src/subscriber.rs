//! Zenoh subscriber feeding inbound messages to the pipeline.

use tokio::sync::watch;
use tracing::{info, trace, warn};
use zenoh::sample::{Sample, SampleKind};

use crate::config::ZenohConfig;
use crate::pipeline::Pipeline;
use crate::record::InboundMessage;
use crate::{device, tagged};

/// Zenoh subscriber that drains the two monitored topic prefixes.
pub struct TelemetrySubscriber {
    pipeline: Pipeline,
    zenoh_config: ZenohConfig,
}

impl TelemetrySubscriber {
    /// Create a new subscriber.
    pub fn new(pipeline: Pipeline, zenoh_config: ZenohConfig) -> Self {
        Self {
            pipeline,
            zenoh_config,
        }
    }

    /// Key expressions covering both decoder vocabularies.
    pub fn key_exprs() -> [String; 2] {
        [
            format!("{}/**", tagged::PREFIX),
            format!("{}/**", device::PREFIX),
        ]
    }

    /// Run the subscriber until the shutdown signal is received.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> anyhow::Result<()> {
        info!("Connecting to Zenoh...");

        // Build Zenoh config
        let mut config = zenoh::Config::default();

        // Set mode
        match self.zenoh_config.mode.as_str() {
            "client" => {
                config
                    .insert_json5("mode", "\"client\"")
                    .map_err(|e| anyhow::anyhow!("Failed to set mode: {}", e))?;
            }
            "router" => {
                config
                    .insert_json5("mode", "\"router\"")
                    .map_err(|e| anyhow::anyhow!("Failed to set mode: {}", e))?;
            }
            _ => {
                config
                    .insert_json5("mode", "\"peer\"")
                    .map_err(|e| anyhow::anyhow!("Failed to set mode: {}", e))?;
            }
        }

        // Set connect endpoints
        if !self.zenoh_config.connect.is_empty() {
            let endpoints_json = serde_json::to_string(&self.zenoh_config.connect)?;
            config
                .insert_json5("connect/endpoints", &endpoints_json)
                .map_err(|e| anyhow::anyhow!("Failed to set connect endpoints: {}", e))?;
        }

        // Set listen endpoints
        if !self.zenoh_config.listen.is_empty() {
            let endpoints_json = serde_json::to_string(&self.zenoh_config.listen)?;
            config
                .insert_json5("listen/endpoints", &endpoints_json)
                .map_err(|e| anyhow::anyhow!("Failed to set listen endpoints: {}", e))?;
        }

        // Open session
        let session = zenoh::open(config)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to open Zenoh session: {}", e))?;

        info!(
            zid = %session.zid(),
            "Connected to Zenoh"
        );

        let [tagged_expr, device_expr] = Self::key_exprs();

        info!(key_expr = %tagged_expr, "Subscribing to tagged measurements");
        let tagged_sub = session
            .declare_subscriber(&tagged_expr)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create subscriber: {}", e))?;

        info!(key_expr = %device_expr, "Subscribing to device events");
        let device_sub = session
            .declare_subscriber(&device_expr)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create subscriber: {}", e))?;

        info!("Subscribers started, waiting for messages...");

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("Shutdown signal received, stopping subscriber");
                        break;
                    }
                }

                sample = tagged_sub.recv_async() => {
                    match sample {
                        Ok(sample) => self.dispatch(sample).await,
                        Err(e) => warn!("Error receiving sample: {}", e),
                    }
                }

                sample = device_sub.recv_async() => {
                    match sample {
                        Ok(sample) => self.dispatch(sample).await,
                        Err(e) => warn!("Error receiving sample: {}", e),
                    }
                }
            }
        }

        // Clean shutdown
        tagged_sub
            .undeclare()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to undeclare subscriber: {}", e))?;
        device_sub
            .undeclare()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to undeclare subscriber: {}", e))?;
        session
            .close()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to close session: {}", e))?;

        info!("Subscriber stopped");
        Ok(())
    }

    /// Convert a sample into an inbound message and hand it to the pipeline.
    async fn dispatch(&self, sample: Sample) {
        if sample.kind() == SampleKind::Delete {
            trace!(key = %sample.key_expr(), "Ignoring delete sample");
            return;
        }

        let msg = InboundMessage::new(
            sample.key_expr().as_str(),
            sample.payload().to_bytes().into_owned(),
        );

        self.pipeline.handle(msg).await;
    }
}
