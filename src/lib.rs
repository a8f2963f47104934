//! InfluxDB exporter for Zenoh telemetry.
//!
//! This crate subscribes to two pub/sub topic vocabularies, normalizes both
//! into a single canonical metric record, and writes the records to an
//! InfluxDB line-protocol endpoint over HTTP.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │  Zenoh Network  │────>│     Pipeline    │────>│    InfluxDB     │
//! │ influx/**       │     │ route / decode  │     │  (HTTP /write)  │
//! │ plugwise2mqtt/**│     │ / serialize     │     │                 │
//! └─────────────────┘     └─────────────────┘     └─────────────────┘
//! ```
//!
//! Two decoders share the [`record::Record`] output contract:
//!
//! - [`tagged`] reads measurement, tag pairs, and field name from the topic
//!   segments of `influx/<measurement>/(<tag>/<value>/)*<field>/state` and
//!   the numeric value from the payload text.
//! - [`device`] reads a JSON energy event from `plugwise2mqtt/**` payloads,
//!   maps the hardware id to a source label, and converts watt-hours to
//!   joules.
//!
//! Decode and write failures are absorbed per message: they are logged with
//! the offending topic and payload, and never interrupt the subscription.
//!
//! # Usage
//!
//! Run the exporter binary with a configuration file:
//!
//! ```bash
//! zenoh-exporter-influxdb --config config.json5
//! ```
//!
//! # Configuration
//!
//! See [`config::ExporterConfig`] for configuration options.

pub mod config;
pub mod device;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod router;
pub mod subscriber;
pub mod tagged;
pub mod writer;

pub use config::ExporterConfig;
pub use device::DeviceLabelTable;
pub use error::{DecodeError, WriteError};
pub use pipeline::Pipeline;
pub use record::{InboundMessage, Record};
pub use subscriber::TelemetrySubscriber;
pub use writer::InfluxWriter;
