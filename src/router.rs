//! Topic router: first-segment dispatch to the matching decoder.

use crate::device::{self, DeviceLabelTable};
use crate::error::DecodeError;
use crate::record::{InboundMessage, Record};
use crate::tagged;

/// Dispatch an inbound message to the decoder selected by its first topic
/// segment.
///
/// Returns `None` for unrecognized prefixes: those messages are ignored
/// without logging, they are not an error. A `Some(Err(_))` is terminal for
/// this message only; the caller logs it and continues.
pub fn decode(
    msg: &InboundMessage,
    labels: &DeviceLabelTable,
) -> Option<Result<Record, DecodeError>> {
    let prefix = msg.topic.split('/').next().unwrap_or_default();

    match prefix {
        tagged::PREFIX => Some(tagged::decode(&msg.topic, &msg.payload)),
        device::PREFIX => Some(device::decode(&msg.payload, labels)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_tagged_topics() {
        let msg = InboundMessage::new("influx/environ/pm25/state", b"23.5".to_vec());
        let record = decode(&msg, &DeviceLabelTable::builtin())
            .unwrap()
            .unwrap();

        assert_eq!(record.measurement, "environ");
        assert_eq!(record.value, 23.5);
    }

    #[test]
    fn test_routes_device_events() {
        let payload = br#"{"mac":"000D6F0002588E41","cum_energy":1.0,"ts":10}"#;
        let msg = InboundMessage::new("plugwise2mqtt/state/energy/sticky01", payload.to_vec());
        let record = decode(&msg, &DeviceLabelTable::builtin())
            .unwrap()
            .unwrap();

        assert_eq!(record.measurement, "energyv3");
        assert_eq!(record.timestamp, Some(10));
    }

    #[test]
    fn test_unrecognized_prefix_is_ignored() {
        let msg = InboundMessage::new("zigbee2mqtt/livingroom/lamp", b"on".to_vec());
        assert!(decode(&msg, &DeviceLabelTable::builtin()).is_none());

        let msg = InboundMessage::new("", b"".to_vec());
        assert!(decode(&msg, &DeviceLabelTable::builtin()).is_none());
    }

    #[test]
    fn test_decoder_error_is_returned_not_panicked() {
        let msg = InboundMessage::new("influx/environ/pm25/state", b"nan".to_vec());
        let result = decode(&msg, &DeviceLabelTable::builtin()).unwrap();
        assert!(result.is_err());
    }

    #[test]
    fn test_prefix_must_match_whole_segment() {
        // "influxdb" shares a prefix string but is a different first segment.
        let msg = InboundMessage::new("influxdb/environ/pm25/state", b"1".to_vec());
        assert!(decode(&msg, &DeviceLabelTable::builtin()).is_none());
    }
}
