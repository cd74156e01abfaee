// SPDX-License-Identifier: MPL-2.0

// Integration tests for the packet codec
// These tests are run as integration tests from the tests/ directory

use roomlink::mqtt_serde::base_data::{Utf8String, VariableByteInteger};
use roomlink::mqtt_serde::control_packet::MqttControlPacket;
use roomlink::mqtt_serde::parser::{
    packet_type, parse_packet_id, parse_remaining_length, parse_utf8_string, ParseError,
};
use roomlink::mqtt_serde::v311::{MqttPublish, MqttSubscribe};

#[test]
fn test_packet_type_extraction() {
    assert_eq!(packet_type(&[0x10]).unwrap(), 1); // CONNECT
    assert_eq!(packet_type(&[0x20]).unwrap(), 2); // CONNACK
    assert_eq!(packet_type(&[0x30]).unwrap(), 3); // PUBLISH
    assert_eq!(packet_type(&[0xc0]).unwrap(), 12); // PINGREQ
    assert_eq!(packet_type(&[0xe0]).unwrap(), 14); // DISCONNECT

    assert!(matches!(packet_type(&[]), Err(ParseError::BufferTooShort)));
}

#[test]
fn test_remaining_length_roundtrip_sweep() {
    // boundary values where the encoding gains a byte
    let boundaries = [
        0u32, 1, 127, 128, 16383, 16384, 2097151, 2097152, 268435454, 268435455,
    ];
    for &value in &boundaries {
        let encoded = VariableByteInteger::encode(value);
        let (decoded, consumed) = VariableByteInteger::decode(&encoded).unwrap();
        assert_eq!(value as usize, decoded);
        assert_eq!(encoded.len(), consumed);
    }

    // strided sweep across the rest of the encodable range
    let mut value = 0u32;
    while value <= 268_435_455 {
        let encoded = VariableByteInteger::encode(value);
        let expected_width = match value {
            0..=127 => 1,
            128..=16_383 => 2,
            16_384..=2_097_151 => 3,
            _ => 4,
        };
        assert_eq!(encoded.len(), expected_width, "width of {}", value);
        let (decoded, _) = parse_remaining_length(&encoded).unwrap();
        assert_eq!(value as usize, decoded);
        value = value.saturating_add(1_048_573);
    }
}

#[test]
fn test_utf8_string_roundtrip_at_length_limit() {
    let s = "x".repeat(65535);
    let encoded = Utf8String::encode(&s);
    assert_eq!(encoded.len(), 65537);
    let (decoded, consumed) = parse_utf8_string(&encoded).unwrap();
    assert_eq!(s, decoded);
    assert_eq!(consumed, 65537);
}

#[test]
fn test_publish_too_long_topic_rejected() {
    // the 2-byte length prefix cannot represent more than 65535 bytes
    let publish = MqttPublish::new("x".repeat(65536), Vec::new());
    assert!(matches!(
        publish.to_bytes(),
        Err(ParseError::StringTooLong)
    ));
}

#[test]
fn test_subscribe_wire_image_parses_back() {
    let subscribe = MqttSubscribe::new(7, vec!["rooms/+/go".to_string(), "show/abort".to_string()]);
    let bytes = subscribe.to_bytes().unwrap();
    assert_eq!(bytes[0], 0x82);

    let (remaining, vbi_len) = parse_remaining_length(&bytes[1..]).unwrap();
    let body = &bytes[1 + vbi_len..];
    assert_eq!(remaining, body.len());

    let (packet_id, consumed) = parse_packet_id(body).unwrap();
    assert_eq!(packet_id, 7);

    let mut offset = consumed;
    let mut filters = Vec::new();
    while offset < body.len() {
        let (filter, used) = parse_utf8_string(&body[offset..]).unwrap();
        offset += used;
        assert_eq!(body[offset], 0x00, "requested QoS must be 0");
        offset += 1;
        filters.push(filter);
    }
    assert_eq!(filters, vec!["rooms/+/go", "show/abort"]);
}

#[test]
fn test_publish_wire_image_parses_back() {
    let publish = MqttPublish::new("rooms/3/fire".to_string(), b"go".to_vec());
    let bytes = publish.to_bytes().unwrap();
    assert_eq!(bytes[0], 0x30);

    let (remaining, vbi_len) = parse_remaining_length(&bytes[1..]).unwrap();
    let body = &bytes[1 + vbi_len..];
    assert_eq!(remaining, body.len());

    let parsed = MqttPublish::from_body(body).unwrap();
    assert_eq!(parsed.topic_name, "rooms/3/fire");
    assert_eq!(parsed.payload, b"go");
}
