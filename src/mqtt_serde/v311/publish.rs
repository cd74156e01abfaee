use serde::{Deserialize, Serialize};

use crate::mqtt_serde::control_packet::{ControlPacketType, MqttControlPacket};
use crate::mqtt_serde::encode_utf8_string;
use crate::mqtt_serde::parser::{parse_utf8_string, ParseError};

/// Represents the PUBLISH packet in MQTT 3.1.1, restricted to QoS 0.
///
/// At QoS 0 the fixed header carries no DUP/RETAIN flags and the variable
/// header carries no packet identifier, so a PUBLISH is just a
/// length-prefixed topic name followed by the raw application payload.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct MqttPublish {
    pub topic_name: String,
    pub payload: Vec<u8>,
}

impl MqttPublish {
    pub fn new(topic_name: String, payload: Vec<u8>) -> Self {
        Self {
            topic_name,
            payload,
        }
    }

    /// Decodes the body of an inbound PUBLISH frame, everything after the
    /// fixed header: `[2-byte topic length][topic bytes][rest = payload]`.
    pub fn from_body(body: &[u8]) -> Result<Self, ParseError> {
        let (topic_name, consumed) = parse_utf8_string(body)?;
        Ok(Self {
            topic_name,
            payload: body[consumed..].to_vec(),
        })
    }
}

impl MqttControlPacket for MqttPublish {
    fn control_packet_type(&self) -> u8 {
        ControlPacketType::PUBLISH as u8
    }

    fn variable_header(&self) -> Result<Vec<u8>, ParseError> {
        encode_utf8_string(&self.topic_name)
    }

    fn payload(&self) -> Result<Vec<u8>, ParseError> {
        Ok(self.payload.clone())
    }
}
