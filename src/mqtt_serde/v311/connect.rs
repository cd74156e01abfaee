use serde::{Deserialize, Serialize};

use crate::mqtt_serde::base_data::TwoByteInteger;
use crate::mqtt_serde::control_packet::{ControlPacketType, MqttControlPacket};
use crate::mqtt_serde::encode_utf8_string;
use crate::mqtt_serde::parser::ParseError;

/// Represents the CONNECT packet in MQTT 3.1.1.
///
/// This client never sets a will, username or password, so the connect
/// flags byte only ever carries the clean-session bit.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct MqttConnect {
    pub clean_session: bool,
    pub keep_alive: u16,
    pub client_id: String,
}

impl MqttConnect {
    pub fn new(client_id: String, keep_alive: u16, clean_session: bool) -> Self {
        Self {
            clean_session,
            keep_alive,
            client_id,
        }
    }
}

impl MqttControlPacket for MqttConnect {
    fn control_packet_type(&self) -> u8 {
        ControlPacketType::CONNECT as u8
    }

    fn variable_header(&self) -> Result<Vec<u8>, ParseError> {
        let mut vh = Vec::new();
        // Protocol Name
        vh.extend(encode_utf8_string("MQTT")?);
        // Protocol Level
        vh.push(4);

        let mut flags = 0u8;
        if self.clean_session {
            flags |= 0x02;
        }
        vh.push(flags);

        // Keep Alive
        vh.extend_from_slice(&TwoByteInteger::encode(self.keep_alive));
        Ok(vh)
    }

    fn payload(&self) -> Result<Vec<u8>, ParseError> {
        // Client Identifier is the sole payload field.
        encode_utf8_string(&self.client_id)
    }
}
