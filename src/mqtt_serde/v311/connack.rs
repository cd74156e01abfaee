// SPDX-License-Identifier: MPL-2.0

use serde::{Deserialize, Serialize};

use crate::mqtt_serde::control_packet::ControlPacketType;
use crate::mqtt_serde::parser::ParseError;

/// A CONNACK is always exactly four bytes on the wire.
pub const CONNACK_LEN: usize = 4;

/// Represents the CONNACK packet in MQTT 3.1.1.
///
/// The CONNACK packet is the packet sent by the Server in response to a
/// CONNECT packet received from a Client. Return code 0 means the
/// connection was accepted.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct MqttConnAck {
    pub session_present: bool,
    pub return_code: u8,
}

impl MqttConnAck {
    /// Decodes the fixed 4-byte CONNACK reply read during the handshake.
    pub fn from_reply(reply: &[u8; CONNACK_LEN]) -> Result<Self, ParseError> {
        if reply[0] >> 4 != ControlPacketType::CONNACK as u8 || reply[0] & 0x0F != 0 {
            return Err(ParseError::InvalidPacketType);
        }
        if reply[1] != 0x02 {
            return Err(ParseError::ParseError(
                "CONNACK must have a remaining length of 2".to_string(),
            ));
        }
        Ok(Self {
            session_present: reply[2] & 0x01 == 0x01,
            return_code: reply[3],
        })
    }

    pub fn is_accepted(&self) -> bool {
        self.return_code == 0
    }
}
