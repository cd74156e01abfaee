// SPDX-License-Identifier: MPL-2.0

use serde::{Deserialize, Serialize};

use crate::mqtt_serde::control_packet::{ControlPacketType, MqttControlPacket};
use crate::mqtt_serde::parser::ParseError;

/// Represents the PINGREQ packet in MQTT 3.1.1.
///
/// Sent by the keep-alive pulse to indicate the client is alive in the
/// absence of other control packets. Always `0xC0 0x00` on the wire.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Default)]
pub struct MqttPingReq;

impl MqttPingReq {
    pub fn new() -> Self {
        Self
    }
}

impl MqttControlPacket for MqttPingReq {
    fn control_packet_type(&self) -> u8 {
        ControlPacketType::PINGREQ as u8
    }

    fn variable_header(&self) -> Result<Vec<u8>, ParseError> {
        Ok(Vec::new())
    }

    fn payload(&self) -> Result<Vec<u8>, ParseError> {
        Ok(Vec::new())
    }
}
