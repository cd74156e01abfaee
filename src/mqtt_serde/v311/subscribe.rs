use serde::{Deserialize, Serialize};

use crate::mqtt_serde::base_data::TwoByteInteger;
use crate::mqtt_serde::control_packet::{ControlPacketType, MqttControlPacket};
use crate::mqtt_serde::encode_utf8_string;
use crate::mqtt_serde::parser::ParseError;

/// Represents the SUBSCRIBE packet in MQTT 3.1.1.
///
/// Every topic filter is requested at QoS 0; the requested-QoS byte after
/// each filter is always zero. No SUBACK correlation is performed, so the
/// packet identifier is only ever consumed by the broker.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct MqttSubscribe {
    pub packet_id: u16,
    pub topic_filters: Vec<String>,
}

impl MqttSubscribe {
    pub fn new(packet_id: u16, topic_filters: Vec<String>) -> Self {
        Self {
            packet_id,
            topic_filters,
        }
    }
}

impl MqttControlPacket for MqttSubscribe {
    fn control_packet_type(&self) -> u8 {
        ControlPacketType::SUBSCRIBE as u8
    }

    fn flags(&self) -> u8 {
        // For SUBSCRIBE, bits 3,2,1,0 MUST be 0,0,1,0
        0x02
    }

    fn variable_header(&self) -> Result<Vec<u8>, ParseError> {
        Ok(TwoByteInteger::encode(self.packet_id).to_vec())
    }

    fn payload(&self) -> Result<Vec<u8>, ParseError> {
        let mut payload = Vec::new();
        for filter in &self.topic_filters {
            payload.extend(encode_utf8_string(filter)?);
            // requested QoS, fixed at "at most once"
            payload.push(0x00);
        }
        Ok(payload)
    }
}
