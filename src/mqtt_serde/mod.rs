// SPDX-License-Identifier: MPL-2.0

pub mod base_data;
pub mod control_packet;
pub mod parser;
pub mod v311;

use crate::mqtt_serde::base_data::{Utf8String, VariableByteInteger};
use crate::mqtt_serde::parser::ParseError;

// MQTT 3.1.1 Spec, 1.5.3: string payloads carry a 2-byte length prefix,
// so anything longer than 65535 bytes cannot be represented.
pub(crate) fn encode_utf8_string(s: &str) -> Result<Vec<u8>, ParseError> {
    if s.len() > u16::MAX as usize {
        return Err(ParseError::StringTooLong);
    }
    Ok(Utf8String::encode(s))
}

// MQTT 3.1.1 Spec, 2.2.3
fn encode_variable_length(len: usize) -> Vec<u8> {
    VariableByteInteger::encode(len as u32)
}
