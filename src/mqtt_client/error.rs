// SPDX-License-Identifier: MPL-2.0

//! Error types for MQTT client operations
//!
//! The taxonomy distinguishes local state errors (returned to the caller
//! before any I/O happens) from handshake, transport and framing failures.

use crate::mqtt_serde::parser::ParseError;
use std::fmt;
use std::io;

pub type MqttClientResult<T> = Result<T, MqttClientError>;

/// Error type for MQTT client operations
#[derive(Debug, Clone)]
pub enum MqttClientError {
    // ==================== State Errors (local, no I/O performed) ====================
    /// Operation attempted while not connected to the broker
    NotConnected,

    /// Connect attempted while a connection is already live
    AlreadyConnected,

    // ==================== Handshake Errors (synchronous, from connect) ====================
    /// Broker refused the connection, or the CONNACK reply was malformed
    HandshakeRejected { return_code: u8 },

    // ==================== Connection Errors (asynchronous after handshake) ====================
    /// Network I/O error on the underlying stream
    Transport {
        kind: io::ErrorKind,
        message: String,
    },

    /// Inbound framing violated the protocol (bad remaining length,
    /// truncated packet body, malformed PUBLISH)
    Protocol { message: String },
}

impl MqttClientError {
    /// Returns true for errors raised before any bytes were written.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::NotConnected | Self::AlreadyConnected)
    }

    /// Convert from io::Error with context about where it occurred
    pub fn from_io_error(error: io::Error, context: &str) -> Self {
        Self::Transport {
            kind: error.kind(),
            message: format!("{}: {}", context, error),
        }
    }
}

impl fmt::Display for MqttClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "Not connected to broker. Call connect() first."),
            Self::AlreadyConnected => write!(f, "Already connected to broker."),
            Self::HandshakeRejected { return_code } => {
                write!(
                    f,
                    "Connection rejected by broker (CONNACK return code: 0x{:02X})",
                    return_code
                )
            }
            Self::Transport { kind, message } => {
                write!(f, "Transport error ({:?}): {}", kind, message)
            }
            Self::Protocol { message } => write!(f, "MQTT protocol violation: {}", message),
        }
    }
}

impl std::error::Error for MqttClientError {}

impl From<io::Error> for MqttClientError {
    fn from(error: io::Error) -> Self {
        Self::Transport {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

impl From<ParseError> for MqttClientError {
    fn from(error: ParseError) -> Self {
        Self::Protocol {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_errors() {
        assert!(MqttClientError::NotConnected.is_local());
        assert!(MqttClientError::AlreadyConnected.is_local());
        assert!(!MqttClientError::HandshakeRejected { return_code: 2 }.is_local());
    }

    #[test]
    fn test_from_io_error_keeps_kind() {
        let io_err = io::Error::new(io::ErrorKind::ConnectionReset, "peer reset");
        match MqttClientError::from_io_error(io_err, "packet write") {
            MqttClientError::Transport { kind, message } => {
                assert_eq!(kind, io::ErrorKind::ConnectionReset);
                assert!(message.starts_with("packet write"));
            }
            other => panic!("expected Transport, got {:?}", other),
        }
    }
}
