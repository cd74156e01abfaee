// SPDX-License-Identifier: MPL-2.0

//! Minimal MQTT 3.1.1 client for show-control servers.
//!
//! The crate has two halves: [`mqtt_serde`] holds the byte-level packet
//! codec, and [`mqtt_client`] layers a tokio-based client on top of it,
//! with a caller-driven write path, a background frame reader, and a
//! keep-alive pulse sharing one TCP connection. Only QoS 0 is supported;
//! there is no TLS, no authentication, and no automatic reconnection.
//!
//! [`room_config`] is the self-healing room timing configuration the
//! owning server persists between runs.

pub mod mqtt_client;
pub mod mqtt_serde;
pub mod room_config;

pub use mqtt_client::{
    ClientEventHandler, MqttClient, MqttClientError, MqttClientOptions, MqttClientResult,
};
pub use room_config::RoomConfig;
