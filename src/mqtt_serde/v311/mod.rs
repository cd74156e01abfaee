// SPDX-License-Identifier: MPL-2.0

//! MQTT 3.1.1 packet subset used by the client: outbound CONNECT,
//! SUBSCRIBE, PUBLISH, PINGREQ and DISCONNECT, inbound CONNACK and PUBLISH.

pub mod connack;
pub mod connect;
pub mod disconnect;
pub mod pingreq;
pub mod publish;
pub mod subscribe;

pub use connack::MqttConnAck;
pub use connect::MqttConnect;
pub use disconnect::MqttDisconnect;
pub use pingreq::MqttPingReq;
pub use publish::MqttPublish;
pub use subscribe::MqttSubscribe;
