pub mod client;
pub mod error;
pub mod opts;

pub use client::{ClientEventHandler, MqttClient};
pub use error::{MqttClientError, MqttClientResult};
pub use opts::MqttClientOptions;
