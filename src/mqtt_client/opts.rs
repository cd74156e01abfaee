/// Options applied to every connection a client makes.
pub struct MqttClientOptions {
    // Keep-alive interval in seconds, sent in the CONNECT variable header.
    // The background pulse pings at half this interval (minimum 1 second).
    pub keep_alive: u16,
    // Request a clean (non-persistent) session on connect.
    pub clean_session: bool,
}

impl Default for MqttClientOptions {
    fn default() -> Self {
        Self {
            keep_alive: 60,
            clean_session: true,
        }
    }
}
