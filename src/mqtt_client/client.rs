// SPDX-License-Identifier: MPL-2.0

//! Tokio-based MQTT 3.1.1 client, QoS 0 only.
//!
//! One TCP connection carries three concurrent activities: the caller-driven
//! write path (connect/subscribe/publish/disconnect), a background frame
//! reader that parses inbound packets, and a keep-alive pulse. All outbound
//! writes serialize through the state mutex, which acts as the write gate.

use std::convert::TryFrom;
use std::io::ErrorKind;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::mqtt_serde::base_data::VariableByteInteger;
use crate::mqtt_serde::control_packet::{ControlPacketType, MqttControlPacket};
use crate::mqtt_serde::v311::connack::{MqttConnAck, CONNACK_LEN};
use crate::mqtt_serde::v311::{
    MqttConnect, MqttDisconnect, MqttPingReq, MqttPublish, MqttSubscribe,
};

use super::error::{MqttClientError, MqttClientResult};
use super::opts::MqttClientOptions;

/// Callbacks raised by the background frame reader.
///
/// The reader task is the sole producer, so callbacks arrive in wire order
/// and never overlap. A handler must not block indefinitely: the reader
/// cannot consume further frames until the callback returns.
#[async_trait]
pub trait ClientEventHandler: Send + Sync {
    /// Called once per inbound PUBLISH frame, in arrival order.
    async fn on_message_received(&mut self, topic: &str, payload: &[u8]) {
        let _ = (topic, payload);
    }

    /// Called exactly once when the connection ends. `None` means an
    /// orderly shutdown (explicit disconnect or clean peer close).
    async fn on_disconnected(&mut self, error: Option<&MqttClientError>) {
        let _ = error;
    }
}

type SharedHandler = Arc<Mutex<Box<dyn ClientEventHandler>>>;
type SharedState = Arc<Mutex<ClientState>>;

/// Per-connection mutable state. The mutex around it doubles as the write
/// gate: every outbound packet is written and flushed while holding it, so
/// no two packets ever interleave on the wire.
struct ClientState {
    connected: bool,
    writer: Option<OwnedWriteHalf>,
    next_packet_id: u16,
    reader_cancel: Option<CancellationToken>,
    keep_alive_cancel: Option<CancellationToken>,
}

impl ClientState {
    fn new() -> Self {
        ClientState {
            connected: false,
            writer: None,
            next_packet_id: 1,
            reader_cancel: None,
            keep_alive_cancel: None,
        }
    }

    // Packet identifiers run 1..=65535 and wrap; 0 is reserved by the spec.
    fn next_packet_id(&mut self) -> u16 {
        let id = self.next_packet_id;
        self.next_packet_id = self.next_packet_id.wrapping_add(1);
        if self.next_packet_id == 0 {
            self.next_packet_id = 1;
        }
        id
    }

    /// Drops the connection resources and cancels both background tasks.
    /// Returns true when this call performed the Connected → Disconnected
    /// transition; the caller then raises the disconnection notification,
    /// which keeps it at exactly one per session however many paths race
    /// into teardown.
    fn teardown(&mut self) -> bool {
        let was_connected = self.connected;
        self.connected = false;
        if let Some(token) = self.reader_cancel.take() {
            token.cancel();
        }
        if let Some(token) = self.keep_alive_cancel.take() {
            token.cancel();
        }
        self.writer = None;
        was_connected
    }
}

/// Minimal MQTT 3.1.1 client bound to a single broker connection.
pub struct MqttClient {
    options: MqttClientOptions,
    state: SharedState,
    handler: SharedHandler,
}

impl MqttClient {
    pub fn new(options: MqttClientOptions, handler: Box<dyn ClientEventHandler>) -> Self {
        MqttClient {
            options,
            state: Arc::new(Mutex::new(ClientState::new())),
            handler: Arc::new(Mutex::new(handler)),
        }
    }

    /// Connect to the broker and perform the CONNECT/CONNACK handshake.
    ///
    /// Blocks until the fixed 4-byte CONNACK reply arrives. On success the
    /// frame-reader and keep-alive tasks are started; on any failure the
    /// client stays Disconnected and nothing is spawned.
    pub async fn connect(&self, host: &str, port: u16, client_id: &str) -> MqttClientResult<()> {
        let mut state = self.state.lock().await;
        if state.connected {
            return Err(MqttClientError::AlreadyConnected);
        }

        let stream = TcpStream::connect((host, port))
            .await
            .map_err(|e| MqttClientError::from_io_error(e, "broker connect"))?;
        let (mut read_half, mut write_half) = stream.into_split();

        let connect = MqttConnect::new(
            client_id.to_string(),
            self.options.keep_alive,
            self.options.clean_session,
        );
        let bytes = connect.to_bytes()?;
        write_half
            .write_all(&bytes)
            .await
            .map_err(|e| MqttClientError::from_io_error(e, "CONNECT write"))?;
        write_half
            .flush()
            .await
            .map_err(|e| MqttClientError::from_io_error(e, "CONNECT flush"))?;

        let mut reply = [0u8; CONNACK_LEN];
        read_half
            .read_exact(&mut reply)
            .await
            .map_err(|e| MqttClientError::from_io_error(e, "CONNACK read"))?;

        let connack = MqttConnAck::from_reply(&reply).map_err(|_| {
            MqttClientError::HandshakeRejected {
                return_code: reply[3],
            }
        })?;
        if !connack.is_accepted() {
            return Err(MqttClientError::HandshakeRejected {
                return_code: connack.return_code,
            });
        }

        debug!(client_id, "connected to {}:{}", host, port);

        let reader_cancel = CancellationToken::new();
        let keep_alive_cancel = CancellationToken::new();
        state.connected = true;
        state.writer = Some(write_half);
        state.next_packet_id = 1;
        state.reader_cancel = Some(reader_cancel.clone());
        state.keep_alive_cancel = Some(keep_alive_cancel.clone());

        tokio::spawn(reader_loop(
            read_half,
            Arc::clone(&self.state),
            Arc::clone(&self.handler),
            reader_cancel,
        ));
        tokio::spawn(keep_alive_loop(
            Arc::clone(&self.state),
            self.options.keep_alive,
            keep_alive_cancel,
        ));

        Ok(())
    }

    /// Subscribe to a list of topic filters, all at QoS 0, in one SUBSCRIBE
    /// packet. The guarantee is "request transmitted": no SUBACK is awaited.
    pub async fn subscribe(&self, topics: &[&str]) -> MqttClientResult<()> {
        let mut state = self.state.lock().await;
        if !state.connected {
            return Err(MqttClientError::NotConnected);
        }
        let packet_id = state.next_packet_id();
        let filters = topics.iter().map(|t| t.to_string()).collect();
        let bytes = MqttSubscribe::new(packet_id, filters).to_bytes()?;
        write_locked(&mut state, &bytes).await
    }

    /// Publish a message at QoS 0. Bytes are flushed to the transport
    /// before this returns; no acknowledgment is solicited.
    pub async fn publish(&self, topic: &str, payload: &[u8]) -> MqttClientResult<()> {
        let mut state = self.state.lock().await;
        if !state.connected {
            return Err(MqttClientError::NotConnected);
        }
        let bytes = MqttPublish::new(topic.to_string(), payload.to_vec()).to_bytes()?;
        write_locked(&mut state, &bytes).await
    }

    /// Disconnect from the broker. Idempotent: a no-op when already
    /// disconnected. The DISCONNECT packet is best-effort; teardown runs
    /// whether or not the send succeeded.
    pub async fn disconnect(&self) {
        let mut state = self.state.lock().await;
        if !state.connected {
            return;
        }
        if let Ok(bytes) = MqttDisconnect::new().to_bytes() {
            if let Some(writer) = state.writer.as_mut() {
                let _ = writer.write_all(&bytes).await;
                let _ = writer.flush().await;
            }
        }
        let should_notify = state.teardown();
        drop(state);

        if should_notify {
            self.handler.lock().await.on_disconnected(None).await;
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.state.lock().await.connected
    }
}

/// Writes and flushes one packet while the state lock (the write gate) is
/// held, so the packet reaches the wire whole.
async fn write_locked(state: &mut ClientState, bytes: &[u8]) -> MqttClientResult<()> {
    let writer = state.writer.as_mut().ok_or(MqttClientError::NotConnected)?;
    writer
        .write_all(bytes)
        .await
        .map_err(|e| MqttClientError::from_io_error(e, "packet write"))?;
    writer
        .flush()
        .await
        .map_err(|e| MqttClientError::from_io_error(e, "packet flush"))?;
    Ok(())
}

/// Background frame reader. Runs until cancellation, orderly close, or a
/// failure, then performs teardown and raises the disconnection
/// notification if no concurrent explicit disconnect got there first.
async fn reader_loop(
    mut reader: OwnedReadHalf,
    state: SharedState,
    handler: SharedHandler,
    cancel: CancellationToken,
) {
    let error = match read_frames(&mut reader, &handler, &cancel).await {
        Ok(()) => None,
        Err(e) => Some(e),
    };
    if let Some(e) = &error {
        warn!(error = %e, "frame reader stopped");
    }

    let should_notify = state.lock().await.teardown();
    if should_notify {
        handler.lock().await.on_disconnected(error.as_ref()).await;
    }
}

/// The per-frame state machine: fixed-header byte, remaining-length varint,
/// exact-length body, dispatch on the packet-type nibble. Only PUBLISH is
/// interpreted; every other inbound type is consumed to keep the stream
/// framing aligned and then discarded.
async fn read_frames(
    reader: &mut OwnedReadHalf,
    handler: &SharedHandler,
    cancel: &CancellationToken,
) -> MqttClientResult<()> {
    loop {
        // A zero-byte read here is an orderly close.
        let first = match read_byte(reader, cancel).await? {
            Some(b) => b,
            None => return Ok(()),
        };

        let mut rl_bytes = Vec::with_capacity(4);
        loop {
            let byte = match read_byte(reader, cancel).await? {
                Some(b) => b,
                None if cancel.is_cancelled() => return Ok(()),
                None => {
                    return Err(MqttClientError::Protocol {
                        message: "stream closed inside a fixed header".to_string(),
                    })
                }
            };
            rl_bytes.push(byte);
            if byte & 0x80 == 0 {
                break;
            }
            if rl_bytes.len() == 4 {
                return Err(MqttClientError::Protocol {
                    message: "remaining length exceeds 4 bytes".to_string(),
                });
            }
        }
        let (remaining, _) = VariableByteInteger::decode(&rl_bytes)?;

        let mut body = vec![0u8; remaining];
        tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            res = reader.read_exact(&mut body) => {
                res.map_err(|e| match e.kind() {
                    ErrorKind::UnexpectedEof => MqttClientError::Protocol {
                        message: "stream closed inside a packet body".to_string(),
                    },
                    _ => MqttClientError::from_io_error(e, "packet body read"),
                })?;
            }
        }

        match ControlPacketType::try_from(first >> 4) {
            Ok(ControlPacketType::PUBLISH) => {
                let publish = MqttPublish::from_body(&body)?;
                handler
                    .lock()
                    .await
                    .on_message_received(&publish.topic_name, &publish.payload)
                    .await;
            }
            Ok(other) => {
                debug!(packet = ?other, len = body.len(), "discarding inbound packet");
            }
            Err(_) => {
                debug!(header = first, "discarding packet with unknown type nibble");
            }
        }
    }
}

/// Reads one byte from the stream. `None` means the read was cancelled or
/// the stream closed without yielding a byte.
async fn read_byte(
    reader: &mut OwnedReadHalf,
    cancel: &CancellationToken,
) -> MqttClientResult<Option<u8>> {
    tokio::select! {
        _ = cancel.cancelled() => Ok(None),
        res = reader.read_u8() => match res {
            Ok(b) => Ok(Some(b)),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(MqttClientError::from_io_error(e, "frame read")),
        },
    }
}

/// Keep-alive pulse: one PINGREQ per half keep-alive interval (minimum one
/// second) while the connection is marked Connected. Send failures are
/// swallowed; the frame reader owns detection of the resulting stream
/// failure.
async fn keep_alive_loop(state: SharedState, keep_alive_secs: u16, cancel: CancellationToken) {
    let interval = Duration::from_secs(u64::max(1, keep_alive_secs as u64 / 2));
    let ping = match MqttPingReq::new().to_bytes() {
        Ok(bytes) => bytes,
        Err(_) => return,
    };

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(interval) => {}
        }

        let mut state = state.lock().await;
        if cancel.is_cancelled() || !state.connected {
            return;
        }
        if let Some(writer) = state.writer.as_mut() {
            let result = match writer.write_all(&ping).await {
                Ok(()) => writer.flush().await,
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                warn!(error = %e, "keep-alive ping failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_id_starts_at_one() {
        let mut state = ClientState::new();
        assert_eq!(state.next_packet_id(), 1);
        assert_eq!(state.next_packet_id(), 2);
    }

    #[test]
    fn test_packet_id_wraps_skipping_zero() {
        let mut state = ClientState::new();
        state.next_packet_id = 65535;
        assert_eq!(state.next_packet_id(), 65535);
        assert_eq!(state.next_packet_id(), 1);
    }

    #[test]
    fn test_teardown_reports_transition_once() {
        let mut state = ClientState::new();
        state.connected = true;
        state.reader_cancel = Some(CancellationToken::new());
        state.keep_alive_cancel = Some(CancellationToken::new());
        assert!(state.teardown());
        assert!(!state.teardown());
        assert!(!state.connected);
        assert!(state.reader_cancel.is_none());
        assert!(state.keep_alive_cancel.is_none());
    }

    #[test]
    fn test_teardown_cancels_tokens() {
        let mut state = ClientState::new();
        state.connected = true;
        let reader = CancellationToken::new();
        let keep_alive = CancellationToken::new();
        state.reader_cancel = Some(reader.clone());
        state.keep_alive_cancel = Some(keep_alive.clone());
        state.teardown();
        assert!(reader.is_cancelled());
        assert!(keep_alive.is_cancelled());
    }
}
