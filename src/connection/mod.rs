//! Realtime connection to a board.
//!
//! DESIGN
//! ======
//! [`Connection`] is the seam the session depends on. [`live::LiveConnection`]
//! speaks websocket text frames; [`simulated::SimulatedConnection`] never
//! touches the network, synthesizing updates on a timer and echoing drawn
//! strokes back. Both deliver inbound frames by posting raw text into the
//! session's event queue, in arrival order and without buffering of their
//! own, so the session handles either one identically.
//!
//! ERROR HANDLING
//! ==============
//! `send` is fire-and-forget: it fails fast with [`ConnectionError::NotOpen`]
//! when the connection is not open and never queues or retries. Failures seen
//! after the connection opened reach the session as
//! [`crate::events::SessionEvent::TransportLost`].

pub mod live;
pub mod simulated;

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use async_trait::async_trait;

use crate::config::{ClientConfig, Transport};
use crate::events::EventSender;

#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("invalid websocket url: {0}")]
    InvalidUrl(String),
    #[error("websocket handshake failed: {0}")]
    Handshake(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("timed out connecting to {0}")]
    Timeout(String),
    #[error("connection is not open")]
    NotOpen,
    #[error("connection closed by peer: {reason}")]
    Closed { reason: String },
    #[error("transport error: {0}")]
    Transport(String),
}

/// Connection lifecycle. Moves forward only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Open,
    Closed,
}

#[async_trait]
pub trait Connection: Send {
    /// Open the connection. Resolves once the handshake completed or failed.
    async fn connect(&mut self) -> Result<(), ConnectionError>;

    /// Send one text frame.
    async fn send(&mut self, text: &str) -> Result<(), ConnectionError>;

    /// Close the connection and stop every task it started. Idempotent.
    async fn close(&mut self);

    fn state(&self) -> ConnectionState;
}

/// Builds the connection for a board once login has supplied its id.
pub trait Connector: Send {
    fn open(&self, board_id: &str, events: EventSender) -> Box<dyn Connection>;
}

/// Build the connector the configured transport calls for.
#[must_use]
pub fn connector(config: &ClientConfig) -> Box<dyn Connector> {
    match config.transport {
        Transport::Live => Box::new(live::LiveConnector::new(config)),
        Transport::Simulated => Box::new(simulated::SimulatedConnector::new(config)),
    }
}

/// Connection state shared between a connection and its background tasks.
#[derive(Debug, Clone)]
pub(crate) struct SharedState(Arc<AtomicU8>);

impl SharedState {
    pub(crate) fn new() -> Self {
        Self(Arc::new(AtomicU8::new(encode_state(ConnectionState::Disconnected))))
    }

    pub(crate) fn get(&self) -> ConnectionState {
        decode_state(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn set(&self, state: ConnectionState) {
        self.0.store(encode_state(state), Ordering::Release);
    }
}

fn encode_state(state: ConnectionState) -> u8 {
    match state {
        ConnectionState::Disconnected => 0,
        ConnectionState::Connecting => 1,
        ConnectionState::Open => 2,
        ConnectionState::Closed => 3,
    }
}

fn decode_state(raw: u8) -> ConnectionState {
    match raw {
        0 => ConnectionState::Disconnected,
        1 => ConnectionState::Connecting,
        2 => ConnectionState::Open,
        _ => ConnectionState::Closed,
    }
}
