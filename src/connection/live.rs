//! Websocket connection to a board.
//!
//! The board id travels as the `boardId` query parameter of the configured
//! websocket URL. After the handshake the stream is split: the sink stays
//! here for `send`, the read half moves into a reader task that posts every
//! text frame into the session queue as it arrives.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use super::{Connection, ConnectionError, ConnectionState, Connector, SharedState};
use crate::config::ClientConfig;
use crate::events::{EventSender, SessionEvent};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct LiveConnector {
    ws_url: String,
    connect_timeout: Duration,
}

impl LiveConnector {
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self { ws_url: config.ws_url.clone(), connect_timeout: config.timeouts.connect() }
    }
}

impl Connector for LiveConnector {
    fn open(&self, board_id: &str, events: EventSender) -> Box<dyn Connection> {
        Box::new(LiveConnection::new(&self.ws_url, board_id, self.connect_timeout, events))
    }
}

pub struct LiveConnection {
    base_url: String,
    board_id: String,
    connect_timeout: Duration,
    events: EventSender,
    state: SharedState,
    sink: Option<SplitSink<WsStream, WsMessage>>,
    reader: Option<JoinHandle<()>>,
}

impl LiveConnection {
    #[must_use]
    pub fn new(base_url: &str, board_id: &str, connect_timeout: Duration, events: EventSender) -> Self {
        Self {
            base_url: base_url.to_owned(),
            board_id: board_id.to_owned(),
            connect_timeout,
            events,
            state: SharedState::new(),
            sink: None,
            reader: None,
        }
    }

    fn fail(&self, error: ConnectionError) -> Result<(), ConnectionError> {
        self.state.set(ConnectionState::Closed);
        Err(error)
    }
}

#[async_trait]
impl Connection for LiveConnection {
    async fn connect(&mut self) -> Result<(), ConnectionError> {
        match self.state.get() {
            ConnectionState::Open => return Ok(()),
            ConnectionState::Disconnected => {}
            ConnectionState::Connecting | ConnectionState::Closed => return Err(ConnectionError::NotOpen),
        }

        let url = match board_url(&self.base_url, &self.board_id) {
            Ok(url) => url,
            Err(e) => return self.fail(e),
        };

        self.state.set(ConnectionState::Connecting);
        info!(%url, "websocket connecting");
        let (stream, _response) = match tokio::time::timeout(self.connect_timeout, connect_async(url.as_str())).await {
            Ok(Ok(pair)) => pair,
            Ok(Err(e)) => return self.fail(ConnectionError::Handshake(Box::new(e))),
            Err(_) => return self.fail(ConnectionError::Timeout(url)),
        };

        let (sink, stream) = stream.split();
        self.state.set(ConnectionState::Open);
        self.reader = Some(spawn_reader(stream, self.events.clone(), self.state.clone()));
        self.sink = Some(sink);
        info!(board_id = %self.board_id, "websocket open");
        Ok(())
    }

    async fn send(&mut self, text: &str) -> Result<(), ConnectionError> {
        if self.state.get() != ConnectionState::Open {
            return Err(ConnectionError::NotOpen);
        }
        let Some(sink) = self.sink.as_mut() else {
            return Err(ConnectionError::NotOpen);
        };
        if let Err(e) = sink.send(WsMessage::Text(text.to_owned().into())).await {
            return self.fail(ConnectionError::Transport(e.to_string()));
        }
        Ok(())
    }

    async fn close(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        if let Some(mut sink) = self.sink.take() {
            if let Err(e) = sink.close().await {
                debug!(error = %e, "websocket close handshake failed");
            }
            info!(board_id = %self.board_id, "websocket closed");
        }
        self.state.set(ConnectionState::Closed);
    }

    fn state(&self) -> ConnectionState {
        self.state.get()
    }
}

impl Drop for LiveConnection {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}

/// Websocket URL for a board: `base` plus a `boardId` query parameter.
///
/// # Errors
///
/// Returns [`ConnectionError::InvalidUrl`] when `base` does not parse or is
/// not a `ws`/`wss` URL.
pub fn board_url(base: &str, board_id: &str) -> Result<String, ConnectionError> {
    let url = reqwest::Url::parse_with_params(base, &[("boardId", board_id)])
        .map_err(|e| ConnectionError::InvalidUrl(format!("{base}: {e}")))?;
    match url.scheme() {
        "ws" | "wss" => Ok(url.into()),
        other => Err(ConnectionError::InvalidUrl(format!("{base}: unsupported scheme `{other}`"))),
    }
}

fn spawn_reader(mut stream: SplitStream<WsStream>, events: EventSender, state: SharedState) -> JoinHandle<()> {
    tokio::spawn(async move {
        let lost = loop {
            match stream.next().await {
                Some(Ok(WsMessage::Text(text))) => {
                    if !events.post(SessionEvent::Inbound(text.as_str().to_owned())) {
                        return;
                    }
                }
                Some(Ok(WsMessage::Close(frame))) => {
                    let reason = frame.map_or_else(|| "no reason given".to_owned(), |f| f.reason.as_str().to_owned());
                    break ConnectionError::Closed { reason };
                }
                Some(Ok(WsMessage::Binary(bytes))) => debug!(len = bytes.len(), "ignoring binary frame"),
                Some(Ok(_)) => {}
                Some(Err(e)) => break ConnectionError::Transport(e.to_string()),
                None => break ConnectionError::Closed { reason: "stream ended".to_owned() },
            }
        };

        state.set(ConnectionState::Closed);
        warn!(error = %lost, "websocket lost");
        if !events.post(SessionEvent::TransportLost(lost)) {
            debug!("session no longer listening");
        }
    })
}

#[cfg(test)]
#[path = "live_test.rs"]
mod tests;
