//! In-process stand-in for a board server.
//!
//! No network I/O. Connecting always succeeds and starts a broadcaster that,
//! every interval, posts an `UPDATE` delta of random points as if another
//! participant had drawn them. Sent `DRAW` frames loop straight back into the
//! session queue, the way a server echoes strokes to their drawer.

use std::time::Duration;

use async_trait::async_trait;
use frames::{BoardUpdate, Message, Pen, Point, decode_message, encode_message};
use rand::Rng;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::{Connection, ConnectionError, ConnectionState, Connector};
use crate::config::ClientConfig;
use crate::events::{EventSender, SessionEvent, spawn_ticker};

/// Points per synthesized update.
pub const POINTS_PER_BROADCAST: usize = 5;

pub struct SimulatedConnector {
    width: usize,
    height: usize,
    interval: Duration,
}

impl SimulatedConnector {
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self { width: config.board_width, height: config.board_height, interval: config.broadcast_interval }
    }
}

impl Connector for SimulatedConnector {
    fn open(&self, board_id: &str, events: EventSender) -> Box<dyn Connection> {
        Box::new(SimulatedConnection::new(board_id, self.width, self.height, self.interval, events))
    }
}

pub struct SimulatedConnection {
    board_id: String,
    width: usize,
    height: usize,
    interval: Duration,
    events: EventSender,
    state: ConnectionState,
    broadcaster: Option<JoinHandle<()>>,
}

impl SimulatedConnection {
    #[must_use]
    pub fn new(board_id: &str, width: usize, height: usize, interval: Duration, events: EventSender) -> Self {
        Self {
            board_id: board_id.to_owned(),
            width,
            height,
            interval,
            events,
            state: ConnectionState::Disconnected,
            broadcaster: None,
        }
    }
}

#[async_trait]
impl Connection for SimulatedConnection {
    async fn connect(&mut self) -> Result<(), ConnectionError> {
        match self.state {
            ConnectionState::Open => return Ok(()),
            ConnectionState::Disconnected => {}
            ConnectionState::Connecting | ConnectionState::Closed => return Err(ConnectionError::NotOpen),
        }

        let (width, height) = (self.width, self.height);
        self.broadcaster = Some(spawn_ticker(self.events.clone(), self.interval, self.interval, move || {
            random_update(width, height).map(|message| SessionEvent::Inbound(encode_message(&message)))
        }));
        self.state = ConnectionState::Open;
        info!(board_id = %self.board_id, "connected to simulated board");
        Ok(())
    }

    async fn send(&mut self, text: &str) -> Result<(), ConnectionError> {
        if self.state != ConnectionState::Open {
            return Err(ConnectionError::NotOpen);
        }
        match decode_message(text) {
            Ok(Message::Draw { .. }) => {
                if !self.events.post(SessionEvent::Inbound(text.to_owned())) {
                    debug!("loopback dropped, session no longer listening");
                }
            }
            Ok(message) => debug!(kind = %message.kind(), "simulated server swallowed message"),
            Err(e) => debug!(error = %e, "simulated server ignored undecodable frame"),
        }
        Ok(())
    }

    async fn close(&mut self) {
        if let Some(broadcaster) = self.broadcaster.take() {
            broadcaster.abort();
            info!(board_id = %self.board_id, "simulated board closed");
        }
        self.state = ConnectionState::Closed;
    }

    fn state(&self) -> ConnectionState {
        self.state
    }
}

impl Drop for SimulatedConnection {
    fn drop(&mut self) {
        if let Some(broadcaster) = self.broadcaster.take() {
            broadcaster.abort();
        }
    }
}

/// An `UPDATE` delta of random points on a `width` x `height` board with
/// random pen values. `None` for an empty board.
#[must_use]
pub fn random_update(width: usize, height: usize) -> Option<Message> {
    if width == 0 || height == 0 {
        return None;
    }
    let max_x = i32::try_from(width).unwrap_or(i32::MAX);
    let max_y = i32::try_from(height).unwrap_or(i32::MAX);

    let mut rng = rand::rng();
    let points = (0..POINTS_PER_BROADCAST)
        .map(|_| {
            let pen = if rng.random_bool(0.5) { Pen::Ink } else { Pen::Erase };
            Point::new(rng.random_range(0..max_x), rng.random_range(0..max_y), pen)
        })
        .collect();
    Some(Message::Update(BoardUpdate::Delta(points)))
}

#[cfg(test)]
#[path = "simulated_test.rs"]
mod tests;
