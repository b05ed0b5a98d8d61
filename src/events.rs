//! Session event queue.
//!
//! DESIGN
//! ======
//! Every producer that is not the session itself (websocket reader, timers,
//! the login task, the UI) posts into one unbounded channel. The session is
//! the only consumer and applies events one at a time, so board and session
//! state are mutated from a single task without locks.
//!
//! Each sender shares a liveness flag with the session. Once the session
//! starts tearing down it clears the flag; from then on `post` refuses new
//! events and background producers use that refusal to stop themselves.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use canvas::input::Tool;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::connection::ConnectionError;
use crate::login::{LoginError, LoginGrant};

/// Inbound UI intents, in the order the surface produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    SubmitName(String),
    GestureStart { x: i32, y: i32 },
    GestureMove { x: i32, y: i32 },
    GestureEnd { x: i32, y: i32 },
    Tool(Tool),
    PenRadius(u32),
    Teardown,
}

/// Everything the session reacts to.
#[derive(Debug)]
pub enum SessionEvent {
    /// A text frame from the transport, not yet decoded.
    Inbound(String),
    /// The transport was closed or failed after it opened.
    TransportLost(ConnectionError),
    /// Time to ask the server for a fresh snapshot.
    PollTick,
    /// The off-thread login request finished.
    LoginCompleted(Result<LoginGrant, LoginError>),
    Ui(UiEvent),
}

/// Producer half of the session queue.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<SessionEvent>,
    live: Arc<AtomicBool>,
}

impl EventSender {
    /// Queue an event. Returns `false` once the session stopped accepting
    /// events; callers looping on a timer should exit then.
    pub fn post(&self, event: SessionEvent) -> bool {
        if !self.is_live() {
            return false;
        }
        self.tx.send(event).is_ok()
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire) && !self.tx.is_closed()
    }

    /// Refuse every later `post`, from this sender and all its clones.
    pub(crate) fn shut(&self) {
        self.live.store(false, Ordering::Release);
    }
}

/// Create a fresh queue with its liveness flag set.
#[must_use]
pub fn channel() -> (EventSender, mpsc::UnboundedReceiver<SessionEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx, live: Arc::new(AtomicBool::new(true)) }, rx)
}

/// Spawn a repeating producer.
///
/// The first tick fires after `first_delay`, later ones every `period`. Each
/// tick calls `make` and posts the result; a `None` skips the tick. The task
/// exits on its own once the queue refuses an event.
pub fn spawn_ticker<F>(events: EventSender, first_delay: Duration, period: Duration, mut make: F) -> JoinHandle<()>
where
    F: FnMut() -> Option<SessionEvent> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + first_delay, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if !events.is_live() {
                break;
            }
            let Some(event) = make() else {
                continue;
            };
            if !events.post(event) {
                break;
            }
        }
    })
}

#[cfg(test)]
#[path = "events_test.rs"]
mod tests;
