//! Session orchestration: login, connection, dispatch, teardown.
//!
//! DESIGN
//! ======
//! A `Session` is the single owner of board and session state. It lives on
//! one task and drains its event queue one event at a time; the websocket
//! reader, the poll timer, the simulated broadcaster, the login task, and the
//! UI only ever post into that queue. Nothing else touches the board.
//!
//! Lifecycle:
//!
//! ```text
//! LoggedOut -> LoggingIn -> Connecting -> Active -> Closing -> Closed
//!     ^            |             |
//!     +------------+-------------+   (login or connect failed)
//! ```
//!
//! The board keeps the size of the login matrix. When login supplies no matrix
//! (or an empty one) a blank board of the configured size stands in until the
//! first server snapshot fixes the size; later snapshots must match it.
//!
//! A live `connect` is awaited on the session task, so UI events queue behind
//! the handshake for at most the connect timeout.
//!
//! Teardown is reachable from every phase and runs once. It shuts the queue
//! first so no timer or reader callback lands after `Closed`, then sends
//! `LEAVE` (live transport with a known user only) and closes the connection.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here is fatal. Validation, login, connection, and server errors go
//! to the surface. Malformed and unknown inbound messages are logged and
//! dropped. Failed sends are logged and never retried.

use std::sync::Arc;

use canvas::board::BoardState;
use canvas::engine::{Action, EngineCore};
use canvas::input::Tool;
use frames::{BoardMatrix, BoardUpdate, Message, decode_message, encode_message};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::{ClientConfig, Transport};
use crate::connection::{Connection, ConnectionError, ConnectionState, Connector};
use crate::events::{self, EventSender, SessionEvent, UiEvent, spawn_ticker};
use crate::login::{LoginError, LoginGrant, LoginService};
use crate::surface::Surface;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Login(#[from] LoginError),
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    #[error("malformed message: {0}")]
    MalformedMessage(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("{0}")]
    UnknownMessageType(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    LoggedOut,
    LoggingIn,
    Connecting,
    Active,
    Closing,
    Closed,
}

/// Who this session is and which board it addresses. Fixed once login succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub username: String,
    pub board_id: String,
}

pub struct Session<S: Surface> {
    transport: Transport,
    poll_interval: Option<std::time::Duration>,
    board_width: usize,
    board_height: usize,
    phase: Phase,
    identity: Option<SessionIdentity>,
    pending_username: Option<String>,
    engine: EngineCore,
    /// Set once a server-supplied matrix has fixed the board's dimensions.
    sized: bool,
    login: Arc<dyn LoginService>,
    connector: Box<dyn Connector>,
    connection: Option<Box<dyn Connection>>,
    surface: S,
    events: EventSender,
    inbox: mpsc::UnboundedReceiver<SessionEvent>,
    poller: Option<JoinHandle<()>>,
    login_task: Option<JoinHandle<()>>,
}

impl<S: Surface> Session<S> {
    pub fn new(config: &ClientConfig, login: Arc<dyn LoginService>, connector: Box<dyn Connector>, surface: S) -> Self {
        let (events, inbox) = events::channel();
        let mut engine = EngineCore::new();
        engine.set_pen_radius(config.pen_radius);
        Self {
            transport: config.transport,
            poll_interval: config.polls().then_some(config.poll_interval),
            board_width: config.board_width,
            board_height: config.board_height,
            phase: Phase::LoggedOut,
            identity: None,
            pending_username: None,
            engine,
            sized: false,
            login,
            connector,
            connection: None,
            surface,
            events,
            inbox,
            poller: None,
            login_task: None,
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// A producer handle for the UI and other event sources.
    #[must_use]
    pub fn events(&self) -> EventSender {
        self.events.clone()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn identity(&self) -> Option<&SessionIdentity> {
        self.identity.as_ref()
    }

    #[must_use]
    pub fn board(&self) -> &BoardState {
        &self.engine.board
    }

    #[must_use]
    pub fn engine(&self) -> &EngineCore {
        &self.engine
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// State of the current connection, if one exists.
    #[must_use]
    pub fn connection_state(&self) -> Option<ConnectionState> {
        self.connection.as_ref().map(|c| c.state())
    }

    // =========================================================================
    // EVENT LOOP
    // =========================================================================

    /// Process events until the session is closed.
    pub async fn run(&mut self) {
        while self.phase != Phase::Closed {
            if !self.step_next().await {
                break;
            }
        }
    }

    /// Wait for the next event and process it. Returns `false` when the queue
    /// has no producers left.
    pub async fn step_next(&mut self) -> bool {
        match self.inbox.recv().await {
            Some(event) => {
                self.step(event).await;
                true
            }
            None => false,
        }
    }

    /// Process every event already queued, without waiting. Returns how many
    /// were processed.
    pub async fn drain(&mut self) -> usize {
        let mut processed = 0;
        while self.phase != Phase::Closed {
            let Ok(event) = self.inbox.try_recv() else {
                break;
            };
            self.step(event).await;
            processed += 1;
        }
        processed
    }

    /// Apply one event.
    pub async fn step(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Inbound(text) => {
                if let Err(e) = self.handle_inbound(&text).await {
                    warn!(error = %e, "inbound message dropped");
                }
            }
            SessionEvent::TransportLost(error) => self.transport_lost(error),
            SessionEvent::PollTick => self.poll().await,
            SessionEvent::LoginCompleted(result) => self.finish_login(result).await,
            SessionEvent::Ui(event) => self.handle_ui(event).await,
        }
    }

    async fn handle_ui(&mut self, event: UiEvent) {
        match event {
            UiEvent::SubmitName(name) => {
                if let Err(e) = self.submit_name(&name) {
                    info!(error = %e, "login not started");
                }
            }
            UiEvent::GestureStart { x, y } => self.gesture_start(x, y).await,
            UiEvent::GestureMove { x, y } => self.gesture_move(x, y).await,
            UiEvent::GestureEnd { x, y } => self.gesture_end(x, y).await,
            UiEvent::Tool(tool) => self.set_tool(tool),
            UiEvent::PenRadius(radius) => self.set_pen_radius(radius),
            UiEvent::Teardown => self.shutdown().await,
        }
    }

    // =========================================================================
    // LOGIN AND CONNECT
    // =========================================================================

    /// Start logging in as `name`.
    ///
    /// The request runs on its own task; its result arrives later as
    /// [`SessionEvent::LoginCompleted`]. Ignored outside `LoggedOut`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Validation`] for an empty name, after reporting
    /// it to the surface. The session stays `LoggedOut`.
    pub fn submit_name(&mut self, name: &str) -> Result<(), SessionError> {
        if self.phase != Phase::LoggedOut {
            debug!(phase = ?self.phase, "name submitted outside login view");
            return Ok(());
        }

        let username = name.trim();
        if username.is_empty() {
            let error = SessionError::Validation("Name cannot be empty".to_owned());
            self.surface.report(&error);
            return Err(error);
        }

        self.phase = Phase::LoggingIn;
        self.pending_username = Some(username.to_owned());
        self.surface.set_login_enabled(false);

        let login = Arc::clone(&self.login);
        let events = self.events.clone();
        let username = username.to_owned();
        self.login_task = Some(tokio::spawn(async move {
            let result = login.login(&username).await;
            if !events.post(SessionEvent::LoginCompleted(result)) {
                debug!(%username, "login finished after session closed");
            }
        }));
        Ok(())
    }

    async fn finish_login(&mut self, result: Result<LoginGrant, LoginError>) {
        if self.phase != Phase::LoggingIn {
            debug!(phase = ?self.phase, "stale login result dropped");
            return;
        }
        self.login_task = None;
        let username = self.pending_username.take().unwrap_or_default();

        let grant = match result {
            Ok(grant) => grant,
            Err(e) => {
                warn!(error = %e, %username, "login failed");
                self.return_to_login(SessionError::Login(e));
                return;
            }
        };

        self.phase = Phase::Connecting;
        self.identity = Some(SessionIdentity { username: username.clone(), board_id: grant.board_id.clone() });
        info!(board_id = %grant.board_id, %username, "connecting to board");

        let mut connection = self.connector.open(&grant.board_id, self.events.clone());
        if let Err(e) = connection.connect().await {
            warn!(board_id = %grant.board_id, error = %e, "connect failed");
            connection.close().await;
            self.identity = None;
            self.return_to_login(SessionError::Connection(e));
            return;
        }

        let matrix = grant.matrix.filter(|m| !m.is_empty());
        self.sized = matrix.is_some();
        let matrix = matrix.unwrap_or_else(|| BoardMatrix::blank(self.board_width, self.board_height));
        let actions = self.engine.start_board(matrix);
        self.connection = Some(connection);
        self.phase = Phase::Active;
        self.perform(actions).await;
        self.surface.show_whiteboard();

        self.send(&Message::Join { username }).await;
        if let Some(period) = self.poll_interval {
            self.poller = Some(spawn_ticker(self.events.clone(), std::time::Duration::ZERO, period, || {
                Some(SessionEvent::PollTick)
            }));
        }
        info!(board_id = %grant.board_id, "session active");
    }

    fn return_to_login(&mut self, error: SessionError) {
        self.phase = Phase::LoggedOut;
        self.surface.set_login_enabled(true);
        self.surface.report(&error);
    }

    // =========================================================================
    // INBOUND DISPATCH
    // =========================================================================

    /// Decode and apply one inbound frame. Frames outside `Active` are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownMessageType`] or
    /// [`SessionError::MalformedMessage`] when the frame was dropped. Board and
    /// session state are unchanged in that case.
    pub async fn handle_inbound(&mut self, text: &str) -> Result<(), SessionError> {
        if self.phase != Phase::Active {
            debug!(phase = ?self.phase, "frame outside active session dropped");
            return Ok(());
        }

        let message = decode_message(text).map_err(|e| {
            if e.is_unrecognized() {
                SessionError::UnknownMessageType(e.to_string())
            } else {
                SessionError::MalformedMessage(e.to_string())
            }
        })?;

        match message {
            Message::Confirm { username, matrix } => {
                debug!(%username, "join confirmed");
                self.apply_snapshot(matrix).await
            }
            Message::Update(BoardUpdate::Snapshot(matrix)) => self.apply_snapshot(matrix).await,
            Message::Draw { points } | Message::Update(BoardUpdate::Delta(points)) => {
                let actions = self.engine.apply_points(&points);
                self.perform(actions).await;
                Ok(())
            }
            Message::Error { message } => {
                warn!(%message, "server reported error");
                self.surface.report(&SessionError::Server(message));
                Ok(())
            }
            other @ (Message::Join { .. } | Message::Leave { .. } | Message::RequestUpdate) => {
                debug!(kind = %other.kind(), "client-to-server kind received, ignoring");
                Ok(())
            }
        }
    }

    async fn apply_snapshot(&mut self, matrix: BoardMatrix) -> Result<(), SessionError> {
        if !self.sized {
            if matrix.is_empty() {
                debug!("empty snapshot before board size is known, ignoring");
                return Ok(());
            }
            info!(width = matrix.width(), height = matrix.height(), "board size set by server snapshot");
            self.sized = true;
            let actions = self.engine.start_board(matrix);
            self.perform(actions).await;
            return Ok(());
        }
        let actions = self.engine.load_snapshot(matrix).map_err(|e| SessionError::MalformedMessage(e.to_string()))?;
        self.perform(actions).await;
        Ok(())
    }

    fn transport_lost(&mut self, error: ConnectionError) {
        if self.phase != Phase::Active {
            debug!(error = %error, "transport loss outside active session");
            return;
        }
        warn!(error = %error, "transport lost, not reconnecting");
        if let Some(poller) = self.poller.take() {
            poller.abort();
        }
        self.surface.report(&SessionError::Connection(error));
    }

    async fn poll(&mut self) {
        if self.phase != Phase::Active {
            return;
        }
        self.send(&Message::RequestUpdate).await;
    }

    // =========================================================================
    // UI INPUT
    // =========================================================================

    pub async fn gesture_start(&mut self, x: i32, y: i32) {
        if self.phase == Phase::Active {
            let actions = self.engine.on_gesture_start(x, y);
            self.perform(actions).await;
        }
    }

    pub async fn gesture_move(&mut self, x: i32, y: i32) {
        if self.phase == Phase::Active {
            let actions = self.engine.on_gesture_move(x, y);
            self.perform(actions).await;
        }
    }

    pub async fn gesture_end(&mut self, x: i32, y: i32) {
        if self.phase == Phase::Active {
            let actions = self.engine.on_gesture_end(x, y);
            self.perform(actions).await;
        }
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.engine.set_tool(tool);
    }

    pub fn set_pen_radius(&mut self, radius: u32) {
        self.engine.set_pen_radius(radius);
    }

    // =========================================================================
    // TEARDOWN
    // =========================================================================

    /// Close the session. Safe to call any number of times; only the first
    /// call sends `LEAVE` or closes the connection.
    pub async fn shutdown(&mut self) {
        if matches!(self.phase, Phase::Closing | Phase::Closed) {
            return;
        }
        self.phase = Phase::Closing;
        self.events.shut();

        if let Some(poller) = self.poller.take() {
            poller.abort();
        }
        if let Some(login_task) = self.login_task.take() {
            login_task.abort();
        }
        self.engine.gesture.cancel();

        if let Some(mut connection) = self.connection.take() {
            if self.transport.is_live() {
                if let Some(identity) = &self.identity {
                    let leave = encode_message(&Message::Leave { username: identity.username.clone() });
                    if let Err(e) = connection.send(&leave).await {
                        debug!(error = %e, "leave not delivered");
                    }
                }
            }
            connection.close().await;
        }

        let mut discarded = 0usize;
        while self.inbox.try_recv().is_ok() {
            discarded += 1;
        }
        self.phase = Phase::Closed;
        info!(discarded, "session closed");
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    async fn perform(&mut self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::Render { cell, pen_on } => self.surface.render(cell, pen_on),
                Action::Repaint => {
                    self.surface.clear();
                    for cell in self.engine.board.ink_cells() {
                        self.surface.render(cell, true);
                    }
                }
                Action::Flush(points) => {
                    self.send(&Message::Draw { points }).await;
                }
            }
        }
    }

    /// Fire-and-forget send. Failures are logged and the message is dropped.
    async fn send(&mut self, message: &Message) {
        let Some(connection) = self.connection.as_mut() else {
            debug!(kind = %message.kind(), "no connection, message dropped");
            return;
        };
        if let Err(e) = connection.send(&encode_message(message)).await {
            warn!(kind = %message.kind(), error = %e, "send failed, not retried");
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
