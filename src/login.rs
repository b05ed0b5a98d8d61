//! Login: trade a username for a board id and the board's current matrix.
//!
//! DESIGN
//! ======
//! Login is the one request that blocks on the network, so the session never
//! awaits it inline. It spawns [`LoginService::login`] on its own task and gets
//! the result back through the event queue. Two services exist: [`HttpLogin`]
//! posts to the login endpoint, [`SimulatedLogin`] answers locally with a fresh
//! board id and a blank matrix.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures, non-2xx statuses, and unparsable bodies all become a
//! [`LoginError`]. Nothing is retried; the user submits the name again.

use std::sync::Arc;

use async_trait::async_trait;
use frames::BoardMatrix;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::{ClientConfig, Transport};

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("login request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("login rejected with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed login response: {0}")]
    Malformed(String),
}

/// What a successful login hands the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginGrant {
    pub user_id: Option<String>,
    /// Opaque board identifier addressed on the realtime transport.
    pub board_id: String,
    pub message: Option<String>,
    /// The board at login time; `None` when the server sent no matrix.
    pub matrix: Option<BoardMatrix>,
}

#[async_trait]
pub trait LoginService: Send + Sync {
    /// Log in as `username`.
    async fn login(&self, username: &str) -> Result<LoginGrant, LoginError>;
}

/// Build the login service the configured transport calls for.
///
/// # Errors
///
/// Returns [`LoginError::Http`] when the HTTP client cannot be built.
pub fn service(config: &ClientConfig) -> Result<Arc<dyn LoginService>, LoginError> {
    let service: Arc<dyn LoginService> = match config.transport {
        Transport::Live => Arc::new(HttpLogin::new(config)?),
        Transport::Simulated => Arc::new(SimulatedLogin::new(config.board_width, config.board_height)),
    };
    Ok(service)
}

// =============================================================================
// HTTP
// =============================================================================

pub struct HttpLogin {
    client: reqwest::Client,
    url: String,
}

impl HttpLogin {
    /// # Errors
    ///
    /// Returns [`LoginError::Http`] when the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, LoginError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeouts.request())
            .connect_timeout(config.timeouts.connect())
            .build()?;
        Ok(Self { client, url: config.login_url.clone() })
    }
}

#[async_trait]
impl LoginService for HttpLogin {
    async fn login(&self, username: &str) -> Result<LoginGrant, LoginError> {
        debug!(url = %self.url, %username, "login request");
        let response = self.client.post(&self.url).json(&serde_json::json!({ "username": username })).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(LoginError::Status { status: status.as_u16(), body });
        }

        let grant = parse_grant(&body)?;
        info!(board_id = %grant.board_id, %username, "logged in");
        Ok(grant)
    }
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    user_id: Option<Value>,
    board_id: Value,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    board_matrix_data: Option<BoardMatrix>,
}

/// Parse a login response body. Ids may arrive as strings or numbers.
fn parse_grant(body: &str) -> Result<LoginGrant, LoginError> {
    let response: LoginResponse = serde_json::from_str(body).map_err(|e| LoginError::Malformed(e.to_string()))?;
    let board_id = opaque_id(&response.board_id)
        .ok_or_else(|| LoginError::Malformed("`board_id` must be a non-empty string or number".to_owned()))?;

    Ok(LoginGrant {
        user_id: response.user_id.as_ref().and_then(opaque_id),
        board_id,
        message: response.message,
        matrix: response.board_matrix_data,
    })
}

fn opaque_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// =============================================================================
// SIMULATED
// =============================================================================

/// Answers every login locally with a new board id and a blank board.
pub struct SimulatedLogin {
    width: usize,
    height: usize,
}

impl SimulatedLogin {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

#[async_trait]
impl LoginService for SimulatedLogin {
    async fn login(&self, username: &str) -> Result<LoginGrant, LoginError> {
        let board_id = Uuid::new_v4().to_string();
        info!(%board_id, %username, "simulated login");
        Ok(LoginGrant {
            user_id: None,
            board_id,
            message: Some("simulated login".to_owned()),
            matrix: Some(BoardMatrix::blank(self.width, self.height)),
        })
    }
}

#[cfg(test)]
#[path = "login_test.rs"]
mod tests;
