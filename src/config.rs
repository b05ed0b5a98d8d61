//! Client configuration parsed from environment variables.

use std::time::Duration;

use canvas::consts::{
    DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH, DEFAULT_PEN_RADIUS, MAX_BOARD_SIDE, MAX_PEN_RADIUS, MIN_PEN_RADIUS,
};

pub const DEFAULT_WS_URL: &str = "ws://localhost:8080/ws/draw";
pub const DEFAULT_LOGIN_URL: &str = "http://localhost:8080/login";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_BROADCAST_INTERVAL_MS: u64 = 5000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown PIXELBOARD_TRANSPORT: {0} (expected 'live' or 'simulated')")]
    UnknownTransport(String),
}

/// Which transport backs the session's connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    /// Real websocket and HTTP login.
    #[default]
    Live,
    /// In-process stand-in: no network I/O at all.
    Simulated,
}

impl Transport {
    /// Parse `live` or `simulated`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownTransport`] for anything else.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw {
            "live" => Ok(Self::Live),
            "simulated" => Ok(Self::Simulated),
            other => Err(ConfigError::UnknownTransport(other.to_owned())),
        }
    }

    #[must_use]
    pub fn is_live(self) -> bool {
        self == Self::Live
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Timeouts {
    #[must_use]
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub transport: Transport,
    pub ws_url: String,
    pub login_url: String,
    pub board_width: usize,
    pub board_height: usize,
    pub pen_radius: u32,
    /// Period of `REQUEST_UPDATE` polling on a live transport. Zero disables.
    pub poll_interval: Duration,
    /// Period of synthesized updates on a simulated transport.
    pub broadcast_interval: Duration,
    pub timeouts: Timeouts,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            transport: Transport::Live,
            ws_url: DEFAULT_WS_URL.to_owned(),
            login_url: DEFAULT_LOGIN_URL.to_owned(),
            board_width: DEFAULT_BOARD_WIDTH,
            board_height: DEFAULT_BOARD_HEIGHT,
            pen_radius: DEFAULT_PEN_RADIUS,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            broadcast_interval: Duration::from_millis(DEFAULT_BROADCAST_INTERVAL_MS),
            timeouts: Timeouts {
                request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            },
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `PIXELBOARD_TRANSPORT`: `live` (default) or `simulated`
    /// - `PIXELBOARD_WS_URL`: default `ws://localhost:8080/ws/draw`
    /// - `PIXELBOARD_LOGIN_URL`: default `http://localhost:8080/login`
    /// - `PIXELBOARD_BOARD_WIDTH` / `PIXELBOARD_BOARD_HEIGHT`: default 1280x720
    /// - `PIXELBOARD_PEN_RADIUS`: default 1, clamped to 1..=50
    /// - `PIXELBOARD_POLL_INTERVAL_MS`: default 1000, 0 disables polling
    /// - `PIXELBOARD_BROADCAST_INTERVAL_MS`: default 5000
    /// - `PIXELBOARD_REQUEST_TIMEOUT_SECS`: default 10
    /// - `PIXELBOARD_CONNECT_TIMEOUT_SECS`: default 5
    ///
    /// Unparsable numbers fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unknown transport name.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unknown transport name.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let transport = match lookup("PIXELBOARD_TRANSPORT") {
            Some(raw) => Transport::parse(raw.trim())?,
            None => Transport::default(),
        };
        let parse = |key: &str, default: u64| parse_or(lookup(key).as_deref(), default);

        let pen_radius = u32::try_from(parse("PIXELBOARD_PEN_RADIUS", u64::from(DEFAULT_PEN_RADIUS)))
            .unwrap_or(MAX_PEN_RADIUS)
            .clamp(MIN_PEN_RADIUS, MAX_PEN_RADIUS);

        Ok(Self {
            transport,
            ws_url: lookup("PIXELBOARD_WS_URL").unwrap_or_else(|| DEFAULT_WS_URL.to_owned()),
            login_url: lookup("PIXELBOARD_LOGIN_URL").unwrap_or_else(|| DEFAULT_LOGIN_URL.to_owned()),
            board_width: board_side(lookup("PIXELBOARD_BOARD_WIDTH").as_deref(), DEFAULT_BOARD_WIDTH),
            board_height: board_side(lookup("PIXELBOARD_BOARD_HEIGHT").as_deref(), DEFAULT_BOARD_HEIGHT),
            pen_radius,
            poll_interval: Duration::from_millis(parse("PIXELBOARD_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS)),
            broadcast_interval: Duration::from_millis(
                parse("PIXELBOARD_BROADCAST_INTERVAL_MS", DEFAULT_BROADCAST_INTERVAL_MS).max(1),
            ),
            timeouts: Timeouts {
                request_secs: parse("PIXELBOARD_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
                connect_secs: parse("PIXELBOARD_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
            },
        })
    }

    /// Whether the session should poll for snapshots.
    #[must_use]
    pub fn polls(&self) -> bool {
        self.transport.is_live() && !self.poll_interval.is_zero()
    }
}

fn parse_or<T>(raw: Option<&str>, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    raw.and_then(|v| v.trim().parse::<T>().ok()).unwrap_or(default)
}

/// A board side in `1..=MAX_BOARD_SIDE`; anything else falls back to `default`.
fn board_side(raw: Option<&str>, default: usize) -> usize {
    Some(parse_or(raw, default)).filter(|side| (1..=MAX_BOARD_SIDE).contains(side)).unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
