//! Shared wire model and JSON codec for the realtime board transport.
//!
//! This crate owns the message representation used by both the session
//! runtime and the board engine. Messages travel as JSON text frames tagged
//! by a `type` field. Decoding separates messages of an unrecognized kind,
//! which callers drop quietly, from recognized kinds whose payload is broken.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error returned by [`decode_message`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The text is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The message carries no string `type` field.
    #[error("message has no `type` field")]
    MissingType,
    /// The `type` field names a message kind this client does not know.
    #[error("unknown message type: {0}")]
    UnknownType(String),
    /// A known message kind with a missing or invalid field.
    #[error("malformed {kind} message: {reason}")]
    Malformed { kind: Kind, reason: String },
}

impl CodecError {
    /// Whether the message kind itself was unset or unknown, as opposed to a
    /// recognized kind with a broken payload.
    #[must_use]
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, Self::MissingType | Self::UnknownType(_))
    }
}

/// Error returned when building a [`BoardMatrix`] from raw rows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatrixError {
    /// Rows exist but have no columns.
    #[error("matrix rows are empty")]
    EmptyRows,
    /// A row's length differs from the first row's.
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged { row: usize, expected: usize, found: usize },
    /// A cell holds something other than 0 or 1.
    #[error("cell ({row}, {col}) has invalid value {value}")]
    InvalidCell { row: usize, col: usize, value: u8 },
}

/// A pen value that is neither 0 nor 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid pen value {0}, expected 0 or 1")]
pub struct InvalidPen(pub u8);

// =============================================================================
// MESSAGE KINDS
// =============================================================================

/// Every message kind on the wire, in both directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Join,
    Leave,
    Draw,
    Update,
    Confirm,
    Error,
    RequestUpdate,
}

impl Kind {
    /// The `type` tag used on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Join => "JOIN",
            Self::Leave => "LEAVE",
            Self::Draw => "DRAW",
            Self::Update => "UPDATE",
            Self::Confirm => "CONFIRM",
            Self::Error => "ERROR",
            Self::RequestUpdate => "REQUEST_UPDATE",
        }
    }

    /// Parse a wire `type` tag. Tags are case-sensitive.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "JOIN" => Some(Self::Join),
            "LEAVE" => Some(Self::Leave),
            "DRAW" => Some(Self::Draw),
            "UPDATE" => Some(Self::Update),
            "CONFIRM" => Some(Self::Confirm),
            "ERROR" => Some(Self::Error),
            "REQUEST_UPDATE" => Some(Self::RequestUpdate),
            _ => None,
        }
    }

    /// Whether servers send this kind to clients.
    #[must_use]
    pub fn is_server_to_client(self) -> bool {
        matches!(self, Self::Draw | Self::Update | Self::Confirm | Self::Error)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// POINTS AND MATRICES
// =============================================================================

/// Binary ink flag carried by points and board cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Pen {
    /// Paint background (`0`).
    #[default]
    Erase,
    /// Paint ink (`1`).
    Ink,
}

impl Pen {
    #[must_use]
    pub fn is_ink(self) -> bool {
        self == Self::Ink
    }
}

impl TryFrom<u8> for Pen {
    type Error = InvalidPen;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Erase),
            1 => Ok(Self::Ink),
            other => Err(InvalidPen(other)),
        }
    }
}

impl From<Pen> for u8 {
    fn from(pen: Pen) -> Self {
        match pen {
            Pen::Erase => 0,
            Pen::Ink => 1,
        }
    }
}

/// One stroke sample. `x` is the column, `y` is the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
    pub pen: Pen,
}

impl Point {
    #[must_use]
    pub fn new(x: i32, y: i32, pen: Pen) -> Self {
        Self { x, y, pen }
    }
}

/// Rectangular grid of cells, stored row-major.
///
/// On the wire a matrix is an array of rows, each an array of `0`/`1`.
/// `height` is the number of rows and `width` the number of columns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct BoardMatrix {
    width: usize,
    height: usize,
    cells: Vec<Pen>,
}

impl BoardMatrix {
    /// A blank (all-erase) matrix of the given dimensions.
    ///
    /// Dimensions whose cell count overflows `usize` yield a 0×0 matrix.
    #[must_use]
    pub fn blank(width: usize, height: usize) -> Self {
        match width.checked_mul(height) {
            Some(len) => Self { width, height, cells: vec![Pen::Erase; len] },
            None => Self { width: 0, height: 0, cells: Vec::new() },
        }
    }

    /// Build a matrix from wire rows.
    ///
    /// An empty row list yields a 0×0 matrix.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError`] for rows without columns, ragged rows, or cell
    /// values other than 0 and 1.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self, MatrixError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height > 0 && width == 0 {
            return Err(MatrixError::EmptyRows);
        }

        let mut cells = Vec::with_capacity(width * height);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != width {
                return Err(MatrixError::Ragged { row, expected: width, found: values.len() });
            }
            for (col, value) in values.into_iter().enumerate() {
                let pen = Pen::try_from(value).map_err(|_| MatrixError::InvalidCell { row, col, value })?;
                cells.push(pen);
            }
        }

        Ok(Self { width, height, cells })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `true` when the matrix has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell value at `[row][col]`, or `None` when out of range.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<Pen> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.cells.get(row * self.width + col).copied()
    }

    /// Set the cell at `[row][col]`. Returns `true` if the value changed.
    /// Out-of-range coordinates are ignored.
    pub fn set(&mut self, row: usize, col: usize, pen: Pen) -> bool {
        if row >= self.height || col >= self.width {
            return false;
        }
        let Some(cell) = self.cells.get_mut(row * self.width + col) else {
            return false;
        };
        let changed = *cell != pen;
        *cell = pen;
        changed
    }

    /// Wire rows, top to bottom.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<u8>> {
        if self.width == 0 {
            return Vec::new();
        }
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|pen| u8::from(*pen)).collect())
            .collect()
    }

    /// `(row, col)` of every ink cell in row-major order.
    pub fn ink_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, pen)| pen.is_ink())
            .map(move |(index, _)| (index / width, index % width))
    }
}

impl TryFrom<Vec<Vec<u8>>> for BoardMatrix {
    type Error = MatrixError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<BoardMatrix> for Vec<Vec<u8>> {
    fn from(matrix: BoardMatrix) -> Self {
        matrix.rows()
    }
}

// =============================================================================
// MESSAGES
// =============================================================================

/// Board content carried by an `UPDATE` message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoardUpdate {
    /// Full replacement of the board.
    Snapshot(BoardMatrix),
    /// Ordered cell changes.
    Delta(Vec<Point>),
}

/// A single message on the realtime wire protocol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message {
    /// Client announces itself on the board.
    Join { username: String },
    /// Client leaves the board.
    Leave { username: String },
    /// One completed stroke, points in input order.
    Draw { points: Vec<Point> },
    /// Server-pushed board content, snapshot or delta.
    Update(BoardUpdate),
    /// Server accepts a join and sends the initial snapshot.
    Confirm { username: String, matrix: BoardMatrix },
    /// Server-side failure report.
    Error { message: String },
    /// Client polls for the latest snapshot.
    RequestUpdate,
}

impl Message {
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Join { .. } => Kind::Join,
            Self::Leave { .. } => Kind::Leave,
            Self::Draw { .. } => Kind::Draw,
            Self::Update(_) => Kind::Update,
            Self::Confirm { .. } => Kind::Confirm,
            Self::Error { .. } => Kind::Error,
            Self::RequestUpdate => Kind::RequestUpdate,
        }
    }
}

/// Encode a message as a JSON text frame.
#[must_use]
pub fn encode_message(message: &Message) -> String {
    let wire = message_to_wire(message);
    // Serializing these types never fails: every map key is a string and no
    // custom serializer returns an error.
    serde_json::to_string(&wire).unwrap_or_default()
}

/// Decode a JSON text frame.
///
/// # Errors
///
/// Returns [`CodecError::Json`] for invalid JSON, [`CodecError::MissingType`]
/// or [`CodecError::UnknownType`] for messages of no known kind, and
/// [`CodecError::Malformed`] when a known kind lacks a required field or
/// carries an invalid one.
pub fn decode_message(text: &str) -> Result<Message, CodecError> {
    let value: Value = serde_json::from_str(text)?;
    let kind = match value.get("type").and_then(Value::as_str) {
        None => return Err(CodecError::MissingType),
        Some(tag) => Kind::parse(tag).ok_or_else(|| CodecError::UnknownType(tag.to_owned()))?,
    };

    let wire: WireMessage =
        serde_json::from_value(value).map_err(|e| CodecError::Malformed { kind, reason: e.to_string() })?;
    wire_to_message(kind, wire)
}

fn message_to_wire(message: &Message) -> WireMessage {
    match message {
        Message::Join { username } => WireMessage::Join { username: username.clone() },
        Message::Leave { username } => WireMessage::Leave { username: username.clone() },
        Message::Draw { points } => WireMessage::Draw { points: points.clone() },
        Message::Update(BoardUpdate::Snapshot(matrix)) => {
            WireMessage::Update { matrix: Some(matrix.clone()), points: None }
        }
        Message::Update(BoardUpdate::Delta(points)) => WireMessage::Update { matrix: None, points: Some(points.clone()) },
        Message::Confirm { username, matrix } => {
            WireMessage::Confirm { username: username.clone(), matrix: matrix.clone() }
        }
        Message::Error { message } => WireMessage::Error { message: message.clone() },
        Message::RequestUpdate => WireMessage::RequestUpdate,
    }
}

fn wire_to_message(kind: Kind, wire: WireMessage) -> Result<Message, CodecError> {
    Ok(match wire {
        WireMessage::Join { username } => Message::Join { username },
        WireMessage::Leave { username } => Message::Leave { username },
        WireMessage::Draw { points } => Message::Draw { points },
        WireMessage::Update { matrix: Some(matrix), .. } => Message::Update(BoardUpdate::Snapshot(matrix)),
        WireMessage::Update { matrix: None, points: Some(points) } => Message::Update(BoardUpdate::Delta(points)),
        WireMessage::Update { matrix: None, points: None } => {
            return Err(CodecError::Malformed { kind, reason: "expected `matrix` or `points`".to_owned() });
        }
        WireMessage::Confirm { username, matrix } => Message::Confirm { username, matrix },
        WireMessage::Error { message } => Message::Error { message },
        WireMessage::RequestUpdate => Message::RequestUpdate,
    })
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
enum WireMessage {
    Join {
        username: String,
    },
    Leave {
        username: String,
    },
    Draw {
        points: Vec<Point>,
    },
    Update {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        matrix: Option<BoardMatrix>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        points: Option<Vec<Point>>,
    },
    Confirm {
        username: String,
        matrix: BoardMatrix,
    },
    Error {
        message: String,
    },
    RequestUpdate,
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
