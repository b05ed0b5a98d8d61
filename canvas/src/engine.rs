use frames::{BoardMatrix, Pen, Point};

use crate::board::{BoardError, BoardState};
use crate::coords::Cell;
use crate::input::{GestureState, Tool, UiState};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from engine handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// One cell changed; draw it on (`pen_on`) or off.
    Render { cell: Cell, pen_on: bool },
    /// The whole board changed; clear the surface and redraw every ink cell.
    Repaint,
    /// A stroke finished; send its points as one batch.
    Flush(Vec<Point>),
}

/// Core engine state: the board, the drawing settings, and the active gesture.
///
/// Pure and synchronous. The host owns one engine and calls it from a single
/// task, so no locking happens here.
#[derive(Debug, Default)]
pub struct EngineCore {
    pub board: BoardState,
    pub ui: UiState,
    pub gesture: GestureState,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine over a blank board of the given size.
    #[must_use]
    pub fn with_size(width: usize, height: usize) -> Self {
        Self { board: BoardState::new(width, height), ..Self::default() }
    }

    // --- Data inputs ---

    /// Adopt a session's initial board, dimensions included.
    pub fn start_board(&mut self, matrix: BoardMatrix) -> Vec<Action> {
        self.gesture.cancel();
        self.board.reset(matrix);
        vec![Action::Repaint]
    }

    /// Apply a full snapshot from the server.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::DimensionMismatch`] when the snapshot does not fit
    /// the board; the board is left untouched.
    pub fn load_snapshot(&mut self, matrix: BoardMatrix) -> Result<Vec<Action>, BoardError> {
        self.board.apply_snapshot(matrix)?;
        Ok(vec![Action::Repaint])
    }

    /// Apply point deltas from the server with the current pen radius.
    pub fn apply_points(&mut self, points: &[Point]) -> Vec<Action> {
        let radius = self.ui.pen_radius();
        render_changes(self.board.apply_points(points, radius))
    }

    // --- Settings ---

    pub fn set_tool(&mut self, tool: Tool) {
        self.ui.tool = tool;
    }

    /// Set the pen radius, clamped into the selectable range.
    pub fn set_pen_radius(&mut self, radius: u32) {
        self.ui.set_pen_radius(radius);
    }

    // --- Gestures ---

    /// Begin a stroke at surface position `(x, y)`.
    pub fn on_gesture_start(&mut self, x: i32, y: i32) -> Vec<Action> {
        let Some(point) = self.point_at(x, y) else {
            return Vec::new();
        };
        self.gesture.begin(point);
        self.paint(point)
    }

    /// Extend the running stroke. Ignored when no stroke is running.
    pub fn on_gesture_move(&mut self, x: i32, y: i32) -> Vec<Action> {
        if !self.gesture.is_drawing() {
            return Vec::new();
        }
        let Some(point) = self.point_at(x, y) else {
            return Vec::new();
        };
        self.gesture.extend(point);
        self.paint(point)
    }

    /// End the running stroke and flush its batch.
    pub fn on_gesture_end(&mut self, x: i32, y: i32) -> Vec<Action> {
        if !self.gesture.is_drawing() {
            return Vec::new();
        }
        let Some(point) = self.point_at(x, y) else {
            self.gesture.cancel();
            return Vec::new();
        };
        let mut actions = self.paint(point);
        if let Some(batch) = self.gesture.finish(point) {
            actions.push(Action::Flush(batch));
        }
        actions
    }

    // --- Queries ---

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.ui.tool
    }

    #[must_use]
    pub fn pen_radius(&self) -> u32 {
        self.ui.pen_radius()
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.gesture.is_drawing()
    }

    fn point_at(&self, x: i32, y: i32) -> Option<Point> {
        self.board.bounds().point_at(x, y, self.ui.tool.pen())
    }

    fn paint(&mut self, point: Point) -> Vec<Action> {
        let radius = self.ui.pen_radius();
        render_changes(self.board.apply_points(&[point], radius))
    }
}

fn render_changes(changes: Vec<(Cell, Pen)>) -> Vec<Action> {
    changes.into_iter().map(|(cell, pen)| Action::Render { cell, pen_on: pen.is_ink() }).collect()
}
