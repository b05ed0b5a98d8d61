//! Board state: the canonical cell grid and its reconciliation rules.
//!
//! DESIGN
//! ======
//! The board is replaced wholesale by snapshots and patched by point deltas.
//! A snapshot must match the board's dimensions once they are known; the only
//! way to change dimensions is [`BoardState::reset`], used when a session
//! starts from its initial matrix. Deltas apply in order so a later point on
//! the same cell wins.
//!
//! Every mutation reports the cells whose value changed. The engine turns
//! those into render actions; nothing here touches a surface.

#[cfg(test)]
#[path = "board_test.rs"]
mod board_test;

use frames::{BoardMatrix, Pen, Point};

use crate::coords::{Bounds, Cell};

/// Error returned when reconciling the board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// A snapshot's dimensions differ from the board's.
    #[error("snapshot is {width}x{height}, board is {expected_width}x{expected_height}")]
    DimensionMismatch { expected_width: usize, expected_height: usize, width: usize, height: usize },
}

/// The local copy of the shared board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    matrix: BoardMatrix,
}

impl BoardState {
    /// A blank board.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self { matrix: BoardMatrix::blank(width, height) }
    }

    /// A board seeded from a matrix, taking its dimensions.
    #[must_use]
    pub fn from_matrix(matrix: BoardMatrix) -> Self {
        Self { matrix }
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.matrix.width(), self.matrix.height())
    }

    #[must_use]
    pub fn matrix(&self) -> &BoardMatrix {
        &self.matrix
    }

    /// Value of one cell, `None` when off the board.
    #[must_use]
    pub fn cell(&self, cell: Cell) -> Option<Pen> {
        self.matrix.get(cell.row, cell.col)
    }

    /// Every ink cell, row-major.
    pub fn ink_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.matrix.ink_cells().map(|(row, col)| Cell::new(row, col))
    }

    /// Replace the board and its dimensions.
    pub fn reset(&mut self, matrix: BoardMatrix) {
        self.matrix = matrix;
    }

    /// Replace every cell from a snapshot of the same dimensions.
    ///
    /// Applying the same snapshot twice leaves the board as after once.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::DimensionMismatch`] and leaves the board untouched
    /// when the snapshot's width or height differs.
    pub fn apply_snapshot(&mut self, matrix: BoardMatrix) -> Result<(), BoardError> {
        if matrix.width() != self.matrix.width() || matrix.height() != self.matrix.height() {
            return Err(BoardError::DimensionMismatch {
                expected_width: self.matrix.width(),
                expected_height: self.matrix.height(),
                width: matrix.width(),
                height: matrix.height(),
            });
        }
        self.matrix = matrix;
        Ok(())
    }

    /// Paint each point's disk in order. Returns every cell that changed,
    /// in application order, with its new value.
    ///
    /// Points outside the board are clamped onto the nearest edge.
    pub fn apply_points(&mut self, points: &[Point], radius: u32) -> Vec<(Cell, Pen)> {
        let bounds = self.bounds();
        let mut changed = Vec::new();
        for point in points {
            let Some(center) = bounds.to_cell(point) else {
                continue;
            };
            for cell in bounds.disk(center, radius) {
                if self.matrix.set(cell.row, cell.col, point.pen) {
                    changed.push((cell, point.pen));
                }
            }
        }
        changed
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
