//! Coordinate normalization between board cells and wire points.
//!
//! Board cells are addressed `[row][col]`; wire points carry `{x: col, y: row}`.
//! Every translation between the two conventions goes through this module so
//! that encode, decode, and render paths agree on a single orientation.
//! Out-of-range values are clamped onto the nearest board edge.

#[cfg(test)]
#[path = "coords_test.rs"]
mod coords_test;

use frames::{Pen, Point};

/// A board cell address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    #[must_use]
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Board dimensions. `width` counts columns, `height` counts rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub width: usize,
    pub height: usize,
}

impl Bounds {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Whether the board has no cells at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether `cell` lies on the board.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// Cell for a wire point: `row = point.y`, `col = point.x`, clamped.
    ///
    /// Returns `None` only for an empty board.
    #[must_use]
    pub fn to_cell(&self, point: &Point) -> Option<Cell> {
        self.cell_at(point.x, point.y)
    }

    /// Cell for raw surface coordinates (`x` column, `y` row), clamped.
    #[must_use]
    pub fn cell_at(&self, x: i32, y: i32) -> Option<Cell> {
        if self.is_empty() {
            return None;
        }
        Some(Cell { row: clamp_axis(y, self.height), col: clamp_axis(x, self.width) })
    }

    /// Point at the clamped position of `(x, y)`.
    #[must_use]
    pub fn point_at(&self, x: i32, y: i32, pen: Pen) -> Option<Point> {
        self.cell_at(x, y).map(|cell| to_point(cell, pen))
    }

    /// Cells covered by a pen disk of `radius` centered on `center`.
    ///
    /// A cell belongs to the disk when `dr² + dc² < radius²`; radius 1 covers
    /// only the center. Cells off the board are skipped. Radius 0 is treated
    /// as 1.
    #[must_use]
    pub fn disk(&self, center: Cell, radius: u32) -> Vec<Cell> {
        let radius = i64::from(radius.max(1));
        let limit = radius * radius;
        let reach = radius - 1;
        let (Ok(center_row), Ok(center_col)) = (i64::try_from(center.row), i64::try_from(center.col)) else {
            return Vec::new();
        };

        let mut cells = Vec::new();
        for dr in -reach..=reach {
            for dc in -reach..=reach {
                if dr * dr + dc * dc >= limit {
                    continue;
                }
                let (Ok(row), Ok(col)) = (usize::try_from(center_row + dr), usize::try_from(center_col + dc)) else {
                    continue;
                };
                let cell = Cell { row, col };
                if self.contains(cell) {
                    cells.push(cell);
                }
            }
        }
        cells
    }
}

/// Wire point for a cell: `x = col`, `y = row`.
#[must_use]
pub fn to_point(cell: Cell, pen: Pen) -> Point {
    Point {
        x: i32::try_from(cell.col).unwrap_or(i32::MAX),
        y: i32::try_from(cell.row).unwrap_or(i32::MAX),
        pen,
    }
}

fn clamp_axis(value: i32, len: usize) -> usize {
    let max = len.saturating_sub(1);
    usize::try_from(value).map_or(0, |v| v.min(max))
}
