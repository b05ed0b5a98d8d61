//! Input model: tools and the stroke gesture state machine.
//!
//! A stroke runs from gesture start to gesture end. While it runs, every
//! sampled point lands in a [`StrokeBuffer`]; on release the buffer is taken
//! whole and handed back as the batch to send. The buffer is never read while
//! it is being appended to, and a taken batch is never handed out twice.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use frames::{Pen, Point};

use crate::consts::{DEFAULT_PEN_RADIUS, MAX_PEN_RADIUS, MIN_PEN_RADIUS};

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Paint ink (default).
    #[default]
    Pen,
    /// Paint background.
    Eraser,
}

impl Tool {
    /// Pen value carried by points drawn with this tool.
    #[must_use]
    pub fn pen(self) -> Pen {
        match self {
            Self::Pen => Pen::Ink,
            Self::Eraser => Pen::Erase,
        }
    }
}

/// Persistent drawing settings, independent of any gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiState {
    pub tool: Tool,
    pen_radius: u32,
}

impl UiState {
    #[must_use]
    pub fn pen_radius(&self) -> u32 {
        self.pen_radius
    }

    /// Set the pen radius, clamped into the selectable range.
    pub fn set_pen_radius(&mut self, radius: u32) {
        self.pen_radius = radius.clamp(MIN_PEN_RADIUS, MAX_PEN_RADIUS);
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self { tool: Tool::default(), pen_radius: DEFAULT_PEN_RADIUS }
    }
}

/// Points of one stroke, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrokeBuffer {
    points: Vec<Point>,
}

impl StrokeBuffer {
    /// A buffer holding only the stroke's first point.
    #[must_use]
    pub fn start(point: Point) -> Self {
        Self { points: vec![point] }
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

/// Active gesture state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GestureState {
    /// No stroke in progress.
    #[default]
    Idle,
    /// A stroke is being recorded.
    Drawing { buffer: StrokeBuffer },
}

impl GestureState {
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::Drawing { .. })
    }

    /// Start a stroke at `point`. A stroke already in progress is discarded.
    pub fn begin(&mut self, point: Point) {
        *self = Self::Drawing { buffer: StrokeBuffer::start(point) };
    }

    /// Append `point` to the running stroke. Returns `false` when idle.
    pub fn extend(&mut self, point: Point) -> bool {
        match self {
            Self::Drawing { buffer } => {
                buffer.push(point);
                true
            }
            Self::Idle => false,
        }
    }

    /// Append `point`, end the stroke, and take its batch.
    ///
    /// Returns `None` when idle, or when the taken batch is empty.
    pub fn finish(&mut self, point: Point) -> Option<Vec<Point>> {
        match std::mem::take(self) {
            Self::Drawing { mut buffer } => {
                buffer.push(point);
                Some(buffer.into_points()).filter(|points| !points.is_empty())
            }
            Self::Idle => None,
        }
    }

    /// Drop any stroke in progress without producing a batch.
    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }
}
