//! Shared numeric constants for the canvas crate.

// ── Pen ─────────────────────────────────────────────────────────

/// Pen radius used until the user picks another. Radius 1 paints one cell.
pub const DEFAULT_PEN_RADIUS: u32 = 1;

/// Smallest selectable pen radius.
pub const MIN_PEN_RADIUS: u32 = 1;

/// Largest selectable pen radius.
pub const MAX_PEN_RADIUS: u32 = 50;

// ── Board ───────────────────────────────────────────────────────

/// Board width in cells when no snapshot supplies one.
pub const DEFAULT_BOARD_WIDTH: usize = 1280;

/// Board height in cells when no snapshot supplies one.
pub const DEFAULT_BOARD_HEIGHT: usize = 720;

/// Largest configurable board side, in cells.
pub const MAX_BOARD_SIDE: usize = 8192;
