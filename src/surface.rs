//! Outbound UI calls the session makes to reflect its state.

use canvas::coords::Cell;
use tracing::{debug, info, warn};

use crate::session::SessionError;

pub trait Surface {
    /// Draw one cell on (`pen_on`) or off.
    fn render(&mut self, cell: Cell, pen_on: bool);

    /// Blank the whole drawing area.
    fn clear(&mut self);

    /// Switch from the login view to the whiteboard view.
    fn show_whiteboard(&mut self);

    /// Enable or disable the login controls.
    fn set_login_enabled(&mut self, enabled: bool);

    /// Show a user-visible error.
    fn report(&mut self, error: &SessionError);
}

/// Headless surface that logs every call.
#[derive(Debug, Default)]
pub struct TraceSurface {
    ink_cells: u64,
    erased_cells: u64,
}

impl TraceSurface {
    #[must_use]
    pub fn ink_cells(&self) -> u64 {
        self.ink_cells
    }

    #[must_use]
    pub fn erased_cells(&self) -> u64 {
        self.erased_cells
    }
}

impl Surface for TraceSurface {
    fn render(&mut self, cell: Cell, pen_on: bool) {
        if pen_on {
            self.ink_cells += 1;
        } else {
            self.erased_cells += 1;
        }
        debug!(row = cell.row, col = cell.col, pen_on, "render");
    }

    fn clear(&mut self) {
        info!(ink_cells = self.ink_cells, erased_cells = self.erased_cells, "clear");
        self.ink_cells = 0;
        self.erased_cells = 0;
    }

    fn show_whiteboard(&mut self) {
        info!("whiteboard shown");
    }

    fn set_login_enabled(&mut self, enabled: bool) {
        info!(enabled, "login controls");
    }

    fn report(&mut self, error: &SessionError) {
        warn!(%error, "reported to user");
    }
}
