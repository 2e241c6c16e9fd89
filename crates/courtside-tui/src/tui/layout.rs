// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into fixed zones for the scorekeeping screen:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Tip Line (1 row)                                  |
// +-------------------------+------------------------+
// | Starting Five (55%)      | Bench (45%)            |
// |                          |                        |
// +-------------------------+------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: team, match id, team points, substitution mode.
    pub status_bar: Rect,
    /// Second row: prompts and the result of the last action.
    pub tip_line: Rect,
    /// Left panel: players on the floor.
    pub start: Rect,
    /// Right panel: players available to come in.
    pub bench: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: status(1) | tip(1) | middle(fill) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(1), // tip line
            Constraint::Min(7),    // roster panels
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(vertical[2]);

    AppLayout {
        status_bar: vertical[0],
        tip_line: vertical[1],
        start: horizontal[0],
        bench: horizontal[1],
        help_bar: vertical[3],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
