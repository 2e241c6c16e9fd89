// TUI widget modules for each screen zone.

pub mod dialog;
pub mod roster;
pub mod status_bar;
