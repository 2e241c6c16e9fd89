// Library root: exposes the terminal front end so integration tests can
// drive it without a real terminal.

pub mod tui;
