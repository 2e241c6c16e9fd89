// TUI scorekeeping screen: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that the presenter drives through `GameView`.
// Row content is read straight from the presenter's roster adapters when a
// frame is drawn; the loop redraws only after something marked the state
// dirty.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{self, Event};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::{DefaultTerminal, Frame};
use tracing::{debug, info, warn};

use courtside_core::game::presenter::GamePresenter;
use courtside_core::game::view::GameView;
use courtside_core::model::MatchId;
use courtside_core::storage::Storage;

use layout::{build_layout, AppLayout};

/// Shown when an event key is pressed with nobody selected.
pub const TAP_TIP: &str = "Select a player on the floor first (Enter), then press an event key";

/// How long to wait for input before checking whether a redraw is due.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Commands the key handler hands back to the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    Save,
    Quit,
}

/// Which roster panel has keyboard focus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Panel {
    #[default]
    Start,
    Bench,
}

impl Panel {
    pub fn toggle(self) -> Panel {
        match self {
            Panel::Start => Panel::Bench,
            Panel::Bench => Panel::Start,
        }
    }
}

/// A substitution waiting for the scorekeeper's y/n.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub outgoing: String,
    pub incoming: String,
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state for rendering. The presenter updates it through
/// [`GameView`]; key handling updates cursors and focus directly.
#[derive(Debug)]
pub struct ViewState {
    /// Home team shown in the status bar.
    pub team_name: String,
    /// Match the stats are saved against.
    pub match_id: Option<MatchId>,
    pub focus: Panel,
    pub start_cursor: usize,
    pub bench_cursor: usize,
    /// One-line message under the status bar.
    pub tip: Option<String>,
    /// Pending substitution prompt.
    pub confirmation: Option<Confirmation>,
    /// Whether the quit confirmation dialog is shown.
    pub confirm_quit: bool,
    /// Set whenever something visible changed since the last frame.
    pub dirty: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            team_name: String::new(),
            match_id: None,
            focus: Panel::Start,
            start_cursor: 0,
            bench_cursor: 0,
            tip: None,
            confirmation: None,
            confirm_quit: false,
            dirty: true,
        }
    }
}

impl ViewState {
    pub fn new(team_name: &str, match_id: MatchId) -> Self {
        ViewState {
            team_name: team_name.to_string(),
            match_id: Some(match_id),
            ..Default::default()
        }
    }

    pub fn set_tip(&mut self, tip: impl Into<String>) {
        self.tip = Some(tip.into());
        self.dirty = true;
    }
}

impl GameView for ViewState {
    fn reload_start_list(&mut self) {
        self.dirty = true;
    }

    fn reload_bench_list(&mut self) {
        self.dirty = true;
    }

    fn show_bench(&mut self) {
        self.focus = Panel::Bench;
        self.bench_cursor = 0;
        self.set_tip("Pick the bench player coming in (Enter), Esc to cancel");
    }

    fn show_tap_tip(&mut self) {
        self.set_tip(TAP_TIP);
    }

    fn show_substitution_confirmation(&mut self, outgoing: &str, incoming: &str) {
        self.confirmation = Some(Confirmation {
            outgoing: outgoing.to_string(),
            incoming: incoming.to_string(),
        });
        self.dirty = true;
    }

    fn deselect_start_row(&mut self, index: usize) {
        debug!("Start row {} deselected", index);
        self.dirty = true;
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete screen.
pub fn render_frame<S: Storage + ?Sized>(
    frame: &mut Frame,
    presenter: &GamePresenter<'_, S, ViewState>,
) {
    let area = frame.area();
    let layout = build_layout(area);
    let state = presenter.view();

    widgets::status_bar::render(frame, layout.status_bar, presenter);
    render_tip_line(frame, &layout, state);
    widgets::roster::render(
        frame,
        layout.start,
        presenter.start(),
        state.start_cursor,
        state.focus == Panel::Start,
    );
    widgets::roster::render(
        frame,
        layout.bench,
        presenter.bench(),
        state.bench_cursor,
        state.focus == Panel::Bench,
    );
    render_help_bar(frame, &layout);

    if let Some(ref confirmation) = state.confirmation {
        widgets::dialog::render_substitution(frame, area, confirmation);
    }
    if state.confirm_quit {
        widgets::dialog::render_quit(frame, area);
    }
}

fn render_tip_line(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let text = state.tip.as_deref().unwrap_or("");
    let paragraph = Paragraph::new(Line::from(Span::styled(
        format!(" {text}"),
        Style::default().fg(Color::Yellow),
    )));
    frame.render_widget(paragraph, layout.tip_line);
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        help_text(),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

/// Key hints, built from the event key table.
pub fn help_text() -> String {
    let events: Vec<String> = input::EVENT_KEYS
        .iter()
        .map(|(key, event)| format!("{key}:{}", event.display_str()))
        .collect();
    format!(
        " {} | Enter:Select s:Sub Tab:Panel w:Save q:Quit",
        events.join(" ")
    )
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop until the scorekeeper quits.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook that restores the terminal.
/// 3. Polls crossterm for key events, redrawing when the state is dirty.
/// 4. Restores the terminal on exit, including after an error.
pub fn run<S: Storage + ?Sized>(
    presenter: &mut GamePresenter<'_, S, ViewState>,
    match_id: MatchId,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let result = event_loop(&mut terminal, presenter, match_id);

    ratatui::restore();
    result
}

fn event_loop<S: Storage + ?Sized>(
    terminal: &mut DefaultTerminal,
    presenter: &mut GamePresenter<'_, S, ViewState>,
    match_id: MatchId,
) -> anyhow::Result<()> {
    loop {
        if presenter.view().dirty {
            terminal.draw(|frame| render_frame(frame, presenter))?;
            presenter.view_mut().dirty = false;
        }

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        match event::read()? {
            Event::Key(key_event) => match input::handle_key(key_event, presenter) {
                Some(UserCommand::Quit) => {
                    info!("Quit requested");
                    break;
                }
                Some(UserCommand::Save) => {
                    let report = presenter.save_all(match_id);
                    let tip = if report.failed == 0 {
                        format!("Saved {} players", report.saved)
                    } else {
                        warn!("{} stat records failed to save", report.failed);
                        format!(
                            "Saved {} players, {} failed (see log)",
                            report.saved, report.failed
                        )
                    };
                    presenter.view_mut().set_tip(tip);
                }
                None => {}
            },
            Event::Resize(_, _) => presenter.view_mut().dirty = true,
            _ => {}
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
