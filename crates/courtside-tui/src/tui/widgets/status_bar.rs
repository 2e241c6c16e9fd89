// Status bar widget: team, match, team points, and the scoring target.
//
// Single-row bar at the top of the screen:
// " Home  Match #3 | 42 PTS | [SUB] | Active: #07 Alex Moore"

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use courtside_core::game::presenter::GamePresenter;
use courtside_core::model::MatchId;
use courtside_core::storage::Storage;

use crate::tui::ViewState;

/// Render the status bar into the given area.
pub fn render<S: Storage + ?Sized>(
    frame: &mut Frame,
    area: Rect,
    presenter: &GamePresenter<'_, S, ViewState>,
) {
    let state = presenter.view();
    let mut spans = vec![
        Span::styled(
            format!(" {}", team_label(&state.team_name)),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  {}", match_label(state.match_id))),
        Span::raw(" | "),
        Span::styled(
            format!("{} PTS", presenter.overall_points()),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
    ];

    if presenter.substitution_mode() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            "[SUB]",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let start = presenter.start();
    if let Some(index) = start.active_index() {
        let row = start.content(index);
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!("Active: #{} {} {}", row.number, row.name, row.surname),
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn team_label(team_name: &str) -> &str {
    if team_name.is_empty() {
        "Home"
    } else {
        team_name
    }
}

fn match_label(match_id: Option<MatchId>) -> String {
    match match_id {
        Some(id) => format!("Match #{id}"),
        None => "No match".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
