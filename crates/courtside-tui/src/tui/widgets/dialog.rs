// Modal dialogs drawn over the main layout: substitution confirmation and
// quit confirmation.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::Confirmation;

const QUIT_WIDTH: u16 = 28;
const QUIT_HEIGHT: u16 = 5;
const SUBSTITUTION_WIDTH: u16 = 48;
const SUBSTITUTION_HEIGHT: u16 = 7;

/// Render the quit confirmation overlay centered on the screen.
pub fn render_quit(frame: &mut Frame, area: Rect) {
    let dialog_area = centered_rect(QUIT_WIDTH, QUIT_HEIGHT, area);
    frame.render_widget(Clear, dialog_area);

    let paragraph = Paragraph::new(yes_no_line("  Really quit? "))
        .block(dialog_block(" Quit? ", Color::Yellow))
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}

/// Render the substitution prompt: who leaves, who enters, y/n.
pub fn render_substitution(frame: &mut Frame, area: Rect, confirmation: &Confirmation) {
    let dialog_area = centered_rect(SUBSTITUTION_WIDTH, SUBSTITUTION_HEIGHT, area);
    frame.render_widget(Clear, dialog_area);

    let lines = vec![
        Line::from(vec![
            Span::styled("  Out: ", Style::default().fg(Color::Red)),
            Span::raw(confirmation.outgoing.clone()),
        ]),
        Line::from(vec![
            Span::styled("  In:  ", Style::default().fg(Color::Green)),
            Span::raw(confirmation.incoming.clone()),
        ]),
        Line::raw(""),
        yes_no_line("  Confirm substitution? "),
    ];

    let paragraph = Paragraph::new(lines)
        .block(dialog_block(" Substitution ", Color::Cyan))
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog_area);
}

fn dialog_block(title: &'static str, color: Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
}

fn yes_no_line(prompt: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw(prompt),
        Span::raw("("),
        Span::styled(
            "y",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("/"),
        Span::styled(
            "n",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::raw(")"),
    ])
}

/// Compute a centered rectangle of the given size within `area`, clamped to
/// the available space.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .split(area);

    Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .split(vertical[0])[0]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
