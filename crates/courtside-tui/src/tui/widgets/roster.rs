// Roster panel widget: one list per roster group.
//
// "#07 Alex Moore  12 PTS  3 REB  2 AST  1 PF"
// The active starter is bold yellow, fouled-out players are red, and the
// cursor row is reversed while the panel has focus.

use ratatui::layout::{Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};
use ratatui::Frame;

use courtside_core::game::roster::{RosterAdapter, RosterRow};
use courtside_core::storage::Storage;

/// Render one roster group into the given area.
pub fn render<S: Storage + ?Sized>(
    frame: &mut Frame,
    area: Rect,
    adapter: &RosterAdapter<'_, S>,
    cursor: usize,
    focused: bool,
) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let total = adapter.row_count();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!("{} ({})", adapter.side().display_str(), total));

    if total == 0 {
        let paragraph = Paragraph::new("  No players.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    // Visible row count: subtract 2 for borders
    let visible_rows = (area.height as usize).saturating_sub(2).max(1);
    let cursor = cursor.min(total - 1);
    let scroll_offset = scroll_offset_for(cursor, visible_rows);
    let active = adapter.active_index();

    let items: Vec<ListItem> = (0..total)
        .skip(scroll_offset)
        .take(visible_rows)
        .map(|index| {
            let row = adapter.content(index);
            let style = row_style(
                &row,
                active == Some(index),
                focused && index == cursor,
            );
            ListItem::new(Line::from(Span::styled(
                format!(" {}", format_row_text(&row)),
                style,
            )))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);

    if total > visible_rows {
        let mut scrollbar_state =
            ScrollbarState::new(total.saturating_sub(visible_rows)).position(scroll_offset);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

/// First visible row so that `cursor` stays on screen.
fn scroll_offset_for(cursor: usize, visible_rows: usize) -> usize {
    (cursor + 1).saturating_sub(visible_rows)
}

fn row_style(row: &RosterRow, active: bool, under_cursor: bool) -> Style {
    let mut style = if row.line.fouled_out() {
        Style::default().fg(Color::Red)
    } else if active {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    if active {
        style = style.add_modifier(Modifier::BOLD);
    }
    if under_cursor {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

/// Format a roster row as a plain string.
pub fn format_row_text(row: &RosterRow) -> String {
    if row.name.is_empty() && row.surname.is_empty() {
        return "[unknown player]".to_string();
    }
    format!(
        "#{} {} {}  {} PTS  {} REB  {} AST  {} PF",
        row.number,
        row.name,
        row.surname,
        row.line.points(),
        row.line.rebounds(),
        row.line.assists,
        row.line.fouls,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use courtside_core::db::Database;
    use courtside_core::game::roster::RosterSide;
    use courtside_core::game::stat::{StatEvent, StatLine};

    fn row(number: &str, name: &str, surname: &str) -> RosterRow {
        RosterRow {
            name: name.to_string(),
            surname: surname.to_string(),
            number: number.to_string(),
            line: StatLine::default(),
        }
    }

    #[test]
    fn format_row_text_fresh_player() {
        assert_eq!(
            format_row_text(&row("07", "Alex", "Moore")),
            "#07 Alex Moore  0 PTS  0 REB  0 AST  0 PF"
        );
    }

    #[test]
    fn format_row_text_with_stats() {
        let mut r = row("11", "Robin", "Castillo");
        for event in [
            StatEvent::MadeThree,
            StatEvent::MadeTwo,
            StatEvent::MissedOne,
            StatEvent::OffensiveRebound,
            StatEvent::DefensiveRebound,
            StatEvent::Assist,
            StatEvent::Foul,
        ] {
            r.line.apply(event);
        }
        assert_eq!(
            format_row_text(&r),
            "#11 Robin Castillo  5 PTS  2 REB  1 AST  1 PF"
        );
    }

    #[test]
    fn format_row_text_unresolved() {
        assert_eq!(format_row_text(&RosterRow::default()), "[unknown player]");
    }

    #[test]
    fn scroll_keeps_cursor_visible() {
        assert_eq!(scroll_offset_for(0, 5), 0);
        assert_eq!(scroll_offset_for(4, 5), 0);
        assert_eq!(scroll_offset_for(5, 5), 1);
        assert_eq!(scroll_offset_for(11, 5), 7);
    }

    #[test]
    fn fouled_out_row_is_red() {
        let mut r = row("05", "Sam", "Lee");
        for _ in 0..5 {
            r.line.apply(StatEvent::Foul);
        }
        assert_eq!(row_style(&r, false, false).fg, Some(Color::Red));
    }

    #[test]
    fn active_row_is_bold() {
        let style = row_style(&row("01", "A", "B"), true, false);
        assert!(style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(style.fg, Some(Color::Yellow));
    }

    #[test]
    fn render_does_not_panic_empty() {
        let db = Database::open(":memory:").unwrap();
        let adapter = RosterAdapter::new(RosterSide::Bench, &[], &db);
        let backend = ratatui::backend::TestBackend::new(40, 10);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &adapter, 0, true))
            .unwrap();
    }

    #[test]
    fn render_does_not_panic_with_overflow() {
        let db = Database::open(":memory:").unwrap();
        let players: Vec<_> = (1..=12)
            .map(|i| {
                db.add_player(&format!("N{i}"), &format!("S{i}"), &format!("{i:02}"))
                    .unwrap()
            })
            .collect();
        let adapter = RosterAdapter::new(RosterSide::Bench, &players, &db);
        let backend = ratatui::backend::TestBackend::new(50, 8);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &adapter, 11, true))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Bench (12)"));
        assert!(text.contains("#12 N12 S12"));
    }
}
