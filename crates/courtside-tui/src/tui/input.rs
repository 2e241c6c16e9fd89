// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into presenter calls (row selection,
// scoring events, the substitution handshake) or local ViewState changes
// (cursor movement, panel focus). Save and quit go back to the event loop
// as a UserCommand.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use courtside_core::game::presenter::GamePresenter;
use courtside_core::game::stat::StatEvent;
use courtside_core::storage::Storage;

use super::{Panel, UserCommand, ViewState};

/// Scoring keys, in help-bar order.
pub const EVENT_KEYS: [(char, StatEvent); 13] = [
    ('1', StatEvent::MadeOne),
    ('2', StatEvent::MadeTwo),
    ('3', StatEvent::MadeThree),
    ('4', StatEvent::MissedOne),
    ('5', StatEvent::MissedTwo),
    ('6', StatEvent::MissedThree),
    ('a', StatEvent::Assist),
    ('o', StatEvent::OffensiveRebound),
    ('d', StatEvent::DefensiveRebound),
    ('t', StatEvent::Turnover),
    ('b', StatEvent::Block),
    ('l', StatEvent::Steal),
    ('f', StatEvent::Foul),
];

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the event loop has to act (save, quit).
/// Everything else is handled here by calling into the presenter or
/// mutating the view state.
pub fn handle_key<S: Storage + ?Sized>(
    key_event: KeyEvent,
    presenter: &mut GamePresenter<'_, S, ViewState>,
) -> Option<UserCommand> {
    // On Windows crossterm reports both Press and Release; only act once
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    presenter.view_mut().dirty = true;

    if presenter.view().confirm_quit {
        return handle_confirm_quit(key_event, presenter.view_mut());
    }

    if presenter.view().confirmation.is_some() {
        handle_confirmation(key_event, presenter);
        return None;
    }

    match key_event.code {
        KeyCode::Up | KeyCode::Char('k') => move_cursor(presenter, -1),
        KeyCode::Down | KeyCode::Char('j') => move_cursor(presenter, 1),
        KeyCode::Tab | KeyCode::BackTab => {
            let state = presenter.view_mut();
            state.focus = state.focus.toggle();
        }
        KeyCode::Enter => select_row(presenter),
        KeyCode::Esc => cancel_all(presenter),
        KeyCode::Char('s') => {
            let enabled = !presenter.substitution_mode();
            presenter.set_substitution_mode(enabled);
            presenter.view_mut().set_tip(if enabled {
                "Substitution: pick the starter going out (Enter)"
            } else {
                "Substitution mode off"
            });
        }
        KeyCode::Char('w') => return Some(UserCommand::Save),
        KeyCode::Char('q') => presenter.view_mut().confirm_quit = true,
        KeyCode::Char(c) => {
            if let Some(event) = event_for_key(c) {
                apply_event(presenter, event);
            }
        }
        _ => {}
    }
    None
}

/// Look up the scoring event bound to `c`.
pub fn event_for_key(c: char) -> Option<StatEvent> {
    EVENT_KEYS
        .iter()
        .find(|(key, _)| *key == c)
        .map(|&(_, event)| event)
}

/// Handle key events while the quit dialog is open.
///
/// - `y` or `q` confirms quit
/// - `n` or `Esc` cancels
/// - all other keys are blocked
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

/// Handle key events while a substitution is waiting for confirmation.
///
/// The selection is reset whichever way it goes, so the next bench pick
/// starts over.
fn handle_confirmation<S: Storage + ?Sized>(
    key_event: KeyEvent,
    presenter: &mut GamePresenter<'_, S, ViewState>,
) {
    let confirmed = match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => true,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => false,
        _ => return,
    };

    let tip = if !confirmed {
        "Substitution cancelled"
    } else if presenter.complete() {
        "Substitution made"
    } else {
        "Substitution could not be completed"
    };
    presenter.cancel();

    let state = presenter.view_mut();
    state.confirmation = None;
    state.focus = Panel::Start;
    state.set_tip(tip);
}

fn move_cursor<S: Storage + ?Sized>(
    presenter: &mut GamePresenter<'_, S, ViewState>,
    delta: isize,
) {
    let focus = presenter.view().focus;
    let rows = match focus {
        Panel::Start => presenter.start().row_count(),
        Panel::Bench => presenter.bench().row_count(),
    };
    let state = presenter.view_mut();
    let cursor = match focus {
        Panel::Start => &mut state.start_cursor,
        Panel::Bench => &mut state.bench_cursor,
    };
    let last = rows.saturating_sub(1);
    *cursor = cursor.saturating_add_signed(delta).min(last);
}

fn select_row<S: Storage + ?Sized>(presenter: &mut GamePresenter<'_, S, ViewState>) {
    let state = presenter.view();
    match state.focus {
        Panel::Start => {
            let cursor = state.start_cursor;
            presenter.select_start_row(cursor);
            if presenter.start().active_index() == Some(cursor) {
                let row = presenter.start().content(cursor);
                presenter.view_mut().set_tip(format!(
                    "#{} {} {} selected: press an event key",
                    row.number, row.name, row.surname
                ));
            }
        }
        Panel::Bench => {
            let cursor = state.bench_cursor;
            if presenter.substitution().is_none() {
                presenter
                    .view_mut()
                    .set_tip("Press s, then pick the starter going out");
                return;
            }
            presenter.select_bench_row(cursor);
        }
    }
}

fn apply_event<S: Storage + ?Sized>(
    presenter: &mut GamePresenter<'_, S, ViewState>,
    event: StatEvent,
) {
    let row = presenter
        .start()
        .active_index()
        .map(|i| presenter.start().content(i));
    if presenter.apply_event(event) {
        if let Some(row) = row {
            presenter.view_mut().set_tip(format!(
                "{} for #{} {} {}",
                event.display_str(),
                row.number,
                row.name,
                row.surname
            ));
        }
    }
}

/// Drop the scoring selection and any substitution in progress.
fn cancel_all<S: Storage + ?Sized>(presenter: &mut GamePresenter<'_, S, ViewState>) {
    presenter.deselect_active();
    presenter.cancel();
    presenter.set_substitution_mode(false);
    let state = presenter.view_mut();
    state.focus = Panel::Start;
    state.tip = None;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
