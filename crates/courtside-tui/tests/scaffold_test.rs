// Smoke tests for the shipped data files and a headless session.

use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use courtside_core::db::Database;
use courtside_core::game::presenter::{GamePresenter, STARTING_FIVE};
use courtside_core::import;
use courtside_core::storage::Storage;
use courtside_tui::tui::{self, input, UserCommand, ViewState};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn press(
    presenter: &mut GamePresenter<'_, Database, ViewState>,
    code: KeyCode,
) -> Option<UserCommand> {
    input::handle_key(KeyEvent::new(code, KeyModifiers::NONE), presenter)
}

/// The sample roster imports cleanly and fills both groups.
#[test]
fn sample_roster_imports() {
    let db = Database::open(":memory:").unwrap();
    let count = import::import_roster(&db, &workspace_root().join("data/roster.csv")).unwrap();
    assert!(count > STARTING_FIVE, "sample roster should have a bench");

    let mut view = ViewState::new("Home", 1);
    let presenter = GamePresenter::setup(&db, &mut view).unwrap();
    assert_eq!(presenter.start().row_count(), STARTING_FIVE);
    assert_eq!(presenter.bench().row_count(), count - STARTING_FIVE);
}

/// Score, substitute, and save through the key handler, then draw a frame.
#[test]
fn headless_session_saves_stats() {
    let db = Database::open(":memory:").unwrap();
    import::import_roster(&db, &workspace_root().join("data/roster.csv")).unwrap();
    let record = db.create_match("Home").unwrap();

    let mut view = ViewState::new("Home", record.id);
    let mut presenter = GamePresenter::setup(&db, &mut view).unwrap();

    // First starter scores a three.
    press(&mut presenter, KeyCode::Enter);
    press(&mut presenter, KeyCode::Char('3'));
    assert_eq!(presenter.overall_points(), 3);

    // Second starter goes out for the first bench player.
    let outgoing = presenter.start().stat_at(1).unwrap().player_id;
    let incoming = presenter.bench().stat_at(0).unwrap().player_id;
    press(&mut presenter, KeyCode::Char('s'));
    press(&mut presenter, KeyCode::Down);
    press(&mut presenter, KeyCode::Enter);
    press(&mut presenter, KeyCode::Enter);
    assert!(presenter.view().confirmation.is_some());
    press(&mut presenter, KeyCode::Char('y'));
    assert_eq!(presenter.start().stat_at(1).unwrap().player_id, incoming);
    assert_eq!(presenter.bench().stat_at(0).unwrap().player_id, outgoing);

    assert_eq!(press(&mut presenter, KeyCode::Char('w')), Some(UserCommand::Save));
    let report = presenter.save_all(record.id);
    assert_eq!(report.failed, 0);
    assert_eq!(report.saved, db.player_count().unwrap());

    let saved = db.stats_for_match(record.id).unwrap();
    let points: u32 = saved.iter().map(|s| s.points()).sum();
    assert_eq!(points, 3);

    let backend = ratatui::backend::TestBackend::new(120, 30);
    let mut terminal = ratatui::Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| tui::render_frame(frame, &presenter))
        .unwrap();
}
