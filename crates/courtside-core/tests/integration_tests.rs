// Integration tests for the scorekeeping core.
//
// These drive the presenter through the public API against both the SQLite
// database and a plain in-memory storage, checking that roster membership,
// scoring, the substitution handshake, and persistence hold together.

use std::cell::RefCell;
use std::collections::BTreeMap;

use anyhow::{bail, Result};
use chrono::Utc;

use courtside_core::db::Database;
use courtside_core::game::presenter::GamePresenter;
use courtside_core::game::roster::{PersistReport, RosterAdapter, RosterSide};
use courtside_core::game::stat::{PlayerStat, StatEvent};
use courtside_core::game::substitution::Substitution;
use courtside_core::game::view::{CommandLog, GameView, ViewCommand};
use courtside_core::model::{MatchId, MatchRecord, Player, PlayerId};
use courtside_core::storage::Storage;

// ===========================================================================
// Test helpers
// ===========================================================================

/// Storage kept entirely in memory, keyed the way the database keys rows.
#[derive(Default)]
struct MemoryStorage {
    players: Vec<Player>,
    stats: RefCell<BTreeMap<(MatchId, PlayerId), PlayerStat>>,
    matches: RefCell<Vec<MatchRecord>>,
}

impl MemoryStorage {
    fn with_players(count: usize) -> Self {
        let players = (1..=count as i64)
            .map(|i| Player {
                id: i,
                name: format!("P{i}"),
                surname: format!("Player{i}"),
                number: i.to_string(),
            })
            .collect();
        MemoryStorage {
            players,
            ..Default::default()
        }
    }
}

impl Storage for MemoryStorage {
    fn players(&self) -> Result<Vec<Player>> {
        Ok(self.players.clone())
    }

    fn player(&self, id: PlayerId) -> Result<Option<Player>> {
        Ok(self.players.iter().find(|p| p.id == id).cloned())
    }

    fn save_stat(&self, stat: &PlayerStat) -> Result<()> {
        let Some(match_id) = stat.match_id else {
            bail!("stat has no match id");
        };
        self.stats
            .borrow_mut()
            .insert((match_id, stat.player_id), stat.clone());
        Ok(())
    }

    fn stats_for_match(&self, match_id: MatchId) -> Result<Vec<PlayerStat>> {
        Ok(self
            .stats
            .borrow()
            .iter()
            .filter(|((m, _), _)| *m == match_id)
            .map(|(_, s)| s.clone())
            .collect())
    }

    fn create_match(&self, home_team: &str) -> Result<MatchRecord> {
        let mut matches = self.matches.borrow_mut();
        let record = MatchRecord {
            id: matches.len() as i64 + 1,
            home_team: home_team.to_string(),
            started_at: Utc::now(),
        };
        matches.push(record.clone());
        Ok(record)
    }
}

fn ids<S: Storage + ?Sized>(adapter: &RosterAdapter<'_, S>) -> Vec<PlayerId> {
    adapter.stats().iter().map(|s| s.player_id).collect()
}

/// Every rostered player sits in exactly one of the two groups.
fn assert_partition<S: Storage, V: GameView>(
    presenter: &GamePresenter<'_, S, V>,
    roster: &[Player],
) {
    for player in roster {
        let on_floor = presenter.start().contains(player.id);
        let on_bench = presenter.bench().contains(player.id);
        assert!(
            on_floor ^ on_bench,
            "player {} on floor: {on_floor}, on bench: {on_bench}",
            player.id
        );
    }
    assert_eq!(
        presenter.start().row_count() + presenter.bench().row_count(),
        roster.len()
    );
}

fn substitute<S: Storage, V: GameView>(
    presenter: &mut GamePresenter<'_, S, V>,
    outgoing: PlayerId,
    incoming: PlayerId,
) -> bool {
    presenter.begin_substitution(outgoing);
    presenter.offer_counterpart(incoming);
    let done = presenter.complete();
    presenter.cancel();
    done
}

// ===========================================================================
// Roster membership
// ===========================================================================

#[test]
fn every_player_in_exactly_one_group_across_substitutions() {
    let storage = MemoryStorage::with_players(10);
    let roster = storage.players().unwrap();
    let mut view = CommandLog::default();
    let mut presenter = GamePresenter::setup(&storage, &mut view).unwrap();
    assert_partition(&presenter, &roster);

    // Every original starter spends time on the bench
    for (out, inc) in [(1, 6), (2, 7), (6, 1), (3, 8), (4, 9), (5, 10), (1, 2)] {
        assert!(substitute(&mut presenter, out, inc), "{out} -> {inc}");
        assert_partition(&presenter, &roster);
    }
    assert_eq!(ids(presenter.start()), vec![2, 7, 8, 9, 10]);
}

#[test]
fn six_player_scenario() {
    let storage = MemoryStorage::with_players(6);
    let mut view = CommandLog::default();
    let mut presenter = GamePresenter::setup(&storage, &mut view).unwrap();
    assert_eq!(ids(presenter.start()), vec![1, 2, 3, 4, 5]);
    assert_eq!(ids(presenter.bench()), vec![6]);

    presenter.begin_substitution(1);
    presenter.offer_counterpart(6);
    presenter.complete();

    assert_eq!(ids(presenter.start()), vec![6, 2, 3, 4, 5]);
    assert_eq!(ids(presenter.bench()), vec![1]);
}

#[test]
fn substitution_swaps_exact_positions() {
    let storage = MemoryStorage::with_players(9);
    let mut view = CommandLog::default();
    let mut presenter = GamePresenter::setup(&storage, &mut view).unwrap();

    presenter.select_start_row(3);
    presenter.apply_event(StatEvent::Block);
    presenter.select_start_row(0);
    presenter.apply_event(StatEvent::Steal);

    // Starter at index 3 (id 4) for bench index 2 (id 8)
    let before_start: Vec<_> = presenter.start().stats().to_vec();
    let before_bench: Vec<_> = presenter.bench().stats().to_vec();
    presenter.begin_substitution(4);
    presenter.offer_counterpart(8);
    assert!(presenter.complete());

    let start = presenter.start().stats();
    let bench = presenter.bench().stats();
    assert_eq!(start[3].player_id, 8);
    assert_eq!(start[3].line, before_bench[2].line);
    assert_eq!(bench[2].player_id, 4);
    assert_eq!(bench[2].line, before_start[3].line);
    assert_eq!(bench[2].line.blocks, 1);

    for i in [0, 1, 2, 4] {
        assert_eq!(start[i].player_id, before_start[i].player_id);
        assert_eq!(start[i].line, before_start[i].line);
    }
    for i in [0, 1, 3] {
        assert_eq!(bench[i].player_id, before_bench[i].player_id);
    }
}

// ===========================================================================
// Scoring
// ===========================================================================

#[test]
fn foul_counter_caps_at_five() {
    let storage = MemoryStorage::with_players(6);
    let mut view = CommandLog::default();
    let mut presenter = GamePresenter::setup(&storage, &mut view).unwrap();

    for _ in 0..6 {
        presenter.select_start_row(1);
        presenter.apply_event(StatEvent::Foul);
    }
    let stat = presenter.start().stat(2).unwrap();
    assert_eq!(stat.line.fouls, 5);
    assert!(stat.line.fouled_out());
}

#[test]
fn event_without_active_player_changes_nothing() {
    let storage = MemoryStorage::with_players(7);
    let mut view = CommandLog::default();
    let mut presenter = GamePresenter::setup(&storage, &mut view).unwrap();

    for event in StatEvent::ALL {
        assert!(!presenter.apply_event(event));
    }
    assert!(presenter
        .start()
        .stats()
        .iter()
        .chain(presenter.bench().stats())
        .all(|s| s.line == Default::default()));
    assert_eq!(
        presenter.view().commands,
        vec![ViewCommand::ShowTapTip; StatEvent::ALL.len()]
    );
}

#[test]
fn team_points_follow_players_to_the_bench() {
    let storage = MemoryStorage::with_players(6);
    let mut view = CommandLog::default();
    let mut presenter = GamePresenter::setup(&storage, &mut view).unwrap();

    for (row, event) in [
        (0, StatEvent::MadeThree),
        (1, StatEvent::MadeTwo),
        (1, StatEvent::MissedTwo),
        (2, StatEvent::MadeOne),
    ] {
        presenter.select_start_row(row);
        presenter.apply_event(event);
    }
    assert_eq!(presenter.overall_points(), 6);

    substitute(&mut presenter, 1, 6);
    assert_eq!(presenter.bench().points(), 3);
    assert_eq!(presenter.start().points(), 3);
    assert_eq!(presenter.overall_points(), 6);
}

// ===========================================================================
// Cancel / complete
// ===========================================================================

#[test]
fn cancel_resets_any_partial_selection() {
    let storage = MemoryStorage::with_players(6);
    let mut view = CommandLog::default();
    let mut presenter = GamePresenter::setup(&storage, &mut view).unwrap();

    // After picking only the outgoing starter
    presenter.begin_substitution(2);
    presenter.cancel();
    assert_eq!(presenter.substitution(), Substitution::None);
    assert!(!presenter.complete());

    // After picking both
    presenter.begin_substitution(2);
    presenter.offer_counterpart(6);
    presenter.cancel();
    assert_eq!(presenter.substitution(), Substitution::None);
    assert!(!presenter.complete());

    assert_eq!(ids(presenter.start()), vec![1, 2, 3, 4, 5]);
    assert_eq!(ids(presenter.bench()), vec![6]);
}

#[test]
fn complete_before_confirmation_is_noop() {
    let storage = MemoryStorage::with_players(6);
    let mut view = CommandLog::default();
    let mut presenter = GamePresenter::setup(&storage, &mut view).unwrap();

    assert!(!presenter.complete());
    presenter.begin_substitution(1);
    assert!(!presenter.complete());
    assert_eq!(ids(presenter.bench()), vec![6]);
    assert!(!presenter.view().contains(&ViewCommand::ReloadStartList));
}

// ===========================================================================
// Persistence
// ===========================================================================

#[test]
fn persist_round_trip_through_memory_storage() {
    let storage = MemoryStorage::with_players(6);
    let mut view = CommandLog::default();
    let mut presenter = GamePresenter::setup(&storage, &mut view).unwrap();

    presenter.select_start_row(0);
    presenter.apply_event(StatEvent::MadeTwo);
    presenter.select_start_row(4);
    presenter.apply_event(StatEvent::DefensiveRebound);

    let mut expected: Vec<_> = presenter
        .start()
        .stats()
        .iter()
        .chain(presenter.bench().stats())
        .map(|s| (s.player_id, s.line))
        .collect();
    expected.sort_by_key(|(id, _)| *id);

    assert_eq!(
        presenter.save_all(7),
        PersistReport {
            saved: 6,
            failed: 0
        }
    );

    let saved = storage.stats_for_match(7).unwrap();
    assert!(saved.iter().all(|s| s.match_id == Some(7)));
    let actual: Vec<_> = saved.iter().map(|s| (s.player_id, s.line)).collect();
    assert_eq!(actual, expected);
}

#[test]
fn persist_round_trip_through_database() {
    let db = Database::open(":memory:").unwrap();
    db.import_players(&[
        ("A", "One", "1"),
        ("B", "Two", "2"),
        ("C", "Three", "3"),
    ])
    .unwrap();
    let players = db.players().unwrap();

    let mut bench = RosterAdapter::new(RosterSide::Bench, &players, &db);
    let report = bench.persist_all(7);
    assert_eq!(report.saved, 3);

    let saved = db.stats_for_match(7).unwrap();
    assert_eq!(saved.len(), 3);
    for (stat, player) in saved.iter().zip(&players) {
        assert_eq!(stat.player_id, player.id);
        assert_eq!(stat.match_id, Some(7));
        assert_eq!(stat.line, Default::default());
    }
}

#[test]
fn full_match_session_against_database() {
    let db = Database::open(":memory:").unwrap();
    for i in 1..=8 {
        db.add_player(&format!("N{i}"), &format!("S{i}"), &format!("{i:02}"))
            .unwrap();
    }
    let record = db.create_match("Home").unwrap();
    db.set_current_match_id(record.id).unwrap();

    let mut view = CommandLog::default();
    let mut presenter = GamePresenter::setup(&db, &mut view).unwrap();
    let first = presenter.start().stat_at(0).unwrap().player_id;
    let sub = presenter.bench().stat_at(0).unwrap().player_id;

    presenter.select_start_row(0);
    presenter.apply_event(StatEvent::MadeThree);
    substitute(&mut presenter, first, sub);
    presenter.select_start_row(0);
    presenter.apply_event(StatEvent::MadeTwo);

    let match_id = db.current_match_id().unwrap().unwrap();
    let report = presenter.save_all(match_id);
    assert_eq!(report.failed, 0);

    let saved = db.stats_for_match(match_id).unwrap();
    let total: u32 = saved.iter().map(PlayerStat::points).sum();
    assert_eq!(total, 5);
    let starter = saved.iter().find(|s| s.player_id == first).unwrap();
    assert_eq!(starter.line.three_points_made, 1);
    let replacement = saved.iter().find(|s| s.player_id == sub).unwrap();
    assert_eq!(replacement.line.two_points_made, 1);

    assert_eq!(presenter.start().content(0).number, "06");
}

#[test]
fn setup_follows_latest_roster_import() {
    let db = Database::open(":memory:").unwrap();
    let rows = |names: &[&'static str]| -> Vec<(&'static str, &'static str, &'static str)> {
        names.iter().map(|&n| (n, "Player", "0")).collect()
    };
    db.import_players(&rows(&["A", "B", "C", "D", "E", "F"]))
        .unwrap();
    db.import_players(&rows(&["G", "H", "I", "J", "K", "B"]))
        .unwrap();

    let mut view = CommandLog::default();
    let presenter = GamePresenter::setup(&db, &mut view).unwrap();
    let names = |adapter: &RosterAdapter<'_, Database>| -> Vec<String> {
        (0..adapter.row_count())
            .map(|i| adapter.content(i).name)
            .collect()
    };
    assert_eq!(names(presenter.start()), vec!["G", "H", "I", "J", "K"]);
    assert_eq!(names(presenter.bench()), vec!["B"]);
}
