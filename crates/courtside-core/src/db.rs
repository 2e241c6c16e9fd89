// SQLite persistence layer for the roster and match stats.

use std::sync::{Mutex, MutexGuard};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::game::stat::{PlayerStat, StatLine};
use crate::model::{MatchId, MatchRecord, Player, PlayerId};
use crate::storage::Storage;

/// Counter columns of `player_stats`, in `StatLine` field order.
const STAT_COLUMNS: &str = "free_throws_made, free_throws_attempts,
    two_points_made, two_points_attempts,
    three_points_made, three_points_attempts,
    assists, offense_rebounds, defense_rebounds,
    turnovers, blocks, steals, fouls";

/// SQLite-backed persistence for players, matches, per-match player stats,
/// and key-value session state.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS players (
                id      INTEGER PRIMARY KEY AUTOINCREMENT,
                name    TEXT NOT NULL,
                surname TEXT NOT NULL,
                number  TEXT NOT NULL,
                -- Position on the current roster; NULL once dropped from it.
                roster_order INTEGER,
                UNIQUE(name, surname)
            );

            CREATE TABLE IF NOT EXISTS matches (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                home_team  TEXT NOT NULL,
                started_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS player_stats (
                match_id              INTEGER NOT NULL,
                player_id             INTEGER NOT NULL REFERENCES players(id),
                free_throws_made      INTEGER NOT NULL DEFAULT 0,
                free_throws_attempts  INTEGER NOT NULL DEFAULT 0,
                two_points_made       INTEGER NOT NULL DEFAULT 0,
                two_points_attempts   INTEGER NOT NULL DEFAULT 0,
                three_points_made     INTEGER NOT NULL DEFAULT 0,
                three_points_attempts INTEGER NOT NULL DEFAULT 0,
                assists               INTEGER NOT NULL DEFAULT 0,
                offense_rebounds      INTEGER NOT NULL DEFAULT 0,
                defense_rebounds      INTEGER NOT NULL DEFAULT 0,
                turnovers             INTEGER NOT NULL DEFAULT 0,
                blocks                INTEGER NOT NULL DEFAULT 0,
                steals                INTEGER NOT NULL DEFAULT 0,
                fouls                 INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (match_id, player_id)
            );

            CREATE TABLE IF NOT EXISTS session_state (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )
        .context("failed to create database schema")?;

        // Migration: databases created before roster ordering keep their
        // players on the roster in id order.
        if conn
            .execute_batch("ALTER TABLE players ADD COLUMN roster_order INTEGER;")
            .is_ok()
        {
            conn.execute_batch("UPDATE players SET roster_order = id;")
                .context("failed to backfill roster order")?;
        }

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock).
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    // ------------------------------------------------------------------
    // Players
    // ------------------------------------------------------------------

    /// Insert a player or update the jersey number of an existing
    /// `(name, surname)` row. New players, and players previously dropped
    /// from the roster, go to the end of the roster. Returns the stored
    /// player.
    pub fn add_player(&self, name: &str, surname: &str, number: &str) -> Result<Player> {
        let conn = self.conn();
        let id: PlayerId = conn
            .query_row(
                "INSERT INTO players (name, surname, number, roster_order)
                 VALUES (?1, ?2, ?3,
                         (SELECT COALESCE(MAX(roster_order) + 1, 0) FROM players))
                 ON CONFLICT(name, surname) DO UPDATE SET
                     number = excluded.number,
                     roster_order = COALESCE(players.roster_order, excluded.roster_order)
                 RETURNING id",
                params![name, surname, number],
                |row| row.get(0),
            )
            .context("failed to upsert player")?;
        Ok(Player {
            id,
            name: name.to_string(),
            surname: surname.to_string(),
            number: number.to_string(),
        })
    }

    /// Replace the roster with `players`, in the given order, in a single
    /// transaction. A repeated `(name, surname)` keeps its first position and
    /// its last number. Players missing from the batch leave the roster but
    /// keep their rows, so saved stats still resolve. Returns how many rows
    /// were written.
    pub fn import_players(&self, players: &[(&str, &str, &str)]) -> Result<usize> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin import transaction")?;

        tx.execute("UPDATE players SET roster_order = NULL", [])
            .context("failed to clear roster order")?;
        for (position, &(name, surname, number)) in players.iter().enumerate() {
            tx.execute(
                "INSERT INTO players (name, surname, number, roster_order)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(name, surname) DO UPDATE SET
                     number = excluded.number,
                     roster_order = COALESCE(players.roster_order, excluded.roster_order)",
                params![name, surname, number, position as i64],
            )
            .context("failed to upsert player in batch")?;
        }

        tx.commit().context("failed to commit import")?;
        Ok(players.len())
    }

    /// Number of players on the current roster.
    pub fn player_count(&self) -> Result<usize> {
        let conn = self.conn();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM players WHERE roster_order IS NOT NULL",
                [],
                |row| row.get(0),
            )
            .context("failed to count players")?;
        Ok(count as usize)
    }

    fn player_from_row(row: &Row<'_>) -> rusqlite::Result<Player> {
        Ok(Player {
            id: row.get(0)?,
            name: row.get(1)?,
            surname: row.get(2)?,
            number: row.get(3)?,
        })
    }

    // ------------------------------------------------------------------
    // Matches
    // ------------------------------------------------------------------

    /// Look up a match by id.
    pub fn load_match(&self, match_id: MatchId) -> Result<Option<MatchRecord>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT id, home_team, started_at FROM matches WHERE id = ?1")
            .context("failed to prepare load_match query")?;

        let mut rows = stmt
            .query_map(params![match_id], |row| {
                let id: MatchId = row.get(0)?;
                let home_team: String = row.get(1)?;
                let started_at: String = row.get(2)?;
                Ok((id, home_team, started_at))
            })
            .context("failed to query matches")?;

        match rows.next() {
            Some(row_result) => {
                let (id, home_team, started_at) =
                    row_result.context("failed to read match row")?;
                let started_at = DateTime::parse_from_rfc3339(&started_at)
                    .with_context(|| format!("bad started_at for match {id}"))?
                    .with_timezone(&Utc);
                Ok(Some(MatchRecord {
                    id,
                    home_team,
                    started_at,
                }))
            }
            None => Ok(None),
        }
    }

    // ------------------------------------------------------------------
    // Session state (key-value)
    // ------------------------------------------------------------------

    /// Persist an arbitrary JSON value under `key`, replacing any previous
    /// value.
    pub fn save_state(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let conn = self.conn();
        let json_str =
            serde_json::to_string(value).context("failed to serialize state value")?;
        conn.execute(
            "INSERT OR REPLACE INTO session_state (key, value) VALUES (?1, ?2)",
            params![key, json_str],
        )
        .context("failed to save state")?;
        Ok(())
    }

    /// Load a previously saved JSON value by `key`.
    pub fn load_state(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT value FROM session_state WHERE key = ?1")
            .context("failed to prepare load_state query")?;

        let mut rows = stmt
            .query_map(params![key], |row| row.get::<_, String>(0))
            .context("failed to query session state")?;

        match rows.next() {
            Some(row_result) => {
                let json_str = row_result.context("failed to read state row")?;
                let value = serde_json::from_str(&json_str)
                    .context("failed to deserialize state value")?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    const CURRENT_MATCH_KEY: &'static str = "current_match_id";

    /// The match the last session was scoring, if any.
    pub fn current_match_id(&self) -> Result<Option<MatchId>> {
        let value = self.load_state(Self::CURRENT_MATCH_KEY)?;
        Ok(value.and_then(|v| v.as_i64()))
    }

    pub fn set_current_match_id(&self, match_id: MatchId) -> Result<()> {
        self.save_state(Self::CURRENT_MATCH_KEY, &serde_json::Value::from(match_id))
    }
}

fn line_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<StatLine> {
    Ok(StatLine {
        free_throws_made: row.get(offset)?,
        free_throws_attempts: row.get(offset + 1)?,
        two_points_made: row.get(offset + 2)?,
        two_points_attempts: row.get(offset + 3)?,
        three_points_made: row.get(offset + 4)?,
        three_points_attempts: row.get(offset + 5)?,
        assists: row.get(offset + 6)?,
        offense_rebounds: row.get(offset + 7)?,
        defense_rebounds: row.get(offset + 8)?,
        turnovers: row.get(offset + 9)?,
        blocks: row.get(offset + 10)?,
        steals: row.get(offset + 11)?,
        fouls: row.get(offset + 12)?,
    })
}

impl Storage for Database {
    fn players(&self) -> Result<Vec<Player>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT id, name, surname, number FROM players
                 WHERE roster_order IS NOT NULL
                 ORDER BY roster_order, id",
            )
            .context("failed to prepare players query")?;

        let players = stmt
            .query_map([], Self::player_from_row)
            .context("failed to query players")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map player rows")?;
        Ok(players)
    }

    fn player(&self, id: PlayerId) -> Result<Option<Player>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT id, name, surname, number FROM players WHERE id = ?1")
            .context("failed to prepare player query")?;

        let mut rows = stmt
            .query_map(params![id], Self::player_from_row)
            .context("failed to query player")?;

        match rows.next() {
            Some(row_result) => Ok(Some(row_result.context("failed to read player row")?)),
            None => Ok(None),
        }
    }

    /// Uses INSERT OR REPLACE so saving the same match twice keeps only the
    /// latest counters.
    fn save_stat(&self, stat: &PlayerStat) -> Result<()> {
        let Some(match_id) = stat.match_id else {
            bail!("stat for player {} has no match id", stat.player_id);
        };
        let line = &stat.line;
        let conn = self.conn();
        conn.execute(
            &format!(
                "INSERT OR REPLACE INTO player_stats (match_id, player_id, {STAT_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
            ),
            params![
                match_id,
                stat.player_id,
                line.free_throws_made,
                line.free_throws_attempts,
                line.two_points_made,
                line.two_points_attempts,
                line.three_points_made,
                line.three_points_attempts,
                line.assists,
                line.offense_rebounds,
                line.defense_rebounds,
                line.turnovers,
                line.blocks,
                line.steals,
                line.fouls,
            ],
        )
        .with_context(|| format!("failed to save stats for player {}", stat.player_id))?;
        Ok(())
    }

    fn stats_for_match(&self, match_id: MatchId) -> Result<Vec<PlayerStat>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT match_id, player_id, {STAT_COLUMNS}
                 FROM player_stats WHERE match_id = ?1 ORDER BY player_id"
            ))
            .context("failed to prepare stats_for_match query")?;

        let stats = stmt
            .query_map(params![match_id], |row| {
                Ok(PlayerStat {
                    match_id: Some(row.get(0)?),
                    player_id: row.get(1)?,
                    line: line_from_row(row, 2)?,
                })
            })
            .context("failed to query player stats")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map player stat rows")?;
        Ok(stats)
    }

    fn create_match(&self, home_team: &str) -> Result<MatchRecord> {
        let started_at = Utc::now();
        let conn = self.conn();
        let id: MatchId = conn
            .query_row(
                "INSERT INTO matches (home_team, started_at) VALUES (?1, ?2) RETURNING id",
                params![home_team, started_at.to_rfc3339()],
                |row| row.get(0),
            )
            .context("failed to create match")?;
        Ok(MatchRecord {
            id,
            home_team: home_team.to_string(),
            started_at,
        })
    }
}
