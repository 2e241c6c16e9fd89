// Identity records owned by storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage row id of a player.
pub type PlayerId = i64;

/// Storage row id of a match.
pub type MatchId = i64;

/// A rostered player. Immutable for the duration of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub surname: String,
    /// Jersey number as printed (e.g. "07"), so leading zeros survive.
    pub number: String,
}

impl Player {
    /// "Name Surname", as shown in the substitution prompt.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

/// A match session that player stats are saved against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub home_team: String,
    pub started_at: DateTime<Utc>,
}
