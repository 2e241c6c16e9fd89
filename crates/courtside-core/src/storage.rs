// Storage seam between the game presenter and persistence.

use anyhow::Result;

use crate::game::stat::PlayerStat;
use crate::model::{MatchId, MatchRecord, Player, PlayerId};

/// Player identity lookup and stat persistence.
///
/// Calls are synchronous and expected to be fast. Reads are idempotent;
/// writes are best-effort and callers decide whether a failure matters.
pub trait Storage {
    /// All rostered players, in roster order.
    fn players(&self) -> Result<Vec<Player>>;

    /// Look up a single player. `Ok(None)` when the id is unknown.
    fn player(&self, id: PlayerId) -> Result<Option<Player>>;

    /// Write one stat record. The stat must carry a match id.
    fn save_stat(&self, stat: &PlayerStat) -> Result<()>;

    /// Stat records saved for a match, ordered by player id.
    fn stats_for_match(&self, match_id: MatchId) -> Result<Vec<PlayerStat>>;

    /// Open a new match and return its record.
    fn create_match(&self, home_team: &str) -> Result<MatchRecord>;
}
