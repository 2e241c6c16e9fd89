// Roster groups: the starting five and the bench, each backing one list panel.

use tracing::{debug, warn};

use super::stat::{PlayerStat, StatLine};
use crate::model::{MatchId, Player, PlayerId};
use crate::storage::Storage;

/// Which roster group an adapter holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RosterSide {
    /// Players on the floor.
    Start,
    /// Players available to come in.
    Bench,
}

impl RosterSide {
    pub fn display_str(&self) -> &'static str {
        match self {
            RosterSide::Start => "Starting Five",
            RosterSide::Bench => "Bench",
        }
    }
}

/// What the presenter exposes to its roster adapters.
///
/// Adapters never hold on to the presenter; it is handed to each call that
/// needs to read the substitution selection or report a list change.
pub trait RosterDelegate {
    /// The player this side should give up in a substitution: the outgoing
    /// starter for [`RosterSide::Start`], the incoming bench player for
    /// [`RosterSide::Bench`].
    fn counterpart(&self, side: RosterSide) -> Option<PlayerId>;

    /// Whether selecting a starter should begin a substitution instead of
    /// activating them for scoring.
    fn substitution_mode(&self) -> bool;

    /// The list on `side` changed and needs redisplay.
    fn roster_changed(&mut self, side: RosterSide);
}

/// Outcome of selecting a row, for the presenter to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    /// Nothing to do.
    Ignore,
    /// A starter at this index is now active for scoring.
    Activated(usize),
    /// A starter was picked to leave the floor.
    BeginSubstitution(PlayerId),
    /// A bench player was picked to replace the outgoing starter.
    OfferCounterpart(PlayerId),
}

/// Display content for one row. Empty when the player can't be resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterRow {
    pub name: String,
    pub surname: String,
    pub number: String,
    pub line: StatLine,
}

/// Result of a best-effort save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistReport {
    pub saved: usize,
    pub failed: usize,
}

impl PersistReport {
    pub fn merge(self, other: PersistReport) -> PersistReport {
        PersistReport {
            saved: self.saved + other.saved,
            failed: self.failed + other.failed,
        }
    }
}

/// Ordered stat records for one roster group.
pub struct RosterAdapter<'a, S: Storage + ?Sized> {
    side: RosterSide,
    stats: Vec<PlayerStat>,
    /// Row selected for scoring. Only the starting five ever sets this.
    active: Option<usize>,
    storage: &'a S,
}

impl<'a, S: Storage + ?Sized> RosterAdapter<'a, S> {
    /// One fresh stat record per player, in the given order.
    pub fn new(side: RosterSide, players: &[Player], storage: &'a S) -> Self {
        let stats = players.iter().map(|p| PlayerStat::new(p.id)).collect();
        RosterAdapter {
            side,
            stats,
            active: None,
            storage,
        }
    }

    pub fn side(&self) -> RosterSide {
        self.side
    }

    pub fn row_count(&self) -> usize {
        self.stats.len()
    }

    pub fn stats(&self) -> &[PlayerStat] {
        &self.stats
    }

    pub fn stat_at(&self, index: usize) -> Option<&PlayerStat> {
        self.stats.get(index)
    }

    pub fn position_of(&self, player_id: PlayerId) -> Option<usize> {
        self.stats.iter().position(|s| s.player_id == player_id)
    }

    pub fn stat(&self, player_id: PlayerId) -> Option<&PlayerStat> {
        self.stats.iter().find(|s| s.player_id == player_id)
    }

    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.position_of(player_id).is_some()
    }

    /// Points scored by everyone in this group.
    pub fn points(&self) -> u32 {
        self.stats.iter().map(PlayerStat::points).sum()
    }

    /// Resolve the row's player through storage for display.
    pub fn content(&self, index: usize) -> RosterRow {
        let Some(stat) = self.stats.get(index) else {
            return RosterRow::default();
        };
        match self.storage.player(stat.player_id) {
            Ok(Some(player)) => RosterRow {
                name: player.name,
                surname: player.surname,
                number: player.number,
                line: stat.line,
            },
            Ok(None) => {
                debug!("No player record for id {}", stat.player_id);
                RosterRow::default()
            }
            Err(e) => {
                warn!("Failed to resolve player {}: {:#}", stat.player_id, e);
                RosterRow::default()
            }
        }
    }

    /// Replace this side's substitution counterpart with `incoming`, keeping
    /// its position in the list.
    ///
    /// Returns `false` (and changes nothing) when the delegate has no
    /// counterpart for this side or the counterpart isn't in this list.
    pub fn request_substitution<D: RosterDelegate + ?Sized>(
        &mut self,
        incoming: PlayerStat,
        delegate: &mut D,
    ) -> bool {
        let Some(counterpart) = delegate.counterpart(self.side) else {
            return false;
        };
        let Some(index) = self.position_of(counterpart) else {
            return false;
        };

        debug!(
            "{:?}: player {} replaced by {} at row {}",
            self.side, counterpart, incoming.player_id, index
        );
        self.stats[index] = incoming;
        if self.active == Some(index) {
            self.active = None;
        }
        delegate.roster_changed(self.side);
        true
    }

    /// Stamp every record with `match_id` and write each one.
    ///
    /// A failed write is logged and skipped; the remaining records are still
    /// written.
    pub fn persist_all(&mut self, match_id: MatchId) -> PersistReport {
        let mut report = PersistReport::default();
        for stat in &mut self.stats {
            stat.match_id = Some(match_id);
            match self.storage.save_stat(stat) {
                Ok(()) => report.saved += 1,
                Err(e) => {
                    warn!(
                        "Failed to save stats for player {} (match {}): {:#}",
                        stat.player_id, match_id, e
                    );
                    report.failed += 1;
                }
            }
        }
        report
    }

    /// React to a tap on `index`.
    ///
    /// Bench rows only matter while a starter is waiting to be replaced.
    /// Starting-five rows activate the player for scoring, or pick them to
    /// leave the floor when substitution mode is on.
    pub fn on_row_selected<D: RosterDelegate + ?Sized>(
        &mut self,
        index: usize,
        delegate: &D,
    ) -> RowAction {
        let Some(stat) = self.stats.get(index) else {
            return RowAction::Ignore;
        };
        match self.side {
            RosterSide::Bench => {
                if delegate.counterpart(RosterSide::Start).is_some() {
                    RowAction::OfferCounterpart(stat.player_id)
                } else {
                    RowAction::Ignore
                }
            }
            RosterSide::Start => {
                if delegate.substitution_mode() {
                    RowAction::BeginSubstitution(stat.player_id)
                } else {
                    self.active = Some(index);
                    RowAction::Activated(index)
                }
            }
        }
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_mut(&mut self) -> Option<&mut PlayerStat> {
        self.active.and_then(|i| self.stats.get_mut(i))
    }

    /// Drop the scoring selection, returning the row it was on.
    pub fn clear_active(&mut self) -> Option<usize> {
        self.active.take()
    }
}
