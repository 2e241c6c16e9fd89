// Game presenter: scoring and the substitution handshake.
//
// The presenter works only with stat records. Players come in from storage
// once, at setup; from then on each participant is tracked by the
// `PlayerStat` attached to them.

use anyhow::Result;
use tracing::{debug, info, warn};

use super::roster::{PersistReport, RosterAdapter, RosterDelegate, RosterSide, RowAction};
use super::stat::StatEvent;
use super::substitution::Substitution;
use super::view::GameView;
use crate::model::{MatchId, Player, PlayerId};
use crate::storage::Storage;

/// Players on the floor at once.
pub const STARTING_FIVE: usize = 5;

/// Presenter state the roster adapters can see: the substitution selection
/// and the view it reports list changes to.
struct Session<'a, V: GameView + ?Sized> {
    view: &'a mut V,
    substitution: Substitution,
    substitution_mode: bool,
}

impl<V: GameView + ?Sized> RosterDelegate for Session<'_, V> {
    fn counterpart(&self, side: RosterSide) -> Option<PlayerId> {
        match side {
            RosterSide::Start => self.substitution.outgoing(),
            RosterSide::Bench => self.substitution.incoming(),
        }
    }

    fn substitution_mode(&self) -> bool {
        self.substitution_mode
    }

    fn roster_changed(&mut self, side: RosterSide) {
        match side {
            RosterSide::Start => self.view.reload_start_list(),
            RosterSide::Bench => self.view.reload_bench_list(),
        }
    }
}

/// Mediates between the two roster groups and the view.
pub struct GamePresenter<'a, S: Storage + ?Sized, V: GameView + ?Sized> {
    storage: &'a S,
    start: RosterAdapter<'a, S>,
    bench: RosterAdapter<'a, S>,
    session: Session<'a, V>,
}

impl<'a, S: Storage + ?Sized, V: GameView + ?Sized> GamePresenter<'a, S, V> {
    /// Build a presenter over explicit groups.
    pub fn new(
        starting_five: &[Player],
        bench: &[Player],
        storage: &'a S,
        view: &'a mut V,
    ) -> Self {
        GamePresenter {
            storage,
            start: RosterAdapter::new(RosterSide::Start, starting_five, storage),
            bench: RosterAdapter::new(RosterSide::Bench, bench, storage),
            session: Session {
                view,
                substitution: Substitution::None,
                substitution_mode: false,
            },
        }
    }

    /// Build a presenter from the stored roster: the first five players
    /// start, everyone else is on the bench. With fewer than five players
    /// nobody starts.
    pub fn setup(storage: &'a S, view: &'a mut V) -> Result<Self> {
        let roster = storage.players()?;
        let split = if roster.len() < STARTING_FIVE {
            warn!(
                "Only {} players on the roster; starting five left empty",
                roster.len()
            );
            0
        } else {
            STARTING_FIVE
        };
        let (five, bench) = roster.split_at(split);
        info!(
            "Game set up with {} starters and {} on the bench",
            five.len(),
            bench.len()
        );
        Ok(Self::new(five, bench, storage, view))
    }

    pub fn start(&self) -> &RosterAdapter<'a, S> {
        &self.start
    }

    pub fn bench(&self) -> &RosterAdapter<'a, S> {
        &self.bench
    }

    pub fn view(&self) -> &V {
        &*self.session.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut *self.session.view
    }

    pub fn substitution(&self) -> Substitution {
        self.session.substitution
    }

    pub fn substitution_mode(&self) -> bool {
        self.session.substitution_mode
    }

    pub fn set_substitution_mode(&mut self, enabled: bool) {
        self.session.substitution_mode = enabled;
    }

    /// Team points across both groups.
    pub fn overall_points(&self) -> u32 {
        self.start.points() + self.bench.points()
    }

    // ------------------------------------------------------------------
    // Scoring
    // ------------------------------------------------------------------

    /// Credit `event` to the active starter, then deselect them.
    ///
    /// With no active starter the view is asked to show the tap tip and
    /// nothing changes. Returns whether a player was credited.
    pub fn apply_event(&mut self, event: StatEvent) -> bool {
        let Some(index) = self.start.active_index() else {
            self.session.view.show_tap_tip();
            return false;
        };
        if let Some(stat) = self.start.active_mut() {
            if stat.apply(event) {
                debug!("{:?} credited to player {}", event, stat.player_id);
            } else {
                debug!(
                    "{:?} ignored for player {}: foul limit reached",
                    event, stat.player_id
                );
            }
        }
        self.start.clear_active();
        self.session.view.deselect_start_row(index);
        true
    }

    /// Drop the scoring selection without crediting anything.
    pub fn deselect_active(&mut self) {
        if let Some(index) = self.start.clear_active() {
            self.session.view.deselect_start_row(index);
        }
    }

    // ------------------------------------------------------------------
    // Row selection
    // ------------------------------------------------------------------

    pub fn select_start_row(&mut self, index: usize) {
        match self.start.on_row_selected(index, &self.session) {
            RowAction::BeginSubstitution(player_id) => self.begin_substitution(player_id),
            RowAction::Activated(i) => debug!("Start row {} active", i),
            RowAction::Ignore | RowAction::OfferCounterpart(_) => {}
        }
    }

    pub fn select_bench_row(&mut self, index: usize) {
        if let RowAction::OfferCounterpart(player_id) =
            self.bench.on_row_selected(index, &self.session)
        {
            self.offer_counterpart(player_id);
        }
    }

    // ------------------------------------------------------------------
    // Substitution
    // ------------------------------------------------------------------

    /// Pick the starter leaving the floor and reveal the bench.
    ///
    /// Replaces any selection already in progress and leaves substitution
    /// mode, so the next starter tap goes back to scoring.
    pub fn begin_substitution(&mut self, outgoing: PlayerId) {
        debug!("Substitution started for player {}", outgoing);
        self.session.substitution = Substitution::PendingStart { outgoing };
        self.session.substitution_mode = false;
        self.session.view.show_bench();
    }

    /// Pick the bench player coming in and ask for confirmation.
    ///
    /// Silently does nothing without an outgoing starter, or when either
    /// player can't be resolved through storage. Returns whether the
    /// confirmation prompt was shown.
    pub fn offer_counterpart(&mut self, incoming: PlayerId) -> bool {
        let Some(next) = self.session.substitution.with_incoming(incoming) else {
            debug!("Ignoring counterpart {}: no outgoing starter", incoming);
            return false;
        };
        let Some(outgoing) = next.outgoing().and_then(|id| self.resolve(id)) else {
            return false;
        };
        let Some(incoming) = self.resolve(incoming) else {
            return false;
        };

        self.session.substitution = next;
        self.session
            .view
            .show_substitution_confirmation(&outgoing.full_name(), &incoming.full_name());
        true
    }

    /// Swap the confirmed pair between the groups, each taking the other's
    /// position. Stat records move with their players.
    ///
    /// The selection is left as it is; call [`cancel`](Self::cancel) to
    /// reset it. Returns whether the swap happened.
    pub fn complete(&mut self) -> bool {
        let Substitution::PendingConfirm { outgoing, incoming } = self.session.substitution else {
            debug!("Complete ignored: substitution not confirmed");
            return false;
        };
        let (Some(leaving), Some(entering)) = (
            self.start.stat(outgoing).cloned(),
            self.bench.stat(incoming).cloned(),
        ) else {
            debug!(
                "Complete ignored: {} not on the floor or {} not on the bench",
                outgoing, incoming
            );
            return false;
        };

        self.start.request_substitution(entering, &mut self.session);
        self.bench.request_substitution(leaving, &mut self.session);
        info!("Substitution: player {} in for {}", incoming, outgoing);
        true
    }

    /// Forget any selection, whatever phase it is in.
    pub fn cancel(&mut self) {
        self.session.substitution = Substitution::None;
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Save both groups against `match_id`. Each group is best-effort and
    /// independent of the other.
    pub fn save_all(&mut self, match_id: MatchId) -> PersistReport {
        let report = self
            .bench
            .persist_all(match_id)
            .merge(self.start.persist_all(match_id));
        if report.failed > 0 {
            warn!(
                "Saved {} stat records for match {}, {} failed",
                report.saved, match_id, report.failed
            );
        } else {
            info!("Saved {} stat records for match {}", report.saved, match_id);
        }
        report
    }

    fn resolve(&self, player_id: PlayerId) -> Option<Player> {
        match self.storage.player(player_id) {
            Ok(player) => player,
            Err(e) => {
                warn!("Failed to resolve player {}: {:#}", player_id, e);
                None
            }
        }
    }
}
