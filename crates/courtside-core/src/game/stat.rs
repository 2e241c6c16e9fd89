// Per-match stat accumulation and the scoring event table.

use serde::{Deserialize, Serialize};

use crate::model::{MatchId, PlayerId};

/// A player fouls out on the fifth foul; further fouls are not recorded.
pub const MAX_FOULS: u32 = 5;

/// A scoring or defensive event entered by the scorekeeper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatEvent {
    MadeOne,
    MissedOne,
    MadeTwo,
    MissedTwo,
    MadeThree,
    MissedThree,
    Assist,
    OffensiveRebound,
    DefensiveRebound,
    Turnover,
    Block,
    Steal,
    Foul,
}

impl StatEvent {
    /// Every event, in scoreboard order.
    pub const ALL: [StatEvent; 13] = [
        StatEvent::MadeOne,
        StatEvent::MissedOne,
        StatEvent::MadeTwo,
        StatEvent::MissedTwo,
        StatEvent::MadeThree,
        StatEvent::MissedThree,
        StatEvent::Assist,
        StatEvent::OffensiveRebound,
        StatEvent::DefensiveRebound,
        StatEvent::Turnover,
        StatEvent::Block,
        StatEvent::Steal,
        StatEvent::Foul,
    ];

    /// Short scoreboard label.
    pub fn display_str(&self) -> &'static str {
        match self {
            StatEvent::MadeOne => "+1",
            StatEvent::MissedOne => "x1",
            StatEvent::MadeTwo => "+2",
            StatEvent::MissedTwo => "x2",
            StatEvent::MadeThree => "+3",
            StatEvent::MissedThree => "x3",
            StatEvent::Assist => "AST",
            StatEvent::OffensiveRebound => "OREB",
            StatEvent::DefensiveRebound => "DREB",
            StatEvent::Turnover => "TO",
            StatEvent::Block => "BLK",
            StatEvent::Steal => "STL",
            StatEvent::Foul => "PF",
        }
    }
}

/// Counters for one player in one match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLine {
    pub free_throws_made: u32,
    pub free_throws_attempts: u32,
    pub two_points_made: u32,
    pub two_points_attempts: u32,
    pub three_points_made: u32,
    pub three_points_attempts: u32,
    pub assists: u32,
    pub offense_rebounds: u32,
    pub defense_rebounds: u32,
    pub turnovers: u32,
    pub blocks: u32,
    pub steals: u32,
    pub fouls: u32,
}

impl StatLine {
    /// Apply one event. Returns `false` when the event was ignored (a foul
    /// past [`MAX_FOULS`]).
    pub fn apply(&mut self, event: StatEvent) -> bool {
        match event {
            StatEvent::MadeOne => {
                self.free_throws_made += 1;
                self.free_throws_attempts += 1;
            }
            StatEvent::MissedOne => self.free_throws_attempts += 1,
            StatEvent::MadeTwo => {
                self.two_points_made += 1;
                self.two_points_attempts += 1;
            }
            StatEvent::MissedTwo => self.two_points_attempts += 1,
            StatEvent::MadeThree => {
                self.three_points_made += 1;
                self.three_points_attempts += 1;
            }
            StatEvent::MissedThree => self.three_points_attempts += 1,
            StatEvent::Assist => self.assists += 1,
            StatEvent::OffensiveRebound => self.offense_rebounds += 1,
            StatEvent::DefensiveRebound => self.defense_rebounds += 1,
            StatEvent::Turnover => self.turnovers += 1,
            StatEvent::Block => self.blocks += 1,
            StatEvent::Steal => self.steals += 1,
            StatEvent::Foul => {
                if self.fouls >= MAX_FOULS {
                    return false;
                }
                self.fouls += 1;
            }
        }
        true
    }

    /// Points scored from made shots.
    pub fn points(&self) -> u32 {
        self.free_throws_made + 2 * self.two_points_made + 3 * self.three_points_made
    }

    /// Offensive plus defensive rebounds.
    pub fn rebounds(&self) -> u32 {
        self.offense_rebounds + self.defense_rebounds
    }

    pub fn fouled_out(&self) -> bool {
        self.fouls >= MAX_FOULS
    }
}

/// A player's stat record for one match.
///
/// Two records are equal when they belong to the same player, regardless of
/// counters or match; compare `line` for value equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStat {
    pub player_id: PlayerId,
    /// Stamped when the record is saved.
    pub match_id: Option<MatchId>,
    pub line: StatLine,
}

impl PlayerStat {
    /// A fresh, unsaved record with all counters at zero.
    pub fn new(player_id: PlayerId) -> Self {
        PlayerStat {
            player_id,
            match_id: None,
            line: StatLine::default(),
        }
    }

    pub fn apply(&mut self, event: StatEvent) -> bool {
        self.line.apply(event)
    }

    pub fn points(&self) -> u32 {
        self.line.points()
    }
}

impl PartialEq for PlayerStat {
    fn eq(&self, other: &Self) -> bool {
        self.player_id == other.player_id
    }
}

impl Eq for PlayerStat {}
