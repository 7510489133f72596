//! Match record (two teams on one court in one round) and generated rounds.

use crate::models::team::{Team, TeamId};
use crate::models::warning::Warning;
use serde::{Deserialize, Serialize};

/// Why a match was scheduled.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    #[default]
    Normal,
    /// Scheduled to reduce lag; may include fillers.
    CatchUp,
}

/// Result of a played match from one side's point of view.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

/// A single match. Both scores at zero means "not played yet".
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub round: u32,
    /// "Court 1", "Court 2", ... within the round.
    pub court: String,
    #[serde(default)]
    pub kind: MatchKind,
    pub team_a: TeamId,
    /// Real players on side A (byes are never listed).
    #[serde(default)]
    pub players_a: Vec<String>,
    pub score_a: u32,
    pub team_b: TeamId,
    #[serde(default)]
    pub players_b: Vec<String>,
    pub score_b: u32,
    /// Players standing in for a catch-up match; their statistics are not counted.
    #[serde(default)]
    pub fillers: Vec<String>,
}

impl Match {
    /// New unplayed match on `court_number` (1-based).
    pub fn new(
        round: u32,
        court_number: usize,
        (team_a, players_a): (TeamId, Vec<String>),
        (team_b, players_b): (TeamId, Vec<String>),
    ) -> Self {
        Self {
            round,
            court: court_label(court_number),
            kind: MatchKind::Normal,
            team_a,
            players_a,
            score_a: 0,
            team_b,
            players_b,
            score_b: 0,
            fillers: Vec::new(),
        }
    }

    pub fn is_played(&self) -> bool {
        !(self.score_a == 0 && self.score_b == 0)
    }

    pub fn involves_team(&self, team_id: &str) -> bool {
        self.team_a == team_id || self.team_b == team_id
    }

    pub fn is_filler(&self, player: &str) -> bool {
        self.fillers.iter().any(|f| f == player)
    }

    /// Outcome for side A (`Loss` for B is `Win` for A and so on).
    pub fn outcome_a(&self) -> Outcome {
        match self.score_a.cmp(&self.score_b) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Equal => Outcome::Draw,
            std::cmp::Ordering::Less => Outcome::Loss,
        }
    }
}

/// Label for a 1-based court number.
pub fn court_label(court_number: usize) -> String {
    format!("Court {}", court_number)
}

/// Highest round number in the log, 0 when empty.
pub fn current_round(matches: &[Match]) -> u32 {
    matches.iter().map(|m| m.round).max().unwrap_or(0)
}

/// One generated round: its matches, the teams formed for it (balanced
/// individual and catch-up rounds only) and any warnings raised.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RoundOutcome {
    pub round: u32,
    pub matches: Vec<Match>,
    pub teams: Vec<Team>,
    pub warnings: Vec<Warning>,
}

impl RoundOutcome {
    /// No match was scheduled.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
