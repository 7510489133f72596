//! Administrative knobs passed into the engine (never hardcoded in it).

use serde::{Deserialize, Serialize};

/// How a tournament forms its teams.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentMode {
    /// Teams are generated once and kept for the whole tournament.
    #[default]
    FixedTeams,
    /// Teams are re-drawn every round, favouring players who played least.
    BalancedIndividual,
}

/// Ranking formula.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMode {
    /// `(3 x wins + draws) x coefficient`, rounded to 2 decimals.
    #[default]
    Weighted,
    /// `2 x wins + draws`.
    Standard,
}

/// How an ordered list of players is cut into pairs.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingStrategy {
    /// First with last, second with second-to-last, ...
    Extremes,
    /// First with second, third with fourth, ...
    Adjacent,
}

/// When the fixed-team scheduler may fall back to rematches.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RematchFallback {
    /// Allow rematches when novel pairings leave courts empty and teams idle.
    #[default]
    FillCourts,
    /// Never schedule a rematch; courts may stay empty.
    Never,
}

/// Tournament configuration. Every field has a default so partial JSON is accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    pub tournament_mode: TournamentMode,
    /// Formula for the team ranking.
    pub ranking_mode: RankingMode,
    /// Formula for the individual ranking.
    pub individual_ranking_mode: RankingMode,
    /// Courts available per round.
    pub court_capacity: usize,
    /// Strategy for fixed team generation.
    pub team_pairing: PairingStrategy,
    /// Strategy for per-round teams in balanced individual mode.
    pub individual_pairing: PairingStrategy,
    pub rematch_fallback: RematchFallback,
    /// Maximum number of catch-up rounds one closeout may generate.
    pub catchup_round_limit: usize,
    /// In APPEND mode, put new players into bye slots before forming new teams.
    pub append_fills_byes: bool,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            tournament_mode: TournamentMode::FixedTeams,
            ranking_mode: RankingMode::Weighted,
            individual_ranking_mode: RankingMode::Weighted,
            court_capacity: 7,
            team_pairing: PairingStrategy::Extremes,
            individual_pairing: PairingStrategy::Adjacent,
            rematch_fallback: RematchFallback::FillCourts,
            catchup_round_limit: 10,
            append_fills_byes: false,
        }
    }
}
