//! Doubles tournament organizer: library with models, pairing, round scheduling and rankings.

pub mod config;
pub mod logic;
pub mod models;

pub use config::{PairingStrategy, RankingMode, RematchFallback, TournamentConfig, TournamentMode};
pub use logic::{
    analyze_lag, generate_catchup_round, generate_final_rounds, generate_individual_round,
    generate_round, generate_teams, individual_teams, play_balance, player_ranking, team_ranking,
    CloseoutOutcome, LagEntry, LagReport, MatchHistory, PairingMode, PlayBalance, RankingRow,
};
pub use models::{
    CategoryTable, Match, MatchKind, Player, PlayerStatus, RoundOutcome, RoundTeams, Team, TeamId,
    TeamSet, Tournament, TournamentError, TournamentId, Warning, BYE_CATEGORY, NEUTRAL_COEFFICIENT,
};
