//! Tournament engine: match history, team pairing, round scheduling, rankings.

mod fixed_round;
mod history;
mod individual_round;
mod pairing;
mod ranking;

pub use fixed_round::generate_round;
pub use history::MatchHistory;
pub use individual_round::{
    analyze_lag, generate_catchup_round, generate_final_rounds, generate_individual_round,
    play_balance, CloseoutOutcome, LagEntry, LagReport, PlayBalance,
};
pub use pairing::{generate_teams, individual_teams, PairingMode};
pub use ranking::{player_ranking, team_ranking, RankingRow};
