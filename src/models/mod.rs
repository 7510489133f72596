//! Data structures for the doubles tournament: players, categories, teams, matches, session state.

mod category;
mod game;
mod player;
mod team;
mod tournament;
mod warning;

pub use category::{CategoryTable, BYE_CATEGORY, NEUTRAL_COEFFICIENT};
pub(crate) use category::round_to;
pub use game::{court_label, current_round, Match, MatchKind, Outcome, RoundOutcome};
pub use player::{Player, PlayerStatus};
pub use team::{RoundTeams, Team, TeamId, TeamSet};
pub use tournament::{Tournament, TournamentError, TournamentId};
pub use warning::Warning;
pub(crate) use warning::raise;
