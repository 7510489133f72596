//! Non-fatal conditions reported next to a result.

use serde::Serialize;

/// Something the organizer should know about; the operation still went through.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// Odd headcount: this player is teamed with a bye.
    OddPlayerWithBye { player: String },
    /// Novel pairings ran out; `rematches` repeat matchups were scheduled.
    NoNovelPairingAvailable { rematches: usize },
    /// More teams than courts: some teams sit out this round.
    CourtCapacityExceeded { teams: usize, courts: usize, matches: usize },
    /// Catch-up requested but every player has played the same number of matches.
    NoLagRemaining,
    /// Not enough non-lagging players to complete a catch-up match.
    NoFillerAvailable { player: String },
    /// The closeout stopped at its round limit with lag remaining.
    CatchupIterationLimitReached { rounds: usize },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::OddPlayerWithBye { player } => write!(f, "Odd player: {} plays with a bye", player),
            Warning::NoNovelPairingAvailable { rematches } => {
                write!(f, "All new pairings are used up; {} rematch(es) scheduled", rematches)
            }
            Warning::CourtCapacityExceeded {
                teams,
                courts,
                matches,
            } => write!(
                f,
                "{} teams for {} courts: only {} matches will be played",
                teams, courts, matches
            ),
            Warning::NoLagRemaining => write!(f, "Every player has played the same number of matches"),
            Warning::NoFillerAvailable { player } => {
                write!(f, "No filler available to complete a match for {}", player)
            }
            Warning::CatchupIterationLimitReached { rounds } => {
                write!(f, "Catch-up limit of {} rounds reached", rounds)
            }
        }
    }
}

/// Emit a warning through the log facade and keep it for the caller.
pub(crate) fn raise(warnings: &mut Vec<Warning>, warning: Warning) {
    log::warn!("{}", warning);
    warnings.push(warning);
}
