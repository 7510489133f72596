//! Balanced individual play: teams re-drawn every round, lag analysis, and
//! catch-up rounds that bring underplayed players level with the rest.

use crate::config::TournamentConfig;
use crate::logic::history::MatchHistory;
use crate::logic::pairing::{eligible_players, individual_teams, Candidate};
use crate::models::{
    raise, CategoryTable, Match, MatchKind, Player, RoundOutcome, Team, TournamentError, Warning,
};
use rand::Rng;
use serde::Serialize;
use std::cmp::Reverse;

/// Players per catch-up match (two teams of two).
const SEATS_PER_MATCH: usize = 4;

/// Generate a normal round in balanced individual mode.
///
/// Fresh teams are drawn for this round only (see [`individual_teams`]); they
/// are then matched in order, first against second, third against fourth, up to
/// the court capacity. The returned outcome carries the team snapshot.
pub fn generate_individual_round<R: Rng + ?Sized>(
    players: &[Player],
    categories: &CategoryTable,
    history: &MatchHistory,
    config: &TournamentConfig,
    rng: &mut R,
) -> Result<RoundOutcome, TournamentError> {
    let courts = config.court_capacity;
    if courts == 0 {
        return Err(TournamentError::InvalidCourtCapacity);
    }
    let round = history.next_round();
    let (teams, mut warnings) = individual_teams(
        players,
        categories,
        history,
        round,
        config.individual_pairing,
        rng,
    )?;
    if teams.len() < 2 {
        // Two players make a single team: nobody to play against.
        return Err(TournamentError::InsufficientPlayers {
            required: 3,
            available: teams.iter().map(|t| t.members().len()).sum(),
        });
    }

    let possible = courts.min(teams.len() / 2);
    let matches: Vec<Match> = teams
        .chunks_exact(2)
        .take(possible)
        .enumerate()
        .map(|(i, pair)| {
            Match::new(
                round,
                i + 1,
                MatchHistory::lineup(&pair[0]),
                MatchHistory::lineup(&pair[1]),
            )
        })
        .collect();

    if teams.len() > courts * 2 {
        raise(
            &mut warnings,
            Warning::CourtCapacityExceeded {
                teams: teams.len(),
                courts,
                matches: matches.len(),
            },
        );
    } else if teams.len() % 2 == 1 {
        log::info!("{} sits out round {}", teams[teams.len() - 1].id, round);
    }
    log::info!("Round {} generated with {} balanced match(es)", round, matches.len());

    Ok(RoundOutcome {
        round,
        matches,
        teams,
        warnings,
    })
}

/// One player's shortfall against the most-played player.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct LagEntry {
    pub player: String,
    pub played: u32,
    pub lag: u32,
}

/// Result of [`analyze_lag`].
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct LagReport {
    /// Highest number of matches played by any player.
    pub max_play_count: u32,
    /// Players below the maximum, largest lag first (roster order among equals).
    pub lagging: Vec<LagEntry>,
}

impl LagReport {
    pub fn is_balanced(&self) -> bool {
        self.lagging.is_empty()
    }

    pub fn lagging_players(&self) -> Vec<&str> {
        self.lagging.iter().map(|e| e.player.as_str()).collect()
    }

    pub fn lag_of(&self, player: &str) -> u32 {
        self.lagging
            .iter()
            .find(|e| e.player == player)
            .map_or(0, |e| e.lag)
    }
}

/// Active players' match counts compared with the maximum.
pub fn analyze_lag(players: &[Player], history: &MatchHistory) -> LagReport {
    let counts: Vec<(String, u32)> = players
        .iter()
        .filter(|p| p.takes_part())
        .map(|p| {
            let name = p.full_name();
            let played = history.player_play_count(&name);
            (name, played)
        })
        .collect();
    let max_play_count = counts.iter().map(|(_, c)| *c).max().unwrap_or(0);
    let mut lagging: Vec<LagEntry> = counts
        .into_iter()
        .filter(|(_, played)| *played < max_play_count)
        .map(|(player, played)| LagEntry {
            player,
            played,
            lag: max_play_count - played,
        })
        .collect();
    lagging.sort_by_key(|e| Reverse(e.lag));
    LagReport {
        max_play_count,
        lagging,
    }
}

/// Generate one catch-up round over lagging players only.
///
/// Lagging players (largest lag first) take seats four to a match: two lagging
/// players form a team whenever possible. Seats left over in the last match are
/// taken by non-lagging fillers (those who filled in least first); fillers are
/// listed on the match and are neither credited with the match nor ranked on it.
///
/// Returns an empty outcome when nobody lags ([`Warning::NoLagRemaining`]) or
/// when there are not enough fillers to complete a single match.
pub fn generate_catchup_round<R: Rng + ?Sized>(
    players: &[Player],
    categories: &CategoryTable,
    history: &MatchHistory,
    config: &TournamentConfig,
    rng: &mut R,
) -> Result<RoundOutcome, TournamentError> {
    let courts = config.court_capacity;
    if courts == 0 {
        return Err(TournamentError::InvalidCourtCapacity);
    }
    let round = history.next_round();
    let mut outcome = RoundOutcome {
        round,
        ..RoundOutcome::default()
    };

    let report = analyze_lag(players, history);
    if report.is_balanced() {
        raise(&mut outcome.warnings, Warning::NoLagRemaining);
        return Ok(outcome);
    }

    let candidates = eligible_players(players, categories)?;
    let (lagging, rested): (Vec<Candidate>, Vec<Candidate>) = candidates
        .into_iter()
        .partition(|c| report.lag_of(&c.name) > 0);

    let mut lagging: Vec<(Candidate, Reverse<u32>, u32)> = lagging
        .into_iter()
        .map(|c| {
            let lag = report.lag_of(&c.name);
            (c, Reverse(lag), rng.gen::<u32>())
        })
        .collect();
    lagging.sort_by_key(|(_, lag, t)| (*lag, *t));
    let lagging: Vec<Candidate> = lagging.into_iter().map(|(c, _, _)| c).collect();

    let mut fillers: Vec<(Candidate, u32, u32)> = rested
        .into_iter()
        .map(|c| {
            let filled = history.filler_count(&c.name);
            (c, filled, rng.gen::<u32>())
        })
        .collect();
    fillers.sort_by_key(|(_, filled, t)| (*filled, *t));
    let fillers: Vec<Candidate> = fillers.into_iter().map(|(c, _, _)| c).collect();

    let mut seated = lagging.len().min(courts * SEATS_PER_MATCH);
    while seated > 0 && fillers_needed(seated) > fillers.len() {
        seated -= 1;
    }
    if seated < lagging.len().min(courts * SEATS_PER_MATCH) {
        raise(
            &mut outcome.warnings,
            Warning::NoFillerAvailable {
                player: lagging[seated].name.clone(),
            },
        );
    }
    if seated == 0 {
        return Ok(outcome);
    }

    let filler_names: Vec<String> = fillers
        .iter()
        .take(fillers_needed(seated))
        .map(|c| c.name.clone())
        .collect();
    let seats: Vec<&Candidate> = lagging
        .iter()
        .take(seated)
        .chain(fillers.iter().take(filler_names.len()))
        .collect();

    outcome.teams = seats
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| {
            let mut team = Team::pair(format!("R{}-C{}", round, i + 1), pair[0].slot(), pair[1].slot());
            team.display_name = format!("Catch-up {}", i + 1);
            team
        })
        .collect();
    outcome.matches = outcome
        .teams
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| {
            let mut m = Match::new(
                round,
                i + 1,
                MatchHistory::lineup(&pair[0]),
                MatchHistory::lineup(&pair[1]),
            );
            m.kind = MatchKind::CatchUp;
            m.fillers = m
                .players_a
                .iter()
                .chain(m.players_b.iter())
                .filter(|p| filler_names.contains(p))
                .cloned()
                .collect();
            m
        })
        .collect();

    log::info!(
        "Catch-up round {}: {} lagging player(s), {} filler(s), {} match(es)",
        round,
        seated,
        filler_names.len(),
        outcome.matches.len()
    );
    Ok(outcome)
}

/// Seats to fill so that `seated` players complete whole matches.
fn fillers_needed(seated: usize) -> usize {
    (SEATS_PER_MATCH - seated % SEATS_PER_MATCH) % SEATS_PER_MATCH
}

/// Result of [`generate_final_rounds`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CloseoutOutcome {
    pub rounds: Vec<RoundOutcome>,
    /// Warnings about the closeout as a whole (per-round ones stay on each round).
    pub warnings: Vec<Warning>,
}

impl CloseoutOutcome {
    pub fn match_count(&self) -> usize {
        self.rounds.iter().map(|r| r.matches.len()).sum()
    }
}

/// Generate catch-up rounds until nobody lags, no round can be formed, or
/// `catchup_round_limit` rounds have been generated.
pub fn generate_final_rounds<R: Rng + ?Sized>(
    players: &[Player],
    categories: &CategoryTable,
    matches: &[Match],
    config: &TournamentConfig,
    rng: &mut R,
) -> Result<CloseoutOutcome, TournamentError> {
    let mut log_so_far = matches.to_vec();
    let mut closeout = CloseoutOutcome::default();

    loop {
        let history = MatchHistory::from_matches(&log_so_far);
        if analyze_lag(players, &history).is_balanced() {
            if closeout.rounds.is_empty() {
                raise(&mut closeout.warnings, Warning::NoLagRemaining);
            }
            break;
        }
        if closeout.rounds.len() >= config.catchup_round_limit {
            raise(
                &mut closeout.warnings,
                Warning::CatchupIterationLimitReached {
                    rounds: closeout.rounds.len(),
                },
            );
            break;
        }
        let round = generate_catchup_round(players, categories, &history, config, rng)?;
        if round.is_empty() {
            closeout.warnings.extend(round.warnings);
            break;
        }
        log_so_far.extend(round.matches.iter().cloned());
        closeout.rounds.push(round);
    }

    log::info!(
        "Closeout generated {} round(s) with {} match(es)",
        closeout.rounds.len(),
        closeout.match_count()
    );
    Ok(closeout)
}

/// Spread of matches played across active players.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PlayBalance {
    pub max: u32,
    pub min: u32,
    pub spread: u32,
    pub mean: f64,
}

/// Max, min, spread and mean of matches played by active players.
pub fn play_balance(players: &[Player], history: &MatchHistory) -> PlayBalance {
    let counts: Vec<u32> = players
        .iter()
        .filter(|p| p.takes_part())
        .map(|p| history.player_play_count(&p.full_name()))
        .collect();
    let (Some(&max), Some(&min)) = (counts.iter().max(), counts.iter().min()) else {
        return PlayBalance::default();
    };
    PlayBalance {
        max,
        min,
        spread: max - min,
        mean: counts.iter().map(|&c| f64::from(c)).sum::<f64>() / counts.len() as f64,
    }
}
