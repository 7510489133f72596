//! Team generation: coefficient-balanced fixed teams, and play-count-aware
//! per-round teams for balanced individual play.

use crate::config::{PairingStrategy, TournamentConfig};
use crate::logic::history::MatchHistory;
use crate::models::{raise, CategoryTable, Player, Team, TeamSet, TournamentError, Warning};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Whether fixed team generation starts over or only places newcomers.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingMode {
    /// Replace every team.
    #[default]
    Fresh,
    /// Keep existing teams; pair only players not already in one.
    Append,
}

/// A player ready to be placed in a team.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Candidate {
    pub name: String,
    pub category: String,
    pub coefficient: f64,
}

impl Candidate {
    pub(crate) fn slot(&self) -> (String, String, f64) {
        (self.name.clone(), self.category.clone(), self.coefficient)
    }
}

/// Active players with a full name and a real category. Unknown categories are an error.
pub(crate) fn eligible_players(
    players: &[Player],
    categories: &CategoryTable,
) -> Result<Vec<Candidate>, TournamentError> {
    players
        .iter()
        .filter(|p| p.takes_part())
        .map(|p| {
            Ok(Candidate {
                name: p.full_name(),
                category: p.category.clone(),
                coefficient: categories.require(&p.category)?,
            })
        })
        .collect()
}

/// Cut an ordered list into pairs. With an odd count the last entry is held back.
pub(crate) fn pair_in_order<T>(ordered: Vec<T>, strategy: PairingStrategy) -> (Vec<(T, T)>, Option<T>) {
    let mut queue: VecDeque<T> = ordered.into();
    let reserved = if queue.len() % 2 == 1 { queue.pop_back() } else { None };
    let mut pairs = Vec::with_capacity(queue.len() / 2);
    match strategy {
        PairingStrategy::Extremes => {
            while let (Some(high), Some(low)) = (queue.pop_front(), queue.pop_back()) {
                pairs.push((high, low));
            }
        }
        PairingStrategy::Adjacent => {
            while let (Some(first), Some(second)) = (queue.pop_front(), queue.pop_front()) {
                pairs.push((first, second));
            }
        }
    }
    (pairs, reserved)
}

/// Generate fixed teams.
///
/// Candidates are sorted by coefficient (highest first) and paired with the
/// configured strategy; with `Extremes` the strongest player partners the
/// weakest. With an odd count the lowest-ranked player is teamed with a bye.
///
/// In `Fresh` mode every existing team is dropped but numbering continues from
/// `existing.next_number`; pass [`TeamSet::new`] to start again at "Team 1".
///
/// In `Append` mode players already in `existing` are skipped, new teams are
/// numbered after the existing ones and appended; with `append_fills_byes`
/// newcomers first take over bye slots.
pub fn generate_teams(
    players: &[Player],
    categories: &CategoryTable,
    existing: &TeamSet,
    mode: PairingMode,
    config: &TournamentConfig,
) -> Result<(TeamSet, Vec<Warning>), TournamentError> {
    let mut candidates = eligible_players(players, categories)?;
    let (mut team_set, required) = match mode {
        PairingMode::Fresh => (
            TeamSet {
                teams: Vec::new(),
                next_number: existing.next_number,
            },
            2,
        ),
        PairingMode::Append => {
            candidates.retain(|c| !existing.contains_player(&c.name));
            (existing.clone(), 1)
        }
    };
    if candidates.len() < required {
        return Err(TournamentError::InsufficientPlayers {
            required,
            available: candidates.len(),
        });
    }

    let mut warnings = Vec::new();
    if mode == PairingMode::Append && config.append_fills_byes {
        fill_bye_slots(&mut team_set, &mut candidates, categories)?;
    }

    candidates.sort_by(|a, b| b.coefficient.total_cmp(&a.coefficient));
    let (pairs, reserved) = pair_in_order(candidates, config.team_pairing);

    let mut created = 0;
    for (p1, p2) in pairs {
        let n = team_set.allocate_number();
        team_set.teams.push(Team::pair(format!("Team {}", n), p1.slot(), p2.slot()));
        created += 1;
    }
    if let Some(odd) = reserved {
        let n = team_set.allocate_number();
        team_set
            .teams
            .push(Team::with_bye(format!("Team {}", n), odd.slot(), format!("Bye {}", n)));
        created += 1;
        raise(&mut warnings, Warning::OddPlayerWithBye { player: odd.name });
    }

    log::info!(
        "{} team(s) {} ({} total)",
        created,
        if mode == PairingMode::Append { "added" } else { "created" },
        team_set.len()
    );
    Ok((team_set, warnings))
}

/// Put candidates into bye slots, each time choosing the candidate whose
/// coefficient is closest to the remaining partner. Used candidates are removed.
fn fill_bye_slots(
    team_set: &mut TeamSet,
    candidates: &mut Vec<Candidate>,
    categories: &CategoryTable,
) -> Result<(), TournamentError> {
    for team in team_set.teams.iter_mut().filter(|t| t.has_bye) {
        let partner = categories.require(&team.category_1)?;
        let best = candidates
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (a.coefficient - partner)
                    .abs()
                    .total_cmp(&(b.coefficient - partner).abs())
            })
            .map(|(i, _)| i);
        let Some(idx) = best else {
            break;
        };
        let newcomer = candidates.remove(idx);
        log::info!("{} replaces the bye in {}", newcomer.name, team.id);
        let kept = (team.player_1.clone(), team.category_1.clone(), partner);
        *team = Team {
            display_name: team.display_name.clone(),
            ..Team::pair(team.id.clone(), kept, newcomer.slot())
        };
    }
    Ok(())
}

/// Per-round teams for balanced individual play.
///
/// Players are ordered by matches played (fewest first, random tiebreak) and
/// paired with `strategy`. With an odd count the most-played player is teamed
/// with a bye. Ids are `R{round}-T{n}`.
pub fn individual_teams<R: Rng + ?Sized>(
    players: &[Player],
    categories: &CategoryTable,
    history: &MatchHistory,
    round: u32,
    strategy: PairingStrategy,
    rng: &mut R,
) -> Result<(Vec<Team>, Vec<Warning>), TournamentError> {
    let candidates = eligible_players(players, categories)?;
    if candidates.len() < 2 {
        return Err(TournamentError::InsufficientPlayers {
            required: 2,
            available: candidates.len(),
        });
    }

    let mut with_tiebreak: Vec<(Candidate, u32, u32)> = candidates
        .into_iter()
        .map(|c| {
            let played = history.player_play_count(&c.name);
            (c, played, rng.gen::<u32>())
        })
        .collect();
    with_tiebreak.sort_by_key(|(_, played, t)| (*played, *t));
    let ordered: Vec<Candidate> = with_tiebreak.into_iter().map(|(c, _, _)| c).collect();

    let (pairs, reserved) = pair_in_order(ordered, strategy);
    let mut warnings = Vec::new();
    let mut teams: Vec<Team> = pairs
        .into_iter()
        .enumerate()
        .map(|(i, (p1, p2))| Team::pair(format!("R{}-T{}", round, i + 1), p1.slot(), p2.slot()))
        .collect();
    if let Some(odd) = reserved {
        let id = format!("R{}-T{}", round, teams.len() + 1);
        teams.push(Team::with_bye(id, odd.slot(), format!("Bye R{}", round)));
        raise(&mut warnings, Warning::OddPlayerWithBye { player: odd.name });
    }
    Ok((teams, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_pairs_outside_in() {
        let (pairs, reserved) = pair_in_order(vec![1, 2, 3, 4, 5], PairingStrategy::Extremes);
        assert_eq!(pairs, vec![(1, 4), (2, 3)]);
        assert_eq!(reserved, Some(5));
    }

    #[test]
    fn adjacent_pairs_neighbours() {
        let (pairs, reserved) = pair_in_order(vec![1, 2, 3, 4], PairingStrategy::Adjacent);
        assert_eq!(pairs, vec![(1, 2), (3, 4)]);
        assert_eq!(reserved, None);
    }
}
