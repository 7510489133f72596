//! Fixed-team rounds: least-played teams pick first, new opponents before rematches.

use crate::config::{RematchFallback, TournamentConfig};
use crate::logic::history::MatchHistory;
use crate::models::{raise, Match, RoundOutcome, Team, TournamentError, Warning};
use rand::Rng;

/// Upper bound on search steps when looking for a full set of new pairings.
const SEARCH_BUDGET: usize = 20_000;

/// Generate the next round for fixed teams.
///
/// 1. Order teams by matches played (ascending), random tiebreak.
/// 2. Pair teams that have never met, in priority order, up to the court capacity.
///    When the plain forward scan would strand teams that could still be paired
///    with new opponents, a bounded backtracking search looks for a longer pairing.
/// 3. If courts are still free and unpaired teams remain, allow rematches
///    (unless `rematch_fallback` is `Never`).
///
/// Courts are labelled from 1 in the order matches are created; scores start at 0.
pub fn generate_round<R: Rng + ?Sized>(
    teams: &[Team],
    history: &MatchHistory,
    config: &TournamentConfig,
    rng: &mut R,
) -> Result<RoundOutcome, TournamentError> {
    let courts = config.court_capacity;
    if courts == 0 {
        return Err(TournamentError::InvalidCourtCapacity);
    }
    if teams.len() < 2 {
        return Err(TournamentError::InsufficientTeams {
            required: 2,
            available: teams.len(),
        });
    }

    let mut with_tiebreak: Vec<(&Team, u32, u32)> = teams
        .iter()
        .map(|t| (t, history.team_play_count(&t.id), rng.gen::<u32>()))
        .collect();
    with_tiebreak.sort_by_key(|(_, played, t)| (*played, *t));
    let order: Vec<&Team> = with_tiebreak.into_iter().map(|(t, _, _)| t).collect();

    let team_count = order.len();
    let target = courts.min(team_count / 2);
    let mut pairs = novel_pairs(&order, history, target);
    let mut warnings = Vec::new();

    if pairs.len() < courts && pairs.len() < team_count / 2 {
        let rematches = match config.rematch_fallback {
            RematchFallback::FillCourts => {
                let before = pairs.len();
                rematch_pass(&order, &mut pairs, courts);
                pairs.len() - before
            }
            RematchFallback::Never => 0,
        };
        raise(&mut warnings, Warning::NoNovelPairingAvailable { rematches });
    }

    let round = history.next_round();
    let matches: Vec<Match> = pairs
        .iter()
        .enumerate()
        .map(|(i, &(a, b))| {
            Match::new(
                round,
                i + 1,
                MatchHistory::lineup(order[a]),
                MatchHistory::lineup(order[b]),
            )
        })
        .collect();

    if team_count > courts * 2 {
        raise(
            &mut warnings,
            Warning::CourtCapacityExceeded {
                teams: team_count,
                courts,
                matches: matches.len(),
            },
        );
    }
    log::info!("Round {} generated with {} match(es)", round, matches.len());

    Ok(RoundOutcome {
        round,
        matches,
        teams: Vec::new(),
        warnings,
    })
}

/// Pairs (indices into `order`) of teams that have never met, at most `target`.
fn novel_pairs(order: &[&Team], history: &MatchHistory, target: usize) -> Vec<(usize, usize)> {
    let greedy = greedy_pairs(order, history, target);
    if greedy.len() == target {
        return greedy;
    }
    let mut search = NovelSearch {
        order,
        history,
        target,
        claimed: vec![false; order.len()],
        pairs: Vec::with_capacity(target),
        best: greedy,
        budget: SEARCH_BUDGET,
    };
    let idle_allowed = order.len() - 2 * target;
    if !search.run(0, idle_allowed) {
        log::debug!(
            "No complete set of new pairings found; keeping {} of {}",
            search.best.len(),
            target
        );
    }
    search.best
}

/// Forward scan in priority order: each unpaired team takes the first later
/// team it has never met. A team with no new opponent is skipped.
fn greedy_pairs(order: &[&Team], history: &MatchHistory, target: usize) -> Vec<(usize, usize)> {
    let mut claimed = vec![false; order.len()];
    let mut pairs = Vec::with_capacity(target);
    for a in 0..order.len() {
        if pairs.len() >= target {
            break;
        }
        if claimed[a] {
            continue;
        }
        let opponent = (a + 1..order.len())
            .find(|&b| !claimed[b] && !history.have_met(&order[a].id, &order[b].id));
        if let Some(b) = opponent {
            claimed[a] = true;
            claimed[b] = true;
            pairs.push((a, b));
        }
    }
    pairs
}

/// Depth-first walk in priority order. Each step takes the first unhandled team
/// and tries its new opponents in order, then leaving it idle. `best` starts
/// as the forward scan result and is only replaced by a longer pairing.
struct NovelSearch<'a> {
    order: &'a [&'a Team],
    history: &'a MatchHistory,
    target: usize,
    claimed: Vec<bool>,
    pairs: Vec<(usize, usize)>,
    best: Vec<(usize, usize)>,
    budget: usize,
}

impl NovelSearch<'_> {
    fn run(&mut self, from: usize, idle_left: usize) -> bool {
        if self.pairs.len() > self.best.len() {
            self.best = self.pairs.clone();
        }
        if self.pairs.len() == self.target {
            return true;
        }
        if self.budget == 0 {
            return false;
        }
        self.budget -= 1;

        let n = self.order.len();
        let Some(a) = (from..n).find(|&i| !self.claimed[i]) else {
            return false;
        };
        self.claimed[a] = true;
        for b in a + 1..n {
            if self.claimed[b] || self.history.have_met(&self.order[a].id, &self.order[b].id) {
                continue;
            }
            self.claimed[b] = true;
            self.pairs.push((a, b));
            if self.run(a + 1, idle_left) {
                return true;
            }
            self.pairs.pop();
            self.claimed[b] = false;
        }
        if idle_left > 0 && self.run(a + 1, idle_left - 1) {
            return true;
        }
        self.claimed[a] = false;
        false
    }
}

/// Fill remaining courts with rematches: each unpaired team, in priority
/// order, takes the next unpaired team after it.
fn rematch_pass(order: &[&Team], pairs: &mut Vec<(usize, usize)>, courts: usize) {
    let mut claimed = vec![false; order.len()];
    for &(a, b) in pairs.iter() {
        claimed[a] = true;
        claimed[b] = true;
    }
    for a in 0..order.len() {
        if pairs.len() >= courts {
            break;
        }
        if claimed[a] {
            continue;
        }
        if let Some(b) = (a + 1..order.len()).find(|&b| !claimed[b]) {
            claimed[a] = true;
            claimed[b] = true;
            log::debug!("Rematch: {} vs {}", order[a].id, order[b].id);
            pairs.push((a, b));
        }
    }
}
