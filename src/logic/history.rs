//! Match history: rebuilt from the full match log on every request.

use crate::models::{current_round, Match, Team, TeamId};
use std::collections::{HashMap, HashSet};

/// Per-team and per-player counters derived from the match log. Scheduled
/// matches count even before a score is entered, so that consecutive rounds
/// generated without scores still rotate fairly.
#[derive(Clone, Debug, Default)]
pub struct MatchHistory {
    team_matches: HashMap<TeamId, u32>,
    opponents: HashMap<TeamId, HashSet<TeamId>>,
    player_matches: HashMap<String, u32>,
    filler_matches: HashMap<String, u32>,
    current_round: u32,
}

impl MatchHistory {
    /// Scan every match once.
    pub fn from_matches(matches: &[Match]) -> Self {
        let mut history = Self {
            current_round: current_round(matches),
            ..Self::default()
        };
        for m in matches {
            *history.team_matches.entry(m.team_a.clone()).or_default() += 1;
            *history.team_matches.entry(m.team_b.clone()).or_default() += 1;
            history
                .opponents
                .entry(m.team_a.clone())
                .or_default()
                .insert(m.team_b.clone());
            history
                .opponents
                .entry(m.team_b.clone())
                .or_default()
                .insert(m.team_a.clone());

            for player in m.players_a.iter().chain(m.players_b.iter()) {
                // Filling in for a catch-up match is not credited as a match played.
                let counter = if m.is_filler(player) {
                    &mut history.filler_matches
                } else {
                    &mut history.player_matches
                };
                *counter.entry(player.clone()).or_default() += 1;
            }
        }
        history
    }

    /// Highest round in the log, 0 if none.
    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn next_round(&self) -> u32 {
        self.current_round + 1
    }

    pub fn team_play_count(&self, team_id: &str) -> u32 {
        self.team_matches.get(team_id).copied().unwrap_or(0)
    }

    pub fn have_met(&self, team_a: &str, team_b: &str) -> bool {
        self.opponents
            .get(team_a)
            .is_some_and(|set| set.contains(team_b))
    }

    /// Matches credited to a player (filler appearances excluded).
    pub fn player_play_count(&self, player: &str) -> u32 {
        self.player_matches.get(player).copied().unwrap_or(0)
    }

    /// How many times a player has stood in as a catch-up filler.
    pub fn filler_count(&self, player: &str) -> u32 {
        self.filler_matches.get(player).copied().unwrap_or(0)
    }

    /// Lineup (real players) of a team, for match records.
    pub(crate) fn lineup(team: &Team) -> (TeamId, Vec<String>) {
        (team.id.clone(), team.members())
    }
}
