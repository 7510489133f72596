//! Team and individual rankings aggregated from the match log.

use crate::config::RankingMode;
use crate::models::{round_to, CategoryTable, Match, Outcome, Player, Team, NEUTRAL_COEFFICIENT};
use serde::Serialize;

/// One line of a ranking table.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RankingRow {
    /// Team display name or player full name.
    pub name: String,
    pub matches_played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub points_for: u32,
    pub points_against: u32,
    pub differential: i64,
    pub score: f64,
}

impl RankingRow {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn record(&mut self, scored: u32, conceded: u32, outcome: Outcome) {
        self.matches_played += 1;
        self.points_for += scored;
        self.points_against += conceded;
        self.differential += i64::from(scored) - i64::from(conceded);
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Loss => self.losses += 1,
        }
    }

    fn finish(&mut self, mode: RankingMode, coefficient: f64) {
        self.score = match mode {
            RankingMode::Weighted => {
                round_to(f64::from(3 * self.wins + self.draws) * coefficient, 2)
            }
            RankingMode::Standard => f64::from(2 * self.wins + self.draws),
        };
    }
}

fn flip(outcome: Outcome) -> Outcome {
    match outcome {
        Outcome::Win => Outcome::Loss,
        Outcome::Draw => Outcome::Draw,
        Outcome::Loss => Outcome::Win,
    }
}

/// Score descending, then differential descending. Stable, so equal rows keep input order.
fn sort_rows(rows: &mut [RankingRow]) {
    rows.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.differential.cmp(&a.differential))
    });
}

/// Ranking of every team. Unplayed (0-0) matches are ignored; the weighted
/// score uses the team coefficient.
pub fn team_ranking(teams: &[Team], matches: &[Match], mode: RankingMode) -> Vec<RankingRow> {
    let mut rows: Vec<RankingRow> = teams
        .iter()
        .map(|team| {
            let mut row = RankingRow::new(team.display_name.clone());
            for m in matches.iter().filter(|m| m.is_played()) {
                if m.team_a == team.id {
                    row.record(m.score_a, m.score_b, m.outcome_a());
                } else if m.team_b == team.id {
                    row.record(m.score_b, m.score_a, flip(m.outcome_a()));
                }
            }
            row.finish(mode, team.coefficient);
            row
        })
        .collect();
    sort_rows(&mut rows);
    rows
}

/// Ranking of active players who have at least one counted match. A player's
/// statistics from matches where they were a catch-up filler are skipped; the
/// weighted score uses the player's own category coefficient.
pub fn player_ranking(
    players: &[Player],
    categories: &CategoryTable,
    matches: &[Match],
    mode: RankingMode,
) -> Vec<RankingRow> {
    let mut rows: Vec<RankingRow> = players
        .iter()
        .filter(|p| p.takes_part())
        .filter_map(|player| {
            let name = player.full_name();
            let mut row = RankingRow::new(name.clone());
            for m in matches.iter().filter(|m| m.is_played() && !m.is_filler(&name)) {
                if m.players_a.contains(&name) {
                    row.record(m.score_a, m.score_b, m.outcome_a());
                } else if m.players_b.contains(&name) {
                    row.record(m.score_b, m.score_a, flip(m.outcome_a()));
                }
            }
            if row.matches_played == 0 {
                return None;
            }
            let coefficient = categories
                .coefficient(&player.category)
                .unwrap_or(NEUTRAL_COEFFICIENT);
            row.finish(mode, coefficient);
            Some(row)
        })
        .collect();
    sort_rows(&mut rows);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_and_standard_scores() {
        let mut row = RankingRow::new("Team 1");
        row.record(21, 15, Outcome::Win);
        row.record(18, 18, Outcome::Draw);
        row.record(10, 21, Outcome::Loss);
        assert_eq!(row.differential, -5);

        row.finish(RankingMode::Weighted, 1.1);
        assert_eq!(row.score, 4.4);
        row.finish(RankingMode::Standard, 1.1);
        assert_eq!(row.score, 3.0);
    }
}
