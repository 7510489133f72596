//! Two-player teams and the fixed team set.

use crate::models::category::{pair_coefficient, CategoryTable, BYE_CATEGORY, NEUTRAL_COEFFICIENT};
use serde::{Deserialize, Serialize};

/// Team identifier, unique within its team set (or round snapshot).
pub type TeamId = String;

/// A pair of players treated as one scheduling unit. When the roster is odd,
/// `player_2` is a synthetic bye and `has_bye` is set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    /// Defaults to the id.
    pub display_name: String,
    pub player_1: String,
    pub category_1: String,
    pub player_2: String,
    pub category_2: String,
    /// Average of both category coefficients, rounded to 3 decimals.
    pub coefficient: f64,
    #[serde(default)]
    pub has_bye: bool,
}

impl Team {
    /// Pair two real players.
    pub fn pair(
        id: impl Into<TeamId>,
        (player_1, category_1, coefficient_1): (String, String, f64),
        (player_2, category_2, coefficient_2): (String, String, f64),
    ) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            player_1,
            category_1,
            player_2,
            category_2,
            coefficient: pair_coefficient(coefficient_1, coefficient_2),
            has_bye: false,
        }
    }

    /// Pair a real player with a synthetic bye called `bye_name`.
    pub fn with_bye(
        id: impl Into<TeamId>,
        (player, category, coefficient): (String, String, f64),
        bye_name: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            player_1: player,
            category_1: category,
            player_2: bye_name.into(),
            category_2: BYE_CATEGORY.to_string(),
            coefficient: pair_coefficient(coefficient, NEUTRAL_COEFFICIENT),
            has_bye: true,
        }
    }

    /// Real (non-bye) players of this team.
    pub fn members(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(2);
        if !CategoryTable::is_bye(&self.category_1) {
            out.push(self.player_1.clone());
        }
        if !CategoryTable::is_bye(&self.category_2) {
            out.push(self.player_2.clone());
        }
        out
    }

    pub fn contains_player(&self, full_name: &str) -> bool {
        self.members().iter().any(|m| m == full_name)
    }
}

/// The fixed teams of a tournament plus the counter that numbers new teams.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamSet {
    pub teams: Vec<Team>,
    /// Number given to the next generated team ("Team {n}").
    pub next_number: u32,
}

impl TeamSet {
    pub fn new() -> Self {
        Self {
            teams: Vec::new(),
            next_number: 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    /// Take the next team number and advance the counter.
    pub fn allocate_number(&mut self) -> u32 {
        let n = self.next_number.max(1);
        self.next_number = n + 1;
        n
    }

    pub fn get(&self, id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| t.id == id)
    }

    /// True if the player (by full name) already sits in one of the teams.
    pub fn contains_player(&self, full_name: &str) -> bool {
        self.teams.iter().any(|t| t.contains_player(full_name))
    }

    pub fn ids(&self) -> Vec<TeamId> {
        self.teams.iter().map(|t| t.id.clone()).collect()
    }
}

/// Teams used in one round of balanced individual play.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundTeams {
    pub round: u32,
    pub teams: Vec<Team>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(name: &str, category: &str, c: f64) -> (String, String, f64) {
        (name.to_string(), category.to_string(), c)
    }

    #[test]
    fn bye_team_averages_with_neutral_coefficient() {
        let t = Team::with_bye("Team 3", slot("Anne Martin", "Leisure", 1.2), "Bye 3");
        assert!(t.has_bye);
        assert_eq!(t.coefficient, 1.1);
        assert_eq!(t.members(), vec!["Anne Martin".to_string()]);
        assert_eq!(t.display_name, "Team 3");
    }

    #[test]
    fn team_numbers_are_monotonic() {
        let mut set = TeamSet::new();
        assert_eq!(set.allocate_number(), 1);
        assert_eq!(set.allocate_number(), 2);
        set.teams.clear();
        assert_eq!(set.allocate_number(), 3);
    }
}
