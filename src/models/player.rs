//! Player record and name identity.

use crate::models::CategoryTable;
use serde::{Deserialize, Serialize};

/// Registration status: players are proposed first, then validated by the organizer.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    #[default]
    Pending,
    Active,
}

/// A registered player. Identity is the (first name, last name) pair, compared
/// case- and whitespace-insensitively.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub first_name: String,
    pub last_name: String,
    /// Key into the category table.
    pub category: String,
    #[serde(default)]
    pub status: PlayerStatus,
}

impl Player {
    /// Create a pending player. Names are trimmed.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into().trim().to_string(),
            last_name: last_name.into().trim().to_string(),
            category: category.into(),
            status: PlayerStatus::Pending,
        }
    }

    /// Create a player that is already validated.
    pub fn active(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            status: PlayerStatus::Active,
            ..Self::new(first_name, last_name, category)
        }
    }

    /// Display name used in team slots and match lineups ("First Last").
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    /// Both name parts are non-empty after trimming.
    pub fn has_name(&self) -> bool {
        !self.first_name.trim().is_empty() && !self.last_name.trim().is_empty()
    }

    pub fn is_active(&self) -> bool {
        self.status == PlayerStatus::Active
    }

    /// Active, fully named, and in a real (non-bye) category.
    pub fn takes_part(&self) -> bool {
        self.is_active() && self.has_name() && !CategoryTable::is_bye(&self.category)
    }

    /// Same person, ignoring case and surrounding whitespace.
    pub fn same_identity(&self, first_name: &str, last_name: &str) -> bool {
        normalize(&self.first_name) == normalize(first_name)
            && normalize(&self.last_name) == normalize(last_name)
    }

    pub fn validate(&mut self) {
        self.status = PlayerStatus::Active;
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}
