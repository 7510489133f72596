//! Tournament session: roster, categories, teams and match log in one place.

use crate::config::{TournamentConfig, TournamentMode};
use crate::logic::{self, CloseoutOutcome, LagReport, MatchHistory, PairingMode, PlayBalance, RankingRow};
use crate::models::category::CategoryTable;
use crate::models::game::{Match, RoundOutcome};
use crate::models::player::Player;
use crate::models::team::{RoundTeams, Team, TeamSet};
use crate::models::warning::Warning;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during tournament operations. None of them leave the
/// session half-updated: the operation is simply not performed.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TournamentError {
    #[error("First and last name are required")]
    EmptyName,
    #[error("Player already registered: {0}")]
    DuplicatePlayer(String),
    #[error("Player not found: {0}")]
    PlayerNotFound(String),
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    #[error("The bye category is reserved")]
    ReservedCategory,
    #[error("Coefficient must be a positive number (got {0})")]
    InvalidCoefficient(f64),
    #[error("Category {0} is still used by a player")]
    CategoryInUse(String),
    #[error("Need at least {required} players (have {available})")]
    InsufficientPlayers { required: usize, available: usize },
    #[error("Need at least {required} teams (have {available})")]
    InsufficientTeams { required: usize, available: usize },
    #[error("Court capacity must be at least 1")]
    InvalidCourtCapacity,
    #[error("Team not found: {0}")]
    TeamNotFound(String),
    #[error("Team {0} already appears in matches")]
    TeamInMatches(String),
    #[error("A team named {0} already exists")]
    DuplicateTeamName(String),
    #[error("No match on {court} in round {round}")]
    MatchNotFound { round: u32, court: String },
    #[error("Not available in the current tournament mode")]
    WrongMode,
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Full tournament state. The engine functions in [`crate::logic`] are pure;
/// these methods feed them the current state and store what they return.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub config: TournamentConfig,
    pub categories: CategoryTable,
    /// Pending and active players, in registration order.
    pub players: Vec<Player>,
    /// Fixed teams (FixedTeams mode).
    pub teams: TeamSet,
    /// Teams of each round (BalancedIndividual mode).
    pub team_history: Vec<RoundTeams>,
    pub matches: Vec<Match>,
}

impl Tournament {
    /// Create an empty tournament with default configuration and categories.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, TournamentConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: TournamentConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: Utc::now(),
            config,
            categories: CategoryTable::default(),
            players: Vec::new(),
            teams: TeamSet::new(),
            team_history: Vec::new(),
            matches: Vec::new(),
        }
    }

    /// Highest round in the match log, 0 if none.
    pub fn current_round(&self) -> u32 {
        crate::models::current_round(&self.matches)
    }

    pub fn history(&self) -> MatchHistory {
        MatchHistory::from_matches(&self.matches)
    }

    /// Replace the configuration. Court capacity must be at least 1.
    pub fn set_config(&mut self, config: TournamentConfig) -> Result<(), TournamentError> {
        if config.court_capacity == 0 {
            return Err(TournamentError::InvalidCourtCapacity);
        }
        self.config = config;
        Ok(())
    }

    // --- players ---

    /// Register a pending player. Names must be unique (case- and whitespace-insensitive).
    pub fn propose_player(
        &mut self,
        first_name: &str,
        last_name: &str,
        category: &str,
    ) -> Result<(), TournamentError> {
        let player = Player::new(first_name, last_name, category);
        if !player.has_name() {
            return Err(TournamentError::EmptyName);
        }
        if CategoryTable::is_bye(category) {
            return Err(TournamentError::ReservedCategory);
        }
        if !self.categories.contains(category) {
            return Err(TournamentError::UnknownCategory(category.to_string()));
        }
        if self
            .players
            .iter()
            .any(|p| p.same_identity(first_name, last_name))
        {
            return Err(TournamentError::DuplicatePlayer(player.full_name()));
        }
        self.players.push(player);
        Ok(())
    }

    /// Promote one pending player to active.
    pub fn validate_player(&mut self, first_name: &str, last_name: &str) -> Result<(), TournamentError> {
        let player = self
            .players
            .iter_mut()
            .find(|p| p.same_identity(first_name, last_name))
            .ok_or_else(|| TournamentError::PlayerNotFound(format!("{} {}", first_name, last_name)))?;
        player.validate();
        Ok(())
    }

    /// Promote every pending player. Returns how many were promoted.
    pub fn validate_pending_players(&mut self) -> usize {
        let mut promoted = 0;
        for p in self.players.iter_mut().filter(|p| !p.is_active()) {
            p.validate();
            promoted += 1;
        }
        promoted
    }

    /// Remove a player (pending or active) from the roster.
    pub fn remove_player(&mut self, first_name: &str, last_name: &str) -> Result<Player, TournamentError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.same_identity(first_name, last_name))
            .ok_or_else(|| TournamentError::PlayerNotFound(format!("{} {}", first_name, last_name)))?;
        Ok(self.players.remove(idx))
    }

    pub fn active_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_active())
    }

    // --- categories ---

    pub fn set_category(&mut self, name: &str, coefficient: f64) -> Result<(), TournamentError> {
        self.categories.set(name, coefficient)
    }

    /// Delete a category no player uses.
    pub fn remove_category(&mut self, name: &str) -> Result<(), TournamentError> {
        if self.players.iter().any(|p| p.category == name) {
            return Err(TournamentError::CategoryInUse(name.to_string()));
        }
        self.categories.remove(name)?;
        Ok(())
    }

    // --- teams ---

    /// Generate fixed teams from the active roster. A fresh draw restarts at
    /// "Team 1" only while the match log is empty, so logged team ids never
    /// point at a new team.
    pub fn generate_teams(&mut self, mode: PairingMode) -> Result<Vec<Warning>, TournamentError> {
        let restart = TeamSet::new();
        let base = if mode == PairingMode::Fresh && self.matches.is_empty() {
            &restart
        } else {
            &self.teams
        };
        let (teams, warnings) =
            logic::generate_teams(&self.players, &self.categories, base, mode, &self.config)?;
        self.teams = teams;
        Ok(warnings)
    }

    /// Teams in play: the fixed teams, or the latest round's teams in individual mode.
    pub fn current_teams(&self) -> &[Team] {
        match self.config.tournament_mode {
            TournamentMode::FixedTeams => &self.teams.teams,
            TournamentMode::BalancedIndividual => self
                .team_history
                .last()
                .map(|r| r.teams.as_slice())
                .unwrap_or(&[]),
        }
    }

    pub fn teams_for_round(&self, round: u32) -> Option<&[Team]> {
        self.team_history
            .iter()
            .find(|r| r.round == round)
            .map(|r| r.teams.as_slice())
    }

    /// Set a fixed team's display name. Empty resets it to the id; names are
    /// unique among teams, case-insensitively.
    pub fn rename_team(&mut self, team_id: &str, display_name: &str) -> Result<(), TournamentError> {
        let wanted = display_name.trim();
        let taken = !wanted.is_empty()
            && self
                .teams
                .teams
                .iter()
                .any(|t| t.id != team_id && t.display_name.to_lowercase() == wanted.to_lowercase());
        if taken {
            return Err(TournamentError::DuplicateTeamName(wanted.to_string()));
        }
        let team = self
            .teams
            .get_mut(team_id)
            .ok_or_else(|| TournamentError::TeamNotFound(team_id.to_string()))?;
        team.display_name = if wanted.is_empty() {
            team.id.clone()
        } else {
            wanted.to_string()
        };
        Ok(())
    }

    /// Remove a fixed team that has not played or been scheduled yet.
    pub fn remove_team(&mut self, team_id: &str) -> Result<Team, TournamentError> {
        if self.matches.iter().any(|m| m.involves_team(team_id)) {
            return Err(TournamentError::TeamInMatches(team_id.to_string()));
        }
        let idx = self
            .teams
            .teams
            .iter()
            .position(|t| t.id == team_id)
            .ok_or_else(|| TournamentError::TeamNotFound(team_id.to_string()))?;
        Ok(self.teams.teams.remove(idx))
    }

    // --- rounds ---

    /// Generate the next round according to the tournament mode and append it.
    pub fn generate_round<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<RoundOutcome, TournamentError> {
        let history = self.history();
        let outcome = match self.config.tournament_mode {
            TournamentMode::FixedTeams => {
                logic::generate_round(&self.teams.teams, &history, &self.config, rng)?
            }
            TournamentMode::BalancedIndividual => logic::generate_individual_round(
                &self.players,
                &self.categories,
                &history,
                &self.config,
                rng,
            )?,
        };
        self.apply_round(&outcome);
        Ok(outcome)
    }

    /// Lag of every active player behind the most-played one.
    pub fn analyze_lag(&self) -> LagReport {
        logic::analyze_lag(&self.players, &self.history())
    }

    /// One catch-up round (balanced individual mode only). Empty when nobody lags.
    pub fn generate_catchup_round<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<RoundOutcome, TournamentError> {
        self.require_individual_mode()?;
        let outcome = logic::generate_catchup_round(
            &self.players,
            &self.categories,
            &self.history(),
            &self.config,
            rng,
        )?;
        self.apply_round(&outcome);
        Ok(outcome)
    }

    /// Catch-up rounds until every player is level (balanced individual mode only).
    pub fn generate_final_rounds<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<CloseoutOutcome, TournamentError> {
        self.require_individual_mode()?;
        let closeout = logic::generate_final_rounds(
            &self.players,
            &self.categories,
            &self.matches,
            &self.config,
            rng,
        )?;
        for round in &closeout.rounds {
            self.apply_round(round);
        }
        Ok(closeout)
    }

    fn require_individual_mode(&self) -> Result<(), TournamentError> {
        if self.config.tournament_mode != TournamentMode::BalancedIndividual {
            return Err(TournamentError::WrongMode);
        }
        Ok(())
    }

    fn apply_round(&mut self, outcome: &RoundOutcome) {
        if outcome.is_empty() {
            return;
        }
        if !outcome.teams.is_empty() {
            self.team_history.push(RoundTeams {
                round: outcome.round,
                teams: outcome.teams.clone(),
            });
        }
        self.matches.extend(outcome.matches.iter().cloned());
    }

    // --- scores and rankings ---

    pub fn record_score(
        &mut self,
        round: u32,
        court: &str,
        score_a: u32,
        score_b: u32,
    ) -> Result<(), TournamentError> {
        let m = self
            .matches
            .iter_mut()
            .find(|m| m.round == round && m.court == court)
            .ok_or_else(|| TournamentError::MatchNotFound {
                round,
                court: court.to_string(),
            })?;
        m.score_a = score_a;
        m.score_b = score_b;
        Ok(())
    }

    /// Drop every match and per-round team snapshot; fixed teams stay.
    pub fn reset_matches(&mut self) {
        self.matches.clear();
        self.team_history.clear();
    }

    pub fn team_ranking(&self) -> Vec<RankingRow> {
        logic::team_ranking(&self.teams.teams, &self.matches, self.config.ranking_mode)
    }

    pub fn player_ranking(&self) -> Vec<RankingRow> {
        logic::player_ranking(
            &self.players,
            &self.categories,
            &self.matches,
            self.config.individual_ranking_mode,
        )
    }

    pub fn play_balance(&self) -> PlayBalance {
        logic::play_balance(&self.players, &self.history())
    }
}
