//! Skill categories and their coefficients.

use crate::models::TournamentError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder category carried by synthetic bye players.
pub const BYE_CATEGORY: &str = "Bye";

/// Coefficient of the bye category. Fixed, never editable.
pub const NEUTRAL_COEFFICIENT: f64 = 1.0;

/// Category name -> positive coefficient. The bye category is implicit: it
/// always resolves to [`NEUTRAL_COEFFICIENT`] and is never stored or listed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTable {
    entries: BTreeMap<String, f64>,
}

impl Default for CategoryTable {
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert("Leisure".to_string(), 1.2);
        entries.insert("Competitor".to_string(), 1.05);
        entries.insert("Advanced".to_string(), 1.0);
        Self { entries }
    }
}

impl CategoryTable {
    /// An empty table (only the bye category resolves).
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn is_bye(name: &str) -> bool {
        name == BYE_CATEGORY
    }

    /// Coefficient for a category, `None` if unknown.
    pub fn coefficient(&self, name: &str) -> Option<f64> {
        if Self::is_bye(name) {
            return Some(NEUTRAL_COEFFICIENT);
        }
        self.entries.get(name).copied()
    }

    /// Like [`Self::coefficient`] but unknown categories are an error.
    pub fn require(&self, name: &str) -> Result<f64, TournamentError> {
        self.coefficient(name)
            .ok_or_else(|| TournamentError::UnknownCategory(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.coefficient(name).is_some()
    }

    /// Insert or update a selectable category.
    pub fn set(&mut self, name: impl Into<String>, coefficient: f64) -> Result<(), TournamentError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(TournamentError::EmptyName);
        }
        if Self::is_bye(&name) {
            return Err(TournamentError::ReservedCategory);
        }
        if !coefficient.is_finite() || coefficient <= 0.0 {
            return Err(TournamentError::InvalidCoefficient(coefficient));
        }
        self.entries.insert(name, coefficient);
        Ok(())
    }

    /// Remove a selectable category. The bye category cannot be removed.
    pub fn remove(&mut self, name: &str) -> Result<f64, TournamentError> {
        if Self::is_bye(name) {
            return Err(TournamentError::ReservedCategory);
        }
        self.entries
            .remove(name)
            .ok_or_else(|| TournamentError::UnknownCategory(name.to_string()))
    }

    /// Categories a player may pick (bye excluded).
    pub fn selectable(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Round to `places` decimals.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Average of two coefficients, rounded to 3 decimals.
pub(crate) fn pair_coefficient(a: f64, b: f64) -> f64 {
    round_to((a + b) / 2.0, 3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bye_is_neutral_and_protected() {
        let mut table = CategoryTable::default();
        assert_eq!(table.coefficient(BYE_CATEGORY), Some(NEUTRAL_COEFFICIENT));
        assert_eq!(table.set(BYE_CATEGORY, 2.0), Err(TournamentError::ReservedCategory));
        assert_eq!(table.remove(BYE_CATEGORY), Err(TournamentError::ReservedCategory));
        assert!(table.selectable().all(|(name, _)| name != BYE_CATEGORY));
    }

    #[test]
    fn rejects_non_positive_coefficients() {
        let mut table = CategoryTable::empty();
        assert!(matches!(table.set("Pro", 0.0), Err(TournamentError::InvalidCoefficient(_))));
        assert!(matches!(table.set("Pro", f64::NAN), Err(TournamentError::InvalidCoefficient(_))));
        table.set("Pro", 0.9).unwrap();
        assert_eq!(table.require("Pro"), Ok(0.9));
        assert_eq!(
            table.require("Nope"),
            Err(TournamentError::UnknownCategory("Nope".to_string()))
        );
    }

    #[test]
    fn pair_coefficient_rounds_to_three_places() {
        assert_eq!(pair_coefficient(1.2, 1.0), 1.1);
        assert_eq!(pair_coefficient(1.0 / 3.0, 1.0), 0.667);
    }
}
