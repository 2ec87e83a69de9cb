//! Fixed catalog of incidents presented during the response phase.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;
use thiserror::Error;

const INCIDENTS_JSON: &str = include_str!("../assets/data/incidents.json");
const MIN_CHOICES: usize = 2;
const MAX_CHOICES: usize = 3;

/// A response option for an incident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentChoice {
    pub text: String,
    #[serde(rename = "correct")]
    pub is_correct: bool,
    #[serde(rename = "consequence")]
    pub consequence_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    pub id: u32,
    pub title: String,
    #[serde(rename = "alert")]
    pub alert_text: String,
    #[serde(rename = "lesson")]
    pub lesson_text: String,
    pub choices: Vec<IncidentChoice>,
}

impl Incident {
    #[must_use]
    pub fn choice(&self, index: usize) -> Option<&IncidentChoice> {
        self.choices.get(index)
    }

    /// Indices of every choice tagged correct.
    pub fn correct_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.choices
            .iter()
            .enumerate()
            .filter(|(_, choice)| choice.is_correct)
            .map(|(idx, _)| idx)
    }

    pub fn incorrect_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.choices
            .iter()
            .enumerate()
            .filter(|(_, choice)| !choice.is_correct)
            .map(|(idx, _)| idx)
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("incident catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("incident catalog is empty")]
    Empty,
    #[error("incident {id} has {count} choices (expected 2-3)")]
    ChoiceCount { id: u32, count: usize },
    #[error("incident {id} has no correct choice")]
    NoCorrectChoice { id: u32 },
    #[error("incident id {id} appears more than once")]
    DuplicateId { id: u32 },
}

/// Ordered, immutable incident sequence indexed by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IncidentCatalog {
    pub incidents: Vec<Incident>,
}

impl IncidentCatalog {
    /// Create an empty catalog (useful for tests)
    #[must_use]
    pub fn empty() -> Self {
        Self {
            incidents: Vec::new(),
        }
    }

    /// Parse and validate a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the incidents break the
    /// catalog shape rules (see [`IncidentCatalog::validate`]).
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    #[must_use]
    pub fn from_incidents(incidents: Vec<Incident>) -> Self {
        Self { incidents }
    }

    /// Load the catalog bundled with the crate.
    ///
    /// Falls back to an empty catalog if the bundled asset is ever broken.
    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(INCIDENTS_JSON).unwrap_or_else(|err| {
            log::error!("bundled incident catalog rejected: {err}");
            Self::empty()
        })
    }

    /// Check that the catalog is non-empty, ids are unique, and every
    /// incident offers 2-3 choices with at least one correct option.
    ///
    /// # Errors
    ///
    /// Returns the first shape violation found.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.incidents.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for incident in &self.incidents {
            if !seen.insert(incident.id) {
                return Err(CatalogError::DuplicateId { id: incident.id });
            }
            let count = incident.choices.len();
            if !(MIN_CHOICES..=MAX_CHOICES).contains(&count) {
                return Err(CatalogError::ChoiceCount {
                    id: incident.id,
                    count,
                });
            }
            if incident.correct_indices().next().is_none() {
                return Err(CatalogError::NoCorrectChoice { id: incident.id });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Incident> {
        self.incidents.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Incident> {
        self.incidents.iter()
    }

    #[must_use]
    pub fn is_last(&self, index: usize) -> bool {
        !self.incidents.is_empty() && index + 1 == self.incidents.len()
    }
}

impl<'a> IntoIterator for &'a IncidentCatalog {
    type Item = &'a Incident;
    type IntoIter = std::slice::Iter<'a, Incident>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Process-wide bundled catalog.
#[must_use]
pub fn catalog() -> &'static IncidentCatalog {
    static CATALOG: OnceLock<IncidentCatalog> = OnceLock::new();
    CATALOG.get_or_init(IncidentCatalog::load_from_static)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_catalog_has_four_incidents_with_two_correct_choices() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 4);
        let titles: Vec<&str> = catalog.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            [
                "SOLAR PANEL MISALIGNMENT",
                "OXYGEN SCRUBBER FAULT",
                "THERMAL CONTROL FAILURE",
                "ATTITUDE DRIFT",
            ]
        );
        for incident in catalog {
            assert_eq!(incident.choices.len(), 3);
            assert_eq!(incident.correct_indices().count(), 2);
            assert_eq!(incident.incorrect_indices().collect::<Vec<_>>(), vec![2]);
        }
        assert!(catalog.is_last(3));
        assert!(!catalog.is_last(0));
    }

    #[test]
    fn catalog_is_shared_across_calls() {
        assert!(std::ptr::eq(catalog(), catalog()));
    }

    #[test]
    fn from_json_rejects_shape_violations() {
        let single_choice = r#"{"incidents":[{"id":1,"title":"t","alert":"a","lesson":"l",
            "choices":[{"text":"x","correct":true,"consequence":"c"}]}]}"#;
        assert!(matches!(
            IncidentCatalog::from_json(single_choice),
            Err(CatalogError::ChoiceCount { id: 1, count: 1 })
        ));

        let no_correct = r#"{"incidents":[{"id":7,"title":"t","alert":"a","lesson":"l",
            "choices":[{"text":"x","correct":false,"consequence":"c"},
                       {"text":"y","correct":false,"consequence":"c"}]}]}"#;
        assert!(matches!(
            IncidentCatalog::from_json(no_correct),
            Err(CatalogError::NoCorrectChoice { id: 7 })
        ));

        assert!(matches!(
            IncidentCatalog::from_json(r#"{"incidents":[]}"#),
            Err(CatalogError::Empty)
        ));
        assert!(matches!(
            IncidentCatalog::from_json("not json"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut incidents = catalog().incidents.clone();
        incidents[1].id = incidents[0].id;
        let err = IncidentCatalog::from_incidents(incidents)
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "incident id 1 appears more than once");
    }

    #[test]
    fn empty_catalog_has_no_last_incident() {
        let catalog = IncidentCatalog::empty();
        assert!(catalog.is_empty());
        assert!(!catalog.is_last(0));
        assert!(catalog.get(0).is_none());
    }
}
