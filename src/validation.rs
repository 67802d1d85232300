//! Input validation for league data.
//!
//! Checks the roster and the default-schedule templates before a season
//! is built. Detects:
//! - Duplicate team ids
//! - Two teams holding the same slot in one division
//! - Template rows pairing a slot with itself
//! - Template rows naming a slot the division size does not have
//! - Division sizes with no template
//!
//! All problems are collected; the check does not stop at the first one.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::models::{DefaultScheduleEntry, DivisionCode, Team};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two teams share the same id.
    DuplicateTeamId,
    /// Two teams of one division share a slot number.
    DuplicateDivisionSlot,
    /// A template row has the same slot at home and away.
    SelfPairing,
    /// A template row names slot 0 or a slot past the division size.
    SlotOutOfRange,
    /// No template exists for a division's size.
    MissingTemplate,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates a roster against the templates it will be expanded with.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_league(teams: &[Team], templates: &[DefaultScheduleEntry]) -> ValidationResult {
    let mut errors = Vec::new();

    // Team ids and division slots
    let mut team_ids = HashSet::new();
    let mut slots: BTreeMap<&str, BTreeSet<u32>> = BTreeMap::new();
    let mut team_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for team in teams {
        *team_counts.entry(team.division.as_str()).or_default() += 1;
        if !team_ids.insert(team.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateTeamId,
                format!("Duplicate team ID: {}", team.id),
            ));
        }
        if !slots
            .entry(team.division.as_str())
            .or_default()
            .insert(team.division_slot)
        {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateDivisionSlot,
                format!(
                    "Division '{}' has more than one team in slot {}",
                    team.division, team.division_slot
                ),
            ));
        }
    }

    // Template rows
    let mut template_sizes = BTreeSet::new();
    for entry in templates {
        template_sizes.insert(entry.division_size);

        if entry.home_slot == entry.visiting_slot {
            errors.push(ValidationError::new(
                ValidationErrorKind::SelfPairing,
                format!(
                    "Template for {} teams, week {}: slot {} plays itself",
                    entry.division_size, entry.week, entry.home_slot
                ),
            ));
        }
        for slot in [entry.home_slot, entry.visiting_slot] {
            if slot == 0 || slot as usize > entry.division_size {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SlotOutOfRange,
                    format!(
                        "Template for {} teams, week {}: no slot {}",
                        entry.division_size, entry.week, slot
                    ),
                ));
            }
        }
    }

    // Every division size needs a template; size counts teams, as expansion does
    let mut sizes: BTreeMap<usize, Vec<DivisionCode>> = BTreeMap::new();
    for (division, &count) in &team_counts {
        sizes.entry(count).or_default().push(division.to_string());
    }
    for (size, divisions) in sizes {
        if !template_sizes.contains(&size) {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingTemplate,
                format!(
                    "No default schedule for {} teams (divisions: {})",
                    size,
                    divisions.join(", ")
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<Team> {
        vec![
            Team::new(1, "A", "Ants", 1),
            Team::new(2, "A", "Apes", 2),
            Team::new(3, "B", "Bees", 1),
            Team::new(4, "B", "Bats", 2),
        ]
    }

    fn pair_template() -> Vec<DefaultScheduleEntry> {
        vec![
            DefaultScheduleEntry::new(2, 1, 1, 2),
            DefaultScheduleEntry::new(2, 2, 2, 1),
        ]
    }

    fn kinds(result: ValidationResult) -> Vec<ValidationErrorKind> {
        result.unwrap_err().into_iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_valid_league() {
        assert!(validate_league(&roster(), &pair_template()).is_ok());
    }

    #[test]
    fn test_duplicate_team_id() {
        let mut teams = roster();
        teams.push(Team::new(1, "C", "Cats", 1));
        teams.push(Team::new(5, "C", "Cows", 2));
        assert_eq!(
            kinds(validate_league(&teams, &pair_template())),
            vec![ValidationErrorKind::DuplicateTeamId]
        );
    }

    #[test]
    fn test_duplicate_division_slot() {
        let mut teams = roster();
        teams[1].division_slot = 1;
        let errors = validate_league(&teams, &pair_template()).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::DuplicateDivisionSlot);
        assert!(errors[0].message.contains("Division 'A'"));
    }

    #[test]
    fn test_bad_template_rows() {
        let mut templates = pair_template();
        templates.push(DefaultScheduleEntry::new(2, 3, 2, 2));
        templates.push(DefaultScheduleEntry::new(2, 4, 1, 3));
        assert_eq!(
            kinds(validate_league(&roster(), &templates)),
            vec![
                ValidationErrorKind::SelfPairing,
                ValidationErrorKind::SlotOutOfRange
            ]
        );
    }

    #[test]
    fn test_missing_template_for_size() {
        let mut teams = roster();
        teams.push(Team::new(5, "B", "Boars", 3));
        let errors = validate_league(&teams, &pair_template()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::MissingTemplate);
        assert_eq!(errors[0].to_string(), "No default schedule for 3 teams (divisions: B)");
    }

    #[test]
    fn test_collects_all_errors() {
        let teams = vec![
            Team::new(1, "A", "Ants", 1),
            Team::new(1, "A", "Apes", 1),
        ];
        let templates = vec![DefaultScheduleEntry::new(2, 1, 1, 1)];
        let errors = validate_league(&teams, &templates).unwrap_err();
        // dup id, dup slot, self pairing
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_missing_template_sized_by_team_count() {
        let mut teams = roster();
        teams.push(Team::new(5, "B", "Boars", 2));
        let errors = validate_league(&teams, &pair_template()).unwrap_err();
        let kinds: Vec<_> = errors.iter().map(|e| e.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                ValidationErrorKind::DuplicateDivisionSlot,
                ValidationErrorKind::MissingTemplate
            ]
        );
        assert_eq!(errors[1].message, "No default schedule for 3 teams (divisions: B)");
    }
}
