//! Validation Engine
//!
//! Checks a submitted batch of records against the field and duplicate-code
//! rules before anything touches the store. An empty error list means the
//! batch is accepted atomically; any error rejects the whole batch.

use serde::Serialize;
use thiserror::Error;

use crate::record::{is_master_course, AthleteRecord};
use crate::store::RosterTable;

/// A user-correctable problem with one submitted record. All variants carry
/// the athlete name so the errors can be itemized back to the form.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum ValidationError {
    #[error("Missing {field}: {athlete}")]
    MissingField { field: &'static str, athlete: String },
    #[error("Duplicate Player Code '{code}': {athlete}")]
    DuplicateCode { code: String, athlete: String },
    #[error("No competitions: {athlete}")]
    NoCompetitions { athlete: String },
    #[error("No coach: {athlete}")]
    NoCoach { athlete: String },
}

/// Knobs for [`validate_with`]. `check_within_batch` additionally rejects two
/// new records sharing a code inside one submission; the observed behavior
/// (and the default) only checks against the pre-existing table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationOptions {
    pub check_within_batch: bool,
}

/// Validate a batch against the existing roster with the default options.
pub fn validate(batch: &[AthleteRecord], existing: &RosterTable) -> Vec<ValidationError> {
    validate_with(batch, existing, ValidationOptions::default())
}

pub fn validate_with(
    batch: &[AthleteRecord],
    existing: &RosterTable,
    options: ValidationOptions,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen_in_batch: Vec<(&str, &str)> = Vec::new();

    for record in batch {
        let athlete = record.athlete_name.clone();

        for (field, value) in required_fields(record) {
            if value.trim().is_empty() {
                errors.push(ValidationError::MissingField {
                    field,
                    athlete: athlete.clone(),
                });
            }
        }

        let code = record.player_code.as_str();
        let existing_codes = existing.player_codes_for(&record.championship);
        let in_batch = options.check_within_batch
            && seen_in_batch
                .iter()
                .any(|(champ, c)| *champ == record.championship && *c == code);
        if existing_codes.contains(code) || in_batch {
            errors.push(ValidationError::DuplicateCode {
                code: code.to_string(),
                athlete: athlete.clone(),
            });
        }
        seen_in_batch.push((&record.championship, code));

        if !is_master_course(&record.championship) {
            if record.competitions.iter().all(|c| c.trim().is_empty()) {
                errors.push(ValidationError::NoCompetitions {
                    athlete: athlete.clone(),
                });
            }
            if record.coach_name.trim().is_empty() {
                errors.push(ValidationError::NoCoach { athlete });
            }
        }
    }

    errors
}

/// The required fields of a record, paired with their schema column names.
fn required_fields(record: &AthleteRecord) -> [(&'static str, &str); 6] {
    [
        ("Athlete Name", record.athlete_name.as_str()),
        ("Player Code", record.player_code.as_str()),
        ("Belt Degree", record.belt_degree.as_str()),
        ("Club", record.club.as_str()),
        ("Nationality", record.nationality.as_str()),
        ("Phone Number", record.phone_number.as_str()),
    ]
}
