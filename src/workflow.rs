//! Registration Workflow
//!
//! The two-step registration flow and its orchestration:
//! - `WorkflowState`: explicit, serializable step state (select championship
//!   <-> enter players), no ambient session globals
//! - the per-category form catalog: which fields a championship presents and
//!   which competition list applies
//! - `Registry`: validate a batch, persist it, then mirror the new rows to
//!   the sheet and report full or partial replication

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::RegistryConfig;
use crate::record::{
    is_master_course, AthleteRecord, BeltDegree, Federation, Sex, CHAMPIONSHIPS, COURSE_TYPES,
    MASTER_COURSE,
};
use crate::replication::SheetReplicator;
use crate::store::RosterStore;
use crate::validation::{validate, ValidationError};

/// Earliest accepted date of birth; the upper bound is always today.
pub fn dob_min() -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(1960, 1, 1).expect("valid constant date")
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Unknown championship: {0}")]
    UnknownChampionship(String),
    #[error("Unknown course type: {0}")]
    UnknownCourseType(String),
    #[error("No championship selected")]
    NoChampionshipSelected,
    #[error("Date of birth {0} outside 1960-01-01..=today")]
    DateOfBirthOutOfRange(chrono::NaiveDate),
}

// ============================================================================
// FORM CATALOG
// ============================================================================

/// Competition list shown for the Egyptian Traditional Karate Federation, and
/// for championships without a federation picker.
pub const DEFAULT_COMPETITIONS: [&str; 8] = [
    "Individual Kata",
    "Kata Team",
    "Individual Kumite",
    "Fuko Go",
    "Inbo Mix",
    "Inbo Male",
    "Inbo Female",
    "Kumite Team",
];

/// Competition list shown for the United General Federation.
pub const UNITED_GENERAL_COMPETITIONS: [&str; 6] = [
    "Individual Kata",
    "Kata Team",
    "Kumite Ibon",
    "Kumite Nihon",
    "Kumite Sanbon",
    "Kumite Rote Shine",
];

/// What the registration step presents for one championship. Fixed lookup,
/// not computed.
#[derive(Debug, Clone, Copy)]
pub struct CategoryForm {
    /// Coach name and coach phone are collected for the whole batch.
    pub collects_coach: bool,
    /// A federation is picked per player and selects the competition list.
    pub collects_federation: bool,
    /// Competitions are picked per player.
    pub collects_competitions: bool,
    /// The master course additionally picks a course type for the batch.
    pub collects_course_type: bool,
}

static CATALOG: Lazy<HashMap<&'static str, CategoryForm>> = Lazy::new(|| {
    let mut catalog = HashMap::new();
    catalog.insert(
        MASTER_COURSE,
        CategoryForm {
            collects_coach: false,
            collects_federation: false,
            collects_competitions: false,
            collects_course_type: true,
        },
    );
    let federation_form = CategoryForm {
        collects_coach: true,
        collects_federation: true,
        collects_competitions: true,
        collects_course_type: false,
    };
    catalog.insert(crate::record::AFRICAN_OPEN, federation_form);
    catalog.insert(crate::record::NORTH_AFRICA_UNITED, federation_form);
    catalog
});

/// Form shape for a championship from the selection list.
pub fn category_form(championship: &str) -> Option<CategoryForm> {
    CATALOG.get(championship).copied()
}

/// Competition options for a player, given the federation picked (if the
/// category picks one). Master-course players have no competitions.
pub fn competition_options(
    championship: &str,
    federation: Option<Federation>,
) -> &'static [&'static str] {
    if is_master_course(championship) {
        &[]
    } else {
        match federation {
            Some(Federation::UnitedGeneral) => &UNITED_GENERAL_COMPETITIONS,
            _ => &DEFAULT_COMPETITIONS,
        }
    }
}

/// Belt options are the same fixed ordered list everywhere.
pub fn belt_options() -> &'static [BeltDegree] {
    &BeltDegree::ALL
}

// ============================================================================
// WORKFLOW STATE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    SelectChampionship,
    Registration,
}

/// Explicit workflow state, passed through the orchestration layer instead of
/// living in ambient session globals. Serializable so a UI session can stash
/// and restore it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowState {
    pub step: Step,
    championship: Option<String>,
    course_type: Option<String>,
}

impl WorkflowState {
    pub fn new() -> Self {
        Self {
            step: Step::SelectChampionship,
            championship: None,
            course_type: None,
        }
    }

    /// Forward transition: championship chosen on the selection step.
    pub fn choose_championship(&mut self, name: &str) -> Result<(), WorkflowError> {
        if !CHAMPIONSHIPS.contains(&name) {
            return Err(WorkflowError::UnknownChampionship(name.to_string()));
        }
        self.championship = Some(name.to_string());
        self.course_type = None;
        self.step = Step::Registration;
        Ok(())
    }

    /// Course type within the master course category.
    pub fn choose_course_type(&mut self, course_type: &str) -> Result<(), WorkflowError> {
        if !COURSE_TYPES.contains(&course_type) {
            return Err(WorkflowError::UnknownCourseType(course_type.to_string()));
        }
        self.course_type = Some(course_type.to_string());
        Ok(())
    }

    /// Back transition: returns to the selection step, dropping the pending
    /// selection.
    pub fn back(&mut self) {
        self.step = Step::SelectChampionship;
        self.championship = None;
        self.course_type = None;
    }

    pub fn championship(&self) -> Option<&str> {
        self.championship.as_deref()
    }

    /// The championship value stored on records: master-course entries carry
    /// the course-type suffix (`"African Master Course - Master"`).
    pub fn stored_championship(&self) -> Result<String, WorkflowError> {
        let name = self
            .championship
            .as_deref()
            .ok_or(WorkflowError::NoChampionshipSelected)?;
        if name == MASTER_COURSE {
            let course_type = self.course_type.as_deref().unwrap_or("Master");
            Ok(format!("{name} - {course_type}"))
        } else {
            Ok(name.to_string())
        }
    }

    pub fn form(&self) -> Option<CategoryForm> {
        self.championship.as_deref().and_then(category_form)
    }
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// RECORD BUILDING
// ============================================================================

/// Batch-level fields, entered once for all players in the submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SharedFields {
    pub club: String,
    pub nationality: String,
    pub coach_name: String,
    pub phone_number: String,
}

/// Per-player form input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerForm {
    pub athlete_name: String,
    pub date_of_birth: chrono::NaiveDate,
    pub sex: Sex,
    pub player_code: String,
    pub belt_degree: BeltDegree,
    pub federation: Option<Federation>,
    pub competitions: Vec<String>,
}

/// Assemble a record for the selected championship. Text fields are trimmed
/// and the date of birth is bounded the way the original entry form bounds
/// its date picker.
pub fn build_record(
    state: &WorkflowState,
    shared: &SharedFields,
    player: &PlayerForm,
) -> Result<AthleteRecord, WorkflowError> {
    let championship = state.stored_championship()?;
    let form = state.form().ok_or(WorkflowError::NoChampionshipSelected)?;

    let today = chrono::Utc::now().date_naive();
    if player.date_of_birth < dob_min() || player.date_of_birth > today {
        return Err(WorkflowError::DateOfBirthOutOfRange(player.date_of_birth));
    }

    Ok(AthleteRecord {
        championship,
        athlete_name: player.athlete_name.trim().to_string(),
        club: shared.club.trim().to_string(),
        nationality: shared.nationality.trim().to_string(),
        coach_name: if form.collects_coach {
            shared.coach_name.trim().to_string()
        } else {
            String::new()
        },
        phone_number: shared.phone_number.trim().to_string(),
        date_of_birth: player.date_of_birth,
        sex: player.sex,
        player_code: player.player_code.trim().to_string(),
        belt_degree: player.belt_degree,
        competitions: if form.collects_competitions {
            player.competitions.clone()
        } else {
            Vec::new()
        },
        federation: if form.collects_federation {
            player.federation
        } else {
            None
        },
        timestamp: chrono::Utc::now(),
    })
}

// ============================================================================
// SUBMISSION ORCHESTRATION
// ============================================================================

/// Outcome of one batch submission.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Batch persisted locally; `replicated` of `saved` rows reached the
    /// sheet. Partial replication is a warning, never a rollback.
    Accepted {
        saved: usize,
        replicated: usize,
        total_rows: usize,
    },
    /// Batch rejected wholesale; the store is untouched.
    Rejected(Vec<ValidationError>),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted { .. })
    }

    pub fn is_fully_replicated(&self) -> bool {
        matches!(
            self,
            SubmitOutcome::Accepted {
                saved, replicated, ..
            } if saved == replicated
        )
    }
}

/// The registration core: store plus replication client behind one submit
/// call. Validation errors never reach the store, a store failure aborts
/// before replication, and replication failures never roll back the store.
pub struct Registry {
    store: RosterStore,
    replicator: Option<SheetReplicator>,
}

impl Registry {
    pub fn new(config: &RegistryConfig) -> Self {
        let replicator = if config.sheet_endpoint.is_empty() {
            None
        } else {
            Some(SheetReplicator::new(
                config.sheet_endpoint.clone(),
                config.retry,
            ))
        };
        Self {
            store: RosterStore::new(config.data_file.clone()),
            replicator,
        }
    }

    pub fn store(&self) -> &RosterStore {
        &self.store
    }

    /// Validate and persist one batch, then mirror the accepted rows.
    pub async fn submit(&self, batch: &[AthleteRecord]) -> anyhow::Result<SubmitOutcome> {
        let existing = self.store.load()?;

        let errors = validate(batch, &existing);
        if !errors.is_empty() {
            info!("Rejected batch of {} with {} errors", batch.len(), errors.len());
            return Ok(SubmitOutcome::Rejected(errors));
        }

        let merged = self.store.append_and_persist(existing, batch)?;

        let mut replicated = 0;
        if let Some(replicator) = &self.replicator {
            for record in batch {
                if replicator.replicate(record).await {
                    replicated += 1;
                } else {
                    warn!("Failed to mirror '{}' to the sheet", record.athlete_name);
                }
            }
            if replicated < batch.len() {
                warn!(
                    "Mirrored {}/{} new rows, local file remains authoritative",
                    replicated,
                    batch.len()
                );
            }
        }

        Ok(SubmitOutcome::Accepted {
            saved: batch.len(),
            replicated,
            total_rows: merged.len(),
        })
    }
}
