//! Championship Roster Registration Core
//!
//! The non-UI core of a multi-step sports-championship registration system:
//! validation of submitted athlete batches, a durable CSV roster store,
//! best-effort replication of accepted rows to a spreadsheet webhook, and a
//! digest-gated admin view. A form UI (or the `roster` CLI) drives it through
//! the workflow layer.
//!
//! ## Module Structure
//!
//! - `record`: fixed roster schema, typed athlete record, fixed enumerations
//! - `store`: CSV-backed roster table (tolerant load, full-rewrite persist)
//! - `validation`: required-field and duplicate-code rules
//! - `replication`: bounded-retry webhook client
//! - `auth`: shared-secret digest check
//! - `workflow`: step state machine, form catalog, submit orchestration
//! - `admin`: gated summary and export
//! - `config`: deployment-time knobs

pub mod admin;
pub mod auth;
pub mod config;
pub mod record;
pub mod replication;
pub mod store;
pub mod validation;
pub mod workflow;

pub use admin::{AdminAccess, AdminPanel, ExportArtifact, RosterSummary};
pub use auth::{hash_password, verify_password};
pub use config::{RegistryConfig, RetryPolicy};
pub use record::{
    AthleteRecord, BeltDegree, Federation, RosterRow, Sex, CHAMPIONSHIPS, COLUMNS,
    REQUIRED_FIELDS,
};
pub use replication::SheetReplicator;
pub use store::{RosterStore, RosterTable};
pub use validation::{validate, validate_with, ValidationError, ValidationOptions};
pub use workflow::{
    build_record, category_form, competition_options, dob_min, CategoryForm, PlayerForm,
    Registry, SharedFields, Step, SubmitOutcome, WorkflowError, WorkflowState,
};
