//! Admin Panel
//!
//! Digest-gated, read-only view over the roster: summary metrics and the
//! downloadable full-table export. Unlocking yields an access token value;
//! everything behind it only reads the table.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::info;

use crate::auth::verify_password;
use crate::record::COLUMNS;
use crate::store::RosterTable;

/// Roster metrics shown on the admin panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterSummary {
    pub total_players: usize,
    pub championships: usize,
}

/// The export download: filename plus serialized table bytes.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub struct AdminPanel {
    admin_digest: String,
}

impl AdminPanel {
    pub fn new(admin_digest: impl Into<String>) -> Self {
        Self {
            admin_digest: admin_digest.into(),
        }
    }

    /// Check the shared secret; `Some` grants the read-only admin view.
    pub fn unlock(&self, password: &str) -> Option<AdminAccess> {
        if verify_password(password, &self.admin_digest) {
            info!("Admin access granted");
            Some(AdminAccess { _guard: () })
        } else {
            None
        }
    }
}

/// Proof of a successful credential check.
pub struct AdminAccess {
    _guard: (),
}

impl AdminAccess {
    pub fn summarize(&self, table: &RosterTable) -> RosterSummary {
        RosterSummary {
            total_players: table.len(),
            championships: table.championship_count(),
        }
    }

    /// Serialize the full table for download, named
    /// `{sanitized_event_name}_{YYYYMMDD}.csv`.
    pub fn export(
        &self,
        table: &RosterTable,
        event: Option<&str>,
        date: NaiveDate,
    ) -> Result<ExportArtifact> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(COLUMNS)
            .context("Failed to write export header")?;
        for row in table.rows() {
            writer
                .write_record(&row.0)
                .context("Failed to write export row")?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to finish export buffer: {e}"))?;

        Ok(ExportArtifact {
            filename: export_filename(event, date),
            bytes,
        })
    }
}

/// `{sanitized_event_name}_{YYYYMMDD}.csv`; falls back to `athletes` when no
/// event is selected.
pub fn export_filename(event: Option<&str>, date: NaiveDate) -> String {
    let name = sanitize_event_name(event.unwrap_or("athletes"));
    format!("{}_{}.csv", name, date.format("%Y%m%d"))
}

fn sanitize_event_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '(' | ')'))
        .collect()
}
