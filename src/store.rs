//! Roster Store
//!
//! Durable storage for the roster table: one CSV file, fixed column order,
//! header row, loaded fully on read and rewritten fully on every save.
//!
//! Loading is tolerant: a missing file is the valid empty state, columns
//! missing from an older file are filled with empty strings, and columns are
//! reordered to the fixed schema. Saving is all-or-nothing: a write failure
//! fails the whole operation and the user resubmits.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::record::{AthleteRecord, RosterRow, COLUMNS};

/// In-memory roster: an ordered sequence of rows under the fixed schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterTable {
    rows: Vec<RosterRow>,
}

impl RosterTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<RosterRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[RosterRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Player codes of existing rows in one championship, as text. This is
    /// the projection the duplicate check runs against.
    pub fn player_codes_for(&self, championship: &str) -> HashSet<&str> {
        self.rows
            .iter()
            .filter(|r| r.championship() == championship)
            .map(|r| r.player_code())
            .collect()
    }

    /// Number of distinct championship values present.
    pub fn championship_count(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.championship())
            .collect::<HashSet<_>>()
            .len()
    }
}

/// CSV-backed roster store. Writes are serialized through an internal lock so
/// two submissions in one process cannot interleave the full-file rewrite.
pub struct RosterStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl RosterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Load the roster. A missing file yields an empty table; columns missing
    /// from the file are filled with empty strings and reordered to the fixed
    /// schema.
    pub fn load(&self) -> Result<RosterTable> {
        if !self.path.exists() {
            debug!("Roster file {:?} not present, starting empty", self.path);
            return Ok(RosterTable::empty());
        }

        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("Failed to open roster file {:?}", self.path))?;

        let headers: Vec<String> = reader
            .headers()
            .context("Failed to read roster headers")?
            .iter()
            .map(str::to_string)
            .collect();

        // Position of each schema column in the file, if present at all.
        let positions: Vec<Option<usize>> = COLUMNS
            .iter()
            .map(|col| headers.iter().position(|h| h == col))
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.context("Failed to read roster row")?;
            let cells = positions
                .iter()
                .map(|pos| {
                    pos.and_then(|i| record.get(i))
                        .unwrap_or("")
                        .to_string()
                })
                .collect();
            rows.push(RosterRow(cells));
        }

        debug!("Loaded {} roster rows from {:?}", rows.len(), self.path);
        Ok(RosterTable::from_rows(rows))
    }

    /// Append the accepted records to the table and rewrite the file. Returns
    /// the merged table; insertion order is preserved.
    pub fn append_and_persist(
        &self,
        existing: RosterTable,
        new_records: &[AthleteRecord],
    ) -> Result<RosterTable> {
        let mut merged = existing;
        merged.rows.extend(new_records.iter().map(AthleteRecord::to_row));
        self.persist(&merged)?;
        info!(
            "Persisted {} rows ({} new) to {:?}",
            merged.len(),
            new_records.len(),
            self.path
        );
        Ok(merged)
    }

    /// Rewrite the whole file: header row then every table row, in order.
    pub fn persist(&self, table: &RosterTable) -> Result<()> {
        let _guard = self.write_lock.lock();

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create data dir {:?}", parent))?;
            }
        }

        let mut writer = csv::Writer::from_path(&self.path)
            .with_context(|| format!("Failed to open roster file {:?} for writing", self.path))?;
        writer
            .write_record(COLUMNS)
            .context("Failed to write roster header")?;
        for row in &table.rows {
            writer
                .write_record(&row.0)
                .context("Failed to write roster row")?;
        }
        writer.flush().context("Failed to flush roster file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{BeltDegree, Sex, AFRICAN_OPEN};
    use chrono::{NaiveDate, Utc};
    use tempfile::tempdir;

    fn record(code: &str) -> AthleteRecord {
        AthleteRecord {
            championship: AFRICAN_OPEN.to_string(),
            athlete_name: format!("Athlete {code}"),
            club: "Club".to_string(),
            nationality: "Egypt".to_string(),
            coach_name: "Coach".to_string(),
            phone_number: "0100".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1999, 1, 2).unwrap(),
            sex: Sex::Male,
            player_code: code.to_string(),
            belt_degree: BeltDegree::Dan2,
            competitions: vec!["Individual Kata".to_string()],
            federation: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = RosterStore::new(dir.path().join("athletes_data.csv"));
        let table = store.load().unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_append_then_load_round_trip() {
        let dir = tempdir().unwrap();
        let store = RosterStore::new(dir.path().join("athletes_data.csv"));

        let table = store.load().unwrap();
        let merged = store
            .append_and_persist(table, &[record("A1"), record("A2")])
            .unwrap();
        assert_eq!(merged.len(), 2);

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded, merged);
        assert_eq!(reloaded.rows()[0].player_code(), "A1");
        assert_eq!(reloaded.rows()[1].player_code(), "A2");
    }

    #[test]
    fn test_persist_of_load_is_stable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("athletes_data.csv");
        let store = RosterStore::new(&path);
        store
            .append_and_persist(RosterTable::empty(), &[record("A1")])
            .unwrap();

        let first = std::fs::read(&path).unwrap();
        let table = store.load().unwrap();
        store.persist(&table).unwrap();
        let second = std::fs::read(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_load_fills_missing_columns_and_reorders() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("athletes_data.csv");

        // Older file: shuffled order, no Federation or Timestamp columns.
        let mut writer = csv::Writer::from_path(&path).unwrap();
        writer
            .write_record(["Player Code", "Championship", "Athlete Name"])
            .unwrap();
        writer.write_record(["C1", "X", "Old Entry"]).unwrap();
        writer.flush().unwrap();

        let store = RosterStore::new(&path);
        let table = store.load().unwrap();
        assert_eq!(table.len(), 1);

        let row = &table.rows()[0];
        assert_eq!(row.0.len(), COLUMNS.len());
        assert_eq!(row.championship(), "X");
        assert_eq!(row.player_code(), "C1");
        assert_eq!(row.get("Athlete Name"), "Old Entry");
        assert_eq!(row.get("Federation"), "");
        assert_eq!(row.get("Timestamp"), "");
    }

    #[test]
    fn test_player_code_projection_is_scoped() {
        let dir = tempdir().unwrap();
        let store = RosterStore::new(dir.path().join("athletes_data.csv"));
        let mut other = record("C1");
        other.championship = "Other Championship".to_string();
        let table = store
            .append_and_persist(RosterTable::empty(), &[record("C1"), other])
            .unwrap();

        let codes = table.player_codes_for(AFRICAN_OPEN);
        assert!(codes.contains("C1"));
        assert_eq!(codes.len(), 1);
        assert_eq!(table.championship_count(), 2);
    }
}
