//! Roster Data Model
//!
//! Defines the fixed roster schema and the typed registration record:
//! - The 13-column schema shared by the store, the export artifact, and the
//!   replication payload
//! - `AthleteRecord` (typed, construction side) and `RosterRow` (stringly,
//!   storage side)
//! - Fixed enumerations: sex, belt degree (ordered 25-rank list), federation
//! - Championship catalog constants

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// SCHEMA
// ============================================================================

/// Fixed column order for the roster table. Every persisted file, export
/// artifact, and replication payload uses exactly these names.
pub const COLUMNS: [&str; 13] = [
    "Championship",
    "Athlete Name",
    "Club",
    "Nationality",
    "Coach Name",
    "Phone Number",
    "Date of Birth",
    "Sex",
    "Player Code",
    "Belt Degree",
    "Competitions",
    "Federation",
    "Timestamp",
];

/// Fields that must be non-empty after trimming for every record.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "Athlete Name",
    "Player Code",
    "Belt Degree",
    "Club",
    "Nationality",
    "Phone Number",
];

// ============================================================================
// CHAMPIONSHIP CATALOG
// ============================================================================

pub const MASTER_COURSE: &str = "African Master Course";
pub const AFRICAN_OPEN: &str = "African Open Traditional Karate Championship";
pub const NORTH_AFRICA_UNITED: &str = "North Africa Unitied Karate Championship (General)";

/// The championships offered on the selection step.
pub const CHAMPIONSHIPS: [&str; 3] = [MASTER_COURSE, AFRICAN_OPEN, NORTH_AFRICA_UNITED];

/// Course types offered within the master course category. The stored
/// championship value is `"African Master Course - {type}"`.
pub const COURSE_TYPES: [&str; 2] = ["Master", "General"];

/// Master-course records carry no coach, federation, or competitions; the
/// category is matched by prefix because of the course-type suffix.
pub fn is_master_course(championship: &str) -> bool {
    championship.starts_with(MASTER_COURSE)
}

// ============================================================================
// ENUMS
// ============================================================================

/// Athlete sex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Male" => Some(Sex::Male),
            "Female" => Some(Sex::Female),
            _ => None,
        }
    }
}

/// Belt degree, ordered from the lowest junior kyu up to Dan 8. The ordering
/// of the variants matches the presentation order of the rank list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BeltDegree {
    #[serde(rename = "Kyu Junior yellow 10")]
    KyuJuniorYellow10,
    #[serde(rename = "Kyu Junior yellow 9")]
    KyuJuniorYellow9,
    #[serde(rename = "Kyu Junior orange 8")]
    KyuJuniorOrange8,
    #[serde(rename = "Kyu Junior orange green 7")]
    KyuJuniorOrangeGreen7,
    #[serde(rename = "Kyu Junior green 6")]
    KyuJuniorGreen6,
    #[serde(rename = "Kyu Junior green blue 5")]
    KyuJuniorGreenBlue5,
    #[serde(rename = "Kyu Junior blue 4")]
    KyuJuniorBlue4,
    #[serde(rename = "Kyu Junior blue 3")]
    KyuJuniorBlue3,
    #[serde(rename = "Kyu Junior brown 2")]
    KyuJuniorBrown2,
    #[serde(rename = "Kyu Junior brown 1")]
    KyuJuniorBrown1,
    #[serde(rename = "Kyu Senior yellow 7")]
    KyuSeniorYellow7,
    #[serde(rename = "Kyu Senior yellow 6")]
    KyuSeniorYellow6,
    #[serde(rename = "Kyu Senior orange 5")]
    KyuSeniorOrange5,
    #[serde(rename = "Kyu Senior orange 4")]
    KyuSeniorOrange4,
    #[serde(rename = "Kyu Senior green 3")]
    KyuSeniorGreen3,
    #[serde(rename = "Kyu Senior blue 2")]
    KyuSeniorBlue2,
    #[serde(rename = "Kyu Senior brown 1")]
    KyuSeniorBrown1,
    #[serde(rename = "Dan 1")]
    Dan1,
    #[serde(rename = "Dan 2")]
    Dan2,
    #[serde(rename = "Dan 3")]
    Dan3,
    #[serde(rename = "Dan 4")]
    Dan4,
    #[serde(rename = "Dan 5")]
    Dan5,
    #[serde(rename = "Dan 6")]
    Dan6,
    #[serde(rename = "Dan 7")]
    Dan7,
    #[serde(rename = "Dan 8")]
    Dan8,
}

impl BeltDegree {
    /// All ranks in presentation order.
    pub const ALL: [BeltDegree; 25] = [
        BeltDegree::KyuJuniorYellow10,
        BeltDegree::KyuJuniorYellow9,
        BeltDegree::KyuJuniorOrange8,
        BeltDegree::KyuJuniorOrangeGreen7,
        BeltDegree::KyuJuniorGreen6,
        BeltDegree::KyuJuniorGreenBlue5,
        BeltDegree::KyuJuniorBlue4,
        BeltDegree::KyuJuniorBlue3,
        BeltDegree::KyuJuniorBrown2,
        BeltDegree::KyuJuniorBrown1,
        BeltDegree::KyuSeniorYellow7,
        BeltDegree::KyuSeniorYellow6,
        BeltDegree::KyuSeniorOrange5,
        BeltDegree::KyuSeniorOrange4,
        BeltDegree::KyuSeniorGreen3,
        BeltDegree::KyuSeniorBlue2,
        BeltDegree::KyuSeniorBrown1,
        BeltDegree::Dan1,
        BeltDegree::Dan2,
        BeltDegree::Dan3,
        BeltDegree::Dan4,
        BeltDegree::Dan5,
        BeltDegree::Dan6,
        BeltDegree::Dan7,
        BeltDegree::Dan8,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BeltDegree::KyuJuniorYellow10 => "Kyu Junior yellow 10",
            BeltDegree::KyuJuniorYellow9 => "Kyu Junior yellow 9",
            BeltDegree::KyuJuniorOrange8 => "Kyu Junior orange 8",
            BeltDegree::KyuJuniorOrangeGreen7 => "Kyu Junior orange green 7",
            BeltDegree::KyuJuniorGreen6 => "Kyu Junior green 6",
            BeltDegree::KyuJuniorGreenBlue5 => "Kyu Junior green blue 5",
            BeltDegree::KyuJuniorBlue4 => "Kyu Junior blue 4",
            BeltDegree::KyuJuniorBlue3 => "Kyu Junior blue 3",
            BeltDegree::KyuJuniorBrown2 => "Kyu Junior brown 2",
            BeltDegree::KyuJuniorBrown1 => "Kyu Junior brown 1",
            BeltDegree::KyuSeniorYellow7 => "Kyu Senior yellow 7",
            BeltDegree::KyuSeniorYellow6 => "Kyu Senior yellow 6",
            BeltDegree::KyuSeniorOrange5 => "Kyu Senior orange 5",
            BeltDegree::KyuSeniorOrange4 => "Kyu Senior orange 4",
            BeltDegree::KyuSeniorGreen3 => "Kyu Senior green 3",
            BeltDegree::KyuSeniorBlue2 => "Kyu Senior blue 2",
            BeltDegree::KyuSeniorBrown1 => "Kyu Senior brown 1",
            BeltDegree::Dan1 => "Dan 1",
            BeltDegree::Dan2 => "Dan 2",
            BeltDegree::Dan3 => "Dan 3",
            BeltDegree::Dan4 => "Dan 4",
            BeltDegree::Dan5 => "Dan 5",
            BeltDegree::Dan6 => "Dan 6",
            BeltDegree::Dan7 => "Dan 7",
            BeltDegree::Dan8 => "Dan 8",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.as_str() == label)
    }
}

/// Federation, present only for the federation championships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Federation {
    #[serde(rename = "Egyptian Traditional Karate Federation")]
    EgyptianTraditional,
    #[serde(rename = "United General Federation")]
    UnitedGeneral,
}

impl Federation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Federation::EgyptianTraditional => "Egyptian Traditional Karate Federation",
            Federation::UnitedGeneral => "United General Federation",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Egyptian Traditional Karate Federation" => Some(Federation::EgyptianTraditional),
            "United General Federation" => Some(Federation::UnitedGeneral),
            _ => None,
        }
    }
}

// ============================================================================
// RECORDS
// ============================================================================

/// One athlete registration as entered through the workflow. Field names
/// serialize to the schema column names so a serialized record doubles as the
/// replication payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthleteRecord {
    #[serde(rename = "Championship")]
    pub championship: String,
    #[serde(rename = "Athlete Name")]
    pub athlete_name: String,
    #[serde(rename = "Club")]
    pub club: String,
    #[serde(rename = "Nationality")]
    pub nationality: String,
    /// Empty for master-course records.
    #[serde(rename = "Coach Name")]
    pub coach_name: String,
    #[serde(rename = "Phone Number")]
    pub phone_number: String,
    #[serde(rename = "Date of Birth")]
    pub date_of_birth: NaiveDate,
    #[serde(rename = "Sex")]
    pub sex: Sex,
    /// Unique per championship, not globally.
    #[serde(rename = "Player Code")]
    pub player_code: String,
    #[serde(rename = "Belt Degree")]
    pub belt_degree: BeltDegree,
    /// Serialized as comma-joined text, empty for master-course records.
    #[serde(rename = "Competitions", with = "comma_list")]
    pub competitions: Vec<String>,
    #[serde(rename = "Federation", with = "optional_label")]
    pub federation: Option<Federation>,
    #[serde(rename = "Timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl AthleteRecord {
    /// Flatten into a stringly row in schema column order.
    pub fn to_row(&self) -> RosterRow {
        RosterRow(vec![
            self.championship.clone(),
            self.athlete_name.clone(),
            self.club.clone(),
            self.nationality.clone(),
            self.coach_name.clone(),
            self.phone_number.clone(),
            self.date_of_birth.to_string(),
            self.sex.as_str().to_string(),
            self.player_code.clone(),
            self.belt_degree.as_str().to_string(),
            self.competitions.join(", "),
            self.federation.map(|f| f.as_str()).unwrap_or("").to_string(),
            self.timestamp.to_rfc3339(),
        ])
    }
}

/// One stored roster row: 13 text cells in schema column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRow(pub Vec<String>);

impl RosterRow {
    /// Cell value for a schema column, empty string if the column name is
    /// unknown.
    pub fn get(&self, column: &str) -> &str {
        COLUMNS
            .iter()
            .position(|c| *c == column)
            .and_then(|i| self.0.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn championship(&self) -> &str {
        self.get("Championship")
    }

    pub fn player_code(&self) -> &str {
        self.get("Player Code")
    }
}

// ============================================================================
// SERDE HELPERS
// ============================================================================

/// Competitions travel as comma-joined text in both the file and the webhook
/// payload.
mod comma_list {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(items: &[String], ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&items.join(", "))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
        let joined = String::deserialize(de)?;
        Ok(joined
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Federation serializes as its display label, empty string when absent.
mod optional_label {
    use super::Federation;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(fed: &Option<Federation>, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(fed.map(|f| f.as_str()).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Federation>, D::Error> {
        let label = String::deserialize(de)?;
        Ok(Federation::from_label(&label))
    }
}
