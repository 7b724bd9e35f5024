use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// Half-day bucket a record belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    sqlx::Type,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Period {
    Morning,
    Afternoon,
}

impl Period {
    pub const ALL: [Period; 2] = [Period::Morning, Period::Afternoon];

    /// Label used in exported workbooks.
    pub fn sheet_label(self) -> &'static str {
        match self {
            Period::Morning => "上午",
            Period::Afternoon => "下午",
        }
    }

    /// Label used in the HTML pages.
    pub fn label(self) -> &'static str {
        match self {
            Period::Morning => "Morning",
            Period::Afternoon => "Afternoon",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TimeRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub period: Period,
    pub hours: f64,
    pub project_name: String,
    pub description: Option<String>,
    /// `true` for typed entries, `false` for timer-derived ones
    pub is_manual: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTimeRecord {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub period: Period,
    pub hours: f64,
    pub project_name: String,
    pub description: Option<String>,
    pub is_manual: bool,
}

/// Validated field values for a manual entry or an edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordFields {
    pub date: NaiveDate,
    pub period: Period,
    pub hours: f64,
    pub project_name: String,
    pub description: Option<String>,
}

/// Raw form payload for creating or editing a record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordForm {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time_period: String,
    #[serde(default)]
    pub hours: String,
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Local path to redirect to after saving
    #[serde(default)]
    pub next: Option<String>,
}
