use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::services::cadence::CadenceStats;

/// Row of the `events` table; the occurrence history lives in `event_occurrences`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub team: String,
    pub name: String,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub team: String,
    pub name: String,
    pub category: Option<String>,
    /// Occurrences in the order they were recorded.
    pub timestamps: Vec<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn from_row(row: EventRow, timestamps: Vec<DateTime<Utc>>) -> Self {
        Self {
            id: row.id,
            team: row.team,
            name: row.name,
            category: row.category,
            timestamps,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    pub fn with_stats(self, now: DateTime<Utc>) -> EventWithStats {
        let stats = CadenceStats::compute(&self.timestamps, now);
        EventWithStats { event: self, stats }
    }
}

/// Event as returned by the list endpoint: persisted fields plus cadence stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventWithStats {
    #[serde(flatten)]
    pub event: Event,
    #[serde(flatten)]
    pub stats: CadenceStats,
}

/// Raw create-event payload. Fields stay loosely typed so validation can
/// report the same messages for missing and mistyped values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateEventInput {
    pub name: Option<Value>,
    pub category: Option<Value>,
}

/// Validated event payload: trimmed name, canonical optional category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub name: String,
    pub category: Option<String>,
}
