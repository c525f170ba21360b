use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub const DEFAULT_CATEGORIES: [&str; 3] = ["deployment", "meeting", "release"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub display_name: String,
    pub description: String,
    #[sqlx(json)]
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>, // TEXT, RFC 3339
}

/// Raw team configuration payload, validated into a [`TeamConfig`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInput {
    pub display_name: Option<Value>,
    pub description: Option<Value>,
    pub categories: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamConfig {
    pub display_name: String,
    pub description: String,
    pub categories: Vec<String>,
}

pub fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

/// Outcome of a create-or-replace on the team configuration.
#[derive(Debug, Clone)]
pub struct TeamUpsert {
    pub team: Team,
    pub created: bool,
}
