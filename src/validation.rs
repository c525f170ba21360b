use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    database::models::{CreateEventInput, NewEvent, TeamConfig, TeamInput, default_categories},
    error::AppError,
};

static TEAM_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]+$").expect("team name pattern is valid"));

/// URL-safe team token used as the partition key for events.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TeamName(String);

impl TeamName {
    pub fn parse(raw: impl Into<String>) -> Result<Self, AppError> {
        let raw = raw.into();
        if TEAM_NAME_PATTERN.is_match(&raw) {
            Ok(Self(raw))
        } else {
            Err(AppError::bad_request(
                "Invalid team name. Only alphanumeric characters and hyphens are allowed.",
            ))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn parse_event_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::bad_request("Invalid event ID"))
}

fn non_empty_trimmed(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl CreateEventInput {
    pub fn validate(self) -> Result<NewEvent, AppError> {
        let name = non_empty_trimmed(self.name.as_ref()).ok_or_else(|| {
            AppError::bad_request("Event name is required and must be a non-empty string.")
        })?;

        // Anything other than a non-blank string collapses to "no category".
        let category = non_empty_trimmed(self.category.as_ref());

        Ok(NewEvent { name, category })
    }
}

impl TeamInput {
    pub fn validate(self) -> Result<TeamConfig, AppError> {
        let display_name = non_empty_trimmed(self.display_name.as_ref()).ok_or_else(|| {
            AppError::bad_request("Team display name is required and must be a non-empty string.")
        })?;

        let description = match self.description {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(description)) => description.trim().to_string(),
            Some(_) => return Err(AppError::bad_request("Team description must be a string.")),
        };

        let categories = match self.categories {
            None | Some(Value::Null) => default_categories(),
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(category) => Ok(category),
                    _ => Err(()),
                })
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| AppError::bad_request("Categories must be an array of strings."))?,
            Some(_) => {
                return Err(AppError::bad_request(
                    "Categories must be an array of strings.",
                ));
            }
        };

        Ok(TeamConfig {
            display_name,
            description,
            categories,
        })
    }
}
