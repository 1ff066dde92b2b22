//! Homework records: review status verdicts and update timestamps

use std::str::FromStr;

use chrono::DateTime;
use serde_json::Value;

pub const NAME_FIELD: &str = "homework_name";
pub const STATUS_FIELD: &str = "status";
pub const DATE_UPDATED_FIELD: &str = "date_updated";

/// Problems with a single homework record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HomeworkError {
    #[error("homework record has no \"homework_name\"")]
    MissingName,

    #[error("homework record has no \"status\"")]
    MissingStatus,

    #[error("unknown homework status \"{0}\"")]
    UnknownStatus(String),

    #[error("homework record has no \"date_updated\"")]
    MissingDate,

    #[error("cannot parse \"date_updated\" value {value:?}: {reason}")]
    InvalidDate { value: String, reason: String },
}

/// Review status reported by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub const ALL: [HomeworkStatus; 3] = [
        HomeworkStatus::Approved,
        HomeworkStatus::Reviewing,
        HomeworkStatus::Rejected,
    ];

    /// Wire code used by the API
    pub fn code(self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Rejected => "rejected",
        }
    }

    /// Human-readable verdict sent to the chat
    pub fn verdict(self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = HomeworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.code() == s)
            .ok_or_else(|| HomeworkError::UnknownStatus(s.to_string()))
    }
}

/// Build the chat message for a homework record's current status
pub fn parse_status(homework: &Value) -> Result<String, HomeworkError> {
    let name = homework
        .get(NAME_FIELD)
        .filter(|v| !v.is_null())
        .ok_or(HomeworkError::MissingName)?;
    let status = homework
        .get(STATUS_FIELD)
        .filter(|v| !v.is_null())
        .ok_or(HomeworkError::MissingStatus)?;

    let status: HomeworkStatus = match status {
        Value::String(code) => code.parse()?,
        other => return Err(HomeworkError::UnknownStatus(other.to_string())),
    };

    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        text_of(name),
        status.verdict()
    ))
}

/// Read `date_updated` as unix seconds
pub fn parse_date_updated(homework: &Value) -> Result<i64, HomeworkError> {
    let raw = homework
        .get(DATE_UPDATED_FIELD)
        .filter(|v| !v.is_null())
        .ok_or(HomeworkError::MissingDate)?;

    let text = raw.as_str().ok_or_else(|| HomeworkError::InvalidDate {
        value: raw.to_string(),
        reason: "expected a string".to_string(),
    })?;

    DateTime::parse_from_rfc3339(text)
        .map(|parsed| parsed.timestamp())
        .map_err(|e| HomeworkError::InvalidDate {
            value: text.to_string(),
            reason: e.to_string(),
        })
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
