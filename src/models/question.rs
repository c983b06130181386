use crate::models::param_type::ReturnType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    Coding,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::MultipleChoice => f.write_str("multiple_choice"),
            QuestionKind::Coding => f.write_str("coding"),
        }
    }
}

impl FromStr for QuestionKind {
    type Err = crate::models::param_type::UnknownTypeTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multiple_choice" => Ok(QuestionKind::MultipleChoice),
            "coding" => Ok(QuestionKind::Coding),
            other => Err(crate::models::param_type::UnknownTypeTag(other.to_string())),
        }
    }
}

/// One question of a quiz. Multiple-choice questions carry their options and
/// the correct index inline; coding questions carry the solution function's
/// signature and own their parameters, test cases and driver code as related
/// records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub kind: QuestionKind,
    pub prompt: String,
    pub points: i32,
    pub display_order: i32,
    pub options: Option<JsonValue>,
    pub correct_option: Option<i32>,
    pub function_name: Option<String>,
    pub return_type: Option<ReturnType>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
