use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

/// A graded student submission against a quiz. `answers` holds the graded
/// per-question breakdown produced by the grading service.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attempt {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub student_name: String,
    pub student_email: String,
    pub answers: JsonValue,
    pub earned_points: i32,
    pub max_points: i32,
    pub passed: bool,
    pub submitted_at: DateTime<Utc>,
}
