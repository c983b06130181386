use crate::services::attempt_service::AttemptSort;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitAttemptPayload {
    #[validate(length(min = 1, message = "Student name cannot be empty"))]
    pub student_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub student_email: String,
    /// Per-question answers: `{"question_id": "...", "answer": ...}`.
    pub answers: Vec<JsonValue>,
}

#[derive(Debug, Deserialize)]
pub struct AttemptListQuery {
    pub passed: Option<bool>,
    pub search: Option<String>,
    pub sort: Option<AttemptSort>,
}
