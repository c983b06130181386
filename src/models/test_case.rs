use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A grading test case of a coding question.
///
/// `input` is a JSON object serialized as text, keyed by parameter name.
/// Hidden cases are excluded from student-visible listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TestCase {
    pub id: Uuid,
    pub input: String,
    pub expected_output: String,
    pub hidden: bool,
    pub points: i32,
    pub display_order: i32,
}
