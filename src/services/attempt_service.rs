use crate::error::Result;
use crate::models::attempt::Attempt;
use crate::models::quiz::Quiz;
use crate::services::grading_service::GradeOutcome;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptSort {
    #[default]
    SubmittedAt,
    Score,
}

#[derive(Debug, Default)]
pub struct AttemptFilter {
    pub passed: Option<bool>,
    pub search: Option<String>,
    pub sort: AttemptSort,
}

const ATTEMPT_COLUMNS: &str = "id, quiz_id, student_name, student_email, answers, \
     earned_points, max_points, passed, submitted_at";

#[derive(Clone)]
pub struct AttemptService {
    pool: PgPool,
}

impl AttemptService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn record_attempt(
        &self,
        quiz: &Quiz,
        student_name: &str,
        student_email: &str,
        outcome: &GradeOutcome,
    ) -> Result<Attempt> {
        let passed = passed_quiz(quiz, outcome.earned_points, outcome.max_points);
        let answers = serde_json::Value::Array(outcome.breakdown.clone());

        let attempt = sqlx::query_as::<_, Attempt>(&format!(
            r#"
            INSERT INTO attempts (quiz_id, student_name, student_email, answers, earned_points, max_points, passed)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ATTEMPT_COLUMNS}
            "#
        ))
        .bind(quiz.id)
        .bind(student_name)
        .bind(student_email)
        .bind(answers)
        .bind(outcome.earned_points)
        .bind(outcome.max_points)
        .bind(passed)
        .fetch_one(&self.pool)
        .await?;

        Ok(attempt)
    }

    pub async fn list_attempts(&self, quiz_id: Uuid, filter: AttemptFilter) -> Result<Vec<Attempt>> {
        let search = filter.search.map(|s| format!("%{}%", s));
        let order_by = match filter.sort {
            AttemptSort::SubmittedAt => "submitted_at DESC",
            AttemptSort::Score => "earned_points DESC, submitted_at DESC",
        };

        let attempts = sqlx::query_as::<_, Attempt>(&format!(
            r#"
            SELECT {ATTEMPT_COLUMNS} FROM attempts
            WHERE quiz_id = $1
              AND ($2::bool IS NULL OR passed = $2)
              AND ($3::text IS NULL OR (student_name ILIKE $3 OR student_email ILIKE $3))
            ORDER BY {order_by}
            "#
        ))
        .bind(quiz_id)
        .bind(filter.passed)
        .bind(&search)
        .fetch_all(&self.pool)
        .await?;

        Ok(attempts)
    }
}

/// An attempt passes when its percentage clears the quiz passing score.
/// A quiz with no gradable points never passes.
pub fn passed_quiz(quiz: &Quiz, earned_points: i32, max_points: i32) -> bool {
    if max_points <= 0 {
        return false;
    }
    let percentage = Decimal::from(earned_points) * Decimal::from(100) / Decimal::from(max_points);
    percentage >= quiz.passing_score
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn quiz_with_passing_score(passing_score: Decimal) -> Quiz {
        Quiz {
            id: Uuid::new_v4(),
            title: "Midterm".to_string(),
            description: None,
            duration_minutes: 60,
            passing_score,
            shuffle_questions: false,
            is_active: true,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn pass_threshold_is_inclusive() {
        let quiz = quiz_with_passing_score(Decimal::from(70));
        assert!(passed_quiz(&quiz, 7, 10));
        assert!(passed_quiz(&quiz, 10, 10));
        assert!(!passed_quiz(&quiz, 6, 10));
    }

    #[test]
    fn empty_quiz_never_passes() {
        let quiz = quiz_with_passing_score(Decimal::from(0));
        assert!(!passed_quiz(&quiz, 0, 0));
    }

    #[test]
    fn fractional_percentages_compare_exactly() {
        let quiz = quiz_with_passing_score(Decimal::new(665, 1)); // 66.5
        assert!(passed_quiz(&quiz, 2, 3)); // 66.66...%
        assert!(!passed_quiz(&quiz, 1, 3));
    }
}
