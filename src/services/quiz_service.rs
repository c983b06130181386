use crate::dto::quiz_dto::{CreateQuizPayload, UpdateQuizPayload};
use crate::error::{Error, Result};
use crate::models::quiz::Quiz;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, serde::Serialize)]
pub struct PaginatedQuizzes {
    #[serde(rename = "items")]
    pub quizzes: Vec<Quiz>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

#[derive(Debug, Default)]
pub struct QuizFilter {
    pub is_active: Option<bool>,
    pub created_by: Option<Uuid>,
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct QuizService {
    pool: PgPool,
}

const QUIZ_COLUMNS: &str = "id, title, description, duration_minutes, passing_score, \
     shuffle_questions, is_active, created_by, created_at, updated_at";

impl QuizService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_quiz(&self, payload: CreateQuizPayload, created_by: Uuid) -> Result<Quiz> {
        let passing_score = Decimal::from_f64(payload.passing_score)
            .ok_or_else(|| Error::Anyhow(anyhow::anyhow!("Invalid passing score")))?;

        let quiz = sqlx::query_as::<_, Quiz>(&format!(
            r#"
            INSERT INTO quizzes (title, description, duration_minutes, passing_score, shuffle_questions, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {QUIZ_COLUMNS}
            "#
        ))
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(payload.duration_minutes)
        .bind(passing_score)
        .bind(payload.shuffle_questions.unwrap_or(false))
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(quiz)
    }

    pub async fn get_quiz_by_id(&self, quiz_id: Uuid) -> Result<Quiz> {
        let quiz = sqlx::query_as::<_, Quiz>(&format!(
            "SELECT {QUIZ_COLUMNS} FROM quizzes WHERE id = $1"
        ))
        .bind(quiz_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(quiz)
    }

    pub async fn update_quiz(&self, quiz_id: Uuid, payload: UpdateQuizPayload) -> Result<Quiz> {
        let passing_score = match payload.passing_score {
            Some(score) => Some(
                Decimal::from_f64(score)
                    .ok_or_else(|| Error::Anyhow(anyhow::anyhow!("Invalid passing score")))?,
            ),
            None => None,
        };

        let quiz = sqlx::query_as::<_, Quiz>(&format!(
            r#"
            UPDATE quizzes
            SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                duration_minutes = COALESCE($3, duration_minutes),
                passing_score = COALESCE($4, passing_score),
                shuffle_questions = COALESCE($5, shuffle_questions),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
            WHERE id = $7
            RETURNING {QUIZ_COLUMNS}
            "#
        ))
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(payload.duration_minutes)
        .bind(passing_score)
        .bind(payload.shuffle_questions)
        .bind(payload.is_active)
        .bind(quiz_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(quiz)
    }

    pub async fn list_quizzes(
        &self,
        page: i64,
        per_page: i64,
        filter: QuizFilter,
    ) -> Result<PaginatedQuizzes> {
        let offset = (page - 1) * per_page;
        let search = filter.search.map(|s| format!("%{}%", s));

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM quizzes
            WHERE ($1::bool IS NULL OR is_active = $1)
              AND ($2::uuid IS NULL OR created_by = $2)
              AND ($3::text IS NULL OR (title ILIKE $3 OR description ILIKE $3))
            "#,
        )
        .bind(filter.is_active)
        .bind(filter.created_by)
        .bind(&search)
        .fetch_one(&self.pool)
        .await?;

        let total_pages = if per_page > 0 {
            ((total as f64) / (per_page as f64)).ceil() as i64
        } else {
            1
        };

        let quizzes = sqlx::query_as::<_, Quiz>(&format!(
            r#"
            SELECT {QUIZ_COLUMNS} FROM quizzes
            WHERE ($1::bool IS NULL OR is_active = $1)
              AND ($2::uuid IS NULL OR created_by = $2)
              AND ($3::text IS NULL OR (title ILIKE $3 OR description ILIKE $3))
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(filter.is_active)
        .bind(filter.created_by)
        .bind(&search)
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(PaginatedQuizzes {
            quizzes,
            total,
            page,
            per_page,
            total_pages,
        })
    }

    pub async fn delete_quiz(&self, quiz_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(quiz_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
