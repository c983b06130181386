use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::attempt_dto::{AttemptListQuery, SubmitAttemptPayload},
    error::{Error, Result},
    services::attempt_service::AttemptFilter,
    services::grading_service::GradingService,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/public/quizzes/{id}/attempts",
    params(("id" = Uuid, Path, description = "Quiz ID")),
    request_body = SubmitAttemptPayload,
    responses(
        (status = 201, description = "Submission graded and recorded"),
        (status = 400, description = "Invalid payload or inactive quiz"),
        (status = 404, description = "Quiz not found")
    )
)]
#[axum::debug_handler]
pub async fn submit_attempt(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
    Json(payload): Json<SubmitAttemptPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let quiz = state.quiz_service.get_quiz_by_id(quiz_id).await?;
    if !quiz.is_active {
        return Err(Error::BadRequest(
            "Quiz is not accepting submissions".to_string(),
        ));
    }

    let questions = state.question_service.list_questions(quiz_id).await?;
    let outcome = GradingService::grade(&questions, &payload.answers);
    let attempt = state
        .attempt_service
        .record_attempt(&quiz, &payload.student_name, &payload.student_email, &outcome)
        .await?;
    Ok((StatusCode::CREATED, Json(attempt)))
}

#[utoipa::path(
    get,
    path = "/api/admin/quizzes/{id}/attempts",
    params(
        ("id" = Uuid, Path, description = "Quiz ID"),
        ("passed" = Option<bool>, Query, description = "Filter by pass flag"),
        ("search" = Option<String>, Query, description = "Search by student name or email"),
        ("sort" = Option<String>, Query, description = "submitted_at or score")
    ),
    responses(
        (status = 200, description = "Attempts for the quiz"),
        (status = 404, description = "Quiz not found")
    )
)]
#[axum::debug_handler]
pub async fn list_attempts(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
    Query(query): Query<AttemptListQuery>,
) -> Result<impl IntoResponse> {
    let _ = state.quiz_service.get_quiz_by_id(quiz_id).await?;
    let filter = AttemptFilter {
        passed: query.passed,
        search: query.search,
        sort: query.sort.unwrap_or_default(),
    };
    let attempts = state.attempt_service.list_attempts(quiz_id, filter).await?;
    Ok(Json(attempts))
}
