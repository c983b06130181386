use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::quiz_dto::{CreateQuizPayload, QuizListQuery, UpdateQuizPayload},
    error::Result,
    middleware::auth::Claims,
    services::quiz_service::QuizFilter,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/admin/quizzes",
    request_body = CreateQuizPayload,
    responses(
        (status = 201, description = "Quiz created successfully"),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_quiz(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateQuizPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let created_by = claims.subject_id()?;
    let quiz = state.quiz_service.create_quiz(payload, created_by).await?;
    Ok((StatusCode::CREATED, Json(quiz)))
}

#[utoipa::path(
    get,
    path = "/api/admin/quizzes",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("per_page" = Option<i64>, Query, description = "Items per page"),
        ("is_active" = Option<bool>, Query, description = "Filter by active flag"),
        ("search" = Option<String>, Query, description = "Search query"),
        ("mine" = Option<bool>, Query, description = "Only quizzes owned by the caller")
    ),
    responses(
        (status = 200, description = "Paginated quiz listing")
    )
)]
#[axum::debug_handler]
pub async fn list_quizzes(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<QuizListQuery>,
) -> Result<impl IntoResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let created_by = if query.mine.unwrap_or(false) {
        Some(claims.subject_id()?)
    } else {
        None
    };
    let filter = QuizFilter {
        is_active: query.is_active,
        created_by,
        search: query.search,
    };
    let result = state.quiz_service.list_quizzes(page, per_page, filter).await?;
    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/api/admin/quizzes/{id}",
    params(("id" = Uuid, Path, description = "Quiz ID")),
    responses(
        (status = 200, description = "Quiz found"),
        (status = 404, description = "Quiz not found")
    )
)]
#[axum::debug_handler]
pub async fn get_quiz(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let quiz = state.quiz_service.get_quiz_by_id(id).await?;
    Ok(Json(quiz))
}

#[utoipa::path(
    patch,
    path = "/api/admin/quizzes/{id}",
    params(("id" = Uuid, Path, description = "Quiz ID")),
    request_body = UpdateQuizPayload,
    responses(
        (status = 200, description = "Quiz updated successfully"),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Quiz not found")
    )
)]
#[axum::debug_handler]
pub async fn update_quiz(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuizPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let quiz = state.quiz_service.update_quiz(id, payload).await?;
    Ok(Json(quiz))
}

#[utoipa::path(
    delete,
    path = "/api/admin/quizzes/{id}",
    params(("id" = Uuid, Path, description = "Quiz ID")),
    responses(
        (status = 204, description = "Quiz deleted successfully"),
        (status = 404, description = "Quiz not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_quiz(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    if !state.quiz_service.delete_quiz(id).await? {
        return Err(crate::error::Error::NotFound("Quiz not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
