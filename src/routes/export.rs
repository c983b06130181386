use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    dto::attempt_dto::AttemptListQuery,
    error::{Error, Result},
    middleware::auth::Claims,
    models::quiz::Quiz,
    services::attempt_service::AttemptFilter,
    services::export_service::ExportService,
    AppState,
};

async fn owned_quiz(state: &AppState, claims: &Claims, quiz_id: Uuid) -> Result<Quiz> {
    let quiz = state.quiz_service.get_quiz_by_id(quiz_id).await?;
    // Results leave the system here; only the owner may pull them.
    if quiz.created_by != claims.subject_id()? {
        return Err(Error::Unauthorized(
            "Only the quiz owner may export results".to_string(),
        ));
    }
    Ok(quiz)
}

fn filter_from(query: AttemptListQuery) -> AttemptFilter {
    AttemptFilter {
        passed: query.passed,
        search: query.search,
        sort: query.sort.unwrap_or_default(),
    }
}

/// Export a quiz's results as a CSV data URL
#[utoipa::path(
    get,
    path = "/api/admin/quizzes/{id}/export",
    params(
        ("id" = Uuid, Path, description = "Quiz ID"),
        ("passed" = Option<bool>, Query, description = "Filter by pass flag"),
        ("search" = Option<String>, Query, description = "Search by student name or email"),
        ("sort" = Option<String>, Query, description = "submitted_at or score")
    ),
    responses(
        (status = 200, description = "Downloadable data URL with CSV rows"),
        (status = 401, description = "Caller does not own the quiz"),
        (status = 404, description = "Quiz not found")
    )
)]
#[axum::debug_handler]
pub async fn export_results_csv(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<Uuid>,
    Query(query): Query<AttemptListQuery>,
) -> Result<impl IntoResponse> {
    let _quiz = owned_quiz(&state, &claims, quiz_id).await?;
    let attempts = state
        .attempt_service
        .list_attempts(quiz_id, filter_from(query))
        .await?;

    let csv = ExportService::results_csv(&attempts);
    Ok(Json(json!({
        "url": ExportService::csv_data_url(&csv),
        "rows": attempts.len(),
    })))
}

/// Export a quiz's results as an XLSX workbook
#[utoipa::path(
    get,
    path = "/api/admin/quizzes/{id}/export.xlsx",
    params(("id" = Uuid, Path, description = "Quiz ID")),
    responses(
        (status = 200, description = "Workbook attachment"),
        (status = 401, description = "Caller does not own the quiz"),
        (status = 404, description = "Quiz not found")
    )
)]
#[axum::debug_handler]
pub async fn export_results_xlsx(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<Uuid>,
    Query(query): Query<AttemptListQuery>,
) -> Result<impl IntoResponse> {
    let quiz = owned_quiz(&state, &claims, quiz_id).await?;
    let attempts = state
        .attempt_service
        .list_attempts(quiz_id, filter_from(query))
        .await?;

    let buffer = ExportService::results_xlsx(&quiz, &attempts)?;
    let filename = format!(
        "quiz_{}_results_{}.xlsx",
        quiz.title.replace(' ', "_"),
        chrono::Utc::now().format("%Y%m%d")
    );
    let disposition = format!("attachment; filename=\"{}\"", filename);

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string(),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        buffer,
    ))
}
