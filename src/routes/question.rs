use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::question_dto::{CreateQuestionPayload, UpdateQuestionPayload},
    error::{Error, Result},
    models::question::QuestionKind,
    services::question_service::QuestionService,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/admin/quizzes/{id}/questions",
    params(("id" = Uuid, Path, description = "Quiz ID")),
    request_body = CreateQuestionPayload,
    responses(
        (status = 201, description = "Question created successfully"),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Quiz not found")
    )
)]
#[axum::debug_handler]
pub async fn create_question(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
    Json(payload): Json<CreateQuestionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let bundle = state.question_service.create_question(quiz_id, payload).await?;
    Ok((StatusCode::CREATED, Json(bundle)))
}

#[utoipa::path(
    get,
    path = "/api/admin/quizzes/{id}/questions",
    params(("id" = Uuid, Path, description = "Quiz ID")),
    responses((status = 200, description = "Questions in display order"))
)]
#[axum::debug_handler]
pub async fn list_questions(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let questions = state.question_service.list_questions(quiz_id).await?;
    Ok(Json(questions))
}

#[utoipa::path(
    get,
    path = "/api/admin/questions/{id}",
    params(("id" = Uuid, Path, description = "Question ID")),
    responses(
        (status = 200, description = "Question with parameters, test cases and driver code"),
        (status = 404, description = "Question not found")
    )
)]
#[axum::debug_handler]
pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let bundle = state.question_service.get_question(id).await?;
    Ok(Json(bundle))
}

#[utoipa::path(
    patch,
    path = "/api/admin/questions/{id}",
    params(("id" = Uuid, Path, description = "Question ID")),
    request_body = UpdateQuestionPayload,
    responses(
        (status = 200, description = "Question updated; parameters and test cases replaced"),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Question not found")
    )
)]
#[axum::debug_handler]
pub async fn update_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuestionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let bundle = state.question_service.update_question(id, payload).await?;
    Ok(Json(bundle))
}

#[utoipa::path(
    delete,
    path = "/api/admin/questions/{id}",
    params(("id" = Uuid, Path, description = "Question ID")),
    responses(
        (status = 204, description = "Question deleted successfully"),
        (status = 404, description = "Question not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    if !state.question_service.delete_question(id).await? {
        return Err(Error::NotFound("Question not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/admin/questions/{id}/driver",
    params(("id" = Uuid, Path, description = "Question ID")),
    responses(
        (status = 200, description = "Driver code regenerated and stored"),
        (status = 400, description = "Missing prerequisites or invalid test case input"),
        (status = 502, description = "Generator failure")
    )
)]
#[axum::debug_handler]
pub async fn generate_driver_code(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let bundle = state.question_service.get_question(id).await?;
    if bundle.question.kind != QuestionKind::Coding {
        return Err(Error::BadRequest(
            "Driver code can only be generated for coding questions".to_string(),
        ));
    }

    let editor = QuestionService::editor_for(&bundle)?;
    let request = editor.generation_request()?;
    let driver = state.generator_service.generate_driver(id, &request).await?;
    state.question_service.save_driver_code(&driver).await?;
    Ok(Json(driver))
}
