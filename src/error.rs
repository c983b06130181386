use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Excel export error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    // Test-data editor taxonomy
    #[error("Malformed test case input: {0}")]
    MalformedInput(String),

    #[error("Test case is missing a value for parameter '{0}'")]
    MissingParameter(String),

    #[error("Duplicate parameter name '{0}'")]
    DuplicateParameter(String),

    #[error("Missing information: {0}")]
    MissingInformation(String),

    #[error("Test case input is not valid JSON: {0}")]
    InvalidTestCaseInput(String),

    #[error("Driver generator returned an unexpected response shape")]
    InvalidGeneratorResponse,

    #[error("Driver generation failed: {0}")]
    GenerationFailed(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Database(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            Error::Json(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Reqwest(err) => (
                StatusCode::BAD_GATEWAY,
                format!("External service error: {}", err),
            ),
            Error::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            Error::Xlsx(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Export error: {}", err),
            ),
            Error::Anyhow(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            err @ (Error::MalformedInput(_)
            | Error::MissingParameter(_)
            | Error::DuplicateParameter(_)
            | Error::MissingInformation(_)
            | Error::InvalidTestCaseInput(_)) => (StatusCode::BAD_REQUEST, err.to_string()),
            err @ (Error::InvalidGeneratorResponse | Error::GenerationFailed(_)) => {
                (StatusCode::BAD_GATEWAY, err.to_string())
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

// Stored type tags are validated on write; a bad one surfacing on read is
// data corruption, not caller error.
impl From<crate::models::param_type::UnknownTypeTag> for Error {
    fn from(err: crate::models::param_type::UnknownTypeTag) -> Self {
        Error::Internal(err.to_string())
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            other => Error::Database(other),
        }
    }
}
