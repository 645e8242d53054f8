use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("No data available for {entity} in {year}")]
    NoDataForSelection { entity: String, year: i32 },

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Generation failure: {0}")]
    GenerationFailure(String),

    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Session limit of {0} reached")]
    SessionLimit(usize),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    fn kind(&self) -> &'static str {
        match self {
            AppError::NoDataForSelection { .. } => "no_data",
            AppError::InvalidSelection(_) => "invalid_selection",
            AppError::GenerationFailure(_) => "generation_failure",
            AppError::SessionNotFound(_) => "session_not_found",
            AppError::SessionLimit(_) => "session_limit",
            _ => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NoDataForSelection { .. } | AppError::SessionNotFound(_) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            AppError::InvalidSelection(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::SessionLimit(_) => {
                tracing::warn!(error = %self, "Rejecting new session");
                (StatusCode::SERVICE_UNAVAILABLE, self.to_string())
            }
            AppError::GenerationFailure(msg) => {
                tracing::error!("Generation failure: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            e => {
                tracing::error!(error = ?e, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "kind": self.kind(),
        }));

        (status, body).into_response()
    }
}

// A query string that does not deserialize is a bad selection, not a plumbing error.
impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidSelection(rejection.body_text())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
