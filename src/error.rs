use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Session expired")]
    SessionExpired,

    #[error("Invalid decision")]
    InvalidDecision,

    #[error("Scenario index {0} out of range")]
    OutOfRange(usize),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::SessionExpired => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Session expired", "redirect": "/" })),
            )
                .into_response(),

            AppError::InvalidDecision => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Decision must be 'yes' or 'no'" })),
            )
                .into_response(),

            AppError::OutOfRange { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
            }
        }
    }
}
