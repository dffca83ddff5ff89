// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::message::{ChatReply, ErrorBody};
use crate::services::gemini::UpstreamError;

/// Shown to the caller whenever the upstream call fails. Detail stays in the logs.
pub const UPSTREAM_FAILURE_FALLBACK: &str =
    "Maaf, terjadi kesalahan teknis fatal. Priono Teknik AC tidak dapat merespons saat ini.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("{0}")]
    BadRequest(String),

    #[error("upstream call failed: {0}")]
    Upstream(#[from] UpstreamError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                Json(ErrorBody {
                    error: "Method Not Allowed".to_string(),
                }),
            )
                .into_response(),
            AppError::BadRequest(reason) => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody { error: reason })).into_response()
            }
            AppError::Upstream(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatReply {
                    response: UPSTREAM_FAILURE_FALLBACK.to_string(),
                }),
            )
                .into_response(),
        }
    }
}
