/*
 * Responsibility
 * - アプリ共通の AppError 定義 (handler 用)
 * - AuthRejection: access gate の拒否レスポンス (常に 401, 固定形の JSON)
 * - IntoResponse 実装 (HTTP status / JSON error body)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{resource} not found."),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        tracing::error!(error = ?e, "repository failure");
        AppError::Internal
    }
}

/// Body of every access-gate rejection.
///
/// `{ "success": false, "message": "You are not authorized", "error": { "message": "<reason>" } }`
#[derive(Debug, Serialize)]
pub struct RejectionBody {
    pub success: bool,
    pub message: &'static str,
    pub error: RejectionReason,
}

#[derive(Debug, Serialize)]
pub struct RejectionReason {
    pub message: String,
}

/// Access gate refusal. Every cause maps to 401; only `error.message` varies.
#[derive(Debug)]
pub struct AuthRejection {
    reason: String,
}

impl AuthRejection {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = RejectionBody {
            success: false,
            message: "You are not authorized",
            error: RejectionReason {
                message: self.reason,
            },
        };

        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}
