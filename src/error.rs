use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::repositories::RepoError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("ユーザーIDが空または不正です")]
    InvalidUserId,

    #[error("バリデーションエラー: {0}")]
    Validation(String),

    #[error("ユーザーが見つかりません: {0}")]
    UserNotFound(String),

    #[error("ユーザープロフィールが見つかりません: {0}")]
    UserProfileNotFound(String),

    #[error("{0}")]
    UserAddressNotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("データベースエラー")]
    Database(#[from] sqlx::Error),

    #[error("内部エラー")]
    Internal(#[from] anyhow::Error),
}

/// エラーレスポンス
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status: u16,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidUserId | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::UserNotFound(_) | Self::UserProfileNotFound(_) | Self::UserAddressNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Database(e) => Self::Database(e),
            // 個別の変換はサービス層で行う
            other => Self::Internal(anyhow::Error::new(other)),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<garde::Report> for AppError {
    fn from(report: garde::Report) -> Self {
        Self::Validation(report.to_string().trim_end().to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = ?e, "データベースエラー");
                "内部エラーが発生しました".to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = ?e, "内部エラー");
                "内部エラーが発生しました".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error: status.canonical_reason().unwrap_or_default().to_string(),
            message,
            status: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}
