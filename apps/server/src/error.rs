use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the HTTP layer.
///
/// Two kinds only: a missing/invalid request parameter (400) or a failed
/// upstream call (500). Every upstream failure is collapsed to a fixed
/// per-route message; only the histórico route carries the raw detail text.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{message}")]
    Upstream {
        message: String,
        detail: Option<String>,
    },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        ApiError::Upstream {
            message: message.into(),
            detail: None,
        }
    }

    pub fn upstream_with_detail(message: impl Into<String>, detail: impl Into<String>) -> Self {
        ApiError::Upstream {
            message: message.into(),
            detail: Some(detail.into()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    erro: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detalhes: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    erro: message,
                    detalhes: None,
                },
            ),
            ApiError::Upstream { message, detail } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    erro: message,
                    detalhes: detail,
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
