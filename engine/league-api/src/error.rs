//! Error types for the league API

use league_store::StoreError;
use nfl_stats_sync::SyncError;
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use tracing::error;
use warp::http::StatusCode;
use warp::{Rejection, Reply};

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
    pub timestamp: String,
}

/// Error detail
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>, details: Option<serde_json::Value>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.to_string(),
                message: message.into(),
                details,
            },
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Errors surfaced by the HTTP handlers
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    NotFound { code: &'static str, message: String },

    #[error("{message}")]
    BadRequest { code: &'static str, message: String },

    #[error("Invalid password")]
    Unauthorized,

    #[error("Admin password not configured")]
    AdminNotConfigured,

    #[error("Upstream feed failed: {0}")]
    Upstream(String),

    #[error("Store error: {0}")]
    Store(StoreError),
}

impl warp::reject::Reject for ApiError {}

impl ApiError {
    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::AdminNotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound { code, .. } | ApiError::BadRequest { code, .. } => *code,
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::AdminNotConfigured => "ADMIN_NOT_CONFIGURED",
            ApiError::Upstream(_) => "UPSTREAM_ERROR",
            ApiError::Store(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(message) => ApiError::not_found("NOT_FOUND", message),
            StoreError::DuplicateEvent(message) => {
                ApiError::bad_request("DUPLICATE_EVENT", message)
            }
            other => ApiError::Store(other),
        }
    }
}

impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Store(store) => store.into(),
            upstream => ApiError::Upstream(upstream.to_string()),
        }
    }
}

/// Wrap any handler error as a warp rejection
pub fn reject(err: impl Into<ApiError>) -> Rejection {
    warp::reject::custom(err.into())
}

/// Turn rejections into JSON error responses
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, body) = if let Some(api_error) = err.find::<ApiError>() {
        if api_error.status().is_server_error() {
            error!("Request failed: {}", api_error);
        }
        // Internal details stay in the logs
        let message = match api_error {
            ApiError::Store(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        (
            api_error.status(),
            ErrorResponse::new(api_error.code(), message, None),
        )
    } else if err.is_not_found() {
        (
            StatusCode::NOT_FOUND,
            ErrorResponse::new("NOT_FOUND", "Route not found", None),
        )
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("INVALID_BODY", e.to_string(), None),
        )
    } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("INVALID_QUERY", e.to_string(), None),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            ErrorResponse::new("METHOD_NOT_ALLOWED", "Method not allowed", None),
        )
    } else {
        error!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("INTERNAL_ERROR", "Internal server error", None),
        )
    };

    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}
