//! API error handling
//!
//! Author: hephaex@gmail.com

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use relgraph_core::RelgraphError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// API error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Error code
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn internal_error() -> Self {
        Self::new("INTERNAL_ERROR", "Internal server error")
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Invalid request input
    BadRequest(String),
    /// Uploaded document could not be decoded
    Decode(String),
    /// Language model backend failed
    Upstream(String),
    /// Rendering failed
    Render(String),
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Decode(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Render(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_api_error(&self) -> ApiError {
        match self {
            AppError::BadRequest(msg) => ApiError::bad_request(msg.clone()),
            AppError::Decode(msg) => {
                ApiError::new("DECODE_ERROR", "Document could not be read").with_details(msg.clone())
            }
            AppError::Upstream(msg) => {
                ApiError::new("EXTRACTION_ERROR", "Relation extraction failed")
                    .with_details(msg.clone())
            }
            AppError::Render(msg) => {
                ApiError::new("RENDER_ERROR", "Graph rendering failed").with_details(msg.clone())
            }
            AppError::Internal(msg) => ApiError::internal_error().with_details(msg.clone()),
        }
    }

    /// One-line message for the HTML error banner
    pub fn banner_message(&self) -> String {
        let error = self.to_api_error();
        match error.details {
            Some(details) => format!("{}: {details}", error.message),
            None => error.message,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(%status, error = ?self, "Request failed");
        }
        (status, Json(self.to_api_error())).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<RelgraphError> for AppError {
    fn from(err: RelgraphError) -> Self {
        match err {
            RelgraphError::Decode(msg) => AppError::Decode(msg),
            RelgraphError::Validation(msg) => AppError::BadRequest(msg),
            RelgraphError::Extraction(msg) => AppError::Upstream(msg),
            RelgraphError::Render(msg) => AppError::Render(msg),
            RelgraphError::Config(msg) => AppError::Internal(format!("Configuration error: {msg}")),
            RelgraphError::Other(err) => AppError::Internal(err.to_string()),
        }
    }
}
