// ABOUTME: API error type mapping domain failures to HTTP status codes and JSON bodies
// ABOUTME: Every error renders as { error, details? } and is logged with a request id

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use figstory_ai::AIServiceError;
use figstory_core::FigmaUrlError;
use figstory_figma::FigmaError;

/// Main application error type that all handlers return
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("Invalid Figma URL: {0}")]
    InvalidUrl(#[from] FigmaUrlError),

    #[error(transparent)]
    Figma(#[from] FigmaError),

    #[error(transparent)]
    Generation(#[from] AIServiceError),

    #[error("Generation backend unavailable at {0}")]
    GenerationUnavailable(String),

    #[error("No user stories were generated")]
    NoStories,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

/// Error body shared by every endpoint
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidBody(_) | AppError::InvalidUrl(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Figma(figma_error) => match figma_error {
                FigmaError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                FigmaError::Unconfigured => StatusCode::INTERNAL_SERVER_ERROR,
                FigmaError::Upstream { status, .. } => {
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
                }
                FigmaError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                FigmaError::OversizedResponse { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                FigmaError::NodeNotFound { .. } => StatusCode::NOT_FOUND,
                FigmaError::Network(_) | FigmaError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
            },
            AppError::Generation(ai_error) => match ai_error {
                AIServiceError::Unreachable(_)
                | AIServiceError::ApiError { .. }
                | AIServiceError::RequestFailed(_) => StatusCode::BAD_GATEWAY,
                AIServiceError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::GenerationUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::NoStories | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-facing message (sanitized for external consumption)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::InvalidBody(_) => "Invalid request body".to_string(),
            AppError::InvalidUrl(_) => "Invalid Figma URL".to_string(),
            AppError::Figma(figma_error) => figma_error.user_message(),
            AppError::Generation(ai_error) => match ai_error {
                AIServiceError::Unreachable(_) => {
                    "AI provider unreachable. Start Ollama on port 11434 or set AI_PROVIDER=openai"
                        .to_string()
                }
                AIServiceError::Timeout => "Story generation timed out".to_string(),
                AIServiceError::NoApiKey => {
                    "AI provider not configured. Please add OPENAI_API_KEY to your environment"
                        .to_string()
                }
                _ => "Failed to generate user stories".to_string(),
            },
            AppError::GenerationUnavailable(_) => {
                "Story generation service is not available. Make sure it's running locally."
                    .to_string()
            }
            AppError::NoStories => "Failed to generate any user stories".to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }

    /// Extra diagnostic text; never carries credentials
    fn details(&self) -> Option<String> {
        match self {
            AppError::InvalidBody(rejection) => Some(rejection.body_text()),
            AppError::InvalidUrl(e) => Some(e.to_string()),
            AppError::Figma(FigmaError::Unconfigured) => Some(
                "Create a .env file in the project root with: FIGMA_ACCESS_TOKEN=your_token_here"
                    .to_string(),
            ),
            AppError::Figma(FigmaError::InvalidInput(_)) => None,
            AppError::Figma(e) => Some(e.to_string()),
            AppError::Generation(e) => Some(e.to_string()),
            AppError::GenerationUnavailable(url) => Some(format!("No response from {}", url)),
            _ => None,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();
        let status_code = self.status_code();

        if status_code.is_server_error() {
            error!(
                request_id = %request_id,
                status = %status_code.as_u16(),
                error = %self,
                "API request failed"
            );
        } else {
            info!(
                request_id = %request_id,
                status = %status_code.as_u16(),
                error = %self,
                "API error response"
            );
        }

        let body = ErrorResponse {
            error: self.user_message(),
            details: self.details(),
        };

        (status_code, Json(body)).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;
