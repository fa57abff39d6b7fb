// ABOUTME: Error types for the Figma client and importer
// ABOUTME: Stable classification of failures with user-presentable messages

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FigmaError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Figma access token not configured")]
    Unconfigured,

    #[error("Figma API returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Request to Figma timed out")]
    Timeout,

    #[error("Response of {declared} bytes exceeds the {limit} byte limit")]
    OversizedResponse { declared: u64, limit: u64 },

    #[error("Frame with ID {node_id} not found. Available nodes: {}", format_available(.available))]
    NodeNotFound {
        node_id: String,
        available: Vec<String>,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type FigmaResult<T> = Result<T, FigmaError>;

fn format_available(available: &[String]) -> String {
    if available.is_empty() {
        "none".to_string()
    } else {
        available.join(", ")
    }
}

impl FigmaError {
    /// Message safe to show to the person who pasted the link
    pub fn user_message(&self) -> String {
        match self {
            FigmaError::InvalidInput(msg) => msg.clone(),
            FigmaError::Unconfigured => {
                "Figma access token not configured. Please add FIGMA_ACCESS_TOKEN to your environment"
                    .to_string()
            }
            FigmaError::Upstream { status: 401, .. } => {
                "Invalid Figma access token. Please check your token.".to_string()
            }
            FigmaError::Upstream { status: 403, .. } => {
                "Access denied. Make sure you have access to this Figma file.".to_string()
            }
            FigmaError::Upstream { status: 404, .. } => {
                "Figma file not found. Please check the file ID.".to_string()
            }
            FigmaError::Upstream { status, .. } => format!("Figma API error ({})", status),
            FigmaError::Timeout => {
                "Request timeout. The Figma file may be too large or the API is slow to respond."
                    .to_string()
            }
            FigmaError::OversizedResponse { .. } => {
                "The Figma file is too large to process. Please try with a smaller file or fewer frames."
                    .to_string()
            }
            FigmaError::NodeNotFound { .. } => self.to_string(),
            FigmaError::Network(_) => "Could not reach the Figma API".to_string(),
            FigmaError::InvalidResponse(_) => "Unexpected response from the Figma API".to_string(),
        }
    }

    /// Upstream HTTP status, if Figma answered with one
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            FigmaError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FigmaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FigmaError::Timeout
        } else if err.is_decode() {
            FigmaError::InvalidResponse(err.to_string())
        } else {
            FigmaError::Network(err.to_string())
        }
    }
}
