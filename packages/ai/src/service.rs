// ABOUTME: Story generation service contract shared by the local and cloud backends
// ABOUTME: Provider selection from an injected config, error taxonomy and HTTP client setup

use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

use figstory_config::defaults;

use crate::ollama::OllamaGenerator;
use crate::openai::OpenAiGenerator;

#[derive(Debug, Error)]
pub enum AIServiceError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Generation backend unreachable: {0}")]
    Unreachable(String),

    #[error("Generation request timed out")]
    Timeout,

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("No API key configured")]
    NoApiKey,

    #[error("Unknown AI provider: {0}")]
    UnknownProvider(String),

    #[error("Frame image unavailable: {0}")]
    ImageUnavailable(String),
}

pub type AIServiceResult<T> = Result<T, AIServiceError>;

impl AIServiceError {
    /// Classify a transport failure the way callers need to report it
    pub(crate) fn from_transport(backend: &str, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            error!("{} request timed out", backend);
            AIServiceError::Timeout
        } else if e.is_connect() {
            error!("Failed to connect to {}: {}", backend, e);
            AIServiceError::Unreachable(e.to_string())
        } else {
            error!("{} request failed: {}", backend, e);
            AIServiceError::RequestFailed(e)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    Ollama,
    OpenAi,
}

impl FromStr for AiProvider {
    type Err = AIServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(AiProvider::Ollama),
            "openai" => Ok(AiProvider::OpenAi),
            _ => Err(AIServiceError::UnknownProvider(s.to_string())),
        }
    }
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiProvider::Ollama => write!(f, "ollama"),
            AiProvider::OpenAi => write!(f, "openai"),
        }
    }
}

/// Generation backend settings, passed explicitly to every generator
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub provider: AiProvider,
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub ollama_vision_model: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::Ollama,
            ollama_base_url: defaults::OLLAMA_BASE_URL.to_string(),
            ollama_model: defaults::OLLAMA_MODEL.to_string(),
            ollama_vision_model: defaults::OLLAMA_VISION_MODEL.to_string(),
            openai_api_key: None,
            openai_model: defaults::OPENAI_MODEL.to_string(),
            openai_base_url: defaults::OPENAI_BASE_URL.to_string(),
            timeout: Duration::from_secs(defaults::AI_TIMEOUT_SECS),
        }
    }
}

impl GenerationConfig {
    /// Base URL of the selected backend
    pub fn endpoint(&self) -> &str {
        match self.provider {
            AiProvider::Ollama => &self.ollama_base_url,
            AiProvider::OpenAi => &self.openai_base_url,
        }
    }
}

/// A backend that turns a prompt (plus optional base64 images) into free-form text
#[async_trait]
pub trait StoryGenerator: Send + Sync {
    /// Single non-streaming request; returns the model's complete text
    async fn generate(&self, prompt: &str, images: &[String]) -> AIServiceResult<String>;

    /// Reachability probe; never fails, only reports
    async fn is_healthy(&self) -> bool;

    /// Base URL of the backend, for health reporting
    fn endpoint(&self) -> &str;

    fn provider(&self) -> AiProvider;
}

/// Build the generator selected by `config.provider`
pub fn build_generator(config: &GenerationConfig) -> AIServiceResult<Box<dyn StoryGenerator>> {
    info!("Using {} generation backend", config.provider);
    match config.provider {
        AiProvider::Ollama => Ok(Box::new(OllamaGenerator::new(config)?)),
        AiProvider::OpenAi => Ok(Box::new(OpenAiGenerator::new(config)?)),
    }
}

/// Create HTTP client with timeout configuration
pub(crate) fn create_client(timeout: Duration) -> AIServiceResult<Client> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .build()
        .map_err(AIServiceError::RequestFailed)
}

/// Turn a non-success response into an `ApiError`
pub(crate) async fn error_from_response(backend: &str, response: reqwest::Response) -> AIServiceError {
    let status = response.status();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    error!("{} API error: {} - {}", backend, status, message);
    AIServiceError::ApiError {
        status: status.as_u16(),
        message,
    }
}
