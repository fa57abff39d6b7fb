// ABOUTME: Server and upstream configuration loaded from environment variables
// ABOUTME: Validates numbers, port range and provider name before anything starts

use std::env;
use std::net::IpAddr;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use figstory_ai::{AiProvider, GenerationConfig};
use figstory_api::ServiceConfig;
use figstory_config::{constants, defaults};
use figstory_figma::FigmaConfig;

const BYTES_PER_MB: u64 = 1024 * 1024;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid host address: {0}")]
    InvalidHost(String),
    #[error("Invalid value for {name}: {value}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("Unknown AI provider: {0} (expected 'ollama' or 'openai')")]
    InvalidProvider(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub cors_origin: String,
    pub static_dir: Option<PathBuf>,
    pub service: ServiceConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port_str = env::var(constants::PORT).unwrap_or_else(|_| defaults::PORT.to_string());
        let port = port_str.trim().parse::<u16>()?;

        // Validate port is in valid range
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let host_str = env::var(constants::HOST).unwrap_or_else(|_| defaults::HOST.to_string());
        let host = host_str
            .trim()
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::InvalidHost(host_str.clone()))?;

        let cors_origin =
            env::var(constants::CORS_ORIGIN).unwrap_or_else(|_| defaults::CORS_ORIGIN.to_string());

        let static_dir = non_empty_var(constants::STATIC_DIR).map(PathBuf::from);

        Ok(Config {
            host,
            port,
            cors_origin,
            static_dir,
            service: ServiceConfig {
                figma: figma_from_env()?,
                generation: generation_from_env()?,
            },
        })
    }
}

fn figma_from_env() -> Result<FigmaConfig, ConfigError> {
    // FIGMA_TOKEN is the older name, still honoured
    let access_token =
        non_empty_var(constants::FIGMA_ACCESS_TOKEN).or_else(|| non_empty_var(constants::FIGMA_TOKEN));

    let max_response_mb = number_var(
        constants::FIGMA_MAX_RESPONSE_MB,
        defaults::FIGMA_MAX_RESPONSE_MB,
    )?;
    let max_response_bytes = max_response_mb
        .checked_mul(BYTES_PER_MB)
        .ok_or_else(|| ConfigError::InvalidNumber {
            name: constants::FIGMA_MAX_RESPONSE_MB,
            value: max_response_mb.to_string(),
        })?;

    Ok(FigmaConfig {
        access_token,
        api_url: non_empty_var(constants::FIGMA_API_URL)
            .unwrap_or_else(|| defaults::FIGMA_API_URL.to_string()),
        timeout: Duration::from_secs(number_var(
            constants::FIGMA_TIMEOUT_SECS,
            defaults::FIGMA_TIMEOUT_SECS,
        )?),
        max_response_bytes,
        max_frames: number_var(constants::FIGMA_MAX_FRAMES, defaults::FIGMA_MAX_FRAMES)?,
        image_batch_size: number_var(
            constants::FIGMA_IMAGE_BATCH_SIZE,
            defaults::FIGMA_IMAGE_BATCH_SIZE,
        )?,
    })
}

fn generation_from_env() -> Result<GenerationConfig, ConfigError> {
    let provider_str =
        env::var(constants::AI_PROVIDER).unwrap_or_else(|_| defaults::AI_PROVIDER.to_string());
    let provider = provider_str
        .parse::<AiProvider>()
        .map_err(|_| ConfigError::InvalidProvider(provider_str.clone()))?;

    Ok(GenerationConfig {
        provider,
        ollama_base_url: non_empty_var(constants::OLLAMA_BASE_URL)
            .unwrap_or_else(|| defaults::OLLAMA_BASE_URL.to_string()),
        ollama_model: non_empty_var(constants::OLLAMA_MODEL)
            .unwrap_or_else(|| defaults::OLLAMA_MODEL.to_string()),
        ollama_vision_model: non_empty_var(constants::OLLAMA_VISION_MODEL)
            .unwrap_or_else(|| defaults::OLLAMA_VISION_MODEL.to_string()),
        openai_api_key: non_empty_var(constants::OPENAI_API_KEY),
        openai_model: non_empty_var(constants::OPENAI_MODEL)
            .unwrap_or_else(|| defaults::OPENAI_MODEL.to_string()),
        openai_base_url: non_empty_var(constants::OPENAI_BASE_URL)
            .unwrap_or_else(|| defaults::OPENAI_BASE_URL.to_string()),
        timeout: Duration::from_secs(number_var(
            constants::AI_TIMEOUT_SECS,
            defaults::AI_TIMEOUT_SECS,
        )?),
    })
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn number_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match non_empty_var(name) {
        Some(value) => value
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        None => Ok(default),
    }
}
