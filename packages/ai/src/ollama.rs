// ABOUTME: Local model-serving backend speaking the Ollama generate API
// ABOUTME: Non-streaming generation with optional images and a tags-based health probe

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::service::{
    create_client, error_from_response, AIServiceError, AIServiceResult, AiProvider,
    GenerationConfig, StoryGenerator,
};

const BACKEND: &str = "Ollama";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    images: &'a [String],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

pub struct OllamaGenerator {
    client: Client,
    base_url: String,
    text_model: String,
    vision_model: String,
}

impl OllamaGenerator {
    pub fn new(config: &GenerationConfig) -> AIServiceResult<Self> {
        Ok(Self {
            client: create_client(config.timeout)?,
            base_url: config.ollama_base_url.trim_end_matches('/').to_string(),
            text_model: config.ollama_model.clone(),
            vision_model: config.ollama_vision_model.clone(),
        })
    }

    /// Vision model when images are attached, text model otherwise
    fn model_for(&self, images: &[String]) -> &str {
        if images.is_empty() {
            &self.text_model
        } else {
            &self.vision_model
        }
    }
}

#[async_trait]
impl StoryGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str, images: &[String]) -> AIServiceResult<String> {
        let model = self.model_for(images);
        info!(
            "Calling Ollama generate with model {} ({} image(s))",
            model,
            images.len()
        );

        let request = GenerateRequest {
            model,
            prompt,
            images,
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| AIServiceError::from_transport(BACKEND, e))?;

        if !response.status().is_success() {
            return Err(error_from_response(BACKEND, response).await);
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AIServiceError::ParseError(e.to_string()))?;

        debug!("Ollama returned {} characters", body.response.len());
        Ok(body.response)
    }

    async fn is_healthy(&self) -> bool {
        match self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Ollama health probe failed: {}", e);
                false
            }
        }
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }

    fn provider(&self) -> AiProvider {
        AiProvider::Ollama
    }
}
