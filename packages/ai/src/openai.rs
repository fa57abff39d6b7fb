// ABOUTME: Cloud chat-completion backend for the story generator
// ABOUTME: Sends the prompt and base64 PNG images as content parts with bearer auth

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::service::{
    create_client, error_from_response, AIServiceError, AIServiceResult, AiProvider,
    GenerationConfig, StoryGenerator,
};

const BACKEND: &str = "OpenAI";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiGenerator {
    pub fn new(config: &GenerationConfig) -> AIServiceResult<Self> {
        let api_key = config
            .openai_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(AIServiceError::NoApiKey)?
            .to_string();

        Ok(Self {
            client: create_client(config.timeout)?,
            api_key,
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            model: config.openai_model.clone(),
        })
    }
}

/// Plain string content for text-only prompts, content parts when images are attached
fn user_content(prompt: &str, images: &[String]) -> Value {
    if images.is_empty() {
        return Value::String(prompt.to_string());
    }

    let mut parts = vec![json!({ "type": "text", "text": prompt })];
    parts.extend(images.iter().map(|image| {
        json!({
            "type": "image_url",
            "image_url": { "url": format!("data:image/png;base64,{}", image) }
        })
    }));
    Value::Array(parts)
}

#[async_trait]
impl StoryGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &str, images: &[String]) -> AIServiceResult<String> {
        info!(
            "Calling OpenAI chat completions with model {} ({} image(s))",
            self.model,
            images.len()
        );

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: user_content(prompt, images),
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AIServiceError::from_transport(BACKEND, e))?;

        if !response.status().is_success() {
            return Err(error_from_response(BACKEND, response).await);
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| AIServiceError::ParseError(e.to_string()))?;

        let text = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        debug!("OpenAI returned {} characters", text.len());
        Ok(text)
    }

    async fn is_healthy(&self) -> bool {
        match self
            .client
            .get(format!("{}/v1/models", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("OpenAI health probe failed: {}", e);
                false
            }
        }
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }

    fn provider(&self) -> AiProvider {
        AiProvider::OpenAi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_only_content_is_a_string() {
        assert_eq!(user_content("hi", &[]), json!("hi"));
    }

    #[test]
    fn test_images_become_data_urls() {
        let content = user_content("describe", &["QUJD".to_string()]);
        assert_eq!(content[0]["text"], "describe");
        assert_eq!(content[1]["image_url"]["url"], "data:image/png;base64,QUJD");
    }
}
