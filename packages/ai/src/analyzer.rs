// ABOUTME: Per-frame story generation pipeline: download render, encode, prompt, normalize
// ABOUTME: Frames that fail at any step are logged and skipped so the batch still yields stories

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

use figstory_core::{Frame, UserStory};

use crate::normalizer::parse_user_stories;
use crate::prompts::frame_analysis_prompt;
use crate::service::{create_client, AIServiceError, AIServiceResult, StoryGenerator};

pub struct FrameAnalyzer<'a> {
    generator: &'a dyn StoryGenerator,
    http: Client,
}

impl<'a> FrameAnalyzer<'a> {
    pub fn new(generator: &'a dyn StoryGenerator, download_timeout: Duration) -> AIServiceResult<Self> {
        Ok(Self {
            generator,
            http: create_client(download_timeout)?,
        })
    }

    /// Fetch a rendered frame image and return it base64-encoded
    pub async fn download_image(&self, url: &str) -> AIServiceResult<String> {
        if url.trim().is_empty() {
            return Err(AIServiceError::ImageUnavailable("no image URL".to_string()));
        }

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AIServiceError::ImageUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AIServiceError::ImageUnavailable(format!(
                "image download returned {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AIServiceError::ImageUnavailable(e.to_string()))?;

        let encoded = STANDARD.encode(&bytes);
        info!("Image converted to base64, size: {} characters", encoded.len());
        Ok(encoded)
    }

    /// Generate stories for a single frame
    pub async fn analyze_frame(
        &self,
        frame: &Frame,
        context: Option<&str>,
    ) -> AIServiceResult<Vec<UserStory>> {
        info!("Processing frame: {} ({})", frame.name, frame.id);

        let image = self.download_image(&frame.image_url).await?;
        let prompt = frame_analysis_prompt(&frame_context(frame, context));
        let raw = self.generator.generate(&prompt, &[image]).await?;

        let stories = parse_user_stories(&raw);
        info!("Generated {} stories for frame {}", stories.len(), frame.name);
        Ok(stories)
    }

    /// Generate stories for every frame in order, skipping frames that fail
    pub async fn analyze_frames(&self, frames: &[Frame], context: Option<&str>) -> Vec<UserStory> {
        let mut all_stories = Vec::new();

        for frame in frames {
            match self.analyze_frame(frame, context).await {
                Ok(stories) => all_stories.extend(stories),
                Err(e) => warn!("Skipping frame {} ({}): {}", frame.name, frame.id, e),
            }
        }

        all_stories
    }
}

/// Frame description line, followed by the caller's context when given
pub fn frame_context(frame: &Frame, context: Option<&str>) -> String {
    match context.map(str::trim).filter(|c| !c.is_empty()) {
        Some(extra) => format!("{}\n{}", frame.context_line(), extra),
        None => frame.context_line(),
    }
}
