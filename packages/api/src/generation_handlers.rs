// ABOUTME: Story generation endpoints and the generation backend health probe
// ABOUTME: Frame-image analysis for selected frames, plus text-only drafting from a Figma link

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use figstory_ai::{build_generator, screen_stories_prompt, FrameAnalyzer};
use figstory_core::{FigmaLink, Frame, UserStory};
use figstory_figma::{screen_names, FigmaApi, FigmaClient};

use crate::error::{ApiResult, AppError};
use crate::state::AppState;

const NO_STORIES_TEXT: &str = "No stories generated.";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub url: String,
    pub timestamp: String,
}

/// GET /health
pub async fn generation_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let config = &state.config.generation;

    let healthy = match build_generator(config) {
        Ok(generator) => generator.is_healthy().await,
        Err(e) => {
            warn!("Generation backend not usable: {}", e);
            false
        }
    };

    Json(HealthResponse {
        healthy,
        url: config.endpoint().to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

#[derive(Debug, Deserialize)]
pub struct GenerateStoriesRequest {
    #[serde(default)]
    pub frames: Vec<Frame>,
    #[serde(default)]
    pub context: Option<String>,
}

/// POST /generate-stories
pub async fn generate_stories(
    State(state): State<AppState>,
    payload: Result<Json<GenerateStoriesRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<UserStory>>> {
    let Json(request) = payload?;
    if request.frames.is_empty() {
        return Err(AppError::validation("Frames are required"));
    }

    let config = &state.config.generation;
    let generator = build_generator(config)?;

    if !generator.is_healthy().await {
        return Err(AppError::GenerationUnavailable(
            generator.endpoint().to_string(),
        ));
    }

    let analyzer = FrameAnalyzer::new(generator.as_ref(), config.timeout)?;
    let stories = analyzer
        .analyze_frames(&request.frames, request.context.as_deref())
        .await;

    if stories.is_empty() {
        return Err(AppError::NoStories);
    }

    info!(
        "Generated {} stories from {} frames",
        stories.len(),
        request.frames.len()
    );
    Ok(Json(stories))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateFromUrlRequest {
    #[serde(default)]
    pub figma_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateFromUrlResponse {
    pub stories: String,
    pub screens: Vec<String>,
}

/// POST /generate-from-url
pub async fn generate_from_url(
    State(state): State<AppState>,
    payload: Result<Json<GenerateFromUrlRequest>, JsonRejection>,
) -> ApiResult<Json<GenerateFromUrlResponse>> {
    let Json(request) = payload?;
    let figma_url = request
        .figma_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| AppError::validation("Figma URL is required"))?;

    let link = FigmaLink::parse(figma_url)?;

    let client = FigmaClient::new(&state.config.figma)?;
    let file = client.fetch_file(&link.file_key).await?;
    let screens = screen_names(&file.document);
    info!("Found {} screens in {}", screens.len(), link.file_key);

    let generator = build_generator(&state.config.generation)?;
    let text = generator
        .generate(&screen_stories_prompt(&screens), &[])
        .await?;

    let stories = if text.trim().is_empty() {
        NO_STORIES_TEXT.to_string()
    } else {
        text
    };

    Ok(Json(GenerateFromUrlResponse { stories, screens }))
}
