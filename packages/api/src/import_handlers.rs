// ABOUTME: Frame import endpoint backed by the Figma importer
// ABOUTME: Returns the frame list with total/returned counts in response headers

use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::info;

use figstory_figma::{FigmaClient, FrameImporter};

use crate::error::{ApiResult, AppError};
use crate::state::AppState;

pub const FRAMES_TOTAL_HEADER: &str = "x-frames-total";
pub const FRAMES_RETURNED_HEADER: &str = "x-frames-returned";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    #[serde(default)]
    pub file_id: Option<String>,
    #[serde(default)]
    pub node_id: Option<String>,
}

/// POST /import
pub async fn import_frames(
    State(state): State<AppState>,
    payload: Result<Json<ImportRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = payload?;
    let file_id = request
        .file_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::validation("File ID is required"))?;

    let figma_config = &state.config.figma;
    let client = FigmaClient::new(figma_config)?;
    let outcome = FrameImporter::new(&client, figma_config)
        .import(file_id, request.node_id.as_deref())
        .await?;

    info!(
        "Imported {} of {} frames from {} ({:?})",
        outcome.frames.len(),
        outcome.total_found,
        file_id,
        outcome.strategy
    );

    let headers = [
        (FRAMES_TOTAL_HEADER, outcome.total_found.to_string()),
        (FRAMES_RETURNED_HEADER, outcome.frames.len().to_string()),
    ];

    Ok((headers, Json(outcome.frames)))
}
