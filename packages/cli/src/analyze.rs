// ABOUTME: Headless analysis run: import a Figma link, select frames, generate and summarize
// ABOUTME: Drives the same session state machine and pipeline the HTTP client uses

use anyhow::{anyhow, bail, Context};
use serde::Serialize;
use tracing::info;

use figstory_ai::{build_generator, FrameAnalyzer};
use figstory_api::ServiceConfig;
use figstory_core::{AnalysisSession, FigmaLink, SessionController, SessionSummary};
use figstory_figma::{FigmaClient, FrameImporter};

#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub figma_url: String,
    /// Analyse at most this many frames; all rendered frames when `None`
    pub limit: Option<usize>,
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub session: AnalysisSession,
    pub selected_frame_ids: Vec<String>,
    pub summary: SessionSummary,
}

pub async fn run_analysis(
    config: &ServiceConfig,
    options: &AnalyzeOptions,
) -> anyhow::Result<AnalysisReport> {
    let link = FigmaLink::parse(&options.figma_url).context("Invalid Figma URL")?;

    let client = FigmaClient::new(&config.figma).map_err(|e| anyhow!(e.user_message()))?;
    let outcome = FrameImporter::new(&client, &config.figma)
        .import(&link.file_key, link.node_id.as_deref())
        .await
        .map_err(|e| anyhow!(e.user_message()))?;
    info!(
        "Imported {} of {} frames from {}",
        outcome.frames.len(),
        outcome.total_found,
        link.file_key
    );

    let mut controller = SessionController::new();
    controller.import(link.file_key.clone(), outcome.frames);
    controller.set_context(options.context.clone())?;

    let selection = pick_frames(&controller, options.limit);
    if selection.is_empty() {
        bail!("No frames with rendered images were found in this file");
    }
    controller.set_selection(selection.iter().cloned())?;

    let frames = controller.begin_generation()?;
    let generator = build_generator(&config.generation)?;
    if !generator.is_healthy().await {
        let message = format!(
            "Story generation service is not available at {}",
            generator.endpoint()
        );
        controller.fail_generation(message.clone())?;
        bail!(message);
    }

    let analyzer = FrameAnalyzer::new(generator.as_ref(), config.generation.timeout)?;
    let context = controller.session().and_then(|s| s.context.clone());
    let stories = analyzer.analyze_frames(&frames, context.as_deref()).await;

    if stories.is_empty() {
        controller.fail_generation("Failed to generate any user stories")?;
        bail!("Failed to generate any user stories");
    }
    controller.complete_generation(stories)?;

    let session = controller
        .session()
        .cloned()
        .ok_or_else(|| anyhow!("Session disappeared during generation"))?;

    Ok(AnalysisReport {
        session,
        selected_frame_ids: selection,
        summary: controller.summary(),
    })
}

/// Frames that have a rendered image, in document order, up to `limit`
fn pick_frames(controller: &SessionController, limit: Option<usize>) -> Vec<String> {
    let Some(session) = controller.session() else {
        return Vec::new();
    };
    session
        .frames
        .iter()
        .filter(|f| f.has_image())
        .take(limit.unwrap_or(usize::MAX))
        .map(|f| f.id.clone())
        .collect()
}
