// ABOUTME: Turns a design document into frame records and enriches them with rendered images
// ABOUTME: Image lookups are batched; a failed batch leaves its frames without images

use futures::future::join_all;
use std::collections::HashMap;
use tracing::{info, warn};

use figstory_core::Frame;

use crate::client::FigmaApi;
use crate::node::DesignNode;
use crate::walker;

/// Frames kept after applying the frame-count cap, plus how many the file had
#[derive(Debug, Clone, PartialEq)]
pub struct FrameExtraction {
    pub frames: Vec<Frame>,
    pub total_found: usize,
}

impl FrameExtraction {
    pub fn truncated(&self) -> bool {
        self.total_found > self.frames.len()
    }
}

/// All frames, components and component sets, in document order
pub fn extract_frames(document: &DesignNode) -> Vec<Frame> {
    walker::collect(document, DesignNode::is_frame_like)
        .into_iter()
        .filter_map(DesignNode::to_frame)
        .collect()
}

/// Like [`extract_frames`], keeping only the first `max_frames`
pub fn extract_frames_limited(document: &DesignNode, max_frames: usize) -> FrameExtraction {
    let mut frames = extract_frames(document);
    let total_found = frames.len();

    if total_found > max_frames {
        warn!(
            "File contains {} frames, limiting to {}",
            total_found, max_frames
        );
        frames.truncate(max_frames);
    }

    FrameExtraction {
        frames,
        total_found,
    }
}

/// Bounded pass over a document: plain frames with ids, stopping after `cap`
pub fn preview_frames(document: &DesignNode, cap: usize) -> Vec<Frame> {
    walker::collect_limited(document, DesignNode::is_frame_with_id, cap)
        .into_iter()
        .filter_map(DesignNode::to_frame)
        .collect()
}

/// Names of every frame-like node, used as the screen list for text prompts
pub fn screen_names(document: &DesignNode) -> Vec<String> {
    walker::collect(document, DesignNode::is_frame_like)
        .into_iter()
        .filter_map(|node| node.name.clone())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Fill `image_url` (and optionally `file_size`) for every frame.
///
/// Batches run one after another. A failing batch is logged and skipped, so
/// its frames keep an empty `image_url` while the rest are still populated.
pub async fn with_images(
    api: &dyn FigmaApi,
    mut frames: Vec<Frame>,
    file_id: &str,
    batch_size: usize,
    fetch_sizes: bool,
) -> Vec<Frame> {
    let batch_size = batch_size.max(1);
    let total_batches = frames.len().div_ceil(batch_size);

    for (index, batch) in frames.chunks_mut(batch_size).enumerate() {
        let ids: Vec<String> = batch.iter().map(|f| f.id.clone()).collect();
        let images = match api.fetch_images(file_id, &ids).await {
            Ok(images) => images,
            Err(e) => {
                warn!(
                    "Failed to get images for batch {}/{}: {}",
                    index + 1,
                    total_batches,
                    e
                );
                continue;
            }
        };

        apply_images(batch, &images);

        if fetch_sizes {
            fill_sizes(api, batch).await;
        }
    }

    let resolved = frames.iter().filter(|f| f.has_image()).count();
    info!("Resolved images for {}/{} frames", resolved, frames.len());
    frames
}

fn apply_images(frames: &mut [Frame], images: &HashMap<String, String>) {
    for frame in frames {
        if let Some(url) = images.get(&frame.id) {
            frame.image_url = url.clone();
        }
    }
}

/// Size lookups within a batch run concurrently; one failure does not affect the others
async fn fill_sizes(api: &dyn FigmaApi, frames: &mut [Frame]) {
    let lookups = frames.iter().map(|frame| async move {
        if !frame.has_image() {
            return None;
        }
        match api.fetch_image_size(&frame.image_url).await {
            Ok(size) => size,
            Err(e) => {
                warn!("Failed to get image size for frame {}: {}", frame.id, e);
                None
            }
        }
    });

    let sizes = join_all(lookups).await;
    for (frame, size) in frames.iter_mut().zip(sizes) {
        if size.is_some() {
            frame.file_size = size;
        }
    }
}
