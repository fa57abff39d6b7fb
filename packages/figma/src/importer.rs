// ABOUTME: Import policy for a Figma file: specific node first, then whole file, then shallow fallback
// ABOUTME: Produces the frame list returned by the import endpoint together with frame counts

use tracing::{info, warn};

use figstory_core::Frame;

use crate::client::{FigmaApi, FigmaConfig};
use crate::error::{FigmaError, FigmaResult};
use crate::extractor::{extract_frames_limited, preview_frames, with_images};
use crate::node::DesignNode;
use crate::walker;

/// Which path produced the imported frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStrategy {
    SpecificNode,
    FullFile,
    MetadataOnly,
}

#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub frames: Vec<Frame>,
    pub total_found: usize,
    pub strategy: ImportStrategy,
}

pub struct FrameImporter<'a> {
    api: &'a dyn FigmaApi,
    max_frames: usize,
    batch_size: usize,
}

impl<'a> FrameImporter<'a> {
    pub fn new(api: &'a dyn FigmaApi, config: &FigmaConfig) -> Self {
        Self {
            api,
            max_frames: config.max_frames,
            batch_size: config.image_batch_size,
        }
    }

    /// Import frames for `file_id`, narrowing to `node_id` when given.
    ///
    /// A failing node lookup falls back once to the whole-file import.
    pub async fn import(&self, file_id: &str, node_id: Option<&str>) -> FigmaResult<ImportOutcome> {
        let file_id = file_id.trim();
        if file_id.is_empty() {
            return Err(FigmaError::InvalidInput("File ID is required".to_string()));
        }

        if let Some(node_id) = node_id.map(str::trim).filter(|n| !n.is_empty()) {
            match self.import_node(file_id, node_id).await {
                Ok(frame) => {
                    info!("Successfully got specific frame {}", node_id);
                    return Ok(ImportOutcome {
                        frames: vec![frame],
                        total_found: 1,
                        strategy: ImportStrategy::SpecificNode,
                    });
                }
                Err(e) => {
                    warn!("Failed to get specific frame {}: {}", node_id, e);
                    info!("Falling back to full file import");
                }
            }
        }

        self.import_file(file_id).await
    }

    async fn import_node(&self, file_id: &str, node_id: &str) -> FigmaResult<Frame> {
        let node = self.api.fetch_node(file_id, node_id).await?;

        let mut frame = match node.to_frame() {
            Some(frame) => frame,
            None => {
                // Node payloads normally carry their id; fall back to the requested one
                let mut node = node;
                node.id = Some(node_id.replace('-', ":"));
                node.to_frame()
                    .ok_or_else(|| FigmaError::InvalidResponse("node without id".to_string()))?
            }
        };

        match self.api.fetch_images(file_id, &[frame.id.clone()]).await {
            Ok(images) => {
                if let Some(url) = images.get(&frame.id) {
                    frame.image_url = url.clone();
                }
            }
            Err(e) => warn!("Failed to get frame image: {}", e),
        }

        if frame.has_image() {
            match self.api.fetch_image_size(&frame.image_url).await {
                Ok(size) => frame.file_size = size,
                Err(e) => warn!("Failed to get image size: {}", e),
            }
        }

        Ok(frame)
    }

    async fn import_file(&self, file_id: &str) -> FigmaResult<ImportOutcome> {
        match self.api.fetch_file(file_id).await {
            Ok(file) => {
                let extraction = extract_frames_limited(&file.document, self.max_frames);
                let frames =
                    with_images(self.api, extraction.frames, file_id, self.batch_size, true).await;
                Ok(ImportOutcome {
                    frames,
                    total_found: extraction.total_found,
                    strategy: ImportStrategy::FullFile,
                })
            }
            Err(FigmaError::OversizedResponse { declared, limit }) => {
                warn!(
                    "File {} too large ({} > {} bytes), importing frame names without images",
                    file_id, declared, limit
                );
                let file = self.api.fetch_file_metadata_only(file_id).await?;
                let frames = preview_frames(&file.document, self.max_frames);
                let total_found = walker::count(&file.document, DesignNode::is_frame_with_id);
                if total_found > frames.len() {
                    warn!(
                        "Showing {} of {} frames from the shallow file listing",
                        frames.len(),
                        total_found
                    );
                }
                Ok(ImportOutcome {
                    total_found,
                    frames,
                    strategy: ImportStrategy::MetadataOnly,
                })
            }
            Err(e) => Err(e),
        }
    }
}
