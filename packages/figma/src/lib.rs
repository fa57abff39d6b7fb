// ABOUTME: Figma integration for Figstory
// ABOUTME: REST client, design tree walker, frame extraction and the import policy

pub mod client;
pub mod error;
pub mod extractor;
pub mod importer;
pub mod node;
pub mod walker;

pub use client::{alternate_node_id, FigmaApi, FigmaClient, FigmaConfig};
pub use error::{FigmaError, FigmaResult};
pub use extractor::{
    extract_frames, extract_frames_limited, preview_frames, screen_names, with_images,
    FrameExtraction,
};
pub use importer::{FrameImporter, ImportOutcome, ImportStrategy};
pub use node::{BoundingBox, DesignNode, FileResponse, FRAME_LIKE_TYPES};
