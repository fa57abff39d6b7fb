// ABOUTME: Core types, session state and utilities for Figstory
// ABOUTME: Foundational package shared by the Figma importer, story generator and API

pub mod figma_url;
pub mod session;
pub mod types;
pub mod utils;

// Re-export main types
pub use types::{Frame, FrameMetadata, Priority, UserStory};

// Re-export session state
pub use session::{
    AnalysisSession, PriorityBreakdown, SessionController, SessionError, SessionPhase,
    SessionSummary,
};

// Re-export utilities
pub use figma_url::{FigmaLink, FigmaUrlError};
pub use utils::{generate_session_id, generate_story_id};
