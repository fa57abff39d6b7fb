// ABOUTME: Shared utility functions for Figstory
// ABOUTME: Identifier generation for sessions and stories

use uuid::Uuid;

/// Generate a unique story id. Ids reported by the model are never trusted.
pub fn generate_story_id() -> String {
    format!("story-{}", Uuid::new_v4().simple())
}

/// Generate a unique analysis session id
pub fn generate_session_id() -> String {
    format!("session-{}", Uuid::new_v4().simple())
}
