// ABOUTME: Single-user analysis session tying one imported file to its frames and stories
// ABOUTME: Phase transitions Empty -> Imported <-> FramesSelected -> Generating -> Completed

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Frame, Priority, UserStory};
use crate::utils::generate_session_id;

#[derive(Error, Debug, PartialEq)]
pub enum SessionError {
    #[error("No file has been imported yet")]
    NoSession,

    #[error("Frame not found in session: {0}")]
    UnknownFrame(String),

    #[error("Cannot {action} while session is {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: SessionPhase,
    },

    #[error("Select at least one frame before generating stories")]
    NothingSelected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Empty,
    Imported,
    FramesSelected,
    Generating,
    Completed,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SessionPhase::Empty => "empty",
            SessionPhase::Imported => "imported",
            SessionPhase::FramesSelected => "frames_selected",
            SessionPhase::Generating => "generating",
            SessionPhase::Completed => "completed",
        };
        write!(f, "{}", label)
    }
}

/// One imported design file with its frames and the stories generated from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSession {
    pub id: String,
    pub figma_file_id: String,
    pub frames: Vec<Frame>,
    pub user_stories: Vec<UserStory>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl AnalysisSession {
    pub fn new(figma_file_id: impl Into<String>, frames: Vec<Frame>) -> Self {
        Self {
            id: generate_session_id(),
            figma_file_id: figma_file_id.into(),
            frames,
            user_stories: Vec::new(),
            created_at: Utc::now(),
            context: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityBreakdown {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Aggregates shown next to the story list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub total_frames: usize,
    pub selected_frames: usize,
    pub total_stories: usize,
    pub total_story_points: u64,
    pub priorities: PriorityBreakdown,
}

/// Drives an [`AnalysisSession`] through its phases.
///
/// Each import replaces the previous session outright, and each completed
/// generation run replaces `user_stories` wholesale.
#[derive(Debug, Default)]
pub struct SessionController {
    session: Option<AnalysisSession>,
    selected: Vec<String>,
    generating: bool,
    completed: bool,
    last_error: Option<String>,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        match &self.session {
            None => SessionPhase::Empty,
            Some(_) if self.generating => SessionPhase::Generating,
            Some(_) if self.completed => SessionPhase::Completed,
            Some(_) if self.selected.is_empty() => SessionPhase::Imported,
            Some(_) => SessionPhase::FramesSelected,
        }
    }

    pub fn session(&self) -> Option<&AnalysisSession> {
        self.session.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Start over with a freshly imported file, discarding any prior session
    pub fn import(&mut self, figma_file_id: impl Into<String>, frames: Vec<Frame>) -> &AnalysisSession {
        self.selected.clear();
        self.generating = false;
        self.completed = false;
        self.last_error = None;
        self.session.insert(AnalysisSession::new(figma_file_id, frames))
    }

    pub fn set_context(&mut self, context: Option<String>) -> Result<(), SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoSession)?;
        session.context = context.filter(|c| !c.trim().is_empty());
        Ok(())
    }

    pub fn select_frame(&mut self, frame_id: &str) -> Result<(), SessionError> {
        self.ensure_editable("select frames")?;
        self.ensure_known(frame_id)?;
        if !self.selected.iter().any(|id| id == frame_id) {
            self.selected.push(frame_id.to_string());
        }
        self.completed = false;
        Ok(())
    }

    pub fn deselect_frame(&mut self, frame_id: &str) -> Result<(), SessionError> {
        self.ensure_editable("deselect frames")?;
        self.ensure_known(frame_id)?;
        self.selected.retain(|id| id != frame_id);
        self.completed = false;
        Ok(())
    }

    /// Replace the whole selection at once
    pub fn set_selection<I, S>(&mut self, frame_ids: I) -> Result<(), SessionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ensure_editable("select frames")?;
        let ids: Vec<String> = frame_ids.into_iter().map(Into::into).collect();
        for id in &ids {
            self.ensure_known(id)?;
        }
        let mut deduped: Vec<String> = Vec::with_capacity(ids.len());
        for id in ids {
            if !deduped.contains(&id) {
                deduped.push(id);
            }
        }
        self.selected = deduped;
        self.completed = false;
        Ok(())
    }

    /// Selected frames in document order
    pub fn selected_frames(&self) -> Vec<Frame> {
        match &self.session {
            Some(session) => session
                .frames
                .iter()
                .filter(|f| self.selected.contains(&f.id))
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    /// Enter `Generating` and hand back the frames to analyse
    pub fn begin_generation(&mut self) -> Result<Vec<Frame>, SessionError> {
        match self.phase() {
            SessionPhase::Empty => return Err(SessionError::NoSession),
            SessionPhase::Imported => return Err(SessionError::NothingSelected),
            SessionPhase::Generating => {
                return Err(SessionError::InvalidTransition {
                    action: "start generation",
                    phase: SessionPhase::Generating,
                })
            }
            SessionPhase::FramesSelected | SessionPhase::Completed => {}
        }
        self.generating = true;
        self.completed = false;
        self.last_error = None;
        Ok(self.selected_frames())
    }

    pub fn complete_generation(&mut self, stories: Vec<UserStory>) -> Result<(), SessionError> {
        self.ensure_generating("complete generation")?;
        if let Some(session) = self.session.as_mut() {
            session.user_stories = stories;
        }
        self.generating = false;
        self.completed = true;
        Ok(())
    }

    /// Revert to `FramesSelected`, keeping the error for display
    pub fn fail_generation(&mut self, error: impl Into<String>) -> Result<(), SessionError> {
        self.ensure_generating("fail generation")?;
        self.generating = false;
        self.last_error = Some(error.into());
        Ok(())
    }

    pub fn summary(&self) -> SessionSummary {
        let Some(session) = &self.session else {
            return SessionSummary::default();
        };

        let mut priorities = PriorityBreakdown::default();
        for story in &session.user_stories {
            match story.priority {
                Priority::High => priorities.high += 1,
                Priority::Medium => priorities.medium += 1,
                Priority::Low => priorities.low += 1,
            }
        }

        SessionSummary {
            total_frames: session.frames.len(),
            selected_frames: self.selected.len(),
            total_stories: session.user_stories.len(),
            total_story_points: session
                .user_stories
                .iter()
                .map(|s| u64::from(s.story_points))
                .sum(),
            priorities,
        }
    }

    fn ensure_editable(&self, action: &'static str) -> Result<(), SessionError> {
        match self.phase() {
            SessionPhase::Empty => Err(SessionError::NoSession),
            SessionPhase::Generating => Err(SessionError::InvalidTransition {
                action,
                phase: SessionPhase::Generating,
            }),
            _ => Ok(()),
        }
    }

    fn ensure_generating(&self, action: &'static str) -> Result<(), SessionError> {
        let phase = self.phase();
        if phase == SessionPhase::Generating {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition { action, phase })
        }
    }

    fn ensure_known(&self, frame_id: &str) -> Result<(), SessionError> {
        let known = self
            .session
            .as_ref()
            .is_some_and(|s| s.frames.iter().any(|f| f.id == frame_id));
        if known {
            Ok(())
        } else {
            Err(SessionError::UnknownFrame(frame_id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn frames() -> Vec<Frame> {
        vec![
            Frame::new("1:1", "Home", 375.0, 812.0, "FRAME"),
            Frame::new("1:2", "Login", 375.0, 812.0, "FRAME"),
            Frame::new("1:3", "Button", 120.0, 40.0, "COMPONENT"),
        ]
    }

    fn story(points: u32, priority: Priority) -> UserStory {
        UserStory {
            id: format!("story-{}", points),
            title: "Title".to_string(),
            description: "Description".to_string(),
            acceptance_criteria: vec!["Works".to_string()],
            priority,
            story_points: points,
            persona: "End User".to_string(),
            category: "UI Component".to_string(),
        }
    }

    #[test]
    fn test_new_controller_is_empty() {
        let controller = SessionController::new();
        assert_eq!(controller.phase(), SessionPhase::Empty);
        assert!(controller.session().is_none());
        assert_eq!(controller.summary(), SessionSummary::default());
    }

    #[test]
    fn test_import_enters_imported() {
        let mut controller = SessionController::new();
        let session = controller.import("abc123", frames());
        assert_eq!(session.figma_file_id, "abc123");
        assert!(session.user_stories.is_empty());
        assert_eq!(controller.phase(), SessionPhase::Imported);
    }

    #[test]
    fn test_selection_toggles_between_imported_and_selected() {
        let mut controller = SessionController::new();
        controller.import("abc123", frames());

        controller.select_frame("1:2").unwrap();
        assert_eq!(controller.phase(), SessionPhase::FramesSelected);

        controller.deselect_frame("1:2").unwrap();
        assert_eq!(controller.phase(), SessionPhase::Imported);
    }

    #[test]
    fn test_select_unknown_frame_fails() {
        let mut controller = SessionController::new();
        controller.import("abc123", frames());
        assert_eq!(
            controller.select_frame("9:9"),
            Err(SessionError::UnknownFrame("9:9".to_string()))
        );
    }

    #[test]
    fn test_select_without_session_fails() {
        let mut controller = SessionController::new();
        assert_eq!(controller.select_frame("1:1"), Err(SessionError::NoSession));
    }

    #[test]
    fn test_generation_requires_selection() {
        let mut controller = SessionController::new();
        controller.import("abc123", frames());
        assert_eq!(
            controller.begin_generation().unwrap_err(),
            SessionError::NothingSelected
        );
    }

    #[test]
    fn test_selected_frames_follow_document_order() {
        let mut controller = SessionController::new();
        controller.import("abc123", frames());
        controller.set_selection(["1:3", "1:1", "1:3"]).unwrap();

        let ids: Vec<String> = controller.selected_frames().into_iter().map(|f| f.id).collect();
        assert_eq!(ids, vec!["1:1".to_string(), "1:3".to_string()]);
    }

    #[test]
    fn test_successful_generation_completes() {
        let mut controller = SessionController::new();
        controller.import("abc123", frames());
        controller.set_selection(["1:1", "1:2"]).unwrap();

        let to_analyse = controller.begin_generation().unwrap();
        assert_eq!(to_analyse.len(), 2);
        assert_eq!(controller.phase(), SessionPhase::Generating);

        controller
            .complete_generation(vec![story(3, Priority::High), story(5, Priority::Low)])
            .unwrap();
        assert_eq!(controller.phase(), SessionPhase::Completed);

        let summary = controller.summary();
        assert_eq!(summary.total_frames, 3);
        assert_eq!(summary.selected_frames, 2);
        assert_eq!(summary.total_stories, 2);
        assert_eq!(summary.total_story_points, 8);
        assert_eq!(
            summary.priorities,
            PriorityBreakdown {
                high: 1,
                medium: 0,
                low: 1
            }
        );
    }

    #[test]
    fn test_failed_generation_reverts_to_selected() {
        let mut controller = SessionController::new();
        controller.import("abc123", frames());
        controller.select_frame("1:1").unwrap();
        controller.begin_generation().unwrap();

        controller.fail_generation("backend unreachable").unwrap();
        assert_eq!(controller.phase(), SessionPhase::FramesSelected);
        assert_eq!(controller.last_error(), Some("backend unreachable"));
    }

    #[test]
    fn test_selection_locked_while_generating() {
        let mut controller = SessionController::new();
        controller.import("abc123", frames());
        controller.select_frame("1:1").unwrap();
        controller.begin_generation().unwrap();

        assert!(matches!(
            controller.select_frame("1:2"),
            Err(SessionError::InvalidTransition { .. })
        ));
        assert!(matches!(
            controller.begin_generation(),
            Err(SessionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_complete_outside_generation_rejected() {
        let mut controller = SessionController::new();
        controller.import("abc123", frames());
        assert!(matches!(
            controller.complete_generation(Vec::new()),
            Err(SessionError::InvalidTransition {
                phase: SessionPhase::Imported,
                ..
            })
        ));
    }

    #[test]
    fn test_regeneration_replaces_stories() {
        let mut controller = SessionController::new();
        controller.import("abc123", frames());
        controller.select_frame("1:1").unwrap();

        controller.begin_generation().unwrap();
        controller
            .complete_generation(vec![story(1, Priority::Medium), story(2, Priority::Medium)])
            .unwrap();

        controller.begin_generation().unwrap();
        controller.complete_generation(vec![story(8, Priority::High)]).unwrap();

        let session = controller.session().unwrap();
        assert_eq!(session.user_stories.len(), 1);
        assert_eq!(controller.summary().total_story_points, 8);
    }

    #[test]
    fn test_new_import_discards_previous_session() {
        let mut controller = SessionController::new();
        controller.import("first", frames());
        controller.select_frame("1:1").unwrap();
        controller.begin_generation().unwrap();

        let first_id = controller.session().unwrap().id.clone();
        controller.import("second", vec![Frame::new("2:1", "Other", 1.0, 1.0, "FRAME")]);

        let session = controller.session().unwrap();
        assert_ne!(session.id, first_id);
        assert_eq!(session.figma_file_id, "second");
        assert_eq!(controller.phase(), SessionPhase::Imported);
        assert!(controller.selected_frames().is_empty());
    }

    #[test]
    fn test_blank_context_is_dropped() {
        let mut controller = SessionController::new();
        controller.import("abc123", frames());
        controller.set_context(Some("   ".to_string())).unwrap();
        assert_eq!(controller.session().unwrap().context, None);

        controller.set_context(Some("Banking app".to_string())).unwrap();
        assert_eq!(
            controller.session().unwrap().context.as_deref(),
            Some("Banking app")
        );
    }
}
