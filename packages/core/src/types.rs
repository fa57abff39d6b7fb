// ABOUTME: Domain types shared by the import, generation and presentation layers
// ABOUTME: Frame, UserStory and Priority as exchanged over the HTTP API

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dimensions and node kind of the design node a frame was built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameMetadata {
    pub width: f64,
    pub height: f64,
    #[serde(rename = "type")]
    pub node_type: String,
}

/// A design frame imported from a Figma file.
///
/// Identity is `id`. Only `image_url` and `file_size` are filled in after
/// creation, by the image enrichment step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    pub metadata: FrameMetadata,
}

impl Frame {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        width: f64,
        height: f64,
        node_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image_url: String::new(),
            file_size: None,
            metadata: FrameMetadata {
                width,
                height,
                node_type: node_type.into(),
            },
        }
    }

    /// Whether a rendered image URL has been resolved for this frame
    pub fn has_image(&self) -> bool {
        !self.image_url.is_empty()
    }

    /// One-line description handed to the generator alongside the image
    pub fn context_line(&self) -> String {
        format!(
            "Frame: {} ({}x{}) - {}",
            self.name, self.metadata.width, self.metadata.height, self.metadata.node_type
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Case-insensitive match against the three known labels
    pub fn parse_loose(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        };
        write!(f, "{}", label)
    }
}

/// An agile user story produced by the story normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStory {
    pub id: String,
    pub title: String,
    pub description: String,
    pub acceptance_criteria: Vec<String>,
    pub priority: Priority,
    pub story_points: u32,
    pub persona: String,
    pub category: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_frame_serializes_camel_case() {
        let mut frame = Frame::new("1:2", "Login", 375.0, 812.0, "FRAME");
        frame.image_url = "https://cdn.example/1.png".to_string();
        frame.file_size = Some(2048);

        let value = serde_json::to_value(&frame).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "1:2",
                "name": "Login",
                "imageUrl": "https://cdn.example/1.png",
                "fileSize": 2048,
                "metadata": {"width": 375.0, "height": 812.0, "type": "FRAME"}
            })
        );
    }

    #[test]
    fn test_frame_without_size_omits_field() {
        let frame = Frame::new("1:2", "Login", 0.0, 0.0, "FRAME");
        let value = serde_json::to_value(&frame).unwrap();
        assert!(value.get("fileSize").is_none());
        assert_eq!(value["imageUrl"], "");
    }

    #[test]
    fn test_frame_deserializes_from_client_payload() {
        let frame: Frame = serde_json::from_value(json!({
            "id": "3:4",
            "name": "Checkout",
            "imageUrl": "https://cdn.example/3.png",
            "metadata": {"width": 1440, "height": 900, "type": "COMPONENT"}
        }))
        .unwrap();

        assert_eq!(frame.metadata.node_type, "COMPONENT");
        assert_eq!(frame.metadata.width, 1440.0);
        assert!(frame.has_image());
        assert_eq!(frame.context_line(), "Frame: Checkout (1440x900) - COMPONENT");
    }

    #[test]
    fn test_priority_parse_loose() {
        assert_eq!(Priority::parse_loose("HIGH"), Some(Priority::High));
        assert_eq!(Priority::parse_loose(" low "), Some(Priority::Low));
        assert_eq!(Priority::parse_loose("urgent"), None);
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_user_story_wire_format() {
        let story = UserStory {
            id: "story-1".to_string(),
            title: "Sign in".to_string(),
            description: "As a user, I want to sign in".to_string(),
            acceptance_criteria: vec!["Form validates email".to_string()],
            priority: Priority::High,
            story_points: 5,
            persona: "Customer".to_string(),
            category: "Authentication".to_string(),
        };

        let value = serde_json::to_value(&story).unwrap();
        assert_eq!(value["acceptanceCriteria"][0], "Form validates email");
        assert_eq!(value["storyPoints"], 5);
        assert_eq!(value["priority"], "High");
    }
}
