// ABOUTME: Read-only model of the Figma document tree and API response envelopes
// ABOUTME: Only the fields needed for frame extraction are decoded; the rest is ignored

use serde::Deserialize;
use std::collections::HashMap;

use figstory_core::Frame;

/// Node kinds treated as screens or reusable units
pub const FRAME_LIKE_TYPES: &[&str] = &["FRAME", "COMPONENT", "COMPONENT_SET"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct BoundingBox {
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

/// A node of a Figma document. The service guarantees the tree has no cycles.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignNode {
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub children: Option<Vec<DesignNode>>,
    #[serde(default)]
    pub absolute_bounding_box: Option<BoundingBox>,
}

impl DesignNode {
    pub fn children(&self) -> &[DesignNode] {
        self.children.as_deref().unwrap_or_default()
    }

    pub fn is_frame_like(&self) -> bool {
        FRAME_LIKE_TYPES.contains(&self.node_type.as_str())
    }

    pub fn is_frame_with_id(&self) -> bool {
        self.node_type == "FRAME" && self.id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// Build a frame record; nodes without an id cannot be referenced later and yield `None`
    pub fn to_frame(&self) -> Option<Frame> {
        let id = self.id.as_deref().filter(|id| !id.is_empty())?;
        let bounds = self.absolute_bounding_box.unwrap_or_default();
        Some(Frame::new(
            id,
            self.name.clone().unwrap_or_default(),
            bounds.width,
            bounds.height,
            self.node_type.clone(),
        ))
    }
}

/// Body of `GET /files/{key}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    #[serde(default)]
    pub name: Option<String>,
    pub document: DesignNode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeEntry {
    pub document: DesignNode,
}

/// Body of `GET /files/{key}/nodes`; unresolved ids map to `null`
#[derive(Debug, Clone, Deserialize)]
pub struct NodesResponse {
    #[serde(default)]
    pub nodes: HashMap<String, Option<NodeEntry>>,
}

/// Body of `GET /images/{key}`; nodes that failed to render map to `null`
#[derive(Debug, Clone, Deserialize)]
pub struct ImagesResponse {
    #[serde(default)]
    pub err: Option<String>,
    #[serde(default)]
    pub images: HashMap<String, Option<String>>,
}
