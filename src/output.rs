//! Output types for the JS host.
//!
//! These structs are serialized to JSON and handed to the frontend, which
//! moves its person nodes to `position` and colours them by
//! `distance / maxDistance`.

use serde::{Deserialize, Serialize};

use crate::layout::{LayoutConfig, LayoutState};
use crate::network::{Edge, Node, Point};

/// What the host sends in: the current graph plus optional config overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutInput {
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub config: LayoutConfig,
}

/// A laid-out node ready for the frontend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeOutput {
    pub id: String,
    pub position: Point,
    pub distance: Option<u32>,
    pub max_distance: Option<u32>,
    /// Ring the node was drawn on; absent when no pass ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ring: Option<u32>,
}

/// Error information for the host to surface.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub message: String,
    pub line: usize,   // 1-based line number
    pub column: usize, // 1-based column number
}

/// The combined output sent to the host.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutOutput {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<NodeOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub changed: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<LayoutState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl LayoutOutput {
    pub fn from_error(err: &serde_json::Error) -> Self {
        Self {
            nodes: vec![],
            changed: vec![],
            state: None,
            error: Some(ErrorInfo {
                message: err.to_string(),
                line: err.line(),
                column: err.column(),
            }),
        }
    }
}
