use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Node `type` strings that mark UI-only annotations.
const PASS_THROUGH_TYPES: [&str; 2] = ["noteNode", "note"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Normal,
    /// Never laid out; keeps the position it arrived with.
    PassThrough,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A node as a flow editor stores it. Attributes the layout engine does not
/// read are kept in `extra` and written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default)]
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measured: Option<Size>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: None,
            position: Position::default(),
            width: None,
            height: None,
            measured: None,
            extra: Map::new(),
        }
    }

    pub fn note(id: impl Into<String>, position: Position) -> Self {
        Self {
            node_type: Some(PASS_THROUGH_TYPES[0].to_string()),
            position,
            ..Self::new(id)
        }
    }

    pub fn with_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_measured(mut self, width: f32, height: f32) -> Self {
        self.measured = Some(Size::new(width, height));
        self
    }

    /// Copy of this node placed at `position`; every other attribute is kept.
    pub fn with_position(&self, position: Position) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self.node_type.as_deref() {
            Some(t) if PASS_THROUGH_TYPES.contains(&t) => NodeKind::PassThrough,
            _ => NodeKind::Normal,
        }
    }

    pub fn is_pass_through(&self) -> bool {
        self.kind() == NodeKind::PassThrough
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Edge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            extra: Map::new(),
        }
    }
}

/// The document the CLI and the wasm wrapper exchange: `{"nodes": [...], "edges": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowGraph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
