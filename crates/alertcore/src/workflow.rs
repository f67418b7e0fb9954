use crate::FlowError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub type WorkflowId = String;
pub type NodeId = String;

/// Id of the node every traversal starts from
pub const START_NODE_ID: &str = "start";
/// Id of the node every workflow must terminate in
pub const END_NODE_ID: &str = "end";

/// Label of the edge taken when a condition evaluates to true
pub const CONDITION_MET_LABEL: &str = "✓ Condition Met";
/// Label of the edge taken when a condition evaluates to false
pub const CONDITION_NOT_MET_LABEL: &str = "✗ No Alert Needed";

/// Complete workflow definition as stored by the editor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    #[serde(default)]
    pub id: WorkflowId,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl WorkflowDefinition {
    pub fn new(id: impl Into<WorkflowId>) -> Self {
        Self {
            id: id.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn with_edge(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    /// Connect two nodes with an unlabeled edge
    pub fn connect(self, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        self.with_edge(Edge::new(source, target))
    }

    pub fn find_node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and decode a workflow saved by the editor
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let json = std::fs::read_to_string(path).map_err(FlowError::Io)?;
        Self::from_json(&json)
    }
}

/// The fixed vocabulary of node types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "start")]
    Start,
    #[serde(rename = "end")]
    End,
    #[serde(rename = "form")]
    Form,
    #[serde(rename = "weather-api", alias = "weather-lookup")]
    WeatherLookup,
    #[serde(rename = "condition")]
    Condition,
    #[serde(rename = "email")]
    Email,
}

impl NodeKind {
    pub const ALL: [NodeKind; 6] = [
        NodeKind::Start,
        NodeKind::End,
        NodeKind::Form,
        NodeKind::WeatherLookup,
        NodeKind::Condition,
        NodeKind::Email,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Start => "start",
            NodeKind::End => "end",
            NodeKind::Form => "form",
            NodeKind::WeatherLookup => "weather-api",
            NodeKind::Condition => "condition",
            NodeKind::Email => "email",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed step in the workflow graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub data: NodeData,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            position: Position::default(),
            data: NodeData::default(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.data.label = label.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.data.description = description.into();
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Position { x, y };
        self
    }

    pub fn with_metadata(mut self, metadata: NodeMetadata) -> Self {
        self.data.metadata = metadata;
        self
    }
}

/// Node position in the visual editor; ignored during execution
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub metadata: NodeMetadata,
}

/// Type specific node settings. Most fields only matter to the editor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetadata {
    #[serde(default)]
    pub has_handles: HasHandles,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_variables: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_variables: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_template: Option<EmailTemplate>,
    /// URL template with `{lat}` and `{lon}` placeholders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CityCoordinates>,
    #[serde(
        default,
        rename = "conditionExpression",
        skip_serializing_if = "Option::is_none"
    )]
    pub condition_expression: Option<String>,
}

/// Editor handle layout. Either side may be a bool or a list of handle names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HasHandles {
    #[serde(default)]
    pub source: serde_json::Value,
    #[serde(default)]
    pub target: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityCoordinates {
    pub city: String,
    pub lat: f64,
    pub lon: f64,
}

/// Directed connection between two nodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    #[serde(default)]
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub edge_type: Option<String>,
    #[serde(default)]
    pub animated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<serde_json::Map<String, serde_json::Value>>,
    /// Only meaningful on edges leaving a condition node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_style: Option<serde_json::Map<String, serde_json::Value>>,
}

impl Edge {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("e-{}-{}", source, target),
            source,
            target,
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}
