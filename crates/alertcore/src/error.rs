use crate::ContextKey;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failures raised by a node handler. They are recorded as a failed step and
/// end the traversal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NodeError {
    #[error("name is required")]
    MissingName,

    #[error("email is required")]
    MissingEmail,

    #[error("city is required")]
    MissingCity,

    #[error("missing context value: {0}")]
    MissingContext(ContextKey),

    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),

    #[error("geocoding API request failed: {0}")]
    GeocodingRequest(String),

    #[error("no results found for city: {0}")]
    NoGeocodingResults(String),

    #[error("failed to fetch weather data: {0}")]
    WeatherRequest(String),

    #[error("weather API returned status: {0}")]
    WeatherStatus(u16),

    #[error("failed to decode response: {0}")]
    ResponseDecode(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("no handler registered for node type '{0}'")]
    NoHandler(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

/// Structural problems detected before any node runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    #[error("missing 'start' node")]
    MissingStartNode,

    #[error("missing 'end' node")]
    MissingEndNode,

    #[error("duplicate node id: {0}")]
    DuplicateNode(String),

    #[error("edge {edge} references unknown node {node}")]
    DanglingEdge { edge: String, node: String },

    #[error("workflow graph contains a cycle")]
    Cycle,

    #[error("Workflow not found: {0}")]
    NotFound(String),
}
