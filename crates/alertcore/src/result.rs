use crate::{Node, NodeId, NodeKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key under which every step records its elapsed milliseconds
pub const DURATION_KEY: &str = "duration";
/// Key under which a failed step records its cause
pub const ERROR_KEY: &str = "error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Completed,
    Failed,
}

/// Outcome of one handler invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub node_id: NodeId,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub label: String,
    pub description: String,
    pub status: StepStatus,
    #[serde(default)]
    pub output: Map<String, Value>,
}

impl StepResult {
    pub fn new(node: &Node, status: StepStatus, output: Map<String, Value>) -> Self {
        Self {
            node_id: node.id.clone(),
            kind: node.kind,
            label: node.data.label.clone(),
            description: node.data.description.clone(),
            status,
            output,
        }
    }

    pub fn duration_ms(&self) -> Option<u64> {
        self.output.get(DURATION_KEY).and_then(Value::as_u64)
    }

    pub fn error(&self) -> Option<&str> {
        self.output.get(ERROR_KEY).and_then(Value::as_str)
    }
}

/// Why a traversal stopped early
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A handler returned an error; the failed step is the last entry
    Handler,
    /// A condition node had no edge labelled for its outcome
    NoMatchingEdge,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionFailure {
    pub node_id: NodeId,
    pub kind: FailureKind,
    pub message: String,
}

/// Full trace of one traversal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    #[serde(with = "rfc3339_nanos")]
    pub executed_at: DateTime<Utc>,
    pub status: ExecutionStatus,
    pub steps: Vec<StepResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<ExecutionFailure>,
}

impl ExecutionResult {
    pub fn completed(steps: Vec<StepResult>) -> Self {
        Self {
            executed_at: Utc::now(),
            status: ExecutionStatus::Completed,
            steps,
            failure: None,
        }
    }

    pub fn failed(steps: Vec<StepResult>, failure: ExecutionFailure) -> Self {
        Self {
            executed_at: Utc::now(),
            status: ExecutionStatus::Failed,
            steps,
            failure: Some(failure),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Completed
    }

    pub fn step(&self, node_id: &str) -> Option<&StepResult> {
        self.steps.iter().find(|s| s.node_id == node_id)
    }
}

mod rfc3339_nanos {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Nanos, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
