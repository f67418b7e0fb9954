use crate::{ExecutePayload, ExecutionContext, Node, NodeError, NodeKind};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Core trait that every node handler implements
#[async_trait]
pub trait NodeHandler: Send + Sync {
    /// Node type this handler executes
    fn kind(&self) -> NodeKind;

    /// Short human readable summary, shown by `alertflow nodes`
    fn description(&self) -> &str {
        ""
    }

    /// Perform the node's effect. Handlers may read and write the context but
    /// never touch the graph.
    async fn handle(
        &self,
        node: &Node,
        payload: &ExecutePayload,
        ctx: &mut ExecutionContext,
    ) -> Result<NodeOutput, NodeError>;
}

/// Output from a successful handler call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeOutput {
    /// Handler specific fields copied into the step output
    pub fields: Map<String, Value>,

    /// Outcome of a condition node; `None` for every other kind
    pub branch: Option<bool>,
}

impl NodeOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_branch(mut self, taken: bool) -> Self {
        self.branch = Some(taken);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}
