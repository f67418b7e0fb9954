use alertcore::{ExecutePayload, ExecutionContext, Node, NodeError, NodeHandler, NodeKind, NodeOutput};
use async_trait::async_trait;

/// Entry point of every workflow. Does nothing yet; a natural place for
/// per-execution instrumentation.
pub struct StartNode;

#[async_trait]
impl NodeHandler for StartNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Start
    }

    fn description(&self) -> &str {
        "Marks the beginning of a workflow"
    }

    async fn handle(
        &self,
        node: &Node,
        _payload: &ExecutePayload,
        _ctx: &mut ExecutionContext,
    ) -> Result<NodeOutput, NodeError> {
        tracing::debug!("Workflow entered at node {}", node.id);
        Ok(NodeOutput::new())
    }
}

/// Terminal node, same shape as [`StartNode`]
pub struct EndNode;

#[async_trait]
impl NodeHandler for EndNode {
    fn kind(&self) -> NodeKind {
        NodeKind::End
    }

    fn description(&self) -> &str {
        "Marks the end of a workflow"
    }

    async fn handle(
        &self,
        node: &Node,
        _payload: &ExecutePayload,
        _ctx: &mut ExecutionContext,
    ) -> Result<NodeOutput, NodeError> {
        tracing::debug!("Workflow reached node {}", node.id);
        Ok(NodeOutput::new())
    }
}
