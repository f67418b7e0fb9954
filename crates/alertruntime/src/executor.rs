use crate::graph::WorkflowGraph;
use crate::recorder::{millis, StepRecorder};
use crate::registry::HandlerRegistry;
use alertcore::{
    EventBus, ExecutePayload, ExecutionContext, ExecutionEvent, ExecutionFailure, ExecutionId,
    ExecutionResult, FailureKind, Node, NodeError, NodeKind, WorkflowDefinition, WorkflowError,
    CONDITION_MET_LABEL, CONDITION_NOT_MET_LABEL, START_NODE_ID,
};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

/// Walks a workflow graph depth-first, one node at a time
pub struct WorkflowExecutor {
    registry: Arc<HandlerRegistry>,
    event_bus: Arc<EventBus>,
}

impl WorkflowExecutor {
    pub fn new(registry: Arc<HandlerRegistry>, event_bus: Arc<EventBus>) -> Self {
        Self {
            registry,
            event_bus,
        }
    }

    /// Executor with its own private event bus
    pub fn with_registry(registry: HandlerRegistry) -> Self {
        Self::new(Arc::new(registry), Arc::new(EventBus::default()))
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Execute a workflow and return its trace.
    ///
    /// `Err` is reserved for structural problems found before any node runs.
    /// Handler and routing failures come back as an `ExecutionResult` with
    /// status `failed` and the cause in `failure`.
    pub async fn execute(
        &self,
        workflow: &WorkflowDefinition,
        payload: &ExecutePayload,
    ) -> Result<ExecutionResult, WorkflowError> {
        let graph = WorkflowGraph::build(workflow).map_err(|e| {
            tracing::error!("Workflow {} rejected: {}", workflow.id, e);
            e
        })?;

        let execution_id = ExecutionId::new_v4();
        let started = Instant::now();

        self.event_bus.emit(ExecutionEvent::WorkflowStarted {
            execution_id,
            workflow_id: workflow.id.clone(),
            timestamp: Utc::now(),
        });
        tracing::info!("Starting workflow execution: {} ({})", workflow.id, execution_id);

        let mut traversal = Traversal {
            graph: &graph,
            registry: &self.registry,
            event_bus: &self.event_bus,
            execution_id,
            payload,
            ctx: ExecutionContext::new(),
            recorder: StepRecorder::new(),
            visited: HashSet::new(),
        };
        let outcome = traversal.run().await;
        let steps = traversal.recorder.into_steps();

        let result = match outcome {
            Ok(()) => ExecutionResult::completed(steps),
            Err(failure) => {
                tracing::error!(
                    "Workflow {} failed at node {}: {}",
                    workflow.id,
                    failure.node_id,
                    failure.message
                );
                ExecutionResult::failed(steps, failure)
            }
        };

        let duration_ms = millis(started.elapsed());
        self.event_bus.emit(ExecutionEvent::WorkflowCompleted {
            execution_id,
            status: result.status,
            steps: result.steps.len(),
            duration_ms,
            timestamp: Utc::now(),
        });
        tracing::info!(
            "Workflow {} finished with {} step(s) in {}ms",
            workflow.id,
            result.steps.len(),
            duration_ms
        );

        Ok(result)
    }
}

/// State owned by a single traversal
struct Traversal<'a> {
    graph: &'a WorkflowGraph<'a>,
    registry: &'a HandlerRegistry,
    event_bus: &'a EventBus,
    execution_id: ExecutionId,
    payload: &'a ExecutePayload,
    ctx: ExecutionContext,
    recorder: StepRecorder,
    visited: HashSet<&'a str>,
}

impl<'a> Traversal<'a> {
    async fn run(&mut self) -> Result<(), ExecutionFailure> {
        // Explicit stack; successors are pushed in reverse so they pop in
        // declaration order, matching a recursive walk.
        let mut stack = vec![START_NODE_ID];

        while let Some(id) = stack.pop() {
            if !self.visited.insert(id) {
                tracing::debug!("Skipping already visited node {}", id);
                continue;
            }

            let node = self.graph.node(id).ok_or_else(|| ExecutionFailure {
                node_id: id.to_string(),
                kind: FailureKind::Handler,
                message: format!("node {} not found", id),
            })?;

            let next = self.visit(node).await?;
            stack.extend(next.into_iter().rev());
        }

        Ok(())
    }

    /// Run one node and return the ids to descend into
    async fn visit(&mut self, node: &'a Node) -> Result<Vec<&'a str>, ExecutionFailure> {
        tracing::debug!("Processing node {} ({})", node.id, node.kind);
        self.event_bus.emit(ExecutionEvent::NodeStarted {
            execution_id: self.execution_id,
            node_id: node.id.clone(),
            node_type: node.kind,
            timestamp: Utc::now(),
        });

        let started = Instant::now();
        let outcome = match self.registry.get(node.kind) {
            Some(handler) => handler.handle(node, self.payload, &mut self.ctx).await,
            None => Err(NodeError::NoHandler(node.kind.to_string())),
        };
        let outcome = outcome.and_then(|output| {
            if node.kind == NodeKind::Condition && output.branch.is_none() {
                return Err(NodeError::ExecutionFailed(
                    "condition handler returned no outcome".to_string(),
                ));
            }
            Ok(output)
        });
        let elapsed = started.elapsed();

        let output = match outcome {
            Ok(output) => output,
            Err(e) => {
                tracing::error!("Node {} failed: {}", node.id, e);
                self.recorder.failed(node, &e, elapsed);
                self.event_bus.emit(ExecutionEvent::NodeFailed {
                    execution_id: self.execution_id,
                    node_id: node.id.clone(),
                    error: e.to_string(),
                    timestamp: Utc::now(),
                });
                return Err(ExecutionFailure {
                    node_id: node.id.clone(),
                    kind: FailureKind::Handler,
                    message: e.to_string(),
                });
            }
        };

        let branch = output.branch;
        self.recorder.completed(node, output.fields, elapsed);
        self.event_bus.emit(ExecutionEvent::NodeCompleted {
            execution_id: self.execution_id,
            node_id: node.id.clone(),
            duration_ms: millis(elapsed),
            timestamp: Utc::now(),
        });

        match (node.kind, branch) {
            (NodeKind::Condition, Some(met)) => {
                let label = if met {
                    CONDITION_MET_LABEL
                } else {
                    CONDITION_NOT_MET_LABEL
                };
                match self.graph.labeled_edge(&node.id, label) {
                    Some(edge) => {
                        tracing::debug!(
                            "Condition {} routed via '{}' to {}",
                            node.id,
                            label,
                            edge.target
                        );
                        Ok(vec![edge.target.as_str()])
                    }
                    None => Err(ExecutionFailure {
                        node_id: node.id.clone(),
                        kind: FailureKind::NoMatchingEdge,
                        message: format!("no matching conditional edge for node {}", node.id),
                    }),
                }
            }
            _ => Ok(self.graph.successors(&node.id).collect()),
        }
    }
}
