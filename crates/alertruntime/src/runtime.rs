use crate::store::{InMemoryWorkflowStore, WorkflowStore};
use crate::{HandlerRegistry, WorkflowExecutor};
use alertcore::{
    EventBus, ExecutePayload, ExecutionEvent, ExecutionResult, FlowError, WorkflowDefinition,
};
use std::sync::Arc;

/// Main runtime for executing workflows
pub struct FlowRuntime {
    registry: Arc<HandlerRegistry>,
    executor: WorkflowExecutor,
    event_bus: Arc<EventBus>,
    store: Arc<dyn WorkflowStore>,
}

impl FlowRuntime {
    /// Create a runtime around a pre-populated handler registry
    pub fn with_registry(registry: HandlerRegistry, config: RuntimeConfig) -> Self {
        Self::with_store(registry, config, Arc::new(InMemoryWorkflowStore::new()))
    }

    /// Create a runtime backed by a custom workflow store
    pub fn with_store(
        registry: HandlerRegistry,
        config: RuntimeConfig,
        store: Arc<dyn WorkflowStore>,
    ) -> Self {
        let registry = Arc::new(registry);
        let event_bus = Arc::new(EventBus::new(config.event_buffer_size));
        let executor = WorkflowExecutor::new(registry.clone(), event_bus.clone());

        Self {
            registry,
            executor,
            event_bus,
            store,
        }
    }

    pub fn registry(&self) -> &Arc<HandlerRegistry> {
        &self.registry
    }

    /// Store a workflow so it can be executed by id
    pub async fn register_workflow(&self, workflow: WorkflowDefinition) -> Result<(), FlowError> {
        let id = workflow.id.clone();
        self.store.update(&id, workflow).await?;
        Ok(())
    }

    /// Fetch a stored workflow and execute it
    pub async fn execute_workflow(
        &self,
        workflow_id: &str,
        payload: &ExecutePayload,
    ) -> Result<ExecutionResult, FlowError> {
        let workflow = self.store.fetch(workflow_id).await?;
        self.execute(&workflow, payload).await
    }

    /// Execute a workflow directly (without registration)
    pub async fn execute(
        &self,
        workflow: &WorkflowDefinition,
        payload: &ExecutePayload,
    ) -> Result<ExecutionResult, FlowError> {
        Ok(self.executor.execute(workflow, payload).await?)
    }

    /// Subscribe to execution events
    pub fn subscribe_events(&self) -> tokio::sync::broadcast::Receiver<ExecutionEvent> {
        self.event_bus.subscribe()
    }
}

/// Configuration for the runtime
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub event_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 1000,
        }
    }
}
