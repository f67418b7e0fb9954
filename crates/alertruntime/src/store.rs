use alertcore::{WorkflowDefinition, WorkflowError};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Storage for workflow definitions, keyed by workflow id.
///
/// The engine itself never persists anything; callers fetch a definition
/// and hand it to the executor.
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    async fn fetch(&self, id: &str) -> Result<WorkflowDefinition, WorkflowError>;

    /// Insert or replace the definition stored under `id`
    async fn update(&self, id: &str, definition: WorkflowDefinition) -> Result<(), WorkflowError>;
}

/// Process local store used by the CLI and tests
#[derive(Default)]
pub struct InMemoryWorkflowStore {
    workflows: RwLock<HashMap<String, WorkflowDefinition>>,
}

impl InMemoryWorkflowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.workflows.read().await.len()
    }
}

#[async_trait]
impl WorkflowStore for InMemoryWorkflowStore {
    async fn fetch(&self, id: &str) -> Result<WorkflowDefinition, WorkflowError> {
        self.workflows
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| WorkflowError::NotFound(id.to_string()))
    }

    async fn update(&self, id: &str, definition: WorkflowDefinition) -> Result<(), WorkflowError> {
        self.workflows
            .write()
            .await
            .insert(id.to_string(), definition);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fetch_returns_what_was_stored() {
        let store = InMemoryWorkflowStore::new();
        store
            .update("wf-1", WorkflowDefinition::new("wf-1"))
            .await
            .unwrap();
        assert_eq!(store.fetch("wf-1").await.unwrap().id, "wf-1");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let store = InMemoryWorkflowStore::new();
        assert_eq!(
            store.fetch("nope").await.unwrap_err(),
            WorkflowError::NotFound("nope".into())
        );
    }
}
