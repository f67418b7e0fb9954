use alertcore::{NodeHandler, NodeKind};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of the handler used for each node type.
///
/// The executor only sees handlers through this registry, so tests swap in
/// doubles by registering over the built-ins.
#[derive(Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<NodeKind, Arc<dyn NodeHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler, replacing any previous one for the same type
    pub fn register(&mut self, handler: Arc<dyn NodeHandler>) {
        let kind = handler.kind();
        tracing::debug!("Registering handler for node type: {}", kind);
        self.handlers.insert(kind, handler);
    }

    /// Builder form of [`register`](Self::register)
    pub fn with(mut self, handler: Arc<dyn NodeHandler>) -> Self {
        self.register(handler);
        self
    }

    pub fn get(&self, kind: NodeKind) -> Option<&Arc<dyn NodeHandler>> {
        self.handlers.get(&kind)
    }

    pub fn contains(&self, kind: NodeKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Registered node types, in vocabulary order
    pub fn list_node_types(&self) -> Vec<NodeKind> {
        NodeKind::ALL
            .into_iter()
            .filter(|kind| self.handlers.contains_key(kind))
            .collect()
    }

    pub fn description(&self, kind: NodeKind) -> Option<&str> {
        self.handlers.get(&kind).map(|h| h.description())
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alertcore::{ExecutePayload, ExecutionContext, Node, NodeError, NodeOutput};
    use async_trait::async_trait;

    struct Fixed(NodeKind, &'static str);

    #[async_trait]
    impl NodeHandler for Fixed {
        fn kind(&self) -> NodeKind {
            self.0
        }

        fn description(&self) -> &str {
            self.1
        }

        async fn handle(
            &self,
            _node: &Node,
            _payload: &ExecutePayload,
            _ctx: &mut ExecutionContext,
        ) -> Result<NodeOutput, NodeError> {
            Ok(NodeOutput::new())
        }
    }

    #[test]
    fn later_registration_replaces_earlier() {
        let registry = HandlerRegistry::new()
            .with(Arc::new(Fixed(NodeKind::Email, "real")))
            .with(Arc::new(Fixed(NodeKind::Email, "double")));
        assert_eq!(registry.description(NodeKind::Email), Some("double"));
        assert_eq!(registry.list_node_types(), vec![NodeKind::Email]);
    }

    #[test]
    fn lists_types_in_vocabulary_order() {
        let registry = HandlerRegistry::new()
            .with(Arc::new(Fixed(NodeKind::End, "")))
            .with(Arc::new(Fixed(NodeKind::Start, "")));
        assert_eq!(
            registry.list_node_types(),
            vec![NodeKind::Start, NodeKind::End]
        );
        assert!(!registry.contains(NodeKind::Form));
    }
}
