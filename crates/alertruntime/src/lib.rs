//! Workflow execution runtime
//!
//! This crate provides the traversal engine that runs workflows, the handler
//! registry it dispatches through, graph validation and step recording.

mod executor;
mod graph;
mod recorder;
mod registry;
mod runtime;
mod store;

pub use executor::WorkflowExecutor;
pub use graph::WorkflowGraph;
pub use recorder::StepRecorder;
pub use registry::HandlerRegistry;
pub use runtime::{FlowRuntime, RuntimeConfig};
pub use store::{InMemoryWorkflowStore, WorkflowStore};
