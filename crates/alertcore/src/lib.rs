//! Core abstractions for the alert workflow engine
//!
//! This crate provides the workflow graph model, the execution payload and
//! context, the node handler contract and the result types that every other
//! crate builds on. It performs no I/O.

mod context;
mod error;
mod events;
mod node;
mod payload;
mod result;
mod workflow;

pub use context::{ContextKey, Coordinates, ExecutionContext};
pub use error::{FlowError, NodeError, WorkflowError};
pub use events::{EventBus, ExecutionEvent, ExecutionId};
pub use node::{NodeHandler, NodeOutput};
pub use payload::{Condition, ExecutePayload, FormData};
pub use result::{
    ExecutionFailure, ExecutionResult, ExecutionStatus, FailureKind, StepResult, StepStatus,
    DURATION_KEY, ERROR_KEY,
};
pub use workflow::{
    CityCoordinates, Edge, EmailTemplate, HasHandles, Node, NodeData, NodeId, NodeKind,
    NodeMetadata, Position, WorkflowDefinition, WorkflowId, CONDITION_MET_LABEL,
    CONDITION_NOT_MET_LABEL, END_NODE_ID, START_NODE_ID,
};

/// Result type for flow operations
pub type Result<T> = std::result::Result<T, FlowError>;
