//! Core abstractions for hrflow
//!
//! This crate provides the workflow graph model, its JSON interchange form,
//! the structural validator and the trace types that the runtime produces.
//! Nothing here performs I/O except the explicit document load/save helpers.

mod document;
mod error;
pub mod events;
mod node;
mod trace;
mod validation;
mod workflow;

pub use error::{FlowError, WorkflowError};
pub use node::{
    ApprovalAttributes, AutomatedAttributes, CompletionAttributes, EntryAttributes, Node,
    NodeKind, NodeKindTag, TaskAttributes,
};
pub use trace::{ExecutionStep, ExecutionTrace, StepStatus};
pub use validation::{validate, Diagnostic, ValidationResult};
pub use workflow::{Edge, EdgeId, NodeId, Position, Workflow};
pub use events::*;

/// Result type for flow operations
pub type Result<T> = std::result::Result<T, FlowError>;
