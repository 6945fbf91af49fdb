use crate::{NodeId, NodeKindTag};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Simulation timed out after {ms}ms")]
    Timeout { ms: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Faults raised while building or importing a workflow.
///
/// Structural defects of a well-typed graph are never reported here; those
/// are diagnostics returned by [`crate::validate`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Duplicate node id: {0}")]
    DuplicateNode(NodeId),

    #[error("Invalid attributes for {kind} node '{node_id}': {reason}")]
    InvalidAttributes {
        node_id: NodeId,
        kind: NodeKindTag,
        reason: String,
    },
}
