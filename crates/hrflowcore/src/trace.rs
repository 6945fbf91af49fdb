use crate::{NodeId, NodeKindTag};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Success,
    Failure,
}

/// One entry of a simulated run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStep {
    /// Starts at 1 and increases by one per step
    pub step_id: u32,
    /// `None` only for the system step reporting a missing entry point
    pub node_id: Option<NodeId>,
    pub node_kind: Option<NodeKindTag>,
    pub node_label: String,
    pub message: String,
    pub status: StepStatus,
    pub timestamp: DateTime<Utc>,
}

impl ExecutionStep {
    pub fn is_success(&self) -> bool {
        self.status == StepStatus::Success
    }
}

/// Ordered log produced by simulating a workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionTrace {
    pub success: bool,
    pub steps: Vec<ExecutionStep>,
}

impl ExecutionTrace {
    /// Node ids in the order they were first reached
    pub fn visited(&self) -> Vec<&NodeId> {
        self.steps.iter().filter_map(|s| s.node_id.as_ref()).collect()
    }
}
