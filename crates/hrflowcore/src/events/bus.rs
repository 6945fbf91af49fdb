use crate::{ExecutionStep, NodeId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

pub type RunId = Uuid;

/// Events emitted while a workflow is validated and simulated
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExecutionEvent {
    ValidationFailed {
        run_id: RunId,
        errors: Vec<String>,
        invalid_node_ids: Vec<NodeId>,
        timestamp: DateTime<Utc>,
    },
    SimulationStarted {
        run_id: RunId,
        node_count: usize,
        timestamp: DateTime<Utc>,
    },
    StepRecorded {
        run_id: RunId,
        step: ExecutionStep,
    },
    SimulationCompleted {
        run_id: RunId,
        success: bool,
        steps: usize,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },
}

impl ExecutionEvent {
    pub fn run_id(&self) -> RunId {
        match self {
            ExecutionEvent::ValidationFailed { run_id, .. }
            | ExecutionEvent::SimulationStarted { run_id, .. }
            | ExecutionEvent::StepRecorded { run_id, .. }
            | ExecutionEvent::SimulationCompleted { run_id, .. } => *run_id,
        }
    }
}

/// Global event bus
pub struct EventBus {
    sender: broadcast::Sender<ExecutionEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ExecutionEvent> {
        self.sender.subscribe()
    }

    /// Send to current subscribers; dropped silently when nobody listens
    pub fn emit(&self, event: ExecutionEvent) {
        let _ = self.sender.send(event);
    }
}
