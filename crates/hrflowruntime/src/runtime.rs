use crate::{simulate, ActionCatalog};
use chrono::Utc;
use hrflowcore::{
    validate, EventBus, ExecutionEvent, ExecutionTrace, FlowError, RunId, ValidationResult,
    Workflow,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{sleep, timeout, Duration};

/// Validates and simulates workflows off the caller's thread
pub struct SimulationRuntime {
    catalog: Arc<ActionCatalog>,
    event_bus: Arc<EventBus>,
    config: RuntimeConfig,
}

impl SimulationRuntime {
    /// Create a new runtime with default settings
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    /// Create a new runtime with custom configuration
    pub fn with_config(config: RuntimeConfig) -> Self {
        Self::with_catalog(Arc::new(ActionCatalog::with_defaults()), config)
    }

    /// Create a new runtime with a pre-configured action catalog
    pub fn with_catalog(catalog: Arc<ActionCatalog>, config: RuntimeConfig) -> Self {
        let event_bus = Arc::new(EventBus::new(config.event_buffer_size));

        Self {
            catalog,
            event_bus,
            config,
        }
    }

    pub fn catalog(&self) -> &Arc<ActionCatalog> {
        &self.catalog
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Validate `workflow` and, when it is valid, simulate it.
    ///
    /// An invalid workflow is not an error: it comes back as
    /// [`RunOutcome::Rejected`] with the diagnostics. Errors are reserved for
    /// the timeout and for a simulation task that could not be joined.
    pub async fn run(&self, workflow: &Workflow) -> Result<RunOutcome, FlowError> {
        let run_id = RunId::new_v4();
        let validation = validate(workflow);

        if !validation.valid {
            tracing::info!(
                %run_id,
                errors = validation.errors.len(),
                "Workflow rejected by validation"
            );
            self.event_bus.emit(ExecutionEvent::ValidationFailed {
                run_id,
                errors: validation.errors.clone(),
                invalid_node_ids: validation.invalid_node_ids.iter().cloned().collect(),
                timestamp: Utc::now(),
            });
            return Ok(RunOutcome::Rejected(validation));
        }

        for node in self.catalog.unknown_actions(workflow) {
            tracing::warn!(node_id = %node.id, label = %node.label, "Automation references an unknown action");
        }

        tracing::info!(%run_id, nodes = workflow.node_count(), "Starting simulation");
        self.event_bus.emit(ExecutionEvent::SimulationStarted {
            run_id,
            node_count: workflow.node_count(),
            timestamp: Utc::now(),
        });

        let start_time = Instant::now();
        let result = match self.config.timeout_ms {
            Some(ms) => timeout(Duration::from_millis(ms), self.simulate_and_publish(run_id, workflow))
                .await
                .unwrap_or(Err(FlowError::Timeout { ms })),
            None => self.simulate_and_publish(run_id, workflow).await,
        };
        let duration_ms = start_time.elapsed().as_millis() as u64;

        let (success, steps) = match &result {
            Ok(trace) => (trace.success, trace.steps.len()),
            Err(e) => {
                tracing::error!(%run_id, "Simulation failed: {}", e);
                (false, 0)
            }
        };

        self.event_bus.emit(ExecutionEvent::SimulationCompleted {
            run_id,
            success,
            steps,
            duration_ms,
            timestamp: Utc::now(),
        });

        result.map(RunOutcome::Completed)
    }

    async fn simulate_and_publish(
        &self,
        run_id: RunId,
        workflow: &Workflow,
    ) -> Result<ExecutionTrace, FlowError> {
        let snapshot = workflow.clone();
        let trace = tokio::task::spawn_blocking(move || simulate(&snapshot))
            .await
            .map_err(|e| FlowError::Execution(format!("Simulation task join error: {}", e)))?;

        for step in &trace.steps {
            if self.config.step_delay_ms > 0 {
                sleep(Duration::from_millis(self.config.step_delay_ms)).await;
            }
            self.event_bus.emit(ExecutionEvent::StepRecorded {
                run_id,
                step: step.clone(),
            });
        }

        Ok(trace)
    }

    /// Subscribe to execution events
    pub fn subscribe_events(&self) -> tokio::sync::broadcast::Receiver<ExecutionEvent> {
        self.event_bus.subscribe()
    }
}

impl Default for SimulationRuntime {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of [`SimulationRuntime::run`]
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Validation failed; nothing was simulated
    Rejected(ValidationResult),
    Completed(ExecutionTrace),
}

impl RunOutcome {
    pub fn trace(&self) -> Option<&ExecutionTrace> {
        match self {
            RunOutcome::Completed(trace) => Some(trace),
            RunOutcome::Rejected(_) => None,
        }
    }

    pub fn validation(&self) -> Option<&ValidationResult> {
        match self {
            RunOutcome::Rejected(validation) => Some(validation),
            RunOutcome::Completed(_) => None,
        }
    }
}

/// Configuration for the runtime
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Upper bound for a whole simulation, step pacing included
    pub timeout_ms: Option<u64>,
    /// Pause before publishing each step, for interactive playback
    pub step_delay_ms: u64,
    pub event_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            step_delay_ms: 0,
            event_buffer_size: 1000,
        }
    }
}
