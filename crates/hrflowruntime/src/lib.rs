//! Workflow simulation runtime
//!
//! This crate provides the breadth-first simulator that turns a validated
//! workflow into an execution trace, the catalog of automated actions, and
//! an async runtime that validates, simulates and publishes progress events.

mod catalog;
mod runtime;
mod simulator;

pub use catalog::{ActionCatalog, ActionDefinition};
pub use runtime::{RunOutcome, RuntimeConfig, SimulationRuntime};
pub use simulator::{simulate, simulate_with_clock, step_message};
