// crates/hrflowcli/src/main.rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use hrflowcore::{
    validate, ApprovalAttributes, AutomatedAttributes, CompletionAttributes, ExecutionEvent,
    ExecutionTrace, Node, NodeKind, NodeKindTag, TaskAttributes, ValidationResult,
    Workflow,
};
use hrflowruntime::{ActionCatalog, RunOutcome, RuntimeConfig, SimulationRuntime};
use std::path::PathBuf;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hrflow")]
#[command(about = "Workflow designer core: validate and simulate workflow graphs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and simulate a workflow file
    Run {
        /// Path to workflow JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// Print the trace (or diagnostics) as JSON
        #[arg(long)]
        json: bool,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,

        /// Abort the simulation after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Pause between published steps, in milliseconds
        #[arg(long, default_value_t = 0)]
        step_delay_ms: u64,
    },

    /// Validate a workflow file
    Validate {
        /// Path to workflow JSON file
        file: PathBuf,

        /// Print the validation result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List available node kinds
    Nodes,

    /// List the built-in automated actions
    Actions,

    /// Create a new example workflow
    Init {
        /// Output file path
        #[arg(short, long, default_value = "workflow.json")]
        output: PathBuf,
    },
}

/// Logs go to stderr so `--json` output stays parseable
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            file,
            json,
            verbose,
            timeout_ms,
            step_delay_ms,
        } => {
            init_logging(verbose);
            let config = RuntimeConfig {
                timeout_ms,
                step_delay_ms,
                ..RuntimeConfig::default()
            };
            run_workflow(file, json, config).await?;
        }

        Commands::Validate { file, json } => {
            init_logging(false);
            validate_workflow(file, json)?;
        }

        Commands::Nodes => {
            list_nodes();
        }

        Commands::Actions => {
            list_actions();
        }

        Commands::Init { output } => {
            create_example_workflow(output)?;
        }
    }

    Ok(())
}

async fn run_workflow(file: PathBuf, json: bool, config: RuntimeConfig) -> Result<()> {
    let workflow = Workflow::load(&file)?;
    tracing::debug!(
        path = %file.display(),
        nodes = workflow.node_count(),
        edges = workflow.edge_count(),
        "Loaded workflow"
    );
    let runtime = SimulationRuntime::with_config(config);

    if json {
        match runtime.run(&workflow).await? {
            RunOutcome::Completed(trace) => println!("{}", serde_json::to_string_pretty(&trace)?),
            RunOutcome::Rejected(validation) => {
                println!("{}", serde_json::to_string_pretty(&validation)?);
                anyhow::bail!("workflow is invalid");
            }
        }
        return Ok(());
    }

    println!("🚀 Loading workflow from: {}", file.display());
    print_summary(&workflow);
    println!();

    let mut events = runtime.subscribe_events();

    // Print steps as the runtime publishes them
    let event_task = tokio::spawn(async move {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event printer fell behind; some steps were not shown");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            match event {
                ExecutionEvent::SimulationStarted { node_count, .. } => {
                    println!("▶️  Simulation started ({} nodes)", node_count);
                }
                ExecutionEvent::StepRecorded { step, .. } => {
                    let marker = if step.is_success() { "✅" } else { "❌" };
                    let kind = step.node_kind.map(|k| k.as_str()).unwrap_or("system");
                    println!(
                        "  {} [{}] {} ({}): {}",
                        marker,
                        step.step_id,
                        step.node_label,
                        kind,
                        step.message
                    );
                }
                ExecutionEvent::SimulationCompleted {
                    success,
                    duration_ms,
                    ..
                } => {
                    if success {
                        println!("✨ Simulation completed successfully in {}ms", duration_ms);
                    } else {
                        println!("💥 Simulation failed after {}ms", duration_ms);
                    }
                    break;
                }
                ExecutionEvent::ValidationFailed { .. } => break,
            }
        }
    });

    let outcome = runtime.run(&workflow).await;
    // The terminal event has been published by now; let the printer drain it.
    event_task.await?;

    match outcome? {
        RunOutcome::Completed(trace) => {
            print_trace_summary(&trace);
            Ok(())
        }
        RunOutcome::Rejected(validation) => {
            print_diagnostics(&validation);
            anyhow::bail!("workflow is invalid; fix the errors above before simulating")
        }
    }
}

fn validate_workflow(file: PathBuf, json: bool) -> Result<()> {
    let workflow = Workflow::load(&file)?;
    let result = validate(&workflow);
    tracing::debug!(path = %file.display(), valid = result.valid, "Validated workflow");

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("🔍 Validating workflow: {}", file.display());
        print_summary(&workflow);
        if result.valid {
            println!("✅ Workflow is valid");
        } else {
            print_diagnostics(&result);
        }
    }

    if !result.valid {
        anyhow::bail!("{} validation error(s)", result.errors.len());
    }
    Ok(())
}

fn print_summary(workflow: &Workflow) {
    if let Some(name) = &workflow.name {
        println!("📋 Workflow: {}", name);
    }
    println!("   Nodes: {}", workflow.node_count());
    println!("   Edges: {}", workflow.edge_count());
}

fn print_diagnostics(result: &ValidationResult) {
    println!("❌ Workflow is invalid:");
    for error in &result.errors {
        println!("   • {}", error);
    }
    if !result.invalid_node_ids.is_empty() {
        let ids: Vec<&str> = result.invalid_node_ids.iter().map(|id| id.as_str()).collect();
        println!("   Nodes to fix: {}", ids.join(", "));
    }
}

fn print_trace_summary(trace: &ExecutionTrace) {
    println!();
    println!("📊 Execution Summary:");
    println!("   Success: {}", trace.success);
    println!("   Steps: {}", trace.steps.len());
}

fn list_nodes() {
    println!("📦 Available Node Kinds:");
    println!();

    for kind in NodeKindTag::ALL {
        println!("  • {}", kind);
        println!("    {}", kind.description());
    }
}

fn list_actions() {
    println!("⚙️  Available Actions:");
    println!();

    let catalog = ActionCatalog::with_defaults();
    for action in catalog.list() {
        println!("  • {} ({})", action.id, action.label);
        println!("    params: {}", action.params.join(", "));
    }
}

fn create_example_workflow(output: PathBuf) -> Result<()> {
    let mut workflow = Workflow::named("Employee Onboarding");

    let start = workflow.try_add_node(Node::entry("start", "New Hire").with_position(0.0, 150.0))?;
    let documents = workflow.try_add_node(
        Node::task("collect_documents", "Collect Documents")
            .with_kind(NodeKind::Task(
                TaskAttributes::assigned_to("HR Coordinator")
                    .with_description("Gather ID, tax forms and signed policies")
                    .with_due_date("2024-07-01"),
            ))
            .with_position(220.0, 150.0),
    )?;
    let approval = workflow.try_add_node(
        Node::approval("manager_approval", "Manager Approval")
            .with_kind(NodeKind::Approval(ApprovalAttributes::for_role("Manager")))
            .with_position(440.0, 150.0),
    )?;
    let account = workflow.try_add_node(
        Node::automated("create_account", "Create IT Account")
            .with_kind(NodeKind::Automated(
                AutomatedAttributes::action("create_user_account")
                    .with_param("username", "new.hire")
                    .with_param("department", "Engineering"),
            ))
            .with_position(660.0, 150.0),
    )?;
    let done = workflow.try_add_node(
        Node::completion("onboarded", "Onboarded")
            .with_kind(NodeKind::Completion(CompletionAttributes::with_message(
                "Welcome aboard!",
            )))
            .with_position(880.0, 150.0),
    )?;

    workflow.try_connect(start, documents.clone())?;
    workflow.try_connect(documents, approval.clone())?;
    workflow.try_connect(approval, account.clone())?;
    workflow.try_connect(account, done)?;

    workflow.save(&output)?;

    println!("✨ Created example workflow: {}", output.display());
    println!();
    println!("Run it with:");
    println!("  hrflow run --file {}", output.display());

    Ok(())
}
