use chrono::{DateTime, Utc};
use hrflowcore::{
    ExecutionStep, ExecutionTrace, Node, NodeId, NodeKind, NodeKindTag, StepStatus, Workflow,
};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{EdgeRef, VisitMap, Visitable};
use petgraph::Direction;
use std::collections::{HashMap, VecDeque};

/// Simulate a run of `workflow`, stamping steps with the current time.
///
/// Callers are expected to have validated the workflow first. The only case
/// handled here is a missing entry node, which yields a failed trace with a
/// single system step.
pub fn simulate(workflow: &Workflow) -> ExecutionTrace {
    simulate_with_clock(workflow, Utc::now)
}

/// Same as [`simulate`] with a caller-supplied timestamp source
pub fn simulate_with_clock(
    workflow: &Workflow,
    mut clock: impl FnMut() -> DateTime<Utc>,
) -> ExecutionTrace {
    let graph = SimulationGraph::build(workflow);

    let Some(entry) = graph.entry else {
        tracing::warn!("Simulation aborted: no entry point found");
        return ExecutionTrace {
            success: false,
            steps: vec![ExecutionStep {
                step_id: 1,
                node_id: None,
                node_kind: None,
                node_label: "System".to_string(),
                message: "No entry point found.".to_string(),
                status: StepStatus::Failure,
                timestamp: clock(),
            }],
        };
    };

    let mut steps = Vec::with_capacity(workflow.node_count());
    let mut visited = graph.graph.visit_map();
    let mut queue = VecDeque::from([entry]);
    let mut step_id = 0u32;

    // Duplicates may sit in the queue; they are dropped when popped.
    while let Some(idx) = queue.pop_front() {
        if !visited.visit(idx) {
            continue;
        }

        let node = graph.graph[idx];
        step_id += 1;
        tracing::debug!(step_id, node_id = %node.id, kind = %node.kind_tag(), "Simulated step");

        steps.push(ExecutionStep {
            step_id,
            node_id: Some(node.id.clone()),
            node_kind: Some(node.kind_tag()),
            node_label: node.label.clone(),
            message: step_message(node),
            status: StepStatus::Success,
            timestamp: clock(),
        });

        queue.extend(graph.successors(idx));
    }

    ExecutionTrace {
        success: true,
        steps,
    }
}

/// Log line for a step, derived from the node's kind and attributes
pub fn step_message(node: &Node) -> String {
    match &node.kind {
        NodeKind::Task(attrs) => format!(
            "Task assigned to {}",
            or_placeholder(&attrs.assignee, "Unassigned")
        ),
        NodeKind::Approval(attrs) => format!(
            "Approval request sent to {}",
            or_placeholder(&attrs.approver_role, "Admin")
        ),
        NodeKind::Automated(attrs) => format!(
            "Triggered automation: {}",
            or_placeholder(&attrs.action_id, "None")
        ),
        NodeKind::Entry(_) | NodeKind::Completion(_) => format!("Executed {}", node.label),
    }
}

fn or_placeholder<'a>(value: &'a Option<String>, placeholder: &'a str) -> &'a str {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .unwrap_or(placeholder)
}

/// Arena view of a workflow: one graph index per node, edges in list order
struct SimulationGraph<'a> {
    graph: DiGraph<&'a Node, ()>,
    entry: Option<NodeIndex>,
}

impl<'a> SimulationGraph<'a> {
    fn build(workflow: &'a Workflow) -> Self {
        let mut graph = DiGraph::with_capacity(workflow.node_count(), workflow.edge_count());
        let mut node_to_index: HashMap<&NodeId, NodeIndex> = HashMap::new();
        let mut entry = None;

        for node in &workflow.nodes {
            let idx = graph.add_node(node);
            // Edges otherwise resolve to the first node carrying an id.
            node_to_index.entry(&node.id).or_insert(idx);
            if entry.is_none() && node.kind_tag() == NodeKindTag::Entry {
                entry = Some(idx);
            }
        }

        // The root owns its id even when an earlier node shares it, so its
        // outgoing edges start from the root itself.
        if let Some(idx) = entry {
            let root: &'a Node = graph[idx];
            node_to_index.insert(&root.id, idx);
        }

        for edge in &workflow.edges {
            match (node_to_index.get(&edge.source), node_to_index.get(&edge.target)) {
                (Some(from), Some(to)) => {
                    graph.add_edge(*from, *to, ());
                }
                _ => tracing::debug!(edge_id = %edge.id, "Skipping edge with unknown endpoint"),
            }
        }

        Self { graph, entry }
    }

    /// Targets of outgoing edges, in the order the edges were declared
    fn successors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut outgoing: Vec<_> = self.graph.edges_directed(idx, Direction::Outgoing).collect();
        outgoing.sort_by_key(|e| e.id());
        outgoing.into_iter().map(|e| e.target()).collect()
    }
}
