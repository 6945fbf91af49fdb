//! Structural validation of a workflow graph.
//!
//! Every rule runs on every call and diagnostics accumulate in a fixed
//! order, so a single pass reports all problems at once:
//!
//! 1. exactly one entry node
//! 2. every non-entry node has an incoming edge
//! 3. at least one completion node
//! 4. every non-completion node has an outgoing edge
//! 5. no duplicate node ids, no edges pointing at unknown nodes

use crate::{EdgeId, NodeId, NodeKindTag, Workflow};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use thiserror::Error;

/// A single structural defect found by [`validate`]
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Diagnostic {
    #[error("missing entry point: the workflow needs exactly one entry node")]
    MissingEntry,

    #[error("multiple entry points not allowed ({count} entry nodes found)")]
    MultipleEntries { count: usize },

    #[error("node \"{label}\" is unreachable (no incoming connections)")]
    Unreachable { node_id: NodeId, label: String },

    #[error("missing completion node: the workflow needs at least one completion node")]
    MissingCompletion,

    #[error("node \"{label}\" is a dead end (connect it to another node or a completion node)")]
    DeadEnd { node_id: NodeId, label: String },

    #[error("malformed graph: duplicate node id \"{node_id}\"")]
    DuplicateNodeId { node_id: NodeId },

    #[error("malformed graph: edge \"{edge_id}\" references unknown node \"{node_id}\"")]
    DanglingEdge { edge_id: EdgeId, node_id: NodeId },
}

impl Diagnostic {
    /// True for graph-level defects that do not point at one node
    pub fn is_graph_level(&self) -> bool {
        matches!(
            self,
            Diagnostic::MissingEntry
                | Diagnostic::MultipleEntries { .. }
                | Diagnostic::MissingCompletion
                | Diagnostic::DanglingEdge { .. }
        )
    }
}

/// Verdict of a validation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    /// Display text of `diagnostics`, index for index
    pub errors: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
    /// Nodes to highlight; each id appears once
    pub invalid_node_ids: BTreeSet<NodeId>,
}

impl ValidationResult {
    /// Whether the editor should mark this node as erroneous
    pub fn is_flagged(&self, id: &NodeId) -> bool {
        self.invalid_node_ids.contains(id)
    }
}

#[derive(Default)]
struct Report {
    diagnostics: Vec<Diagnostic>,
    flagged: BTreeSet<NodeId>,
}

impl Report {
    fn push(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(%diagnostic, "Validation rule failed");
        self.diagnostics.push(diagnostic);
    }

    fn flag(&mut self, id: &NodeId) {
        self.flagged.insert(id.clone());
    }

    fn finish(self) -> ValidationResult {
        ValidationResult {
            valid: self.diagnostics.is_empty(),
            errors: self.diagnostics.iter().map(ToString::to_string).collect(),
            diagnostics: self.diagnostics,
            invalid_node_ids: self.flagged,
        }
    }
}

/// Check a workflow snapshot for structural validity.
///
/// Pure and idempotent: the same snapshot always yields the same result.
pub fn validate(workflow: &Workflow) -> ValidationResult {
    let mut report = Report::default();

    let with_incoming: HashSet<&NodeId> = workflow.edges.iter().map(|e| &e.target).collect();
    let with_outgoing: HashSet<&NodeId> = workflow.edges.iter().map(|e| &e.source).collect();

    check_entry_points(workflow, &mut report);

    for node in &workflow.nodes {
        if node.kind_tag() != NodeKindTag::Entry && !with_incoming.contains(&node.id) {
            report.push(Diagnostic::Unreachable {
                node_id: node.id.clone(),
                label: node.label.clone(),
            });
            report.flag(&node.id);
        }
    }

    if workflow.nodes_of_kind(NodeKindTag::Completion).next().is_none() {
        report.push(Diagnostic::MissingCompletion);
    }

    for node in &workflow.nodes {
        if node.kind_tag() != NodeKindTag::Completion && !with_outgoing.contains(&node.id) {
            report.push(Diagnostic::DeadEnd {
                node_id: node.id.clone(),
                label: node.label.clone(),
            });
            report.flag(&node.id);
        }
    }

    check_malformed(workflow, &mut report);

    let result = report.finish();
    tracing::debug!(
        valid = result.valid,
        errors = result.errors.len(),
        flagged = result.invalid_node_ids.len(),
        "Validated workflow"
    );
    result
}

fn check_entry_points(workflow: &Workflow, report: &mut Report) {
    let entries: Vec<&NodeId> = workflow
        .nodes_of_kind(NodeKindTag::Entry)
        .map(|n| &n.id)
        .collect();

    match entries.len() {
        0 => report.push(Diagnostic::MissingEntry),
        1 => {}
        count => {
            report.push(Diagnostic::MultipleEntries { count });
            for id in entries {
                report.flag(id);
            }
        }
    }
}

fn check_malformed(workflow: &Workflow, report: &mut Report) {
    let mut seen: HashMap<&NodeId, usize> = HashMap::new();
    for node in &workflow.nodes {
        let count = seen.entry(&node.id).or_insert(0);
        *count += 1;
        // Report each duplicated id once, at its second occurrence.
        if *count == 2 {
            report.push(Diagnostic::DuplicateNodeId {
                node_id: node.id.clone(),
            });
            report.flag(&node.id);
        }
    }

    for edge in &workflow.edges {
        for endpoint in [&edge.source, &edge.target] {
            if !seen.contains_key(endpoint) {
                report.push(Diagnostic::DanglingEdge {
                    edge_id: edge.id.clone(),
                    node_id: endpoint.clone(),
                });
            }
        }
    }
}
