use crate::{Node, NodeKindTag, WorkflowError};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier of a node, stable for the node's lifetime
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(format!("node_{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(format!("edge_{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Directed connection between two nodes.
///
/// Parallel edges and self-loops are allowed; each edge is distinct by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: EdgeId::generate(),
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = EdgeId::new(id);
        self
    }
}

/// Node position in visual editor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Snapshot of a workflow graph as handed over by the editor.
///
/// Nodes and edges keep the caller's order; traversal order in the
/// simulator follows edge order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id.clone();
        self.nodes.push(node);
        id
    }

    /// Append an edge from `source` to `target` and return its id
    pub fn connect(&mut self, source: impl Into<NodeId>, target: impl Into<NodeId>) -> EdgeId {
        let edge = Edge::new(source, target);
        let id = edge.id.clone();
        self.edges.push(edge);
        id
    }

    /// Like [`Workflow::add_node`], refusing an id that is already taken
    pub fn try_add_node(&mut self, node: Node) -> Result<NodeId, WorkflowError> {
        if self.node_by_id(&node.id).is_some() {
            return Err(WorkflowError::DuplicateNode(node.id));
        }
        Ok(self.add_node(node))
    }

    /// Like [`Workflow::connect`], refusing endpoints that name no node
    pub fn try_connect(
        &mut self,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
    ) -> Result<EdgeId, WorkflowError> {
        let (source, target) = (source.into(), target.into());
        for endpoint in [&source, &target] {
            if self.node_by_id(endpoint).is_none() {
                return Err(WorkflowError::NodeNotFound(endpoint.clone()));
            }
        }
        Ok(self.connect(source, target))
    }

    pub fn add_edge(&mut self, edge: Edge) -> EdgeId {
        let id = edge.id.clone();
        self.edges.push(edge);
        id
    }

    pub fn with_node(mut self, node: Node) -> Self {
        self.add_node(node);
        self
    }

    pub fn with_edge(mut self, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        self.connect(source, target);
        self
    }

    pub fn node_by_id(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn nodes_of_kind(&self, kind: NodeKindTag) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().filter(move |n| n.kind_tag() == kind)
    }

    pub fn incoming_edges<'a>(&'a self, node_id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| &e.target == node_id)
    }

    pub fn outgoing_edges<'a>(&'a self, node_id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| &e.source == node_id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
