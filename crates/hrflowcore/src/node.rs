use crate::{NodeId, Position, WorkflowError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Discriminant of [`NodeKind`], used for queries and on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKindTag {
    #[serde(alias = "start")]
    Entry,
    Task,
    Approval,
    Automated,
    #[serde(alias = "end")]
    Completion,
}

impl NodeKindTag {
    pub const ALL: [NodeKindTag; 5] = [
        NodeKindTag::Entry,
        NodeKindTag::Task,
        NodeKindTag::Approval,
        NodeKindTag::Automated,
        NodeKindTag::Completion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKindTag::Entry => "entry",
            NodeKindTag::Task => "task",
            NodeKindTag::Approval => "approval",
            NodeKindTag::Automated => "automated",
            NodeKindTag::Completion => "completion",
        }
    }

    /// One-line description for palettes and CLI listings
    pub fn description(&self) -> &'static str {
        match self {
            NodeKindTag::Entry => "Starting point of the process; exactly one per workflow",
            NodeKindTag::Task => "Human task with an assignee and optional due date",
            NodeKindTag::Approval => "Approval request routed to a role",
            NodeKindTag::Automated => "Automated system action with parameters",
            NodeKindTag::Completion => "Terminal step marking a finished branch",
        }
    }
}

impl fmt::Display for NodeKindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntryAttributes {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_fields: BTreeMap<String, String>,
}

impl TaskAttributes {
    pub fn assigned_to(assignee: impl Into<String>) -> Self {
        Self {
            assignee: Some(assignee.into()),
            ..Self::default()
        }
    }

    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApprovalAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approver_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_approve_threshold: Option<f64>,
}

impl ApprovalAttributes {
    pub fn for_role(role: impl Into<String>) -> Self {
        Self {
            approver_role: Some(role.into()),
            ..Self::default()
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.auto_approve_threshold = Some(threshold);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AutomatedAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_id: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub action_params: BTreeMap<String, serde_json::Value>,
}

impl AutomatedAttributes {
    pub fn action(action_id: impl Into<String>) -> Self {
        Self {
            action_id: Some(action_id.into()),
            ..Self::default()
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.action_params.insert(name.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompletionAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_message: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_summary: bool,
}

impl CompletionAttributes {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            end_message: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Kind of a workflow step together with the attributes only that kind carries
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Entry(EntryAttributes),
    Task(TaskAttributes),
    Approval(ApprovalAttributes),
    Automated(AutomatedAttributes),
    Completion(CompletionAttributes),
}

impl NodeKind {
    pub fn tag(&self) -> NodeKindTag {
        match self {
            NodeKind::Entry(_) => NodeKindTag::Entry,
            NodeKind::Task(_) => NodeKindTag::Task,
            NodeKind::Approval(_) => NodeKindTag::Approval,
            NodeKind::Automated(_) => NodeKindTag::Automated,
            NodeKind::Completion(_) => NodeKindTag::Completion,
        }
    }

    /// Kind with empty attributes, as dropped from a palette
    pub fn empty(tag: NodeKindTag) -> Self {
        match tag {
            NodeKindTag::Entry => NodeKind::Entry(EntryAttributes::default()),
            NodeKindTag::Task => NodeKind::Task(TaskAttributes::default()),
            NodeKindTag::Approval => NodeKind::Approval(ApprovalAttributes::default()),
            NodeKindTag::Automated => NodeKind::Automated(AutomatedAttributes::default()),
            NodeKindTag::Completion => NodeKind::Completion(CompletionAttributes::default()),
        }
    }

    fn from_attributes(
        node_id: &NodeId,
        tag: NodeKindTag,
        attributes: serde_json::Value,
    ) -> Result<Self, WorkflowError> {
        let attributes = if attributes.is_null() {
            serde_json::Value::Object(Default::default())
        } else {
            attributes
        };

        let kind = match tag {
            NodeKindTag::Entry => serde_json::from_value(attributes).map(NodeKind::Entry),
            NodeKindTag::Task => serde_json::from_value(attributes).map(NodeKind::Task),
            NodeKindTag::Approval => serde_json::from_value(attributes).map(NodeKind::Approval),
            NodeKindTag::Automated => serde_json::from_value(attributes).map(NodeKind::Automated),
            NodeKindTag::Completion => serde_json::from_value(attributes).map(NodeKind::Completion),
        };

        kind.map_err(|e| WorkflowError::InvalidAttributes {
            node_id: node_id.clone(),
            kind: tag,
            reason: e.to_string(),
        })
    }

    fn to_attributes(&self) -> serde_json::Value {
        let value = match self {
            NodeKind::Entry(attrs) => serde_json::to_value(attrs),
            NodeKind::Task(attrs) => serde_json::to_value(attrs),
            NodeKind::Approval(attrs) => serde_json::to_value(attrs),
            NodeKind::Automated(attrs) => serde_json::to_value(attrs),
            NodeKind::Completion(attrs) => serde_json::to_value(attrs),
        };
        // String-keyed maps and plain fields always serialize.
        value.unwrap_or_default()
    }
}

/// A step in the workflow graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NodeRecord", into = "NodeRecord")]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub kind: NodeKind,
    /// Canvas layout, carried through untouched
    pub position: Option<Position>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            position: None,
        }
    }

    /// Create a node with a freshly generated id
    pub fn generated(label: impl Into<String>, kind: NodeKind) -> Self {
        Self::new(NodeId::generate(), label, kind)
    }

    pub fn entry(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self::new(id, label, NodeKind::empty(NodeKindTag::Entry))
    }

    pub fn task(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self::new(id, label, NodeKind::empty(NodeKindTag::Task))
    }

    pub fn approval(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self::new(id, label, NodeKind::empty(NodeKindTag::Approval))
    }

    pub fn automated(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self::new(id, label, NodeKind::empty(NodeKindTag::Automated))
    }

    pub fn completion(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self::new(id, label, NodeKind::empty(NodeKindTag::Completion))
    }

    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Position { x, y });
        self
    }

    pub fn kind_tag(&self) -> NodeKindTag {
        self.kind.tag()
    }
}

/// Wire shape of a node: `{ id, kind, label, attributes, position }`.
///
/// Editor exports name the same fields `type` and `config`.
#[derive(Serialize, Deserialize)]
struct NodeRecord {
    id: NodeId,
    #[serde(alias = "type")]
    kind: NodeKindTag,
    #[serde(default)]
    label: String,
    #[serde(default, alias = "config")]
    attributes: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<Position>,
}

impl TryFrom<NodeRecord> for Node {
    type Error = WorkflowError;

    fn try_from(record: NodeRecord) -> Result<Self, Self::Error> {
        let kind = NodeKind::from_attributes(&record.id, record.kind, record.attributes)?;
        Ok(Node {
            id: record.id,
            label: record.label,
            kind,
            position: record.position,
        })
    }
}

impl From<Node> for NodeRecord {
    fn from(node: Node) -> Self {
        NodeRecord {
            kind: node.kind.tag(),
            attributes: node.kind.to_attributes(),
            id: node.id,
            label: node.label,
            position: node.position,
        }
    }
}
