use hrflowcore::{Node, NodeKind, Workflow};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An automated action that AUTOMATED nodes can reference by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDefinition {
    pub id: String,
    pub label: String,
    /// Parameter names the action expects
    pub params: Vec<String>,
}

impl ActionDefinition {
    pub fn new(id: impl Into<String>, label: impl Into<String>, params: &[&str]) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Registry of known automated actions
pub struct ActionCatalog {
    actions: HashMap<String, ActionDefinition>,
}

impl ActionCatalog {
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    /// Catalog holding the built-in HR automations
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        catalog.register(ActionDefinition::new(
            "send_email",
            "Send Email",
            &["to", "subject", "body"],
        ));
        catalog.register(ActionDefinition::new(
            "generate_contract",
            "Generate Contract",
            &["template_id", "candidate_name"],
        ));
        catalog.register(ActionDefinition::new(
            "notify_slack",
            "Notify Slack Channel",
            &["channel", "message"],
        ));
        catalog.register(ActionDefinition::new(
            "create_user_account",
            "Create IT Account",
            &["username", "department"],
        ));
        catalog
    }

    /// Register an action, replacing any previous definition with the same id
    pub fn register(&mut self, action: ActionDefinition) {
        tracing::debug!("Registering action: {}", action.id);
        self.actions.insert(action.id.clone(), action);
    }

    pub fn get(&self, id: &str) -> Option<&ActionDefinition> {
        self.actions.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.actions.contains_key(id)
    }

    /// All actions, sorted by id
    pub fn list(&self) -> Vec<&ActionDefinition> {
        let mut actions: Vec<_> = self.actions.values().collect();
        actions.sort_by(|a, b| a.id.cmp(&b.id));
        actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// AUTOMATED nodes naming an action this catalog does not know.
    ///
    /// Nodes without an action id are not reported.
    pub fn unknown_actions<'a>(&self, workflow: &'a Workflow) -> Vec<&'a Node> {
        workflow
            .nodes
            .iter()
            .filter(|node| match &node.kind {
                NodeKind::Automated(attrs) => attrs
                    .action_id
                    .as_deref()
                    .is_some_and(|id| !id.is_empty() && !self.contains(id)),
                _ => false,
            })
            .collect()
    }
}

impl Default for ActionCatalog {
    fn default() -> Self {
        Self::new()
    }
}
