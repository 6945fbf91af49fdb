// crates/hrflowcore/tests/document_test.rs

use hrflowcore::{
    ApprovalAttributes, AutomatedAttributes, CompletionAttributes, FlowError, Node, NodeId,
    NodeKind, NodeKindTag, Position, TaskAttributes, Workflow, WorkflowError,
};
use serde_json::json;
use uuid::Uuid;

fn full_workflow() -> Workflow {
    let mut entry = Node::entry("start", "Offer Accepted").with_position(0.0, 120.0);
    if let NodeKind::Entry(attrs) = &mut entry.kind {
        attrs.metadata.insert("source".to_string(), "ats".to_string());
    }

    Workflow::named("Hiring")
        .with_node(entry)
        .with_node(
            Node::task("docs", "Collect Documents")
                .with_kind(NodeKind::Task(
                    TaskAttributes::assigned_to("Alice")
                        .with_due_date("2024-05-01")
                        .with_description("Passport and tax forms"),
                ))
                .with_position(200.0, 120.5),
        )
        .with_node(Node::approval("hr", "HR Sign-off").with_kind(NodeKind::Approval(
            ApprovalAttributes::for_role("HR Manager").with_threshold(75.0),
        )))
        .with_node(Node::automated("mail", "Welcome Mail").with_kind(NodeKind::Automated(
            AutomatedAttributes::action("send_email")
                .with_param("to", "new.hire@example.com")
                .with_param("retries", 3),
        )))
        .with_node(Node::completion("end", "Hired").with_kind(NodeKind::Completion(
            CompletionAttributes {
                end_message: Some("Welcome aboard".to_string()),
                is_summary: true,
            },
        )))
        .with_edge("start", "docs")
        .with_edge("docs", "hr")
        .with_edge("hr", "mail")
        .with_edge("mail", "end")
}

#[test]
fn test_export_import_is_lossless() {
    let workflow = full_workflow();

    let json = workflow.to_json_pretty().unwrap();
    let restored = Workflow::from_json(&json).unwrap();

    assert_eq!(restored, workflow);
}

#[test]
fn test_wire_shape() {
    let workflow = full_workflow();

    let value = serde_json::to_value(&workflow).unwrap();
    let docs = &value["nodes"][1];

    assert_eq!(docs["id"], json!("docs"));
    assert_eq!(docs["kind"], json!("task"));
    assert_eq!(docs["label"], json!("Collect Documents"));
    assert_eq!(docs["attributes"]["assignee"], json!("Alice"));
    assert_eq!(docs["attributes"]["dueDate"], json!("2024-05-01"));
    assert_eq!(docs["position"], json!({ "x": 200.0, "y": 120.5 }));
    assert_eq!(value["nodes"][2]["attributes"]["approverRole"], json!("HR Manager"));
    assert_eq!(value["nodes"][3]["attributes"]["actionId"], json!("send_email"));
    assert_eq!(value["nodes"][4]["attributes"]["isSummary"], json!(true));

    let edge = &value["edges"][0];
    assert_eq!(edge["source"], json!("start"));
    assert_eq!(edge["target"], json!("docs"));
    assert!(edge["id"].as_str().unwrap().starts_with("edge_"));
}

#[test]
fn test_import_accepts_editor_kind_names() {
    let json = r#"{
        "nodes": [
            { "id": "s", "kind": "start", "label": "Start" },
            { "id": "t", "kind": "task", "label": "Review", "attributes": { "assignee": "Bob" } },
            { "id": "e", "kind": "end", "label": "End", "attributes": {} }
        ],
        "edges": [
            { "id": "1", "source": "s", "target": "t" },
            { "id": "2", "source": "t", "target": "e" }
        ]
    }"#;

    let workflow = Workflow::from_json(json).unwrap();

    assert_eq!(workflow.node_count(), 3);
    assert_eq!(workflow.edge_count(), 2);
    assert_eq!(workflow.nodes[0].kind_tag(), NodeKindTag::Entry);
    assert_eq!(workflow.nodes[2].kind_tag(), NodeKindTag::Completion);
    match &workflow.nodes[1].kind {
        NodeKind::Task(attrs) => assert_eq!(attrs.assignee.as_deref(), Some("Bob")),
        other => panic!("expected task, got {:?}", other),
    }
}

#[test]
fn test_import_editor_export_shape() {
    let json = r#"{
        "nodes": [
            { "id": "1", "type": "start", "label": "Start", "config": {}, "position": { "x": 0, "y": 0 } },
            { "id": "2", "type": "task", "label": "Review", "config": { "assignee": "Alice" }, "position": { "x": 200, "y": 0 } },
            { "id": "3", "type": "end", "label": "Done", "config": {}, "position": { "x": 400, "y": 0 } }
        ],
        "edges": [
            { "id": "e1-2", "source": "1", "target": "2", "animated": true },
            { "id": "e2-3", "source": "2", "target": "3" }
        ]
    }"#;

    let workflow = Workflow::from_json(json).unwrap();

    let kinds: Vec<_> = workflow.nodes.iter().map(|n| n.kind_tag()).collect();
    assert_eq!(
        kinds,
        vec![NodeKindTag::Entry, NodeKindTag::Task, NodeKindTag::Completion]
    );
    match &workflow.nodes[1].kind {
        NodeKind::Task(attrs) => assert_eq!(attrs.assignee.as_deref(), Some("Alice")),
        other => panic!("expected task, got {:?}", other),
    }
    assert_eq!(workflow.nodes[2].position, Some(Position { x: 400.0, y: 0.0 }));
    assert_eq!(workflow.edge_count(), 2);

    // Export always writes the canonical field names
    let value = serde_json::to_value(&workflow).unwrap();
    assert_eq!(value["nodes"][1]["kind"], json!("task"));
    assert_eq!(value["nodes"][1]["attributes"]["assignee"], json!("Alice"));
}

#[test]
fn test_missing_sections_default_to_empty() {
    let workflow = Workflow::from_json(r#"{ "nodes": [ { "id": "a", "kind": "approval" } ] }"#).unwrap();

    assert!(workflow.edges.is_empty());
    assert_eq!(workflow.nodes[0].label, "");
    assert_eq!(
        workflow.nodes[0].kind,
        NodeKind::Approval(ApprovalAttributes::default())
    );
    assert_eq!(workflow.nodes[0].position, None);
}

#[test]
fn test_mismatched_attributes_are_rejected() {
    let json = r#"{
        "nodes": [ { "id": "t", "kind": "task", "label": "Bad", "attributes": { "assignee": 5 } } ],
        "edges": []
    }"#;

    let err = Workflow::from_json(json).unwrap_err();

    assert!(matches!(err, FlowError::Serialization(_)));
    assert!(err.to_string().contains("Invalid attributes for task node 't'"));
}

#[test]
fn test_unknown_kind_is_rejected() {
    let json = r#"{ "nodes": [ { "id": "x", "kind": "decision", "label": "X" } ], "edges": [] }"#;

    assert!(Workflow::from_json(json).is_err());
}

#[test]
fn test_save_and_load() {
    let path = std::env::temp_dir().join(format!("hrflow-{}.json", Uuid::new_v4()));
    let workflow = full_workflow();

    workflow.save(&path).unwrap();
    let loaded = Workflow::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded, workflow);
}

#[test]
fn test_load_missing_file_is_io_error() {
    let path = std::env::temp_dir().join(format!("hrflow-missing-{}.json", Uuid::new_v4()));

    assert!(matches!(Workflow::load(&path), Err(FlowError::Io(_))));
}

#[test]
fn test_graph_queries() {
    let workflow = full_workflow();
    let docs = NodeId::from("docs");

    assert_eq!(workflow.node_by_id(&docs).map(|n| n.label.as_str()), Some("Collect Documents"));
    assert!(workflow.node_by_id(&NodeId::from("nope")).is_none());
    assert_eq!(workflow.nodes_of_kind(NodeKindTag::Task).count(), 1);
    assert_eq!(workflow.incoming_edges(&docs).count(), 1);
    assert_eq!(workflow.outgoing_edges(&docs).next().map(|e| e.target.as_str()), Some("hr"));
    assert_eq!(
        workflow.node_by_id(&docs).and_then(|n| n.position),
        Some(Position { x: 200.0, y: 120.5 })
    );
}

#[test]
fn test_strict_builders() {
    let mut workflow = Workflow::new();
    workflow.try_add_node(Node::entry("start", "Start")).unwrap();
    workflow.try_add_node(Node::completion("end", "End")).unwrap();

    assert_eq!(
        workflow.try_add_node(Node::task("start", "Clash")),
        Err(WorkflowError::DuplicateNode(NodeId::from("start")))
    );
    assert_eq!(
        workflow.try_connect("start", "missing"),
        Err(WorkflowError::NodeNotFound(NodeId::from("missing")))
    );
    assert!(workflow.try_connect("start", "end").is_ok());
    assert_eq!(workflow.node_count(), 2);
    assert_eq!(workflow.edge_count(), 1);
}

#[test]
fn test_generated_ids_are_unique() {
    let a = Node::generated("A", NodeKind::empty(NodeKindTag::Task));
    let b = Node::generated("B", NodeKind::empty(NodeKindTag::Task));

    assert_ne!(a.id, b.id);
    assert!(a.id.as_str().starts_with("node_"));
}
