//! Tool Protocol and Broadcast Integration Tests
//!
//! The agent-session path end to end: tool calls through the executor,
//! schema validation, broadcast coupling, and the status state machine.

use std::sync::Arc;

use serde_json::json;

use social_canvas::services::agent::{AgentSession, SessionEvent, TurnDecision};
use social_canvas::services::canvas::CanvasAggregate;
use social_canvas::services::knowledge::{ContentType, InMemoryKnowledgeSearch, SeedDocument};
use social_canvas::services::tools::impls::thread_context::InMemoryThreadContexts;
use social_canvas::services::tools::ToolRegistry;
use social_canvas::services::venture::VentureProfileService;
use social_canvas::storage::Database;
use social_canvas_core::AgentStatus;

const PURPOSE: &str = "We exist to help under-banked artisans reach global buyers";

fn session_with_docs(documents: Vec<SeedDocument>) -> AgentSession {
    let db = Database::new_in_memory().unwrap();
    db.create_canvas("c1", "Test").unwrap();
    AgentSession::new(
        "conv-1",
        Arc::new(CanvasAggregate::open(db.clone(), "c1").unwrap()),
        Arc::new(VentureProfileService::new(db, "c1")),
        Arc::new(InMemoryKnowledgeSearch::new(documents)),
        Arc::new(InMemoryThreadContexts::default()),
        Arc::new(ToolRegistry::with_builtin_tools()),
    )
}

fn session() -> AgentSession {
    session_with_docs(Vec::new())
}

fn canvas_events(rx: &mut tokio::sync::broadcast::Receiver<SessionEvent>) -> Vec<String> {
    let mut tokens = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let SessionEvent::Canvas(e) = event {
            tokens.push(e.canvas_updated_at);
        }
    }
    tokens
}

#[tokio::test]
async fn test_mutating_tool_broadcasts_exactly_once() {
    let session = session();
    let mut rx = session.subscribe();
    session.begin_turn("set the purpose");

    let result = session
        .execute_tool("update_purpose", json!({"content": PURPOSE}))
        .await
        .unwrap();
    assert!(result.success);
    assert_eq!(canvas_events(&mut rx).len(), 1);
}

#[tokio::test]
async fn test_read_only_tool_broadcasts_nothing() {
    let session = session();
    let mut rx = session.subscribe();
    session.begin_turn("look at the canvas");

    for tool in ["get_canvas", "get_completion_status", "get_venture_profile"] {
        let result = session.execute_tool(tool, json!({})).await.unwrap();
        assert!(result.success, "{} failed", tool);
    }
    assert!(canvas_events(&mut rx).is_empty());
}

#[tokio::test]
async fn test_each_mutating_call_broadcasts_an_intermediate_state() {
    let session = session();
    let mut rx = session.subscribe();
    session.begin_turn("fill the chain");

    session
        .execute_tool(
            "update_impact_field",
            json!({"field": "issue", "content": "Lack of market access for rural artisans"}),
        )
        .await
        .unwrap();
    session
        .execute_tool(
            "update_impact_field",
            json!({"field": "participants", "content": "Rural artisan cooperatives"}),
        )
        .await
        .unwrap();

    // clients observe both intermediate snapshots, in order
    let tokens = canvas_events(&mut rx);
    assert_eq!(tokens.len(), 2);
    assert!(tokens[0] <= tokens[1], "change token moved backwards");
}

#[tokio::test]
async fn test_unknown_tool_and_schema_violations_never_execute() {
    let session = session();
    let mut rx = session.subscribe();
    session.begin_turn("bad calls");

    let result = session.execute_tool("delete_canvas", json!({})).await.unwrap();
    assert!(!result.success);
    assert!(result.error.unwrap().contains("Unknown tool"));

    let result = session
        .execute_tool("update_customer_section", json!({"section": "customers"}))
        .await
        .unwrap();
    assert!(!result.success);
    assert!(result.error.unwrap().contains("content"));

    let result = session
        .execute_tool(
            "update_customer_section",
            json!({"section": "not_a_section", "content": PURPOSE}),
        )
        .await
        .unwrap();
    assert!(!result.success);

    assert!(canvas_events(&mut rx).is_empty());
}

#[tokio::test]
async fn test_failed_chain_write_is_narrated_not_broadcast() {
    let session = session();
    let mut rx = session.subscribe();
    session.begin_turn("skip ahead");

    let result = session
        .execute_tool(
            "update_impact_field",
            json!({"field": "impact", "content": "Sustainable artisan livelihoods"}),
        )
        .await
        .unwrap();
    assert!(!result.success);
    // the error text names the prerequisite so the LLM can explain it
    let narration = result.to_content();
    assert!(narration.contains("participants") || narration.contains("issue"));
    assert!(canvas_events(&mut rx).is_empty());
}

#[tokio::test]
async fn test_knowledge_tools_search_without_touching_canvas() {
    let session = session_with_docs(vec![SeedDocument::new(
        "Guide: articulating the value proposition for artisan ventures",
        ContentType::Methodology,
    )]);
    session.begin_turn("research");

    let result = session
        .execute_tool("search_methodology", json!({"query": "value proposition"}))
        .await
        .unwrap();
    assert!(result.success);
    assert!(result.output.unwrap().contains("articulating"));
    assert_eq!(session.status().status, AgentStatus::Searching);

    let canvas = session
        .execute_tool("get_canvas", json!({}))
        .await
        .unwrap();
    assert!(canvas.output.unwrap().contains("0% complete"));
}

#[tokio::test]
async fn test_full_turn_status_sequence() {
    let session = session();
    let mut statuses = Vec::new();
    let mut rx = session.subscribe();

    assert_eq!(session.begin_turn("please fill the purpose"), TurnDecision::Started);
    session.begin_context_assembly();
    session
        .execute_tool("update_purpose", json!({"content": PURPOSE}))
        .await
        .unwrap();
    assert!(session.complete_turn().is_none());

    while let Ok(event) = rx.try_recv() {
        if let SessionEvent::Status(update) = event {
            statuses.push(update.status);
        }
    }
    assert_eq!(
        statuses,
        vec![
            AgentStatus::Thinking,
            AgentStatus::Searching,
            AgentStatus::Updating,
            AgentStatus::Idle
        ]
    );
}

#[tokio::test]
async fn test_queued_message_waits_for_turn_completion() {
    let session = session();
    assert_eq!(session.begin_turn("first message"), TurnDecision::Started);
    assert_eq!(session.begin_turn("second message"), TurnDecision::Queued);

    let next = session.complete_turn();
    assert_eq!(next.as_deref(), Some("second message"));
    assert_eq!(session.begin_turn(next.unwrap()), TurnDecision::Started);
}

#[tokio::test]
async fn test_registry_definitions_expose_wire_contract() {
    let registry = ToolRegistry::with_builtin_tools();
    let definitions = registry.definitions();
    assert_eq!(definitions.len(), 12);

    let update_impact = definitions
        .iter()
        .find(|d| d.name == "update_impact_field")
        .unwrap();
    assert!(update_impact.modifies_canvas);
    let required = update_impact.input_schema.required.as_ref().unwrap();
    assert!(required.contains(&"field".to_string()));
    assert!(required.contains(&"content".to_string()));

    let searches: Vec<_> = definitions
        .iter()
        .filter(|d| d.name.starts_with("search_"))
        .collect();
    assert_eq!(searches.len(), 3);
    assert!(searches.iter().all(|d| !d.modifies_canvas));
}
