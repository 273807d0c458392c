use cogload::{
    gateway::{
        error::{GatewayError, GatewayErrorKind},
        testing::ScriptedBackend,
    },
    orchestration::{CollectiveMemory, Orchestrator},
};

use crate::support::session;

#[tokio::test]
async fn given_list_in_prose_when_decompose_then_styles_are_taken_verbatim() {
    let backend = ScriptedBackend::constant(
        "Plan:\n```json\n[\"Algebra\", \"Geometry\", \"Estimation\"]\n```",
    );
    let orchestrator = Orchestrator::new(session(&backend));

    let decomposition = orchestrator.decompose("Q", 3).await;
    assert!(!decomposition.fell_back);
    assert_eq!(decomposition.styles, vec!["Algebra", "Geometry", "Estimation"]);
}

#[tokio::test]
async fn given_unparseable_reply_when_decompose_then_three_fallback_styles() {
    let backend = ScriptedBackend::constant("I would rather not answer in JSON.");
    let orchestrator = Orchestrator::new(session(&backend));

    let decomposition = orchestrator.decompose("Q", 3).await;
    assert!(decomposition.fell_back);
    assert_eq!(decomposition.styles.len(), 3);
    assert!(decomposition.styles.iter().all(|style| !style.trim().is_empty()));
    assert_eq!(decomposition.styles[0], "Analytical Style 1");
}

#[tokio::test]
async fn given_wrong_length_list_when_decompose_then_fallback_keeps_requested_count() {
    let backend = ScriptedBackend::constant(r#"["only", "two"]"#);
    let orchestrator = Orchestrator::new(session(&backend));

    let decomposition = orchestrator.decompose("Q", 3).await;
    assert!(decomposition.fell_back);
    assert_eq!(decomposition.styles.len(), 3);
}

#[tokio::test]
async fn given_failed_call_when_decompose_then_fallback_styles() {
    let backend = ScriptedBackend::new(|_, _| {
        Err(GatewayError::new(GatewayErrorKind::Unknown, "boom"))
    });
    let orchestrator = Orchestrator::new(session(&backend));

    let decomposition = orchestrator.decompose("Q", 4).await;
    assert!(decomposition.fell_back);
    assert_eq!(decomposition.styles.len(), 4);
    assert!(decomposition.response.failure().is_some());
}

#[tokio::test]
async fn given_memory_when_synthesize_then_prompt_embeds_outputs_and_history() {
    let backend = ScriptedBackend::constant(r#"{"answer": "A", "reasoning": "r"}"#);
    let orchestrator = Orchestrator::new(session(&backend));
    let mut memory = CollectiveMemory::new();
    memory
        .update(vec!["first thought".to_string()], 0)
        .expect("round 0 should be accepted");

    let output = orchestrator
        .synthesize("What is x?", &["final thought".to_string()], &memory)
        .await;

    assert_eq!(output.as_text(), Some(r#"{"answer": "A", "reasoning": "r"}"#));
    let prompt = &backend.calls()[0].prompt;
    assert!(prompt.contains("ORIGINAL QUERY:\nWhat is x?"));
    assert!(prompt.contains("\"final thought\""));
    assert!(prompt.contains("\"first thought\""));
}
