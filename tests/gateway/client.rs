use std::sync::Arc;

use cogload::gateway::{
    ModelClient,
    error::{GatewayError, GatewayErrorKind},
    testing::ScriptedBackend,
    types::{ChatDelta, ChatRequest, Credential, ModelSpec},
};

fn model() -> ModelSpec {
    ModelSpec {
        name: "m".to_string(),
        model_id: "org/m".to_string(),
        enable_thinking: true,
    }
}

#[tokio::test]
async fn given_interleaved_fragments_when_completed_then_reasoning_and_answer_are_separate() {
    let backend = ScriptedBackend::new(|_, _| {
        Ok(vec![
            ChatDelta::reasoning("step 1. "),
            ChatDelta::content("{\"answer\":"),
            ChatDelta {
                reasoning: Some("step 2.".to_string()),
                content: Some(" \"A\"}".to_string()),
            },
        ])
    });
    let client = ModelClient::new(Arc::new(backend.clone()));

    let completion = client
        .complete(&Credential::new(0, "k0"), ChatRequest::new("r", &model(), "p"))
        .await
        .expect("completion should succeed");

    assert_eq!(completion.reasoning, "step 1. step 2.");
    assert_eq!(completion.answer, "{\"answer\": \"A\"}");
    assert_eq!(backend.call_count(), 1);
    assert!(backend.calls()[0].stream);
}

#[tokio::test]
async fn given_backend_failure_when_completed_then_error_carries_key_index() {
    let backend = ScriptedBackend::new(|_, _| {
        Err(GatewayError::new(GatewayErrorKind::RateLimited, "429 too many requests"))
    });
    let client = ModelClient::new(Arc::new(backend));

    let err = client
        .complete(&Credential::new(3, "k3"), ChatRequest::new("r", &model(), "p"))
        .await
        .expect_err("backend failure should surface");

    assert_eq!(err.kind, GatewayErrorKind::RateLimited);
    assert_eq!(err.credential_index, Some(3));
}
