use std::time::Duration;

use cogload::{
    gateway::{
        error::{GatewayError, GatewayErrorKind},
        testing::ScriptedBackend,
    },
    orchestration::{Agent, AgentId, AgentOutput},
};

use crate::support::session;

#[tokio::test]
async fn given_successful_call_when_generate_then_text_output() {
    let backend = ScriptedBackend::constant("hello");
    let agent = Agent::new(AgentId::Worker(0), session(&backend));

    let output = agent.generate("prompt").await;
    assert_eq!(output.as_text(), Some("hello"));
    assert_eq!(backend.calls()[0].prompt, "prompt");
}

#[tokio::test(start_paused = true)]
async fn given_failing_call_when_generate_then_failure_is_rendered_after_cooldown() {
    let backend = ScriptedBackend::new(|_, _| {
        Err(GatewayError::new(GatewayErrorKind::BackendTransient, "upstream hiccup"))
    });
    let agent = Agent::new(
        AgentId::Worker(2),
        session(&backend).with_failure_cooldown(Duration::from_secs(1)),
    );

    let started = tokio::time::Instant::now();
    let output = agent.generate("prompt").await;

    assert!(started.elapsed() >= Duration::from_secs(1));
    assert!(matches!(
        output,
        AgentOutput::Failed {
            agent: AgentId::Worker(2),
            ..
        }
    ));
    let rendered = output.render();
    assert!(rendered.starts_with("Error in Agent 2: "), "{rendered}");
    assert!(rendered.contains("upstream hiccup"));
}

#[test]
fn given_orchestrator_id_when_displayed_then_named() {
    assert_eq!(AgentId::Orchestrator.to_string(), "Orchestrator");
    assert_eq!(AgentId::Worker(1).to_string(), "1");
}
