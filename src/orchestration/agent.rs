use std::{fmt, time::Duration};

use tokio::time::sleep;
use uuid::Uuid;

use crate::gateway::{
    ModelClient,
    error::GatewayError,
    types::{ChatRequest, Credential, ModelSpec},
};

pub const DEFAULT_FAILURE_COOLDOWN: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentId {
    Orchestrator,
    Worker(usize),
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Orchestrator => write!(f, "Orchestrator"),
            Self::Worker(index) => write!(f, "{}", index),
        }
    }
}

/// Result of one agent call. A failure is carried as a value so the
/// orchestration protocol always proceeds.
#[derive(Debug, Clone)]
pub enum AgentOutput {
    Text(String),
    Failed { agent: AgentId, error: GatewayError },
}

impl AgentOutput {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Failed { .. } => None,
        }
    }

    pub fn failure(&self) -> Option<&GatewayError> {
        match self {
            Self::Text(_) => None,
            Self::Failed { error, .. } => Some(error),
        }
    }

    /// Text as seen by downstream prompts and result records.
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Failed { agent, error } => format!("Error in Agent {}: {}", agent, error),
        }
    }
}

/// Everything an agent needs to reach the endpoint for one question under
/// one credential.
#[derive(Clone)]
pub struct ModelSession {
    pub client: ModelClient,
    pub credential: Credential,
    pub model: ModelSpec,
    pub failure_cooldown: Duration,
}

impl ModelSession {
    pub fn new(client: ModelClient, credential: Credential, model: ModelSpec) -> Self {
        Self {
            client,
            credential,
            model,
            failure_cooldown: DEFAULT_FAILURE_COOLDOWN,
        }
    }

    pub fn with_failure_cooldown(mut self, cooldown: Duration) -> Self {
        self.failure_cooldown = cooldown;
        self
    }
}

#[derive(Clone)]
pub struct Agent {
    id: AgentId,
    session: ModelSession,
}

impl Agent {
    pub fn new(id: AgentId, session: ModelSession) -> Self {
        Self { id, session }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub async fn generate(&self, prompt: &str) -> AgentOutput {
        let request = ChatRequest::new(
            format!("agent-{}-{}", self.id, Uuid::now_v7()),
            &self.session.model,
            prompt,
        );

        match self
            .session
            .client
            .complete(&self.session.credential, request)
            .await
        {
            Ok(completion) => AgentOutput::Text(completion.answer),
            Err(error) => {
                sleep(self.session.failure_cooldown).await;
                tracing::warn!(
                    target: "orchestration",
                    agent = %self.id,
                    kind = ?error.kind,
                    error = %error,
                    "agent_call_failed"
                );
                AgentOutput::Failed {
                    agent: self.id,
                    error,
                }
            }
        }
    }
}
