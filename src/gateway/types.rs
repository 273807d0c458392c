use std::{fmt, pin::Pin, time::Duration};

use futures_core::Stream;
use serde::{Deserialize, Serialize};

use crate::gateway::error::GatewayError;

pub type RequestId = String;
pub const DEFAULT_BASE_URL: &str = "https://api-inference.modelscope.cn/v1/";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Absent means the transport default: a stuck call blocks its worker.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

impl EndpointConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelSpec {
    pub name: String,
    pub model_id: String,
    #[serde(default)]
    pub enable_thinking: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialRef {
    Env { var: String },
    EnvList { var: String },
    InlineToken { token: String },
}

/// One opaque token checked out of the pool, tagged with its pool position.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub index: usize,
    token: String,
}

impl Credential {
    pub fn new(index: usize, token: impl Into<String>) -> Self {
        Self {
            index,
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("index", &self.index)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub request_id: RequestId,
    pub model: String,
    pub prompt: String,
    pub enable_thinking: bool,
}

impl ChatRequest {
    pub fn new(request_id: impl Into<String>, model: &ModelSpec, prompt: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            model: model.model_id.clone(),
            prompt: prompt.into(),
            enable_thinking: model.enable_thinking,
        }
    }

    /// Thinking mode is only served over the streaming protocol.
    pub fn stream(&self) -> bool {
        self.enable_thinking
    }
}

/// One incremental chunk. Either fragment may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatDelta {
    pub reasoning: Option<String>,
    pub content: Option<String>,
}

impl ChatDelta {
    pub fn content(text: impl Into<String>) -> Self {
        Self {
            reasoning: None,
            content: Some(text.into()),
        }
    }

    pub fn reasoning(text: impl Into<String>) -> Self {
        Self {
            reasoning: Some(text.into()),
            content: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatCompletion {
    /// Diagnostic thinking trace; empty outside thinking mode.
    pub reasoning: String,
    pub answer: String,
}

pub type ChatDeltaStream = Pin<Box<dyn Stream<Item = Result<ChatDelta, GatewayError>> + Send>>;
