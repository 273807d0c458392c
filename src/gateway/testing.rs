use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;

use crate::gateway::{
    adapters::ChatBackend,
    error::GatewayError,
    types::{ChatDelta, ChatDeltaStream, ChatRequest, Credential},
};

/// One recorded call made against a [`ScriptedBackend`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub key_index: usize,
    pub request_id: String,
    pub prompt: String,
    pub stream: bool,
}

pub type Responder =
    Arc<dyn Fn(&Credential, &ChatRequest) -> Result<Vec<ChatDelta>, GatewayError> + Send + Sync>;

/// In-process backend driven by a closure, for tests and dry runs.
#[derive(Clone)]
pub struct ScriptedBackend {
    responder: Responder,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl ScriptedBackend {
    pub fn new(
        responder: impl Fn(&Credential, &ChatRequest) -> Result<Vec<ChatDelta>, GatewayError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            responder: Arc::new(responder),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answers every prompt with the same text.
    pub fn constant(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(move |_, _| Ok(vec![ChatDelta::content(text.clone())]))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    pub fn calls_by_key(&self) -> HashMap<usize, usize> {
        let mut counts = HashMap::new();
        for call in self.calls() {
            *counts.entry(call.key_index).or_insert(0) += 1;
        }
        counts
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn invoke_stream(
        &self,
        credential: &Credential,
        req: ChatRequest,
    ) -> Result<ChatDeltaStream, GatewayError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                key_index: credential.index,
                request_id: req.request_id.clone(),
                prompt: req.prompt.clone(),
                stream: req.stream(),
            });
        }
        let deltas = (self.responder)(credential, &req)?;
        Ok(Box::pin(tokio_stream::iter(
            deltas.into_iter().map(Ok).collect::<Vec<_>>(),
        )))
    }
}
