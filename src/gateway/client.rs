use std::sync::Arc;

use futures_util::StreamExt;

use crate::gateway::{
    adapters::ChatBackend,
    error::GatewayError,
    types::{ChatCompletion, ChatRequest, Credential},
};

/// Folds a backend's delta stream into one completion. Reasoning and answer
/// fragments are accumulated separately.
#[derive(Clone)]
pub struct ModelClient {
    backend: Arc<dyn ChatBackend>,
}

impl ModelClient {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    pub async fn complete(
        &self,
        credential: &Credential,
        request: ChatRequest,
    ) -> Result<ChatCompletion, GatewayError> {
        let request_id = request.request_id.clone();
        let stream_mode = request.stream();
        tracing::debug!(
            target: "gateway",
            request_id = %request_id,
            model = %request.model,
            stream = stream_mode,
            key_index = credential.index,
            prompt_chars = request.prompt.chars().count(),
            "chat_request_prepared"
        );

        let tag = |err: GatewayError| err.with_credential_index(credential.index);
        let mut stream = self
            .backend
            .invoke_stream(credential, request)
            .await
            .map_err(tag)?;

        let mut completion = ChatCompletion::default();
        while let Some(item) = stream.next().await {
            let delta = item.map_err(tag)?;
            if let Some(reasoning) = delta.reasoning {
                completion.reasoning.push_str(&reasoning);
            }
            if let Some(content) = delta.content {
                completion.answer.push_str(&content);
            }
        }

        tracing::debug!(
            target: "gateway",
            request_id = %request_id,
            reasoning_chars = completion.reasoning.chars().count(),
            answer_chars = completion.answer.chars().count(),
            "chat_request_completed"
        );
        Ok(completion)
    }
}
