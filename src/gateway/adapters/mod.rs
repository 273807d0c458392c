use async_trait::async_trait;

use crate::gateway::{
    error::GatewayError,
    types::{ChatDeltaStream, ChatRequest, Credential},
};

pub mod openai_compatible;
pub mod sse;

#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn invoke_stream(
        &self,
        credential: &Credential,
        req: ChatRequest,
    ) -> Result<ChatDeltaStream, GatewayError>;
}
