use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, header};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::gateway::{
    adapters::{
        ChatBackend,
        sse::{SseDecoder, SseFrame},
    },
    error::{
        GatewayError, GatewayErrorKind, classify_failure_message, invalid_request, map_http_error,
        protocol_violation,
    },
    types::{ChatDelta, ChatDeltaStream, ChatRequest, Credential, EndpointConfig},
};

#[derive(Clone)]
pub struct OpenAiCompatibleBackend {
    client: Client,
    endpoint: EndpointConfig,
}

impl OpenAiCompatibleBackend {
    pub fn new(endpoint: EndpointConfig) -> Result<Self, GatewayError> {
        if endpoint.base_url.trim().is_empty() {
            return Err(invalid_request("openai-compatible backend requires base_url"));
        }
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| invalid_request(format!("failed to build http client: {}", err)))?;
        Ok(Self { client, endpoint })
    }

    fn url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.endpoint.base_url.trim_end_matches('/')
        )
    }
}

pub fn request_body(req: &ChatRequest) -> Value {
    json!({
        "model": req.model,
        "messages": [{"role": "user", "content": req.prompt}],
        "stream": req.stream(),
        "enable_thinking": req.enable_thinking,
    })
}

#[async_trait]
impl ChatBackend for OpenAiCompatibleBackend {
    async fn invoke_stream(
        &self,
        credential: &Credential,
        req: ChatRequest,
    ) -> Result<ChatDeltaStream, GatewayError> {
        let mut req_builder = self
            .client
            .post(self.url())
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, credential.auth_header())
            .header("x-request-id", req.request_id.clone())
            .json(&request_body(&req));
        if let Some(timeout) = self.endpoint.request_timeout() {
            req_builder = req_builder.timeout(timeout);
        }

        let response = req_builder.send().await.map_err(transport_error)?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, &body));
        }

        if !req.stream() {
            let payload = response.json::<Value>().await.map_err(|err| {
                protocol_violation(format!("openai-compatible body decode failed: {}", err))
            })?;
            let delta = parse_non_stream_payload(&payload)?;
            return Ok(Box::pin(tokio_stream::iter(vec![Ok(delta)])));
        }

        let (tx, rx) = mpsc::channel::<Result<ChatDelta, GatewayError>>(64);
        let request_id = req.request_id.clone();

        tokio::spawn(async move {
            let mut stream = response.bytes_stream();
            let mut decoder = SseDecoder::default();

            while let Some(item) = stream.next().await {
                let chunk = match item {
                    Ok(chunk) => chunk,
                    Err(err) => {
                        let _ = tx.send(Err(transport_error(err))).await;
                        return;
                    }
                };

                let frames = decoder.push(&chunk);
                if !forward_frames(&tx, frames).await {
                    return;
                }
            }

            let tail = decoder.finish();
            if forward_frames(&tx, tail).await {
                tracing::debug!(
                    target: "gateway",
                    request_id = %request_id,
                    "stream_closed_without_done_marker"
                );
            }
        });

        Ok(Box::pin(ReceiverStream::new(rx)))
    }
}

/// Returns false once the stream is finished or the receiver is gone.
async fn forward_frames(
    tx: &mpsc::Sender<Result<ChatDelta, GatewayError>>,
    frames: Vec<SseFrame>,
) -> bool {
    for frame in frames {
        let data = match frame {
            SseFrame::Done => return false,
            SseFrame::Data(data) => data,
        };

        let parsed = match serde_json::from_str::<Value>(&data) {
            Ok(parsed) => parsed,
            Err(err) => {
                let _ = tx
                    .send(Err(protocol_violation(format!(
                        "failed to parse openai-compatible SSE payload: {}",
                        err
                    ))))
                    .await;
                return false;
            }
        };

        match parse_stream_payload(&parsed) {
            Ok(deltas) => {
                for delta in deltas {
                    if tx.send(Ok(delta)).await.is_err() {
                        return false;
                    }
                }
            }
            Err(err) => {
                let _ = tx.send(Err(err)).await;
                return false;
            }
        }
    }
    true
}

fn transport_error(err: reqwest::Error) -> GatewayError {
    let message = format!("openai-compatible request failed: {}", err);
    let kind = match classify_failure_message(&message) {
        GatewayErrorKind::Unknown => GatewayErrorKind::BackendTransient,
        kind => kind,
    };
    let mut mapped = GatewayError::new(kind, message);
    if let Some(status) = err.status() {
        mapped = mapped.with_provider_http_status(status.as_u16());
    }
    mapped
}

/// Providers report mid-stream failures as an `error` object instead of a
/// status code.
fn embedded_error(payload: &Value) -> Option<GatewayError> {
    let error = payload.get("error")?;
    let message = error
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string());
    let code = error
        .get("code")
        .map(|code| match code {
            Value::String(code) => code.clone(),
            other => other.to_string(),
        })
        .unwrap_or_default();
    let kind = classify_failure_message(&format!("{} {}", code, message));
    Some(GatewayError::new(kind, format!("backend reported error: {} {}", code, message)))
}

fn text_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

pub fn parse_stream_payload(payload: &Value) -> Result<Vec<ChatDelta>, GatewayError> {
    if let Some(err) = embedded_error(payload) {
        return Err(err);
    }

    let choices = payload
        .get("choices")
        .and_then(Value::as_array)
        .ok_or_else(|| protocol_violation("openai-compatible stream payload missing choices"))?;

    let mut deltas = Vec::new();
    for choice in choices {
        let Some(delta) = choice.get("delta") else {
            continue;
        };
        let parsed = ChatDelta {
            reasoning: text_field(delta, &["reasoning_content", "reasoning"]),
            content: text_field(delta, &["content"]),
        };
        if parsed.reasoning.is_some() || parsed.content.is_some() {
            deltas.push(parsed);
        }
    }

    Ok(deltas)
}

pub fn parse_non_stream_payload(payload: &Value) -> Result<ChatDelta, GatewayError> {
    if let Some(err) = embedded_error(payload) {
        return Err(err);
    }

    let message = payload
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .ok_or_else(|| protocol_violation("openai-compatible response missing choices"))?;

    Ok(ChatDelta {
        reasoning: text_field(message, &["reasoning_content", "reasoning"]),
        content: Some(text_field(message, &["content"]).unwrap_or_default()),
    })
}
