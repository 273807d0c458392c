use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayErrorKind {
    InvalidRequest,
    Authentication,
    RateLimited,
    QuotaExceeded,
    BackendTransient,
    ProtocolViolation,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayError {
    pub kind: GatewayErrorKind,
    pub message: String,
    pub retryable: bool,
    pub credential_index: Option<usize>,
    pub provider_http_status: Option<u16>,
}

impl GatewayError {
    pub fn new(kind: GatewayErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable: matches!(
                kind,
                GatewayErrorKind::RateLimited | GatewayErrorKind::BackendTransient
            ),
            credential_index: None,
            provider_http_status: None,
        }
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn with_credential_index(mut self, index: usize) -> Self {
        self.credential_index = Some(index);
        self
    }

    pub fn with_provider_http_status(mut self, status: u16) -> Self {
        self.provider_http_status = Some(status);
        self
    }

    /// Failures that mean "this credential is dead or throttled": the batch
    /// runner advances the shared pool cursor and retries the same question.
    pub fn rotates_credential(&self) -> bool {
        matches!(
            self.kind,
            GatewayErrorKind::Authentication
                | GatewayErrorKind::RateLimited
                | GatewayErrorKind::QuotaExceeded
        )
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.provider_http_status, self.credential_index) {
            (Some(status), Some(index)) => {
                write!(f, "{} (status={}, key_index={})", self.message, status, index)
            }
            (Some(status), None) => write!(f, "{} (status={})", self.message, status),
            (None, Some(index)) => write!(f, "{} (key_index={})", self.message, index),
            (None, None) => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for GatewayError {}

pub fn invalid_request(message: impl Into<String>) -> GatewayError {
    GatewayError::new(GatewayErrorKind::InvalidRequest, message).with_retryable(false)
}

pub fn protocol_violation(message: impl Into<String>) -> GatewayError {
    GatewayError::new(GatewayErrorKind::ProtocolViolation, message).with_retryable(false)
}

/// Classifies a free-form failure message by the markers remote endpoints
/// embed in their error text. Used for transport errors that carry no status.
pub fn classify_failure_message(message: &str) -> GatewayErrorKind {
    let lowered = message.to_ascii_lowercase();
    if lowered.contains("insufficient_quota") {
        GatewayErrorKind::QuotaExceeded
    } else if lowered.contains("429") {
        GatewayErrorKind::RateLimited
    } else if lowered.contains("401") {
        GatewayErrorKind::Authentication
    } else {
        GatewayErrorKind::Unknown
    }
}

pub fn map_http_error(status: u16, body: &str) -> GatewayError {
    let normalized_body = body.chars().take(240).collect::<String>();

    let mut err = if status == 401 || status == 403 {
        GatewayError::new(GatewayErrorKind::Authentication, "authentication failed")
            .with_retryable(false)
    } else if status == 429 && body.contains("insufficient_quota") {
        GatewayError::new(GatewayErrorKind::QuotaExceeded, "credential quota exhausted")
            .with_retryable(false)
    } else if status == 429 {
        GatewayError::new(
            GatewayErrorKind::RateLimited,
            format!("backend returned status {}", status),
        )
    } else if status == 408 || status >= 500 {
        GatewayError::new(
            GatewayErrorKind::BackendTransient,
            format!("backend returned status {}", status),
        )
    } else if (400..500).contains(&status) {
        GatewayError::new(
            GatewayErrorKind::InvalidRequest,
            format!("backend returned status {}", status),
        )
        .with_retryable(false)
    } else {
        GatewayError::new(
            GatewayErrorKind::Unknown,
            format!("backend returned status {}", status),
        )
        .with_retryable(false)
    };

    err = err.with_provider_http_status(status);

    if !normalized_body.is_empty() {
        err.message = format!("{}: {}", err.message, normalized_body);
    }

    err
}
