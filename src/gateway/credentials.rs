use std::{
    env,
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::gateway::{
    error::{GatewayError, GatewayErrorKind, invalid_request},
    types::{Credential, CredentialRef},
};

pub trait CredentialProvider: Send + Sync {
    fn resolve(&self, reference: &CredentialRef) -> Result<Vec<String>, GatewayError>;
}

#[derive(Default)]
pub struct EnvCredentialProvider;

impl CredentialProvider for EnvCredentialProvider {
    fn resolve(&self, reference: &CredentialRef) -> Result<Vec<String>, GatewayError> {
        match reference {
            CredentialRef::Env { var } => {
                let token = env::var(var).map_err(|_| missing_env(var))?;
                if token.trim().is_empty() {
                    return Err(missing_env(var));
                }
                Ok(vec![token.trim().to_string()])
            }
            CredentialRef::EnvList { var } => {
                let raw = env::var(var).map_err(|_| missing_env(var))?;
                let tokens = split_token_list(&raw);
                if tokens.is_empty() {
                    return Err(missing_env(var));
                }
                Ok(tokens)
            }
            CredentialRef::InlineToken { token } => {
                if token.trim().is_empty() {
                    return Err(invalid_request("inline credential token cannot be empty"));
                }
                Ok(vec![token.trim().to_string()])
            }
        }
    }
}

fn missing_env(var: &str) -> GatewayError {
    GatewayError::new(
        GatewayErrorKind::Authentication,
        format!("missing credential environment variable {}", var),
    )
    .with_retryable(false)
}

pub fn split_token_list(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn resolve_all(
    provider: &dyn CredentialProvider,
    references: &[CredentialRef],
) -> Result<Vec<String>, GatewayError> {
    let mut tokens = Vec::new();
    for reference in references {
        tokens.extend(provider.resolve(reference)?);
    }
    Ok(tokens)
}

/// Ordered credential tokens behind one forward-only cursor shared by every
/// worker of a run. Once the cursor passes the last token the pool stays dead.
#[derive(Debug)]
pub struct CredentialPool {
    tokens: Vec<String>,
    cursor: AtomicUsize,
}

impl CredentialPool {
    pub fn new(tokens: Vec<String>) -> Self {
        Self {
            tokens,
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor() >= self.tokens.len()
    }

    pub fn current(&self) -> Option<Credential> {
        let index = self.cursor();
        self.tokens
            .get(index)
            .map(|token| Credential::new(index, token.clone()))
    }

    /// Retires `credential` by moving the cursor past it. Only the worker that
    /// still observes this credential as current advances the cursor, so
    /// concurrent failures on one key skip exactly one position.
    pub fn retire(&self, credential: &Credential) -> bool {
        let retired = self
            .cursor
            .compare_exchange(
                credential.index,
                credential.index + 1,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok();
        if retired {
            tracing::warn!(
                target: "gateway",
                key_index = credential.index,
                remaining = self.tokens.len().saturating_sub(credential.index + 1),
                "credential_retired"
            );
        }
        retired
    }
}
