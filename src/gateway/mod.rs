pub mod adapters;
pub mod client;
pub mod credentials;
pub mod error;
pub mod testing;
pub mod types;

pub use client::ModelClient;
pub use credentials::CredentialPool;
pub use error::{GatewayError, GatewayErrorKind};
pub use types::{ChatCompletion, ChatRequest, Credential, ModelSpec};
