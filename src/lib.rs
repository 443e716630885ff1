use serde::{Deserialize, Serialize};

pub mod backend;
pub mod config;
pub mod error;
pub mod server;

pub use backend::BackendClient;
pub use config::RelayConfig;
pub use error::RelayError;
pub use server::{AppState, router, serve};

/// Query parameters accepted by `POST /chat`.
///
/// `prompt` is optional at the type level so that a missing parameter is
/// reported the same way as an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptResponse {
    pub response: String,
}
