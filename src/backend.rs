//! The single outbound call to the inference daemon.
//!
//! `BackendClient::generate` posts `{model, prompt, stream: false}` and turns
//! whatever comes back into either the generated text or a [`RelayError`].

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::RelayConfig;
use crate::error::RelayError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
}

impl BackendRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            stream: false,
        }
    }
}

/// Fields of interest in a backend reply. Non-string values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendResponse {
    pub response: Option<String>,
    pub error: Option<String>,
}

impl BackendResponse {
    pub fn from_value(value: &Value) -> Self {
        let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_owned);
        Self {
            response: field("response"),
            error: field("error"),
        }
    }

    /// Generated text, if present and non-empty.
    pub fn text(self) -> Option<String> {
        self.response.filter(|text| !text.is_empty())
    }
}

/// Handle to the backend. Cheap to clone; the connection pool is shared.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    url: String,
    model: String,
}

impl BackendClient {
    pub fn new(config: &RelayConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            url: config.backend_url.clone(),
            model: config.model.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, RelayError> {
        debug!(url = %self.url, model = %self.model, "Forwarding prompt to backend");

        let res = self
            .client
            .post(&self.url)
            .json(&BackendRequest::new(&self.model, prompt))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = res.status();

        if !status.is_success() {
            let body = res.text().await.unwrap_or_else(|e| {
                debug!(status = %status, "Could not read backend error body: {e}");
                String::new()
            });
            let message = match serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|value| BackendResponse::from_value(&value).error)
            {
                Some(reported) => format!("backend error: {reported}"),
                None => format!(
                    "backend returned status {}; make sure model '{}' is available",
                    status.as_u16(),
                    self.model
                ),
            };
            warn!(status = %status, "{message}");
            return Err(RelayError::Upstream(message));
        }

        let body = res.text().await.map_err(|e| self.transport_error(e))?;
        let body = body.trim();

        let value: Value = serde_json::from_str(body).map_err(|e| {
            error!("Backend sent invalid JSON: {e}");
            RelayError::malformed(body)
        })?;

        BackendResponse::from_value(&value).text().ok_or_else(|| {
            error!("Backend reply had no 'response' field");
            RelayError::MissingField("response")
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> RelayError {
        if err.is_connect() {
            error!(url = %self.url, "Backend unreachable: {err}");
            RelayError::BackendUnreachable {
                url: self.url.clone(),
            }
        } else {
            error!(url = %self.url, "Backend request failed: {err}");
            RelayError::RequestFailed(err.to_string())
        }
    }
}
