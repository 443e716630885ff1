//! HTTP surface: the chat relay, the front-end page, and static assets.

use std::future::Future;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRequestParts, Query, State},
    http::{header, request::Parts},
    response::IntoResponse,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::backend::BackendClient;
use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::{PromptRequest, PromptResponse};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub backend: BackendClient,
}

impl AppState {
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let backend = BackendClient::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            backend,
        })
    }
}

pub fn router(state: AppState) -> Router {
    let assets = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/", get(index))
        .route("/chat", post(chat))
        .nest_service("/static", assets)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the router on a pre-bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(
        backend = %state.backend.url(),
        model = %state.backend.model(),
        "Relay listening on http://{addr}"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Relay shut down");
    Ok(())
}

/// `Query<PromptRequest>` whose rejection is reported as a [`RelayError`].
pub struct PromptQuery(pub PromptRequest);

impl<S> FromRequestParts<S> for PromptQuery
where
    S: Send + Sync,
{
    type Rejection = RelayError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(request) = Query::<PromptRequest>::from_request_parts(parts, state)
            .await
            .inspect_err(|e| warn!("Rejected query string: {e}"))?;
        Ok(Self(request))
    }
}

async fn index(State(state): State<AppState>) -> Result<impl IntoResponse, RelayError> {
    let path = state.config.index_path();
    match tokio::fs::read(&path).await {
        Ok(page) => Ok(([(header::CONTENT_TYPE, "text/html; charset=utf-8")], page)),
        Err(e) => {
            warn!(path = %path.display(), "Cannot read front-end page: {e}");
            Err(RelayError::IndexMissing(path.display().to_string()))
        }
    }
}

async fn chat(
    State(state): State<AppState>,
    PromptQuery(request): PromptQuery,
) -> Result<Json<PromptResponse>, RelayError> {
    let prompt = match request.prompt {
        Some(prompt) if !prompt.trim().is_empty() => prompt,
        Some(_) => {
            warn!("Rejected empty prompt");
            return Err(RelayError::InvalidInput("prompt must not be empty".into()));
        }
        None => {
            warn!("Rejected request without prompt");
            return Err(RelayError::InvalidInput(
                "missing 'prompt' query parameter".into(),
            ));
        }
    };

    info!(chars = prompt.chars().count(), "POST /chat");

    let response = state.backend.generate(&prompt).await?;
    Ok(Json(PromptResponse { response }))
}
