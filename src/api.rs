//! HTTP surface: a single `GET /transcript?url=...` route.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Serialize;
use tokio::task;
use tracing::error;

use crate::{
    captions::CaptionClient,
    error::TranscriptError,
    transcript::fetch_transcript,
};

#[derive(Clone)]
pub struct AppState {
    client: Arc<dyn CaptionClient>,
}

impl AppState {
    pub fn new(client: Arc<dyn CaptionClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Serialize)]
pub struct TranscriptBody {
    transcript: String,
}

type ApiResult<T> = Result<T, TranscriptError>;

pub fn router(client: Arc<dyn CaptionClient>) -> Router {
    Router::new()
        .route("/transcript", get(get_transcript))
        .with_state(AppState::new(client))
}

async fn get_transcript(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<TranscriptBody>> {
    let url = first_url_param(params);
    if url.is_empty() {
        return Err(TranscriptError::MissingUrl);
    }

    let client = state.client.clone();
    let transcript = task::spawn_blocking(move || fetch_transcript(client.as_ref(), &url))
        .await
        .map_err(|err| {
            error!("transcript worker failed: {err}");
            TranscriptError::Internal(format!("task join error: {err}"))
        })??;

    Ok(Json(TranscriptBody { transcript }))
}

/// Repeated `url` parameters are allowed; the first one wins.
fn first_url_param(params: Vec<(String, String)>) -> String {
    params
        .into_iter()
        .find_map(|(key, value)| (key == "url").then_some(value))
        .unwrap_or_default()
}
