//! Error types shared by the transcript pipeline and the HTTP layer.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failures raised while talking to the upstream video platform.
///
/// The HTTP layer never shows these details to callers; they only end up in
/// debug logs. What the caller sees is decided by the stage that failed, see
/// [`TranscriptError`].
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("reading response from {url} failed: {source}")]
    Body {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("video is not playable ({status}): {reason}")]
    Unplayable { status: String, reason: String },

    #[error("malformed upstream payload: {0}")]
    Payload(String),

    #[error("no caption track for language `{0}`")]
    MissingTrack(String),

    #[error("caption track for language `{0}` is empty")]
    EmptyTrack(String),
}

/// Every way a `/transcript` request can fail.
///
/// The `Display` strings are part of the public contract and are rendered
/// verbatim as the `error` field of the JSON body.
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("Missing YouTube URL")]
    MissingUrl,

    #[error("Invalid YouTube URL")]
    InvalidUrl,

    #[error("Failed to fetch video info")]
    VideoInfo(#[source] UpstreamError),

    #[error("Failed to fetch captions")]
    Captions(#[source] UpstreamError),

    /// The blocking worker running the pipeline died before answering.
    #[error("Internal server error")]
    Internal(String),
}

impl TranscriptError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            TranscriptError::MissingUrl | TranscriptError::InvalidUrl => StatusCode::BAD_REQUEST,
            TranscriptError::VideoInfo(_)
            | TranscriptError::Captions(_)
            | TranscriptError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TranscriptError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.to_string(),
        });
        (self.status_code(), Json(body)).into_response()
    }
}
