//! Narrow interface over the upstream caption provider.
//!
//! The pipeline only ever needs two things from the video platform: a metadata
//! handle for a video and the caption segments of one of its tracks. Keeping
//! that behind [`CaptionClient`] lets the HTTP layer be exercised with a mock
//! while production uses [`crate::youtube::YoutubeClient`].

use crate::{error::UpstreamError, video_id::VideoId};

/// Language requested for every transcript.
pub const CAPTION_LANGUAGE: &str = "en";

/// One caption track advertised by the platform for a video.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
    pub name: String,
    /// `true` for automatic speech recognition tracks.
    pub generated: bool,
}

/// Handle returned by [`CaptionClient::fetch_video`].
///
/// The pipeline passes it back untouched; only the client looks inside.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoMetadata {
    pub video_id: VideoId,
    pub title: String,
    pub author: String,
    pub tracks: Vec<CaptionTrack>,
}

impl VideoMetadata {
    /// Finds the track for `language`, preferring manually created captions
    /// over generated ones.
    pub fn track_for(&self, language: &str) -> Option<&CaptionTrack> {
        let mut candidates = self
            .tracks
            .iter()
            .filter(|track| track.language_code == language);
        let first = candidates.next()?;
        if !first.generated {
            return Some(first);
        }
        candidates.find(|track| !track.generated).or(Some(first))
    }
}

/// A single timed caption fragment. Only `text` ends up in transcripts.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionSegment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

impl CaptionSegment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start: 0.0,
            duration: 0.0,
        }
    }
}

/// Blocking access to the video platform. Each call is a single attempt.
#[cfg_attr(test, mockall::automock)]
pub trait CaptionClient: Send + Sync {
    fn fetch_video(&self, id: &VideoId) -> Result<VideoMetadata, UpstreamError>;

    fn fetch_captions(
        &self,
        video: &VideoMetadata,
        language: &str,
    ) -> Result<Vec<CaptionSegment>, UpstreamError>;
}
