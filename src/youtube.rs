//! Production [`CaptionClient`] talking to YouTube directly.
//!
//! Video metadata comes from the InnerTube `player` endpoint, which also lists
//! the caption tracks available for the video. Captions are then downloaded
//! from the track's timed-text URL in the classic XML format:
//!
//! ```xml
//! <transcript>
//!   <text start="0.48" dur="2.1">hello</text>
//!   <text start="2.58" dur="1.9">world</text>
//! </transcript>
//! ```
//!
//! All calls are blocking (`ureq`), callers are expected to run them on a
//! blocking thread.

use std::{sync::LazyLock, time::Duration};

use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::{
    captions::{CaptionClient, CaptionSegment, CaptionTrack, VideoMetadata},
    error::UpstreamError,
    video_id::VideoId,
};

pub const DEFAULT_BASE_URL: &str = "https://www.youtube.com";
const PLAYER_PATH: &str = "/youtubei/v1/player?prettyPrint=false";
const INNERTUBE_CLIENT_NAME: &str = "ANDROID";
const INNERTUBE_CLIENT_VERSION: &str = "20.10.38";
const USER_AGENT: &str = "com.google.android.youtube/20.10.38 (Linux; U; Android 14) gzip";
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

static TEXT_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<text\b([^>]*?)(?:/>|>(.*?)</text>)").expect("text element pattern is valid")
});
static START_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bstart="([^"]*)""#).expect("start pattern is valid"));
static DUR_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bdur="([^"]*)""#).expect("dur pattern is valid"));

/// Blocking YouTube client. Cheap to share: the underlying agent pools
/// connections internally.
#[derive(Debug, Clone)]
pub struct YoutubeClient {
    agent: ureq::Agent,
    base_url: String,
}

impl Default for YoutubeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl YoutubeClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Points the client at another host, mostly useful for tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(UPSTREAM_TIMEOUT)
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    fn player_url(&self) -> String {
        format!("{}{}", self.base_url, PLAYER_PATH)
    }
}

impl CaptionClient for YoutubeClient {
    fn fetch_video(&self, id: &VideoId) -> Result<VideoMetadata, UpstreamError> {
        let url = self.player_url();
        let payload = json!({
            "context": {
                "client": {
                    "clientName": INNERTUBE_CLIENT_NAME,
                    "clientVersion": INNERTUBE_CLIENT_VERSION,
                    "hl": "en",
                }
            },
            "videoId": id.as_str(),
        });

        debug!(video_id = %id, "requesting player response");
        let response = self
            .agent
            .post(&url)
            .set("Accept-Language", "en-US")
            .send_json(payload)
            .map_err(|source| UpstreamError::Request {
                url: url.clone(),
                source: Box::new(source),
            })?;
        let body = response
            .into_string()
            .map_err(|source| UpstreamError::Body { url, source })?;

        parse_player_response(id, &body)
    }

    fn fetch_captions(
        &self,
        video: &VideoMetadata,
        language: &str,
    ) -> Result<Vec<CaptionSegment>, UpstreamError> {
        let track = video
            .track_for(language)
            .ok_or_else(|| UpstreamError::MissingTrack(language.to_owned()))?;
        let url = strip_format_param(&track.base_url);

        debug!(
            video_id = %video.video_id,
            language,
            generated = track.generated,
            "requesting caption track"
        );
        let response = self
            .agent
            .get(&url)
            .set("Accept-Language", "en-US")
            .call()
            .map_err(|source| UpstreamError::Request {
                url: url.clone(),
                source: Box::new(source),
            })?;
        let body = response
            .into_string()
            .map_err(|source| UpstreamError::Body { url, source })?;

        let segments = parse_timed_text(&body);
        if segments.is_empty() {
            return Err(UpstreamError::EmptyTrack(language.to_owned()));
        }
        Ok(segments)
    }
}

/// Subset of the InnerTube player payload we rely on.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    #[serde(default)]
    playability_status: Option<PlayabilityStatus>,
    #[serde(default)]
    video_details: Option<VideoDetails>,
    #[serde(default)]
    captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: String,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoDetails {
    #[serde(default)]
    title: String,
    #[serde(default)]
    author: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    player_captions_tracklist_renderer: TracklistRenderer,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<RawCaptionTrack>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCaptionTrack {
    base_url: String,
    language_code: String,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    name: Option<TrackName>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackName {
    #[serde(default)]
    simple_text: Option<String>,
    #[serde(default)]
    runs: Vec<TextRun>,
}

#[derive(Debug, Deserialize)]
struct TextRun {
    text: String,
}

impl TrackName {
    fn into_text(self) -> Option<String> {
        self.simple_text
            .or_else(|| self.runs.into_iter().next().map(|run| run.text))
    }
}

fn parse_player_response(id: &VideoId, body: &str) -> Result<VideoMetadata, UpstreamError> {
    let player: PlayerResponse = serde_json::from_str(body)
        .map_err(|err| UpstreamError::Payload(format!("player response: {err}")))?;

    if let Some(status) = player.playability_status {
        if status.status != "OK" {
            return Err(UpstreamError::Unplayable {
                status: status.status,
                reason: status.reason.unwrap_or_default(),
            });
        }
    }

    let details = player
        .video_details
        .ok_or_else(|| UpstreamError::Payload("player response lacks videoDetails".into()))?;

    let tracks = player
        .captions
        .map(|captions| captions.player_captions_tracklist_renderer.caption_tracks)
        .unwrap_or_default()
        .into_iter()
        .map(|raw| {
            let name = raw
                .name
                .and_then(TrackName::into_text)
                .unwrap_or_else(|| raw.language_code.clone());
            CaptionTrack {
                base_url: raw.base_url,
                generated: raw.kind.as_deref() == Some("asr"),
                language_code: raw.language_code,
                name,
            }
        })
        .collect();

    Ok(VideoMetadata {
        video_id: id.clone(),
        title: details.title,
        author: details.author,
        tracks,
    })
}

/// Extracts `<text>` elements in document order, skipping self-closing ones.
/// Text is entity-decoded twice since YouTube escapes caption text before
/// embedding it in XML.
fn parse_timed_text(xml: &str) -> Vec<CaptionSegment> {
    TEXT_ELEMENT
        .captures_iter(xml)
        .filter_map(|captures| {
            let attrs = captures.get(1).map_or("", |m| m.as_str());
            let raw = captures.get(2)?.as_str();
            let xml_decoded = html_escape::decode_html_entities(raw);
            let text = html_escape::decode_html_entities(&xml_decoded).into_owned();
            Some(CaptionSegment {
                text,
                start: numeric_attr(&START_ATTR, attrs),
                duration: numeric_attr(&DUR_ATTR, attrs),
            })
        })
        .collect()
}

fn numeric_attr(pattern: &Regex, attrs: &str) -> f64 {
    pattern
        .captures(attrs)
        .and_then(|captures| captures.get(1))
        .and_then(|value| value.as_str().parse().ok())
        .unwrap_or(0.0)
}

/// Drops any `fmt=` query parameter so the endpoint falls back to plain XML.
fn strip_format_param(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_owned();
    };
    let kept: Vec<&str> = query
        .split('&')
        .filter(|pair| !pair.is_empty() && !pair.starts_with("fmt="))
        .collect();
    if kept.is_empty() {
        base.to_owned()
    } else {
        format!("{base}?{}", kept.join("&"))
    }
}
