//! Extraction of YouTube video identifiers from user supplied URLs.
//!
//! Matching is purely textual: scheme, host and overall URL shape are never
//! checked. An identifier is recognised when it directly follows either a
//! `v=` query parameter or a `/` path separator.

use std::{fmt, sync::LazyLock};

use regex::Regex;

use crate::error::TranscriptError;

pub const VIDEO_ID_LEN: usize = 11;

static VIDEO_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})(?:[^0-9A-Za-z_-]|$)")
        .expect("video id pattern is valid")
});

/// An 11 character identifier drawn from `[0-9A-Za-z_-]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Wraps an already isolated identifier, rejecting anything that is not
    /// exactly 11 characters of the identifier alphabet.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let valid = value.len() == VIDEO_ID_LEN && value.bytes().all(is_id_byte);
        valid.then_some(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_id_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-'
}

/// Returns the leftmost identifier found in `url`.
pub fn extract_video_id(url: &str) -> Result<VideoId, TranscriptError> {
    VIDEO_ID_PATTERN
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|id| VideoId(id.as_str().to_owned()))
        .ok_or(TranscriptError::InvalidUrl)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(url: &str) -> Option<String> {
        extract_video_id(url).ok().map(|id| id.as_str().to_owned())
    }

    #[test]
    fn extracts_from_watch_query() {
        assert_eq!(
            id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn extracts_from_path_segment() {
        assert_eq!(id("https://youtu.be/dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(
            id("https://www.youtube.com/embed/dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            id("https://www.youtube.com/shorts/aB3_-xYz09Q").as_deref(),
            Some("aB3_-xYz09Q")
        );
    }

    #[test]
    fn ignores_trailing_parameters_and_fragments() {
        assert_eq!(
            id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s#comments").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(id("https://youtu.be/dQw4w9WgXcQ?si=abc").as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn anchor_may_appear_at_any_offset() {
        assert_eq!(
            id("https://example/watch?list=PL1&index=3&v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(id("garbage text /dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn leftmost_match_wins() {
        assert_eq!(
            id("https://example/watch?v=AAAAAAAAAAA&v=BBBBBBBBBBB").as_deref(),
            Some("AAAAAAAAAAA")
        );
        assert_eq!(id("/CCCCCCCCCCC?v=DDDDDDDDDDD").as_deref(), Some("CCCCCCCCCCC"));
    }

    #[test]
    fn rejects_tokens_of_wrong_length() {
        assert!(matches!(
            extract_video_id("https://example/watch?v=dQw4w9WgXc"),
            Err(TranscriptError::InvalidUrl)
        ));
        assert!(matches!(
            extract_video_id("https://example/watch?v=dQw4w9WgXcQZ"),
            Err(TranscriptError::InvalidUrl)
        ));
    }

    #[test]
    fn rejects_input_without_anchor() {
        assert!(id("not-a-url").is_none());
        assert!(id("dQw4w9WgXcQ").is_none());
        assert!(id("").is_none());
    }

    #[test]
    fn rejects_characters_outside_alphabet() {
        assert!(id("https://example/watch?v=dQw4w9.gXcQ").is_none());
    }

    #[test]
    fn extracted_ids_respect_alphabet_and_length() {
        let inputs = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/_-_-_-_-_-_",
            "v=0123456789a",
        ];
        for input in inputs {
            let id = extract_video_id(input).unwrap();
            assert_eq!(id.as_str().len(), VIDEO_ID_LEN);
            assert!(id.as_str().bytes().all(is_id_byte));
        }
    }

    #[test]
    fn new_validates_shape() {
        assert!(VideoId::new("dQw4w9WgXcQ").is_some());
        assert!(VideoId::new("short").is_none());
        assert!(VideoId::new("dQw4w9WgXc!").is_none());
    }
}
