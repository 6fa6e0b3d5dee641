//! Turns a user supplied URL into a flat transcript string.

use tracing::debug;

use crate::{
    captions::{CAPTION_LANGUAGE, CaptionClient, CaptionSegment},
    error::TranscriptError,
    video_id::extract_video_id,
};

/// Concatenates segment texts in order, each followed by a single space,
/// including a trailing space after the last segment.
pub fn assemble(segments: &[CaptionSegment]) -> String {
    let capacity = segments.iter().map(|segment| segment.text.len() + 1).sum();
    segments
        .iter()
        .fold(String::with_capacity(capacity), |mut transcript, segment| {
            transcript.push_str(&segment.text);
            transcript.push(' ');
            transcript
        })
}

/// Runs the whole pipeline for one request, stopping at the first failure.
///
/// Blocks on upstream I/O; call it from a blocking context.
pub fn fetch_transcript(client: &dyn CaptionClient, url: &str) -> Result<String, TranscriptError> {
    if url.is_empty() {
        return Err(TranscriptError::MissingUrl);
    }

    let video_id = extract_video_id(url)?;

    let video = client.fetch_video(&video_id).map_err(|err| {
        debug!(%video_id, error = %err, "video info fetch failed");
        TranscriptError::VideoInfo(err)
    })?;

    let segments = client
        .fetch_captions(&video, CAPTION_LANGUAGE)
        .map_err(|err| {
            debug!(%video_id, error = %err, "caption fetch failed");
            TranscriptError::Captions(err)
        })?;

    Ok(assemble(&segments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        captions::{MockCaptionClient, VideoMetadata},
        error::UpstreamError,
        video_id::VideoId,
    };

    fn segments(texts: &[&str]) -> Vec<CaptionSegment> {
        texts.iter().copied().map(CaptionSegment::new).collect()
    }

    fn metadata(id: &VideoId) -> VideoMetadata {
        VideoMetadata {
            video_id: id.clone(),
            title: "title".into(),
            author: "author".into(),
            tracks: Vec::new(),
        }
    }

    #[test]
    fn assemble_empty_is_empty() {
        assert_eq!(assemble(&[]), "");
    }

    #[test]
    fn assemble_singleton_appends_space() {
        assert_eq!(assemble(&segments(&["hello"])), "hello ");
    }

    #[test]
    fn assemble_preserves_order_and_content() {
        assert_eq!(
            assemble(&segments(&["one", " two", "", "three\n"])),
            "one  two  three\n "
        );
    }

    #[test]
    fn empty_url_never_reaches_upstream() {
        let client = MockCaptionClient::new();
        assert!(matches!(
            fetch_transcript(&client, ""),
            Err(TranscriptError::MissingUrl)
        ));
    }

    #[test]
    fn invalid_url_never_reaches_upstream() {
        let client = MockCaptionClient::new();
        assert!(matches!(
            fetch_transcript(&client, "not-a-url"),
            Err(TranscriptError::InvalidUrl)
        ));
    }

    #[test]
    fn video_failure_skips_caption_fetch() {
        let mut client = MockCaptionClient::new();
        client
            .expect_fetch_video()
            .times(1)
            .returning(|_| Err(UpstreamError::Payload("boom".into())));
        client.expect_fetch_captions().never();

        let result = fetch_transcript(&client, "https://example/watch?v=dQw4w9WgXcQ");
        assert!(matches!(result, Err(TranscriptError::VideoInfo(_))));
    }

    #[test]
    fn caption_failure_is_reported_as_caption_error() {
        let mut client = MockCaptionClient::new();
        client
            .expect_fetch_video()
            .returning(|id| Ok(metadata(id)));
        client
            .expect_fetch_captions()
            .returning(|_, language| Err(UpstreamError::MissingTrack(language.to_owned())));

        let result = fetch_transcript(&client, "https://example/watch?v=dQw4w9WgXcQ");
        assert!(matches!(result, Err(TranscriptError::Captions(_))));
    }

    #[test]
    fn success_requests_english_for_parsed_id() {
        let mut client = MockCaptionClient::new();
        client
            .expect_fetch_video()
            .withf(|id| id.as_str() == "dQw4w9WgXcQ")
            .times(1)
            .returning(|id| Ok(metadata(id)));
        client
            .expect_fetch_captions()
            .withf(|video, language| {
                video.video_id.as_str() == "dQw4w9WgXcQ" && language.to_string() == "en"
            })
            .times(1)
            .returning(|_, _| Ok(segments(&["hello", "world"])));

        let transcript =
            fetch_transcript(&client, "https://youtu.be/dQw4w9WgXcQ?t=10").unwrap();
        assert_eq!(transcript, "hello world ");
    }
}
