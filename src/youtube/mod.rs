//! YouTube-side plumbing: URL to video-id resolution and transcript fetching.

pub mod transcript;

pub use transcript::{TimedTextFetcher, TranscriptFetcher, VideoTranscript};

use crate::error::ExtractError;

/// Canonical identifier of a hosted YouTube video.
///
/// Derived deterministically from a URL by [`resolve_video_id`]; always
/// non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the video id from a YouTube URL.
///
/// Three URL shapes are recognized, first match wins:
/// - any `youtube.com` URL carrying a `v=` query parameter,
/// - `youtu.be/<id>` short links,
/// - `/shorts/<id>` paths.
///
/// The id is the text after the marker up to the next `&` or `?`; it must be
/// non-empty but is otherwise not validated. Playlists, channel URLs and
/// arbitrary strings fail with [`ExtractError::InvalidUrl`].
pub fn resolve_video_id(url: &str) -> Result<VideoId, ExtractError> {
    let id = if url.contains("youtube.com") && url.contains("v=") {
        take_after(url, "v=")
    } else if url.contains("youtu.be") {
        take_after(url, "youtu.be/")
    } else if url.contains("shorts") {
        take_after(url, "/shorts/")
    } else {
        None
    };

    match id {
        Some(id) if !id.is_empty() => Ok(VideoId(id.to_string())),
        _ => Err(ExtractError::InvalidUrl {
            url: url.to_string(),
        }),
    }
}

/// The segment between the first `marker` and the next `?` or `&`.
fn take_after<'a>(url: &'a str, marker: &str) -> Option<&'a str> {
    let rest = url.split(marker).nth(1)?;
    rest.split(['?', '&']).next()
}
