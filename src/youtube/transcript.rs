use crate::error::TranscriptError;
use crate::youtube::VideoId;
use async_trait::async_trait;
use log::{debug, info};
use regex::Regex;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// A fetched transcript together with what the watch page knows about the
/// video.
#[derive(Debug, Clone)]
pub struct VideoTranscript {
    pub video_id: VideoId,
    /// Video title from the watch page, when present. Used as a hint for
    /// recipe-title derivation downstream.
    pub title: Option<String>,
    /// Caption fragments in chronological order, joined with single spaces.
    /// Non-empty on success.
    pub text: String,
}

/// Source of video transcripts.
#[async_trait]
pub trait TranscriptFetcher: Send + Sync {
    /// Retrieve the full transcript for a video. One attempt, no caching.
    async fn fetch(&self, video_id: &VideoId) -> Result<VideoTranscript, TranscriptError>;
}

/// Production fetcher backed by YouTube's watch page and timed-text captions.
///
/// Two requests per call: the watch page (to read the embedded player
/// response) and the selected caption track. All failures are folded into
/// [`TranscriptError`].
pub struct TimedTextFetcher {
    client: Client,
    base_url: String,
}

impl TimedTextFetcher {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self::build(YOUTUBE_BASE_URL.to_string(), timeout)
    }

    #[doc(hidden)]
    pub fn with_base_url(base_url: String) -> Self {
        Self::build(base_url, None)
    }

    fn build(base_url: String, timeout: Option<Duration>) -> Self {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to create HTTP client");

        TimedTextFetcher { client, base_url }
    }

    async fn get_text(&self, url: &str) -> Result<String, TranscriptError> {
        let response = self
            .client
            .get(url)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| TranscriptError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TranscriptError::Unavailable(format!(
                "request failed with status: {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| TranscriptError::Unavailable(e.to_string()))
    }
}

impl Default for TimedTextFetcher {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl TranscriptFetcher for TimedTextFetcher {
    async fn fetch(&self, video_id: &VideoId) -> Result<VideoTranscript, TranscriptError> {
        info!("Fetching transcript for video ID: {video_id}");

        let watch_url = format!("{}/watch?v={}", self.base_url, video_id);
        let html = self.get_text(&watch_url).await?;

        let player_response = extract_player_response(&html).ok_or_else(|| {
            TranscriptError::Unavailable("no player response found in watch page".to_string())
        })?;

        if player_response["playabilityStatus"]["status"].as_str() == Some("ERROR") {
            return Err(TranscriptError::InvalidId);
        }

        let title = player_response["videoDetails"]["title"]
            .as_str()
            .map(|s| s.to_string());

        // Absence of the captions object means the video has none at all
        let captions = player_response
            .get("captions")
            .ok_or(TranscriptError::Disabled)?;

        let tracks = captions["playerCaptionsTracklistRenderer"]["captionTracks"]
            .as_array()
            .filter(|tracks| !tracks.is_empty())
            .ok_or(TranscriptError::NotFound)?;

        let track = select_track(tracks);
        debug!(
            "Selected caption track: {}",
            track["languageCode"].as_str().unwrap_or("unknown")
        );

        let track_url = track["baseUrl"]
            .as_str()
            .ok_or(TranscriptError::NotFound)?;
        let track_url = if track_url.starts_with("http") {
            track_url.to_string()
        } else {
            format!("{}{}", self.base_url, track_url)
        };

        let xml = self.get_text(&track_url).await?;
        let fragments = collect_fragments(&xml);
        if fragments.is_empty() {
            return Err(TranscriptError::NotFound);
        }
        info!("Fetched transcript segments (count: {})", fragments.len());

        Ok(VideoTranscript {
            video_id: video_id.clone(),
            title,
            text: fragments.join(" "),
        })
    }
}

/// Locate the `ytInitialPlayerResponse` JSON embedded in watch-page HTML.
///
/// The page carries the blob in a handful of shapes that shift over time, so
/// each pattern is tried in order and the first candidate that parses as JSON
/// wins.
fn extract_player_response(html: &str) -> Option<Value> {
    let patterns = [
        r#"var\s+ytInitialPlayerResponse\s*=\s*(\{.+?\});"#,
        r#"ytInitialPlayerResponse\s*=\s*(\{.+?\})\s*;"#,
        r#""ytInitialPlayerResponse":\s*(\{.+?\})"#,
    ];

    for pattern in patterns {
        let Ok(re) = Regex::new(pattern) else { continue };
        let Some(caps) = re.captures(html) else { continue };
        let Some(candidate) = caps.get(1).map(|m| m.as_str()) else {
            continue;
        };
        if let Ok(parsed) = serde_json::from_str::<Value>(candidate) {
            return Some(parsed);
        }
        // Candidate did not parse, try the next shape
    }

    None
}

/// First English track if any, otherwise the platform's first track.
fn select_track(tracks: &[Value]) -> &Value {
    tracks
        .iter()
        .find(|track| {
            track["languageCode"]
                .as_str()
                .is_some_and(|code| code.starts_with("en"))
        })
        .unwrap_or(&tracks[0])
}

/// Flatten timed-text XML into its caption fragments, in document order.
///
/// Entities are decoded and whitespace-only fragments dropped; timing
/// attributes are discarded.
fn collect_fragments(xml: &str) -> Vec<String> {
    let re = Regex::new(r"<text[^>]*>([^<]*)</text>").expect("fragment pattern is valid");

    re.captures_iter(xml)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| {
            let decoded = html_escape::decode_html_entities(m.as_str());
            let fragment = decoded.trim();
            (!fragment.is_empty()).then(|| fragment.to_string())
        })
        .collect()
}
