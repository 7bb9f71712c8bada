use thiserror::Error;

/// Failures while obtaining a video transcript from YouTube.
///
/// Every platform-specific condition (missing captions, bad video id,
/// network trouble) is folded into one of these variants before it leaves
/// the fetcher.
#[derive(Error, Debug)]
pub enum TranscriptError {
    /// The video exists but has captions turned off
    #[error("Transcripts are disabled for this video.")]
    Disabled,

    /// No transcript segments could be found for this video
    #[error("No transcript segments found.")]
    NotFound,

    /// The video id does not resolve to a playable video
    #[error("Invalid YouTube URL or Video ID.")]
    InvalidId,

    /// The platform could not be reached or answered unexpectedly
    #[error("Failed to fetch transcript: {0}")]
    Unavailable(String),
}

/// Errors that can cross the extraction pipeline boundary.
///
/// Every internal component failure is translated into exactly one of these
/// kinds; no transport or parser error type escapes raw.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The input string is not a recognizable YouTube video URL
    #[error("Invalid YouTube URL provided: {url}")]
    InvalidUrl { url: String },

    /// Transcript acquisition failed
    #[error(transparent)]
    Transcript(#[from] TranscriptError),

    /// The local throttle on AI calls tripped; retry later
    #[error("API rate limit exceeded. Please try again later.")]
    RateLimited,

    /// Neither a caller-supplied nor a default Gemini API key is available
    #[error("No Gemini API key provided. Please enter your API key.")]
    NoCredential,

    /// The AI call failed, or its response could not be parsed or validated
    #[error("AI processing error: {0}")]
    AiProcessing(String),

    /// Configuration error (construction time only)
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
