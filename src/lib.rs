//! Extract structured recipes from YouTube cooking videos.
//!
//! The entry point is [`ExtractionPipeline`]: resolve the video id from a
//! URL, fetch the caption transcript, and turn it into a typed [`Recipe`]
//! through Google Gemini, behind an in-process rate limit.

pub mod config;
pub mod error;
pub mod extractor;
pub mod gemini;
pub mod limiter;
pub mod model;
pub mod pipeline;
pub mod youtube;

pub use crate::config::{AppConfig, GeminiConfig, RateLimitConfig};
pub use crate::error::{ExtractError, TranscriptError};
pub use crate::extractor::RecipeExtractor;
pub use crate::gemini::{GeminiClient, GenerativeModel};
pub use crate::limiter::RateLimiter;
pub use crate::model::{
    ExtractedRecipe, Locale, Quantity, Recipe, RecipeIngredient, RecipeInstruction,
};
pub use crate::pipeline::{ExtractionPipeline, ExtractionPipelineBuilder};
pub use crate::youtube::{
    resolve_video_id, TimedTextFetcher, TranscriptFetcher, VideoId, VideoTranscript,
};

/// One-shot extraction using a pipeline built from configuration.
///
/// Builds a fresh pipeline, and with it a fresh rate limiter, on every call.
/// Long-lived services should construct one [`ExtractionPipeline`] at
/// startup and reuse it so the rate limit actually spans requests.
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), cooktube::ExtractError> {
/// let recipe = cooktube::extract_recipe(
///     "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
///     cooktube::Locale::En,
/// )
/// .await?;
/// println!("{} ingredients", recipe.ingredients.len());
/// # Ok(())
/// # }
/// ```
pub async fn extract_recipe(url: &str, locale: Locale) -> Result<Recipe, ExtractError> {
    let pipeline = ExtractionPipeline::builder().build()?;
    pipeline.run(url, locale, None).await
}
