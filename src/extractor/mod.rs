mod parse;
mod prompt;

pub use parse::parse_ai_response;
pub use prompt::{
    build_system_prompt, build_user_prompt, MAX_TRANSCRIPT_CHARS, RECIPE_EXTRACTION_PROMPT,
};

use crate::error::ExtractError;
use crate::gemini::GenerativeModel;
use crate::limiter::RateLimiter;
use crate::model::{ExtractedRecipe, Locale};
use log::info;
use std::sync::Arc;

/// Key under which AI calls are counted by the rate limiter. All extractions
/// share one quota regardless of caller.
pub const RATE_LIMIT_KEY: &str = "gemini-api";

/// Turns transcript text into a structured recipe through the generative
/// model, gated by the shared rate limiter.
pub struct RecipeExtractor {
    model: Arc<dyn GenerativeModel>,
    limiter: Arc<RateLimiter>,
    default_api_key: Option<String>,
}

impl RecipeExtractor {
    /// `default_api_key` is the process-wide fallback credential; callers
    /// may override it per extraction.
    pub fn new(
        model: Arc<dyn GenerativeModel>,
        limiter: Arc<RateLimiter>,
        default_api_key: Option<String>,
    ) -> Self {
        RecipeExtractor {
            model,
            limiter,
            default_api_key,
        }
    }

    /// Extract a recipe from transcript text.
    ///
    /// Checks the rate limiter before anything else; a limited call makes no
    /// outbound request. The transcript is truncated to
    /// [`MAX_TRANSCRIPT_CHARS`] when building the prompt.
    pub async fn extract(
        &self,
        transcript: &str,
        locale: Locale,
        video_title: Option<&str>,
        api_key: Option<&str>,
    ) -> Result<ExtractedRecipe, ExtractError> {
        if self.limiter.is_limited(RATE_LIMIT_KEY) {
            return Err(ExtractError::RateLimited);
        }

        let key = api_key
            .or(self.default_api_key.as_deref())
            .ok_or(ExtractError::NoCredential)?;

        let system_prompt = build_system_prompt(locale);
        let user_prompt = build_user_prompt(transcript, video_title);

        info!(
            "Requesting recipe extraction (locale: {})",
            locale.as_str()
        );
        let raw = self
            .model
            .generate(&system_prompt, &user_prompt, key)
            .await?;

        parse_ai_response(&raw)
    }
}
