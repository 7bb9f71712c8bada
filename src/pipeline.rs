use std::sync::Arc;
use std::time::Duration;

use log::info;
use url::Url;

use crate::config::AppConfig;
use crate::error::ExtractError;
use crate::extractor::RecipeExtractor;
use crate::gemini::{GeminiClient, GenerativeModel};
use crate::limiter::RateLimiter;
use crate::model::{Locale, Recipe};
use crate::youtube::{resolve_video_id, TimedTextFetcher, TranscriptFetcher};

/// The complete URL-to-recipe pipeline: resolve the video id, fetch the
/// transcript, run the rate-limited AI extraction, and attach the source URL.
///
/// Build one at startup and share it; the rate limiter inside is only
/// process-wide if the pipeline (or an injected limiter) outlives individual
/// requests.
pub struct ExtractionPipeline {
    fetcher: Arc<dyn TranscriptFetcher>,
    extractor: RecipeExtractor,
}

impl ExtractionPipeline {
    /// Creates a new builder for configuring a pipeline
    ///
    /// # Example
    /// ```
    /// use cooktube::ExtractionPipeline;
    ///
    /// let builder = ExtractionPipeline::builder()
    ///     .api_key("your-gemini-api-key");
    /// ```
    pub fn builder() -> ExtractionPipelineBuilder {
        ExtractionPipelineBuilder::default()
    }

    /// Extract a recipe from a YouTube video URL.
    ///
    /// Any component failure short-circuits: nothing is retried and no
    /// fallback is attempted. A caller-supplied `api_key` overrides the
    /// pipeline's default credential for this call only.
    ///
    /// # Example
    /// ```no_run
    /// # use cooktube::{ExtractionPipeline, Locale};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), cooktube::ExtractError> {
    /// let pipeline = ExtractionPipeline::builder().build()?;
    /// let recipe = pipeline
    ///     .run("https://www.youtube.com/watch?v=dQw4w9WgXcQ", Locale::En, None)
    ///     .await?;
    /// println!("{}", recipe.title);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run(
        &self,
        url: &str,
        locale: Locale,
        api_key: Option<&str>,
    ) -> Result<Recipe, ExtractError> {
        if Url::parse(url).is_err() {
            return Err(ExtractError::InvalidUrl {
                url: url.to_string(),
            });
        }

        let video_id = resolve_video_id(url)?;
        info!("Resolved video id: {video_id}");

        let transcript = self.fetcher.fetch(&video_id).await?;

        let extracted = self
            .extractor
            .extract(
                &transcript.text,
                locale,
                transcript.title.as_deref(),
                api_key,
            )
            .await?;

        Ok(extracted.into_recipe(url, transcript.title))
    }
}

/// Builder for [`ExtractionPipeline`].
///
/// Every component has a production default; tests and embedders can swap in
/// their own fetcher, model, or limiter.
#[derive(Default)]
pub struct ExtractionPipelineBuilder {
    config: Option<AppConfig>,
    fetcher: Option<Arc<dyn TranscriptFetcher>>,
    model: Option<Arc<dyn GenerativeModel>>,
    limiter: Option<Arc<RateLimiter>>,
    api_key: Option<String>,
}

impl ExtractionPipelineBuilder {
    /// Use this configuration instead of loading `config.toml` and the
    /// environment
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the transcript source
    pub fn transcript_fetcher(mut self, fetcher: impl TranscriptFetcher + 'static) -> Self {
        self.fetcher = Some(Arc::new(fetcher));
        self
    }

    /// Replace the generative model
    pub fn model(mut self, model: impl GenerativeModel + 'static) -> Self {
        self.model = Some(Arc::new(model));
        self
    }

    /// Share a rate limiter with other pipelines
    ///
    /// # Example
    /// ```
    /// use cooktube::{ExtractionPipeline, RateLimiter};
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// let limiter = Arc::new(RateLimiter::new(20, Duration::from_secs(3600)));
    /// let builder = ExtractionPipeline::builder().limiter(limiter);
    /// ```
    pub fn limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Set the default Gemini API key
    ///
    /// Takes precedence over the configuration file and the
    /// `GEMINI_API_KEY` environment variable; a per-call key passed to
    /// [`ExtractionPipeline::run`] still wins over all of these.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Assemble the pipeline.
    ///
    /// # Errors
    /// Returns [`ExtractError::Config`] when no explicit configuration was
    /// given and loading it from file/environment fails.
    pub fn build(self) -> Result<ExtractionPipeline, ExtractError> {
        let config = match self.config {
            Some(config) => config,
            None => AppConfig::load()?,
        };
        let timeout = Duration::from_secs(config.timeout);

        let fetcher = self
            .fetcher
            .unwrap_or_else(|| Arc::new(TimedTextFetcher::new(Some(timeout))));
        let model = self
            .model
            .unwrap_or_else(|| Arc::new(GeminiClient::new(&config.gemini, Some(timeout))));
        let limiter = self.limiter.unwrap_or_else(|| {
            Arc::new(RateLimiter::new(
                config.rate_limit.max_requests,
                Duration::from_secs(config.rate_limit.window_secs),
            ))
        });

        // Default credential: builder > config file > environment
        let default_api_key = self
            .api_key
            .or_else(|| config.gemini.api_key.clone())
            .or_else(|| std::env::var("GEMINI_API_KEY").ok());

        Ok(ExtractionPipeline {
            fetcher,
            extractor: RecipeExtractor::new(model, limiter, default_api_key),
        })
    }
}
