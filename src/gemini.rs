use crate::config::GeminiConfig;
use crate::error::ExtractError;
use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// How many characters of an upstream error body end up in our error message.
const ERROR_EXCERPT_CHARS: usize = 100;

/// A generative text model invoked with a two-block prompt.
///
/// The credential is passed per call because callers may override the
/// process-wide default key on each request.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Send both prompt blocks and return the model's raw text response.
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        api_key: &str,
    ) -> Result<String, ExtractError>;
}

/// Google Gemini client, speaking the `generateContent` REST API.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

impl GeminiClient {
    /// Create a client from configuration. The API key is supplied at call
    /// time, never stored here.
    pub fn new(config: &GeminiConfig, timeout: Option<Duration>) -> Self {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| GEMINI_BASE_URL.to_string());
        Self::build(config, base_url, timeout)
    }

    #[doc(hidden)]
    pub fn with_base_url(config: &GeminiConfig, base_url: String) -> Self {
        Self::build(config, base_url, None)
    }

    fn build(config: &GeminiConfig, base_url: String, timeout: Option<Duration>) -> Self {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        GeminiClient {
            client,
            base_url,
            model: config.model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
            top_k: config.top_k,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        api_key: &str,
    ) -> Result<String, ExtractError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        { "text": system_prompt },
                        { "text": user_prompt }
                    ]
                }],
                "safetySettings": [
                    { "category": "HARM_CATEGORY_HARASSMENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE" },
                    { "category": "HARM_CATEGORY_HATE_SPEECH", "threshold": "BLOCK_MEDIUM_AND_ABOVE" },
                    { "category": "HARM_CATEGORY_SEXUALLY_EXPLICIT", "threshold": "BLOCK_MEDIUM_AND_ABOVE" },
                    { "category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE" }
                ],
                "generationConfig": {
                    "temperature": self.temperature,
                    "topP": self.top_p,
                    "topK": self.top_k,
                    "maxOutputTokens": self.max_output_tokens
                }
            }))
            .send()
            .await
            .map_err(|e| ExtractError::AiProcessing(format!("AI processing failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(ERROR_EXCERPT_CHARS).collect();
            return Err(ExtractError::AiProcessing(format!(
                "Gemini request failed with status {status}: {excerpt}"
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| ExtractError::AiProcessing(format!("AI processing failed: {e}")))?;
        debug!("Gemini response: {:?}", response_body);

        // Gemini reports some failures in-body even with a 2xx status
        if let Some(body_error) = response_body.get("error") {
            let code = body_error["code"].as_i64().unwrap_or(0);
            let message = body_error["message"].as_str().unwrap_or("Unknown error");
            error!("Gemini API error ({code}): {message}");
            return Err(ExtractError::AiProcessing(format!(
                "Gemini API error ({code}): {message}"
            )));
        }

        let text = response_body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                ExtractError::AiProcessing(
                    "Failed to extract content from Gemini response".to_string(),
                )
            })?
            .to_string();

        Ok(text)
    }
}
