use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Top-level crate configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Gemini model and sampling settings
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// Local throttle on AI calls
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Request timeout in seconds, applied to every outbound HTTP call
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gemini: GeminiConfig::default(),
            rate_limit: RateLimitConfig::default(),
            timeout: default_timeout(),
        }
    }
}

/// Configuration for the Gemini provider
#[derive(Debug, Deserialize, Clone)]
pub struct GeminiConfig {
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Temperature for generation; kept low for schema-conformant output
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Nucleus sampling bound
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    /// Top-k sampling bound
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Default API key (can also be set via the GEMINI_API_KEY environment
    /// variable; a caller-supplied key always takes precedence)
    pub api_key: Option<String>,
    /// Base URL override for proxy or test endpoints
    pub base_url: Option<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            top_k: default_top_k(),
            max_output_tokens: default_max_output_tokens(),
            api_key: None,
            base_url: None,
        }
    }
}

/// Configuration for the in-process rate limiter
#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitConfig {
    /// Maximum calls allowed per window
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    /// Window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
        }
    }
}

// Default value functions
fn default_model() -> String {
    "gemini-2.5-pro-exp-03-25".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_top_p() -> f32 {
    0.8
}

fn default_top_k() -> u32 {
    40
}

fn default_max_output_tokens() -> u32 {
    4096
}

fn default_max_requests() -> u32 {
    20
}

fn default_window_secs() -> u64 {
    3600
}

fn default_timeout() -> u64 {
    30
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with COOKTUBE__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: COOKTUBE__GEMINI__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Optional config file (can be missing)
            .add_source(File::with_name("config").required(false))
            // Use double underscore for nested: COOKTUBE__RATE_LIMIT__MAX_REQUESTS
            .add_source(
                Environment::with_prefix("COOKTUBE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
