//! Service configuration.
//!
//! Every knob that shapes a model call lives in [`ServiceConfig`], built via
//! its [`ServiceConfigBuilder`]. Keeping the knobs in one struct makes it
//! trivial to share across handlers behind an `Arc` and to diff two
//! deployments when their outputs differ.
//!
//! # Design choice: builder over constructor
//! A ten-field constructor breaks on every new field. The builder lets
//! callers set only what they care about and rely on documented defaults
//! for the rest.

use crate::error::LearnForgeError;
use std::fmt;

/// Default Gemini model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default base URL of the Generative Language REST API.
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Configuration for the learnforge service.
///
/// Built via [`ServiceConfig::builder()`], [`ServiceConfig::from_env()`],
/// or [`ServiceConfig::default()`].
#[derive(Clone)]
pub struct ServiceConfig {
    /// Model identifier, e.g. "gemini-2.5-flash". Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// API key for the model endpoint. `None` does not fail startup — every
    /// generation call returns [`LearnForgeError::MissingApiKey`] instead,
    /// so the service can come up before credentials are provisioned.
    pub api_key: Option<String>,

    /// Base URL of the Generative Language API. Default:
    /// [`DEFAULT_API_BASE_URL`]. Overridable to point the client at a local
    /// stub server in tests or at a corporate gateway.
    pub api_base_url: String,

    /// Sampling temperature for every completion. Default: 0.7.
    ///
    /// Learning content benefits from some variety (distinct scenarios for
    /// the same concept on re-request), so this sits higher than the
    /// near-zero values used for transcription workloads.
    pub temperature: f32,

    /// Maximum tokens the model may generate per call. Default: 8192.
    ///
    /// Explanations with multiple embedded diagrams routinely exceed 2 000
    /// output tokens; too small a cap silently truncates mid-sentence.
    pub max_output_tokens: usize,

    /// Maximum retry attempts on a transient API failure. Default: 3.
    ///
    /// Most 429/5xx and timeout errors are transient. Permanent errors
    /// (bad key, 400) are never retried and surface immediately.
    pub max_retries: u32,

    /// Initial retry delay in milliseconds (exponential backoff). Default: 500.
    ///
    /// Doubles after each attempt: 500 ms → 1 s → 2 s.
    pub retry_backoff_ms: u64,

    /// Per-model-call timeout in seconds. Default: 60.
    pub api_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            temperature: 0.7,
            max_output_tokens: 8192,
            max_retries: 3,
            retry_backoff_ms: 500,
            api_timeout_secs: 60,
        }
    }
}

// Manual Debug so the API key never lands in a log line.
impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base_url", &self.api_base_url)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .finish()
    }
}

impl ServiceConfig {
    /// Create a new builder.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder {
            config: Self::default(),
        }
    }

    /// Defaults plus the API key from the process environment.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()),
            ..Self::default()
        }
    }
}

/// Builder for [`ServiceConfig`].
#[derive(Debug)]
pub struct ServiceConfigBuilder {
    config: ServiceConfig,
}

impl ServiceConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_output_tokens(mut self, n: usize) -> Self {
        self.config.max_output_tokens = n;
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        // Ten doubling backoffs from a 500 ms base already exceed 8 minutes
        // of waiting; anything larger is a misconfiguration.
        self.config.max_retries = n.min(10);
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ServiceConfig, LearnForgeError> {
        let c = &self.config;
        if c.model.is_empty() {
            return Err(LearnForgeError::InvalidConfig(
                "Model name must not be empty".into(),
            ));
        }
        if c.api_base_url.is_empty() {
            return Err(LearnForgeError::InvalidConfig(
                "API base URL must not be empty".into(),
            ));
        }
        if c.api_timeout_secs == 0 {
            return Err(LearnForgeError::InvalidConfig(
                "API timeout must be ≥ 1s".into(),
            ));
        }
        Ok(self.config)
    }
}
