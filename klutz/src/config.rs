//! Builder-style configuration for assembling a runtime.
//!
//! ```rust
//! use std::time::Duration;
//!
//! use klutz::{BackendConfig, BackendId, RuntimeConfig, SpeechConfig};
//!
//! let config = RuntimeConfig::new(BackendConfig::new(BackendId::OpenAi).with_api_key("sk-test"))
//!     .with_secondary(BackendConfig::new(BackendId::Ollama).with_model("llama3.2"))
//!     .with_speech(SpeechConfig::default())
//!     .with_timeout(Duration::from_secs(30));
//!
//! assert_eq!(config.secondary.as_ref().map(|backend| backend.backend), Some(BackendId::Ollama));
//! assert_eq!(config.timeout, Duration::from_secs(30));
//! ```

use std::time::Duration;

use kprovider::BackendId;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);

/// One generation backend.
#[derive(Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub backend: BackendId,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    /// Model used when a request does not name one.
    pub model: Option<String>,
}

impl BackendConfig {
    pub fn new(backend: BackendId) -> Self {
        Self {
            backend,
            api_key: None,
            base_url: None,
            model: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("backend", &self.backend)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

/// Local speech program used when speech synthesis fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            program: "espeak".to_string(),
            args: Vec::new(),
        }
    }
}

impl SpeechConfig {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub primary: BackendConfig,
    pub secondary: Option<BackendConfig>,
    pub speech: Option<SpeechConfig>,
    /// Applied to the primary backend when its own `model` is unset.
    pub default_model: Option<String>,
    /// HTTP client timeout. The engine itself enforces none.
    pub timeout: Duration,
}

impl RuntimeConfig {
    pub fn new(primary: BackendConfig) -> Self {
        Self {
            primary,
            secondary: None,
            speech: None,
            default_model: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_secondary(mut self, secondary: BackendConfig) -> Self {
        self.secondary = Some(secondary);
        self
    }

    pub fn with_speech(mut self, speech: SpeechConfig) -> Self {
        self.speech = Some(speech);
        self
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = Some(model.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn primary_model(&self) -> Option<&str> {
        self.primary
            .model
            .as_deref()
            .or(self.default_model.as_deref())
            .map(str::trim)
            .filter(|model| !model.is_empty())
    }
}
