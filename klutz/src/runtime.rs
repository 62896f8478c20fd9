//! Runtime wiring: backends, session, hooks, and the tool catalog.

use std::sync::Arc;

use kengine::{OrchestrationHooks, OrchestrationOutcome, Orchestrator};
use kobserve::{
    CompositeHooks, MetricsObservabilityHooks, SafeOrchestrationHooks, TracingObservabilityHooks,
};
use kprovider::{
    ApiKeySession, BackendId, EnvKeyPrompt, GenerationCapability, LocalSpeechCapability,
    ProviderError, SecureCredentialManager, SessionCapability, SignInPrompt, StaticSession,
};
use ktools::{ToolCatalog, ToolReport, ToolRequest};
use reqwest::Client;

use crate::{BackendConfig, RuntimeConfig, SpeechConfig};

/// Environment variable read when an OpenAI session needs a key.
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Tracing and metrics hooks, each isolated from the other's panics.
pub fn default_hooks() -> Arc<dyn OrchestrationHooks> {
    Arc::new(
        CompositeHooks::new()
            .with(Arc::new(SafeOrchestrationHooks::new(TracingObservabilityHooks)))
            .with(Arc::new(SafeOrchestrationHooks::new(MetricsObservabilityHooks))),
    )
}

/// Catalog over caller-supplied capabilities with default hooks.
pub fn tool_catalog(
    session: Arc<dyn SessionCapability>,
    primary: Arc<dyn GenerationCapability>,
) -> ToolCatalog {
    ToolCatalog::new(
        Orchestrator::builder(session, primary)
            .hooks(default_hooks())
            .build(),
    )
}

#[derive(Clone)]
pub struct KlutzRuntime {
    credentials: Arc<SecureCredentialManager>,
    catalog: ToolCatalog,
}

impl KlutzRuntime {
    pub fn builder(config: RuntimeConfig) -> RuntimeBuilder {
        RuntimeBuilder::new(config)
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        self.catalog.orchestrator()
    }

    pub fn credentials(&self) -> &Arc<SecureCredentialManager> {
        &self.credentials
    }

    pub async fn dispatch(&self, request: ToolRequest) -> OrchestrationOutcome<ToolReport> {
        self.catalog.dispatch(request).await
    }
}

pub struct RuntimeBuilder {
    config: RuntimeConfig,
    hooks: Arc<dyn OrchestrationHooks>,
    credentials: Arc<SecureCredentialManager>,
    sign_in_prompt: Option<Arc<dyn SignInPrompt>>,
}

impl RuntimeBuilder {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            hooks: default_hooks(),
            credentials: Arc::new(SecureCredentialManager::new()),
            sign_in_prompt: None,
        }
    }

    pub fn hooks(mut self, hooks: Arc<dyn OrchestrationHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn credentials(mut self, credentials: Arc<SecureCredentialManager>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Source of an API key when the primary session is signed out.
    /// Defaults to reading `OPENAI_API_KEY`.
    pub fn sign_in_prompt(mut self, prompt: Arc<dyn SignInPrompt>) -> Self {
        self.sign_in_prompt = Some(prompt);
        self
    }

    pub fn build(self) -> Result<KlutzRuntime, ProviderError> {
        let config = self.config;
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| ProviderError::transport(err.to_string()))?;

        store_api_key(&self.credentials, &config.primary)?;
        if let Some(secondary) = &config.secondary {
            store_api_key(&self.credentials, secondary)?;
        }

        let session = build_session(&config.primary, &self.credentials, self.sign_in_prompt)?;
        let primary = build_backend(
            &config.primary,
            config.primary_model(),
            &self.credentials,
            &http,
        )?;

        let mut builder = Orchestrator::builder(session, primary).hooks(self.hooks);
        if let Some(secondary) = &config.secondary {
            builder = builder.secondary(build_backend(
                secondary,
                secondary.model.as_deref(),
                &self.credentials,
                &http,
            )?);
        }
        if let Some(speech) = &config.speech {
            builder = builder.local_speech(build_local_speech(speech)?);
        }

        Ok(KlutzRuntime {
            credentials: self.credentials,
            catalog: ToolCatalog::new(builder.build()),
        })
    }
}

fn store_api_key(
    credentials: &SecureCredentialManager,
    backend: &BackendConfig,
) -> Result<(), ProviderError> {
    match backend.api_key.as_deref().map(str::trim) {
        Some(api_key) if !api_key.is_empty() => credentials.set_api_key(backend.backend, api_key),
        _ => Ok(()),
    }
}

fn build_session(
    primary: &BackendConfig,
    credentials: &Arc<SecureCredentialManager>,
    prompt: Option<Arc<dyn SignInPrompt>>,
) -> Result<Arc<dyn SessionCapability>, ProviderError> {
    match primary.backend {
        BackendId::OpenAi => {
            let prompt = prompt.unwrap_or_else(|| Arc::new(EnvKeyPrompt::new(OPENAI_API_KEY_VAR)));
            Ok(Arc::new(
                ApiKeySession::new(BackendId::OpenAi, Arc::clone(credentials)).with_prompt(prompt),
            ))
        }
        BackendId::Ollama => Ok(Arc::new(StaticSession)),
        BackendId::SystemSpeech => Err(not_a_generation_backend()),
    }
}

fn build_backend(
    config: &BackendConfig,
    model: Option<&str>,
    credentials: &Arc<SecureCredentialManager>,
    http: &Client,
) -> Result<Arc<dyn GenerationCapability>, ProviderError> {
    match config.backend {
        BackendId::OpenAi => build_openai_backend(config, model, credentials, http),
        BackendId::Ollama => build_ollama_backend(config, model, http),
        BackendId::SystemSpeech => Err(not_a_generation_backend()),
    }
}

fn not_a_generation_backend() -> ProviderError {
    ProviderError::invalid_request("system-speech can only serve as the local speech fallback")
}

#[cfg(feature = "backend-openai")]
fn build_openai_backend(
    config: &BackendConfig,
    model: Option<&str>,
    credentials: &Arc<SecureCredentialManager>,
    http: &Client,
) -> Result<Arc<dyn GenerationCapability>, ProviderError> {
    use kprovider::adapters::openai::{OpenAiBackend, OpenAiHttpTransport};

    let mut transport = OpenAiHttpTransport::new(http.clone());
    if let Some(base_url) = &config.base_url {
        transport = transport.with_base_url(base_url);
    }
    let mut backend = OpenAiBackend::new(Arc::clone(credentials), Arc::new(transport));
    if let Some(model) = model {
        backend = backend.with_fallback_model(model);
    }
    Ok(Arc::new(backend))
}

#[cfg(not(feature = "backend-openai"))]
fn build_openai_backend(
    _config: &BackendConfig,
    _model: Option<&str>,
    _credentials: &Arc<SecureCredentialManager>,
    _http: &Client,
) -> Result<Arc<dyn GenerationCapability>, ProviderError> {
    Err(ProviderError::invalid_request(
        "backend-openai feature is not enabled on klutz",
    ))
}

#[cfg(feature = "backend-ollama")]
fn build_ollama_backend(
    config: &BackendConfig,
    model: Option<&str>,
    http: &Client,
) -> Result<Arc<dyn GenerationCapability>, ProviderError> {
    use kprovider::adapters::ollama::OllamaBackend;

    let mut transport = OllamaBackend::default_http_transport(http.clone());
    if let Some(base_url) = &config.base_url {
        transport = transport.with_base_url(base_url);
    }
    let mut backend = OllamaBackend::new(Arc::new(transport));
    if let Some(model) = model {
        backend = backend.with_fallback_model(model);
    }
    Ok(Arc::new(backend))
}

#[cfg(not(feature = "backend-ollama"))]
fn build_ollama_backend(
    _config: &BackendConfig,
    _model: Option<&str>,
    _http: &Client,
) -> Result<Arc<dyn GenerationCapability>, ProviderError> {
    Err(ProviderError::invalid_request(
        "backend-ollama feature is not enabled on klutz",
    ))
}

#[cfg(feature = "system-speech")]
fn build_local_speech(
    config: &SpeechConfig,
) -> Result<Arc<dyn LocalSpeechCapability>, ProviderError> {
    use kprovider::adapters::system_speech::SystemSpeech;

    if config.program.trim().is_empty() {
        return Err(ProviderError::invalid_request(
            "speech program must not be empty",
        ));
    }
    Ok(Arc::new(
        SystemSpeech::new(config.program.trim()).with_args(config.args.iter().cloned()),
    ))
}

#[cfg(not(feature = "system-speech"))]
fn build_local_speech(
    _config: &SpeechConfig,
) -> Result<Arc<dyn LocalSpeechCapability>, ProviderError> {
    Err(ProviderError::invalid_request(
        "system-speech feature is not enabled on klutz",
    ))
}
