//! Ollama backend implemented over the OpenAI-compatible transport.

use std::sync::Arc;

use reqwest::Client;

use crate::adapters::openai::{
    OpenAiAuth, OpenAiChatRequest, OpenAiHttpTransport, OpenAiTransport,
};
use crate::{
    BackendId, CompletionRequest, GenerationCapability, ProviderError, ProviderFuture,
    RawModelResponse, SecretString,
};

pub const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";

#[derive(Clone)]
pub struct OllamaBackend {
    transport: Arc<dyn OpenAiTransport>,
    fallback_model: String,
}

impl OllamaBackend {
    pub fn new(transport: Arc<dyn OpenAiTransport>) -> Self {
        Self {
            transport,
            fallback_model: "llama3.2".to_string(),
        }
    }

    pub fn with_fallback_model(mut self, model: impl Into<String>) -> Self {
        self.fallback_model = model.into();
        self
    }

    pub fn default_http_transport(client: Client) -> OpenAiHttpTransport {
        OpenAiHttpTransport::new(client).with_base_url(OLLAMA_BASE_URL)
    }

    fn auth_placeholder() -> OpenAiAuth {
        OpenAiAuth::ApiKey(SecretString::new("ollama-local"))
    }
}

impl GenerationCapability for OllamaBackend {
    fn id(&self) -> BackendId {
        BackendId::Ollama
    }

    fn complete<'a>(
        &'a self,
        request: CompletionRequest,
    ) -> ProviderFuture<'a, Result<RawModelResponse, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let ollama_request = OpenAiChatRequest::from_completion(request, &self.fallback_model);
            let response = self
                .transport
                .complete(ollama_request, Self::auth_placeholder())
                .await?;

            Ok(RawModelResponse::text(BackendId::Ollama, response.content).with_model(response.model))
        })
    }
}

impl std::fmt::Debug for OllamaBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaBackend")
            .field("transport", &self.transport)
            .field("fallback_model", &self.fallback_model)
            .finish()
    }
}
