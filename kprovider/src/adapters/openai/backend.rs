//! OpenAI generation backend over transport and shared models.

use std::sync::Arc;

use crate::{
    BackendId, CompletionRequest, GenerationCapability, MediaArtifact, MediaKind, ProviderError,
    ProviderFuture, RawModelResponse, SecureCredentialManager,
};

use super::transport::OpenAiTransport;
use super::types::{
    OpenAiAuth, OpenAiChatRequest, OpenAiImageRequest, OpenAiSpeechRequest,
};

#[derive(Clone)]
pub struct OpenAiBackend {
    credentials: Arc<SecureCredentialManager>,
    transport: Arc<dyn OpenAiTransport>,
    fallback_model: String,
    image_model: String,
    speech_model: String,
    voice: String,
}

impl OpenAiBackend {
    pub fn new(
        credentials: Arc<SecureCredentialManager>,
        transport: Arc<dyn OpenAiTransport>,
    ) -> Self {
        Self {
            credentials,
            transport,
            fallback_model: "gpt-4o".to_string(),
            image_model: "dall-e-3".to_string(),
            speech_model: "tts-1".to_string(),
            voice: "alloy".to_string(),
        }
    }

    pub fn with_fallback_model(mut self, model: impl Into<String>) -> Self {
        self.fallback_model = model.into();
        self
    }

    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    pub fn with_speech_model(mut self, model: impl Into<String>, voice: impl Into<String>) -> Self {
        self.speech_model = model.into();
        self.voice = voice.into();
        self
    }

    pub(crate) fn build_chat_request(&self, request: CompletionRequest) -> OpenAiChatRequest {
        OpenAiChatRequest::from_completion(request, &self.fallback_model)
    }

    fn resolve_auth(&self) -> Result<OpenAiAuth, ProviderError> {
        self.credentials
            .api_key(BackendId::OpenAi)?
            .map(OpenAiAuth::ApiKey)
            .ok_or_else(|| ProviderError::authentication("no OpenAI API key configured"))
    }
}

impl GenerationCapability for OpenAiBackend {
    fn id(&self) -> BackendId {
        BackendId::OpenAi
    }

    fn complete<'a>(
        &'a self,
        request: CompletionRequest,
    ) -> ProviderFuture<'a, Result<RawModelResponse, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let auth = self.resolve_auth()?;
            let chat_request = self.build_chat_request(request);
            let response = self.transport.complete(chat_request, auth).await?;

            Ok(RawModelResponse::text(BackendId::OpenAi, response.content).with_model(response.model))
        })
    }

    fn supports_media(&self, _kind: MediaKind) -> bool {
        true
    }

    fn generate_image<'a>(
        &'a self,
        prompt: String,
        model: Option<String>,
    ) -> ProviderFuture<'a, Result<RawModelResponse, ProviderError>> {
        Box::pin(async move {
            if prompt.trim().is_empty() {
                return Err(ProviderError::invalid_request("image prompt must not be empty"));
            }

            let auth = self.resolve_auth()?;
            let model = model
                .filter(|model| !model.trim().is_empty())
                .unwrap_or_else(|| self.image_model.clone());
            let request = OpenAiImageRequest {
                model: model.clone(),
                prompt,
                size: Some("1024x1024".to_string()),
            };
            let response = self.transport.generate_image(request, auth).await?;

            Ok(RawModelResponse::binary(BackendId::OpenAi, response.image).with_model(model))
        })
    }

    fn synthesize_speech<'a>(
        &'a self,
        text: String,
        _locale: Option<String>,
    ) -> ProviderFuture<'a, Result<RawModelResponse, ProviderError>> {
        Box::pin(async move {
            if text.trim().is_empty() {
                return Err(ProviderError::invalid_request("speech input must not be empty"));
            }

            let auth = self.resolve_auth()?;
            let request = OpenAiSpeechRequest {
                model: self.speech_model.clone(),
                input: text,
                voice: self.voice.clone(),
            };
            let response = self.transport.synthesize_speech(request, auth).await?;

            Ok(
                RawModelResponse::binary(BackendId::OpenAi, MediaArtifact::from(response))
                    .with_model(self.speech_model.clone()),
            )
        })
    }
}

impl std::fmt::Debug for OpenAiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiBackend")
            .field("transport", &self.transport)
            .field("fallback_model", &self.fallback_model)
            .field("image_model", &self.image_model)
            .field("speech_model", &self.speech_model)
            .finish()
    }
}
