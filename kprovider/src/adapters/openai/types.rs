//! OpenAI adapter types and backend-agnostic conversion logic.

use std::fmt::Formatter;

use crate::{CompletionRequest, ImageInput, MediaArtifact, Prompt, SecretString};

#[derive(Debug, Clone, PartialEq)]
pub struct OpenAiChatRequest {
    pub model: String,
    pub messages: Vec<OpenAiMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl OpenAiChatRequest {
    /// Chat body shared by every OpenAI-compatible backend. A blank model
    /// resolves to `fallback_model`; a blank system prompt is dropped.
    pub fn from_completion(request: CompletionRequest, fallback_model: &str) -> Self {
        let model = if request.model.trim().is_empty() {
            fallback_model.to_string()
        } else {
            request.model
        };

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system.filter(|system| !system.trim().is_empty()) {
            messages.push(OpenAiMessage::system(system));
        }
        messages.push(OpenAiMessage::from(request.prompt));

        Self {
            model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiMessage {
    pub role: OpenAiRole,
    pub content: String,
    /// Image URLs or data URIs attached to a user message.
    pub images: Vec<String>,
}

impl OpenAiMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: OpenAiRole::System,
            content: content.into(),
            images: Vec::new(),
        }
    }
}

impl From<Prompt> for OpenAiMessage {
    fn from(value: Prompt) -> Self {
        Self {
            role: OpenAiRole::User,
            content: value.text,
            images: value
                .images
                .into_iter()
                .map(|image| match image {
                    ImageInput::Url(url) | ImageInput::DataUri(url) => url,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAiRole {
    System,
    User,
}

impl OpenAiRole {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiChatResponse {
    pub model: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiImageRequest {
    pub model: String,
    pub prompt: String,
    pub size: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiImageResponse {
    pub image: MediaArtifact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiSpeechRequest {
    pub model: String,
    pub input: String,
    pub voice: String,
}

#[derive(Clone, PartialEq, Eq)]
pub struct OpenAiSpeechResponse {
    pub mime_type: String,
    pub audio: Vec<u8>,
}

impl std::fmt::Debug for OpenAiSpeechResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiSpeechResponse")
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.audio.len())
            .finish()
    }
}

impl From<OpenAiSpeechResponse> for MediaArtifact {
    fn from(value: OpenAiSpeechResponse) -> Self {
        MediaArtifact::Inline {
            mime_type: value.mime_type,
            data: value.audio,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum OpenAiAuth {
    ApiKey(SecretString),
}

impl std::fmt::Debug for OpenAiAuth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("OpenAiAuth::ApiKey([REDACTED])"),
        }
    }
}
