//! OpenAI HTTP payload serde models and conversion helpers.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{MediaArtifact, ProviderError};

use super::types::{
    OpenAiChatRequest, OpenAiChatResponse, OpenAiImageRequest, OpenAiImageResponse, OpenAiMessage,
    OpenAiSpeechRequest,
};

pub(crate) fn build_chat_api_request(
    request: OpenAiChatRequest,
) -> Result<OpenAiApiChatRequest, ProviderError> {
    let messages = request
        .messages
        .into_iter()
        .map(OpenAiApiMessage::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    if messages.is_empty() {
        return Err(ProviderError::invalid_request(
            "OpenAI request requires at least one message",
        ));
    }

    Ok(OpenAiApiChatRequest {
        model: request.model,
        messages,
        temperature: request.temperature,
        max_tokens: request.max_tokens,
    })
}

/// Reads `error.message` out of an OpenAI-style error envelope.
pub(crate) fn extract_error_message(envelope: &Value) -> Option<String> {
    envelope
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[derive(Debug, Serialize)]
pub(crate) struct OpenAiApiChatRequest {
    pub model: String,
    pub messages: Vec<OpenAiApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct OpenAiApiMessage {
    pub role: String,
    pub content: OpenAiApiContent,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub(crate) enum OpenAiApiContent {
    Text(String),
    Parts(Vec<OpenAiApiContentPart>),
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum OpenAiApiContentPart {
    Text { text: String },
    ImageUrl { image_url: OpenAiApiImageUrl },
}

#[derive(Debug, Serialize, PartialEq)]
pub(crate) struct OpenAiApiImageUrl {
    pub url: String,
}

impl TryFrom<OpenAiMessage> for OpenAiApiMessage {
    type Error = ProviderError;

    fn try_from(value: OpenAiMessage) -> Result<Self, Self::Error> {
        if value.content.trim().is_empty() {
            return Err(ProviderError::invalid_request(
                "OpenAI message content must not be empty",
            ));
        }

        let content = if value.images.is_empty() {
            OpenAiApiContent::Text(value.content)
        } else {
            let mut parts = vec![OpenAiApiContentPart::Text {
                text: value.content,
            }];
            parts.extend(value.images.into_iter().map(|url| OpenAiApiContentPart::ImageUrl {
                image_url: OpenAiApiImageUrl { url },
            }));
            OpenAiApiContent::Parts(parts)
        };

        Ok(Self {
            role: value.role.as_str().to_string(),
            content,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiApiChatResponse {
    pub model: String,
    pub choices: Vec<OpenAiApiChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiApiChoice {
    pub message: OpenAiApiAssistantMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiApiAssistantMessage {
    pub content: Option<String>,
}

impl TryFrom<OpenAiApiChatResponse> for OpenAiChatResponse {
    type Error = ProviderError;

    fn try_from(value: OpenAiApiChatResponse) -> Result<Self, Self::Error> {
        let choice = value
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::transport("OpenAI response did not include choices"))?;

        Ok(Self {
            model: value.model,
            content: choice.message.content.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct OpenAiApiImageRequest {
    pub model: String,
    pub prompt: String,
    pub n: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl From<OpenAiImageRequest> for OpenAiApiImageRequest {
    fn from(value: OpenAiImageRequest) -> Self {
        Self {
            model: value.model,
            prompt: value.prompt,
            n: 1,
            size: value.size,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiApiImageResponse {
    #[serde(default)]
    pub data: Vec<OpenAiApiImageData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAiApiImageData {
    pub url: Option<String>,
    pub b64_json: Option<String>,
}

impl TryFrom<OpenAiApiImageResponse> for OpenAiImageResponse {
    type Error = ProviderError;

    fn try_from(value: OpenAiApiImageResponse) -> Result<Self, Self::Error> {
        let data = value
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::transport("OpenAI image response did not include data"))?;

        if let Some(url) = data.url.filter(|url| !url.trim().is_empty()) {
            return Ok(Self {
                image: MediaArtifact::Url(url),
            });
        }

        let encoded = data.b64_json.ok_or_else(|| {
            ProviderError::transport("OpenAI image response had neither url nor b64_json")
        })?;
        let bytes = STANDARD
            .decode(encoded.as_bytes())
            .map_err(|err| ProviderError::transport(format!("invalid b64_json image: {err}")))?;

        Ok(Self {
            image: MediaArtifact::Inline {
                mime_type: "image/png".to_string(),
                data: bytes,
            },
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct OpenAiApiSpeechRequest {
    pub model: String,
    pub input: String,
    pub voice: String,
    pub response_format: String,
}

impl From<OpenAiSpeechRequest> for OpenAiApiSpeechRequest {
    fn from(value: OpenAiSpeechRequest) -> Self {
        Self {
            model: value.model,
            input: value.input,
            voice: value.voice,
            response_format: "mp3".to_string(),
        }
    }
}
