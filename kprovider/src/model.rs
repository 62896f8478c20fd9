//! Backend-agnostic request, response, and artifact model types.
//!
//! ```rust
//! use kprovider::{CompletionRequest, ImageInput, Prompt, ProviderErrorKind};
//!
//! let prompt = Prompt::new("Describe this thumbnail")
//!     .with_image(ImageInput::url("https://example.com/thumb.png"));
//! let ok = CompletionRequest::new("gpt-4o", prompt).with_temperature(0.2);
//! assert!(ok.validate().is_ok());
//!
//! let err = CompletionRequest::new("gpt-4o", Prompt::new("  "))
//!     .validate()
//!     .expect_err("blank prompt should fail");
//! assert_eq!(err.kind, ProviderErrorKind::InvalidRequest);
//! ```

use std::fmt::{Display, Formatter};

use kcommon::MetadataMap;

use crate::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendId {
    OpenAi,
    Ollama,
    SystemSpeech,
}

impl Display for BackendId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let id = match self {
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
            Self::SystemSpeech => "system-speech",
        };

        f.write_str(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    Url(String),
    /// `data:<mime>;base64,<payload>` encoded image.
    DataUri(String),
}

impl ImageInput {
    pub fn url(value: impl Into<String>) -> Self {
        Self::Url(value.into())
    }

    pub fn data_uri(value: impl Into<String>) -> Self {
        Self::DataUri(value.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Url(value) | Self::DataUri(value) => value.as_str(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    pub images: Vec<ImageInput>,
}

impl Prompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            images: Vec::new(),
        }
    }

    pub fn with_image(mut self, image: ImageInput) -> Self {
        self.images.push(image);
        self
    }

    pub fn with_images(mut self, images: impl IntoIterator<Item = ImageInput>) -> Self {
        self.images.extend(images);
        self
    }

    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: Option<String>,
    pub prompt: Prompt,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub metadata: MetadataMap,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, prompt: Prompt) -> Self {
        Self {
            model: model.into(),
            system: None,
            prompt,
            temperature: None,
            max_tokens: None,
            metadata: MetadataMap::new(),
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.prompt.text.trim().is_empty() {
            return Err(ProviderError::invalid_request("prompt text must not be empty"));
        }

        if self.prompt.images.iter().any(ImageInput::is_empty) {
            return Err(ProviderError::invalid_request(
                "image inputs must not be empty",
            ));
        }

        if let Some(max_tokens) = self.max_tokens
            && max_tokens == 0
        {
            return Err(ProviderError::invalid_request(
                "max_tokens must be greater than zero",
            ));
        }

        if let Some(temperature) = self.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            return Err(ProviderError::invalid_request(
                "temperature must be in the inclusive range 0.0..=2.0",
            ));
        }

        Ok(())
    }
}

/// Binary output of an image or speech backend.
#[derive(Clone, PartialEq, Eq)]
pub enum MediaArtifact {
    Url(String),
    Inline { mime_type: String, data: Vec<u8> },
}

impl MediaArtifact {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Url(url) => url.trim().is_empty(),
            Self::Inline { data, .. } => data.is_empty(),
        }
    }

    pub fn mime_type(&self) -> Option<&str> {
        match self {
            Self::Url(_) => None,
            Self::Inline { mime_type, .. } => Some(mime_type.as_str()),
        }
    }
}

impl std::fmt::Debug for MediaArtifact {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url(url) => f.debug_tuple("MediaArtifact::Url").field(url).finish(),
            Self::Inline { mime_type, data } => f
                .debug_struct("MediaArtifact::Inline")
                .field("mime_type", mime_type)
                .field("bytes", &data.len())
                .finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawModelResponse {
    pub backend: BackendId,
    pub model: Option<String>,
    pub raw_text: Option<String>,
    pub raw_binary: Option<MediaArtifact>,
}

impl RawModelResponse {
    pub fn text(backend: BackendId, text: impl Into<String>) -> Self {
        Self {
            backend,
            model: None,
            raw_text: Some(text.into()),
            raw_binary: None,
        }
    }

    pub fn binary(backend: BackendId, artifact: MediaArtifact) -> Self {
        Self {
            backend,
            model: None,
            raw_text: None,
            raw_binary: Some(artifact),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}
