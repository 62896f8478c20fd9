//! Capability traits every backend implementation plugs into.
//!
//! ```rust
//! use kprovider::{
//!     BackendId, CompletionRequest, GenerationCapability, ProviderError, ProviderFuture,
//!     RawModelResponse,
//! };
//!
//! struct Echo;
//!
//! impl GenerationCapability for Echo {
//!     fn id(&self) -> BackendId {
//!         BackendId::Ollama
//!     }
//!
//!     fn complete<'a>(
//!         &'a self,
//!         request: CompletionRequest,
//!     ) -> ProviderFuture<'a, Result<RawModelResponse, ProviderError>> {
//!         Box::pin(async move { Ok(RawModelResponse::text(BackendId::Ollama, request.prompt.text)) })
//!     }
//! }
//!
//! let backend = Echo;
//! assert_eq!(backend.id(), BackendId::Ollama);
//! assert!(!backend.supports_media(kprovider::MediaKind::Image));
//! ```

use std::future::Future;
use std::pin::Pin;

use crate::{BackendId, CompletionRequest, ProviderError, RawModelResponse};

pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Media a generation backend may produce besides completion text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Speech,
}

/// Sign-in state of one backend account.
pub trait SessionCapability: Send + Sync {
    /// False when the backend cannot authenticate at all in this environment.
    fn is_available(&self) -> bool;

    fn is_signed_in<'a>(&'a self) -> ProviderFuture<'a, Result<bool, ProviderError>>;

    /// Interactive sign-in. Callers invoke this at most once per orchestration.
    fn sign_in<'a>(&'a self) -> ProviderFuture<'a, Result<(), ProviderError>>;

    fn sign_out<'a>(&'a self) -> ProviderFuture<'a, Result<(), ProviderError>>;
}

pub trait GenerationCapability: Send + Sync {
    fn id(&self) -> BackendId;

    fn complete<'a>(
        &'a self,
        request: CompletionRequest,
    ) -> ProviderFuture<'a, Result<RawModelResponse, ProviderError>>;

    /// Whether `generate_image` or `synthesize_speech` is implemented. Both
    /// default to `Unsupported`, so this defaults to `false`.
    fn supports_media(&self, _kind: MediaKind) -> bool {
        false
    }

    fn generate_image<'a>(
        &'a self,
        _prompt: String,
        _model: Option<String>,
    ) -> ProviderFuture<'a, Result<RawModelResponse, ProviderError>> {
        let backend = self.id();
        Box::pin(async move {
            Err(ProviderError::unsupported(format!(
                "{backend} does not generate images"
            )))
        })
    }

    fn synthesize_speech<'a>(
        &'a self,
        _text: String,
        _locale: Option<String>,
    ) -> ProviderFuture<'a, Result<RawModelResponse, ProviderError>> {
        let backend = self.id();
        Box::pin(async move {
            Err(ProviderError::unsupported(format!(
                "{backend} does not synthesize speech"
            )))
        })
    }
}

/// Native playback with no retrievable artifact.
pub trait LocalSpeechCapability: Send + Sync {
    fn id(&self) -> BackendId;

    fn speak<'a>(
        &'a self,
        text: String,
        locale: Option<String>,
    ) -> ProviderFuture<'a, Result<(), ProviderError>>;
}
