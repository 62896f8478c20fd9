//! Common `kprovider` imports for downstream crates.

pub use crate::{
    ApiKeySession, BackendId, BackendRegistry, CompletionRequest, GenerationCapability,
    ImageInput, LocalSpeechCapability, MediaArtifact, MediaKind, Prompt, ProviderError, ProviderErrorKind,
    ProviderFuture, RawModelResponse, SecureCredentialManager, SessionCapability, SignInPrompt,
    StaticSession,
};
pub use kcommon::{BoxFuture, MetadataMap};
