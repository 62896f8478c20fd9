//! Backend capability contracts, shared request/response types, and adapters.
//!
//! ```rust
//! use kprovider::{BackendId, CompletionRequest, Prompt};
//!
//! let request = CompletionRequest::new("gpt-4o", Prompt::new("Summarize this title"));
//! assert!(request.validate().is_ok());
//! assert_eq!(BackendId::OpenAi.to_string(), "openai");
//! ```

pub mod adapters;
pub mod credentials;
pub mod error;
pub mod model;
pub mod prelude;
pub mod provider;
pub mod registry;
pub mod session;

pub use credentials::{SecretString, SecureCredentialManager};
pub use error::{ProviderError, ProviderErrorKind};
pub use model::{BackendId, CompletionRequest, ImageInput, MediaArtifact, Prompt, RawModelResponse};
pub use provider::{
    GenerationCapability, LocalSpeechCapability, MediaKind, ProviderFuture, SessionCapability,
};
pub use registry::BackendRegistry;
pub use session::{ApiKeySession, EnvKeyPrompt, SignInPrompt, StaticSession};
