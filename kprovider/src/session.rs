//! Session capability implementations backed by the credential manager.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use kprovider::{ApiKeySession, BackendId, SecureCredentialManager, SessionCapability};
//!
//! let credentials = Arc::new(SecureCredentialManager::new());
//! let session = ApiKeySession::new(BackendId::OpenAi, credentials);
//! assert!(session.is_available());
//!
//! let missing = ApiKeySession::unavailable(BackendId::OpenAi);
//! assert!(!missing.is_available());
//! ```

use std::sync::Arc;

use crate::{BackendId, ProviderError, ProviderFuture, SecureCredentialManager, SessionCapability};

/// Interactive source of an API key.
///
/// Resolving to `Ok(None)` means the user declined.
pub trait SignInPrompt: Send + Sync {
    fn request_api_key<'a>(
        &'a self,
        backend: BackendId,
    ) -> ProviderFuture<'a, Result<Option<String>, ProviderError>>;
}

/// Reads the key from an environment variable when sign-in is requested.
#[derive(Debug, Clone)]
pub struct EnvKeyPrompt {
    variable: String,
}

impl EnvKeyPrompt {
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
        }
    }
}

impl SignInPrompt for EnvKeyPrompt {
    fn request_api_key<'a>(
        &'a self,
        _backend: BackendId,
    ) -> ProviderFuture<'a, Result<Option<String>, ProviderError>> {
        Box::pin(async move {
            Ok(std::env::var(&self.variable)
                .ok()
                .filter(|value| !value.trim().is_empty()))
        })
    }
}

#[derive(Clone)]
pub struct ApiKeySession {
    backend: BackendId,
    credentials: Arc<SecureCredentialManager>,
    prompt: Option<Arc<dyn SignInPrompt>>,
    available: bool,
}

impl ApiKeySession {
    pub fn new(backend: BackendId, credentials: Arc<SecureCredentialManager>) -> Self {
        Self {
            backend,
            credentials,
            prompt: None,
            available: true,
        }
    }

    /// A session for an environment where the backend cannot authenticate.
    pub fn unavailable(backend: BackendId) -> Self {
        Self {
            backend,
            credentials: Arc::new(SecureCredentialManager::new()),
            prompt: None,
            available: false,
        }
    }

    pub fn with_prompt(mut self, prompt: Arc<dyn SignInPrompt>) -> Self {
        self.prompt = Some(prompt);
        self
    }

    pub fn backend(&self) -> BackendId {
        self.backend
    }
}

impl SessionCapability for ApiKeySession {
    fn is_available(&self) -> bool {
        self.available
    }

    fn is_signed_in<'a>(&'a self) -> ProviderFuture<'a, Result<bool, ProviderError>> {
        Box::pin(async move { self.credentials.has_api_key(self.backend) })
    }

    fn sign_in<'a>(&'a self) -> ProviderFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            let Some(prompt) = self.prompt.as_ref() else {
                return Err(ProviderError::authentication(format!(
                    "no sign-in prompt configured for {}",
                    self.backend
                )));
            };

            match prompt.request_api_key(self.backend).await? {
                Some(api_key) => self.credentials.set_api_key(self.backend, api_key),
                None => Err(ProviderError::authentication("sign-in was cancelled")),
            }
        })
    }

    fn sign_out<'a>(&'a self) -> ProviderFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            self.credentials.clear(self.backend)?;
            Ok(())
        })
    }
}

impl std::fmt::Debug for ApiKeySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeySession")
            .field("backend", &self.backend)
            .field("has_prompt", &self.prompt.is_some())
            .field("available", &self.available)
            .finish()
    }
}

/// Session for local backends that need no account.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticSession;

impl SessionCapability for StaticSession {
    fn is_available(&self) -> bool {
        true
    }

    fn is_signed_in<'a>(&'a self) -> ProviderFuture<'a, Result<bool, ProviderError>> {
        Box::pin(async { Ok(true) })
    }

    fn sign_in<'a>(&'a self) -> ProviderFuture<'a, Result<(), ProviderError>> {
        Box::pin(async { Ok(()) })
    }

    fn sign_out<'a>(&'a self) -> ProviderFuture<'a, Result<(), ProviderError>> {
        Box::pin(async { Ok(()) })
    }
}
