//! User-facing error taxonomy and the terminal failure value.
//!
//! ```rust
//! use kengine::{ErrorKind, OrchestrationFailure, to_user_message};
//!
//! let failure = OrchestrationFailure::new(ErrorKind::Timeout, "upstream took 95s");
//! assert_eq!(failure.to_string(), to_user_message(ErrorKind::Timeout));
//! assert!(!failure.to_string().contains("95s"));
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

use kcontract::ContractError;
use kprovider::BackendId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    AuthUnavailable,
    AuthDenied,
    BackendUnreachable,
    BackendRejected,
    MalformedResponse,
    QuotaOrPermission,
    Network,
    Timeout,
    Unknown,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 9] = [
        Self::AuthUnavailable,
        Self::AuthDenied,
        Self::BackendUnreachable,
        Self::BackendRejected,
        Self::MalformedResponse,
        Self::QuotaOrPermission,
        Self::Network,
        Self::Timeout,
        Self::Unknown,
    ];

    /// Whether a secondary backend may be tried after this failure.
    pub fn is_recoverable(self) -> bool {
        !matches!(self, Self::AuthDenied | Self::AuthUnavailable)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AuthUnavailable => "auth_unavailable",
            Self::AuthDenied => "auth_denied",
            Self::BackendUnreachable => "backend_unreachable",
            Self::BackendRejected => "backend_rejected",
            Self::MalformedResponse => "malformed_response",
            Self::QuotaOrPermission => "quota_or_permission",
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Unknown => "unknown",
        }
    }
}

const GENERIC_MESSAGE: &str =
    "Something went wrong while contacting the AI service. Please try again, or sign in again if the problem persists.";

/// One short sentence safe to show an end user. Never includes diagnostics.
pub fn to_user_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Network => "Network error. Please check your internet connection and try again.",
        ErrorKind::Timeout => "The request timed out. Please try again.",
        ErrorKind::MalformedResponse => {
            "The AI returned a response in an unexpected format. Please try again."
        }
        ErrorKind::AuthUnavailable
        | ErrorKind::AuthDenied
        | ErrorKind::BackendUnreachable
        | ErrorKind::BackendRejected
        | ErrorKind::QuotaOrPermission
        | ErrorKind::Unknown => GENERIC_MESSAGE,
    }
}

/// Terminal failure of an orchestration call.
///
/// `Display` renders only the user-safe message; `diagnostic` carries the
/// original error text for operator logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestrationFailure {
    pub kind: ErrorKind,
    pub backend: Option<BackendId>,
    pub step: Option<String>,
    pub diagnostic: String,
}

impl OrchestrationFailure {
    pub fn new(kind: ErrorKind, diagnostic: impl Into<String>) -> Self {
        Self {
            kind,
            backend: None,
            step: None,
            diagnostic: diagnostic.into(),
        }
    }

    pub fn auth_unavailable(diagnostic: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthUnavailable, diagnostic)
    }

    pub fn auth_denied(diagnostic: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthDenied, diagnostic)
    }

    pub fn backend_rejected(diagnostic: impl Into<String>) -> Self {
        Self::new(ErrorKind::BackendRejected, diagnostic)
    }

    pub fn malformed_response(diagnostic: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedResponse, diagnostic)
    }

    pub fn with_backend(mut self, backend: BackendId) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_step(mut self, step: impl Into<String>) -> Self {
        self.step = Some(step.into());
        self
    }

    pub fn user_message(&self) -> &'static str {
        to_user_message(self.kind)
    }

    pub fn is_recoverable(&self) -> bool {
        self.kind.is_recoverable()
    }
}

impl Display for OrchestrationFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.user_message())
    }
}

impl Error for OrchestrationFailure {}

impl From<ContractError> for OrchestrationFailure {
    fn from(value: ContractError) -> Self {
        Self::malformed_response(value.to_string())
    }
}
