//! Ordered classification of heterogeneous failure shapes.
//!
//! ```rust
//! use kengine::{ErrorKind, FailureSignal, classify};
//! use serde_json::json;
//!
//! assert_eq!(classify(&FailureSignal::from(json!({}))), ErrorKind::QuotaOrPermission);
//! assert_eq!(classify(&FailureSignal::Null), ErrorKind::Unknown);
//! assert_eq!(
//!     classify(&FailureSignal::text("Failed to fetch")),
//!     ErrorKind::Network
//! );
//! ```

use kprovider::{ProviderError, ProviderErrorKind};
use serde_json::{Map, Value};

use crate::ErrorKind;

const QUOTA_OR_PERMISSION_TERMS: &[&str] = &[
    "usage limit",
    "quota",
    "rate limit",
    "permission",
    "denied",
    "not allowed",
    "forbidden",
    "insufficient",
];

const NETWORK_TERMS: &[&str] = &[
    "network",
    "fetch",
    "connection",
    "dns",
    "econnrefused",
    "econnreset",
    "offline",
];

const TIMEOUT_TERMS: &[&str] = &["timeout", "timed out", "deadline"];

const MALFORMED_TERMS: &[&str] = &[
    "malformed",
    "invalid response",
    "invalid format",
    "unexpected token",
    "unexpected end",
    "json",
    "parse",
];

/// Any value a failed backend call may surface.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureSignal {
    Null,
    Text(String),
    /// Message of an error value.
    Error(String),
    Object(Map<String, Value>),
}

impl FailureSignal {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }
}

impl From<Value> for FailureSignal {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::String(text) => Self::Text(text),
            Value::Object(object) => Self::Object(object),
            other => Self::Text(other.to_string()),
        }
    }
}

impl From<&ProviderError> for FailureSignal {
    fn from(value: &ProviderError) -> Self {
        match &value.envelope {
            Some(Value::Object(object)) => Self::Object(object.clone()),
            _ => Self::Error(value.message.clone()),
        }
    }
}

/// Maps any failure shape to exactly one kind. First matching rule wins.
pub fn classify(signal: &FailureSignal) -> ErrorKind {
    match signal {
        FailureSignal::Null => ErrorKind::Unknown,
        FailureSignal::Text(message) | FailureSignal::Error(message) => classify_message(message),
        FailureSignal::Object(object) => {
            let envelope_message = nested_error_message(object);
            if envelope_message.is_some_and(|message| mentions(message, QUOTA_OR_PERMISSION_TERMS)) {
                return ErrorKind::QuotaOrPermission;
            }

            if object.is_empty() {
                return ErrorKind::QuotaOrPermission;
            }

            envelope_message
                .or_else(|| object.get("message").and_then(Value::as_str))
                .map(classify_message)
                .unwrap_or(ErrorKind::Unknown)
        }
    }
}

/// Classifies a typed backend error, falling back to its kind when the
/// message and envelope say nothing recognizable.
pub fn classify_provider_error(error: &ProviderError) -> ErrorKind {
    match classify(&FailureSignal::from(error)) {
        ErrorKind::Unknown => match error.kind {
            ProviderErrorKind::Transport | ProviderErrorKind::Unavailable => {
                ErrorKind::BackendUnreachable
            }
            ProviderErrorKind::Timeout => ErrorKind::Timeout,
            ProviderErrorKind::Authentication
            | ProviderErrorKind::PermissionDenied
            | ProviderErrorKind::RateLimited => ErrorKind::QuotaOrPermission,
            ProviderErrorKind::InvalidRequest
            | ProviderErrorKind::Unsupported
            | ProviderErrorKind::Rejected
            | ProviderErrorKind::Other => ErrorKind::BackendRejected,
        },
        kind => kind,
    }
}

fn classify_message(message: &str) -> ErrorKind {
    if mentions(message, NETWORK_TERMS) {
        ErrorKind::Network
    } else if mentions(message, TIMEOUT_TERMS) {
        ErrorKind::Timeout
    } else if mentions(message, MALFORMED_TERMS) {
        ErrorKind::MalformedResponse
    } else {
        ErrorKind::Unknown
    }
}

fn nested_error_message(object: &Map<String, Value>) -> Option<&str> {
    object
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str)
}

fn mentions(message: &str, terms: &[&str]) -> bool {
    let message = message.to_ascii_lowercase();
    terms.iter().any(|term| message.contains(term))
}
