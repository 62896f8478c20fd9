//! The single value an orchestration call returns.

use kprovider::BackendId;

use crate::{OrchestrationFailure, OutcomeKind};

#[derive(Debug, Clone, PartialEq)]
pub enum OrchestrationOutcome<T> {
    Success(T),
    /// Produced by the secondary mechanism after the primary failed.
    Fallback { result: T, backend: BackendId },
    Failure(OrchestrationFailure),
}

impl<T> OrchestrationOutcome<T> {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Success(_) => OutcomeKind::Success,
            Self::Fallback { .. } => OutcomeKind::Fallback,
            Self::Failure(_) => OutcomeKind::Failure,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    pub fn result(&self) -> Option<&T> {
        match self {
            Self::Success(result) | Self::Fallback { result, .. } => Some(result),
            Self::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&OrchestrationFailure> {
        match self {
            Self::Failure(failure) => Some(failure),
            _ => None,
        }
    }

    /// User-safe message when the call failed.
    pub fn user_message(&self) -> Option<&'static str> {
        self.failure().map(OrchestrationFailure::user_message)
    }

    pub fn into_result(self) -> Result<T, OrchestrationFailure> {
        match self {
            Self::Success(result) | Self::Fallback { result, .. } => Ok(result),
            Self::Failure(failure) => Err(failure),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> OrchestrationOutcome<U> {
        match self {
            Self::Success(result) => OrchestrationOutcome::Success(f(result)),
            Self::Fallback { result, backend } => OrchestrationOutcome::Fallback {
                result: f(result),
                backend,
            },
            Self::Failure(failure) => OrchestrationOutcome::Failure(failure),
        }
    }
}
