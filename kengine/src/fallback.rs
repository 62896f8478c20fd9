//! Primary-then-secondary combinator.
//!
//! ```rust
//! use kengine::{ErrorKind, OrchestrationFailure, OrchestrationOutcome, with_fallback};
//! use kprovider::BackendId;
//!
//! let outcome = block_on(with_fallback(
//!     || async { Err::<&str, _>(OrchestrationFailure::new(ErrorKind::Network, "offline")) },
//!     BackendId::Ollama,
//!     |_failure| async { Ok("local answer") },
//! ));
//! assert_eq!(
//!     outcome,
//!     OrchestrationOutcome::Fallback { result: "local answer", backend: BackendId::Ollama }
//! );
//!
//! # fn block_on<F: std::future::Future>(future: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(future)
//! # }
//! ```

use std::future::Future;

use kprovider::BackendId;

use crate::{OrchestrationFailure, OrchestrationOutcome};

/// Runs `primary`; on a recoverable failure runs `secondary` once, handing it
/// the primary failure.
///
/// Unrecoverable failures (authentication) return immediately and the
/// secondary is never invoked. A secondary failure is reported as-is.
pub async fn with_fallback<T, P, PF, S, SF>(
    primary: P,
    secondary_backend: BackendId,
    secondary: S,
) -> OrchestrationOutcome<T>
where
    P: FnOnce() -> PF,
    PF: Future<Output = Result<T, OrchestrationFailure>>,
    S: FnOnce(OrchestrationFailure) -> SF,
    SF: Future<Output = Result<T, OrchestrationFailure>>,
{
    let failure = match primary().await {
        Ok(result) => return OrchestrationOutcome::Success(result),
        Err(failure) => failure,
    };

    if !failure.is_recoverable() {
        return OrchestrationOutcome::Failure(failure);
    }

    match secondary(failure).await {
        Ok(result) => OrchestrationOutcome::Fallback {
            result,
            backend: secondary_backend,
        },
        Err(failure) => OrchestrationOutcome::Failure(failure),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::ErrorKind;

    #[tokio::test]
    async fn primary_success_skips_secondary() {
        let calls = AtomicUsize::new(0);
        let outcome = with_fallback(
            || async { Ok(1) },
            BackendId::Ollama,
            |_| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(2)
            },
        )
        .await;

        assert_eq!(outcome, OrchestrationOutcome::Success(1));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn auth_failures_never_reach_secondary() {
        for kind in [ErrorKind::AuthDenied, ErrorKind::AuthUnavailable] {
            let calls = AtomicUsize::new(0);
            let outcome = with_fallback(
                || async move { Err::<u8, _>(OrchestrationFailure::new(kind, "no session")) },
                BackendId::Ollama,
                |_| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(2)
                },
            )
            .await;

            assert_eq!(outcome.failure().map(|failure| failure.kind), Some(kind));
            assert_eq!(calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn secondary_failure_is_returned() {
        let outcome = with_fallback(
            || async { Err::<u8, _>(OrchestrationFailure::new(ErrorKind::BackendRejected, "400")) },
            BackendId::Ollama,
            |primary| async move {
                assert_eq!(primary.kind, ErrorKind::BackendRejected);
                Err(OrchestrationFailure::new(ErrorKind::Network, "refused"))
            },
        )
        .await;

        assert_eq!(
            outcome.failure().map(|failure| failure.kind),
            Some(ErrorKind::Network)
        );
    }
}
