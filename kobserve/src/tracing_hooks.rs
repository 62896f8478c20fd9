//! Tracing-based observability hooks for session checks, backend calls, and outcomes.
//!
//! ```rust
//! use kengine::OrchestrationHooks;
//! use kobserve::TracingObservabilityHooks;
//!
//! fn accepts_hooks(_hooks: &dyn OrchestrationHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_hooks(&hooks);
//! ```

use std::time::Duration;

use kengine::{CallContext, CallOperation, OrchestrationFailure, OrchestrationHooks, OutcomeKind};
use kprovider::BackendId;

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl OrchestrationHooks for TracingObservabilityHooks {
    fn on_session_check(&self, context: &CallContext, signed_in: bool) {
        tracing::info!(
            phase = "session",
            event = "check",
            tool = context.tool,
            trace_id = %context.trace_id,
            signed_in
        );
    }

    fn on_sign_in(&self, context: &CallContext, succeeded: bool) {
        if succeeded {
            tracing::info!(
                phase = "session",
                event = "sign_in",
                tool = context.tool,
                trace_id = %context.trace_id,
                succeeded
            );
        } else {
            tracing::warn!(
                phase = "session",
                event = "sign_in",
                tool = context.tool,
                trace_id = %context.trace_id,
                succeeded
            );
        }
    }

    fn on_call_start(
        &self,
        context: &CallContext,
        backend: BackendId,
        operation: CallOperation,
        step: &str,
    ) {
        tracing::info!(
            phase = "backend",
            event = "call_start",
            tool = context.tool,
            trace_id = %context.trace_id,
            backend = %backend,
            operation = operation.as_str(),
            step
        );
    }

    fn on_call_success(
        &self,
        context: &CallContext,
        backend: BackendId,
        operation: CallOperation,
        step: &str,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "backend",
            event = "call_success",
            tool = context.tool,
            trace_id = %context.trace_id,
            backend = %backend,
            operation = operation.as_str(),
            step,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_call_failure(
        &self,
        context: &CallContext,
        backend: BackendId,
        operation: CallOperation,
        step: &str,
        failure: &OrchestrationFailure,
        elapsed: Duration,
    ) {
        tracing::error!(
            phase = "backend",
            event = "call_failure",
            tool = context.tool,
            trace_id = %context.trace_id,
            backend = %backend,
            operation = operation.as_str(),
            step,
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = failure.kind.as_str(),
            recoverable = failure.is_recoverable(),
            error = %failure.diagnostic
        );
    }

    fn on_fallback(
        &self,
        context: &CallContext,
        from: BackendId,
        to: BackendId,
        failure: &OrchestrationFailure,
    ) {
        tracing::warn!(
            phase = "fallback",
            event = "engaged",
            tool = context.tool,
            trace_id = %context.trace_id,
            from = %from,
            to = %to,
            error_kind = failure.kind.as_str(),
            error = %failure.diagnostic
        );
    }

    fn on_outcome(
        &self,
        context: &CallContext,
        outcome: OutcomeKind,
        failure: Option<&OrchestrationFailure>,
        elapsed: Duration,
    ) {
        match failure {
            Some(failure) => tracing::error!(
                phase = "outcome",
                event = outcome.as_str(),
                tool = context.tool,
                trace_id = %context.trace_id,
                elapsed_ms = elapsed.as_millis() as u64,
                error_kind = failure.kind.as_str(),
                step = failure.step.as_deref().unwrap_or(""),
                error = %failure.diagnostic
            ),
            None => tracing::info!(
                phase = "outcome",
                event = outcome.as_str(),
                tool = context.tool,
                trace_id = %context.trace_id,
                elapsed_ms = elapsed.as_millis() as u64
            ),
        }
    }
}
