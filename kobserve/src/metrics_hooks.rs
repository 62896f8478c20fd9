//! Metrics-based observability hooks for orchestration calls.
//!
//! ```rust
//! use kengine::OrchestrationHooks;
//! use kobserve::MetricsObservabilityHooks;
//!
//! fn accepts_hooks(_hooks: &dyn OrchestrationHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_hooks(&hooks);
//! ```

use std::time::Duration;

use kengine::{CallContext, CallOperation, OrchestrationFailure, OrchestrationHooks, OutcomeKind};
use kprovider::BackendId;

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl OrchestrationHooks for MetricsObservabilityHooks {
    fn on_sign_in(&self, context: &CallContext, succeeded: bool) {
        metrics::counter!(
            "klutz_sign_in_total",
            "tool" => context.tool,
            "succeeded" => succeeded.to_string()
        )
        .increment(1);
    }

    fn on_call_start(
        &self,
        context: &CallContext,
        backend: BackendId,
        operation: CallOperation,
        _step: &str,
    ) {
        metrics::counter!(
            "klutz_backend_call_start_total",
            "tool" => context.tool,
            "backend" => backend.to_string(),
            "operation" => operation.as_str()
        )
        .increment(1);
    }

    fn on_call_success(
        &self,
        context: &CallContext,
        backend: BackendId,
        operation: CallOperation,
        _step: &str,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "klutz_backend_call_success_total",
            "tool" => context.tool,
            "backend" => backend.to_string(),
            "operation" => operation.as_str()
        )
        .increment(1);
        metrics::histogram!(
            "klutz_backend_call_duration_seconds",
            "backend" => backend.to_string(),
            "operation" => operation.as_str(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_call_failure(
        &self,
        context: &CallContext,
        backend: BackendId,
        operation: CallOperation,
        _step: &str,
        failure: &OrchestrationFailure,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "klutz_backend_call_failure_total",
            "tool" => context.tool,
            "backend" => backend.to_string(),
            "operation" => operation.as_str(),
            "error_kind" => failure.kind.as_str()
        )
        .increment(1);
        metrics::histogram!(
            "klutz_backend_call_duration_seconds",
            "backend" => backend.to_string(),
            "operation" => operation.as_str(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_fallback(
        &self,
        context: &CallContext,
        from: BackendId,
        to: BackendId,
        failure: &OrchestrationFailure,
    ) {
        metrics::counter!(
            "klutz_fallback_total",
            "tool" => context.tool,
            "from" => from.to_string(),
            "to" => to.to_string(),
            "error_kind" => failure.kind.as_str()
        )
        .increment(1);
    }

    fn on_outcome(
        &self,
        context: &CallContext,
        outcome: OutcomeKind,
        failure: Option<&OrchestrationFailure>,
        elapsed: Duration,
    ) {
        let error_kind = failure.map_or("none", |failure| failure.kind.as_str());
        metrics::counter!(
            "klutz_outcome_total",
            "tool" => context.tool,
            "outcome" => outcome.as_str(),
            "error_kind" => error_kind
        )
        .increment(1);
        metrics::histogram!(
            "klutz_orchestration_duration_seconds",
            "tool" => context.tool,
            "outcome" => outcome.as_str()
        )
        .record(elapsed.as_secs_f64());
    }
}
