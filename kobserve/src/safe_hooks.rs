use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use kengine::{CallContext, CallOperation, OrchestrationFailure, OrchestrationHooks, OutcomeKind};
use kprovider::BackendId;

/// Wraps hooks so a panicking observer never aborts an orchestration.
pub struct SafeOrchestrationHooks<H> {
    inner: H,
}

impl<H> SafeOrchestrationHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> H {
        self.inner
    }
}

impl<H> OrchestrationHooks for SafeOrchestrationHooks<H>
where
    H: OrchestrationHooks,
{
    fn on_session_check(&self, context: &CallContext, signed_in: bool) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_session_check(context, signed_in)
        }));
    }

    fn on_sign_in(&self, context: &CallContext, succeeded: bool) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_sign_in(context, succeeded)
        }));
    }

    fn on_call_start(
        &self,
        context: &CallContext,
        backend: BackendId,
        operation: CallOperation,
        step: &str,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_call_start(context, backend, operation, step)
        }));
    }

    fn on_call_success(
        &self,
        context: &CallContext,
        backend: BackendId,
        operation: CallOperation,
        step: &str,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_call_success(context, backend, operation, step, elapsed)
        }));
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
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_call_failure(context, backend, operation, step, failure, elapsed)
        }));
    }

    fn on_fallback(
        &self,
        context: &CallContext,
        from: BackendId,
        to: BackendId,
        failure: &OrchestrationFailure,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_fallback(context, from, to, failure)
        }));
    }

    fn on_outcome(
        &self,
        context: &CallContext,
        outcome: OutcomeKind,
        failure: Option<&OrchestrationFailure>,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_outcome(context, outcome, failure, elapsed)
        }));
    }
}
