use std::sync::Arc;
use std::time::Duration;

use kengine::{CallContext, CallOperation, OrchestrationFailure, OrchestrationHooks, OutcomeKind};
use kprovider::BackendId;

/// Forwards every event to each registered hooks value in registration order.
#[derive(Clone, Default)]
pub struct CompositeHooks {
    hooks: Vec<Arc<dyn OrchestrationHooks>>,
}

impl CompositeHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, hooks: Arc<dyn OrchestrationHooks>) -> Self {
        self.hooks.push(hooks);
        self
    }

    pub fn push(&mut self, hooks: Arc<dyn OrchestrationHooks>) {
        self.hooks.push(hooks);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl OrchestrationHooks for CompositeHooks {
    fn on_session_check(&self, context: &CallContext, signed_in: bool) {
        for hooks in &self.hooks {
            hooks.on_session_check(context, signed_in);
        }
    }

    fn on_sign_in(&self, context: &CallContext, succeeded: bool) {
        for hooks in &self.hooks {
            hooks.on_sign_in(context, succeeded);
        }
    }

    fn on_call_start(
        &self,
        context: &CallContext,
        backend: BackendId,
        operation: CallOperation,
        step: &str,
    ) {
        for hooks in &self.hooks {
            hooks.on_call_start(context, backend, operation, step);
        }
    }

    fn on_call_success(
        &self,
        context: &CallContext,
        backend: BackendId,
        operation: CallOperation,
        step: &str,
        elapsed: Duration,
    ) {
        for hooks in &self.hooks {
            hooks.on_call_success(context, backend, operation, step, elapsed);
        }
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
        for hooks in &self.hooks {
            hooks.on_call_failure(context, backend, operation, step, failure, elapsed);
        }
    }

    fn on_fallback(
        &self,
        context: &CallContext,
        from: BackendId,
        to: BackendId,
        failure: &OrchestrationFailure,
    ) {
        for hooks in &self.hooks {
            hooks.on_fallback(context, from, to, failure);
        }
    }

    fn on_outcome(
        &self,
        context: &CallContext,
        outcome: OutcomeKind,
        failure: Option<&OrchestrationFailure>,
        elapsed: Duration,
    ) {
        for hooks in &self.hooks {
            hooks.on_outcome(context, outcome, failure, elapsed);
        }
    }
}
