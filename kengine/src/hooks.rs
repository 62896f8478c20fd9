//! Hook contracts for observing orchestration calls.
//!
//! ```rust
//! use kengine::{NoopOrchestrationHooks, OrchestrationHooks};
//!
//! fn accepts_hooks(_hooks: &dyn OrchestrationHooks) {}
//!
//! let hooks = NoopOrchestrationHooks;
//! accepts_hooks(&hooks);
//! ```

use std::time::Duration;

use kcommon::TraceId;
use kprovider::BackendId;

use crate::OrchestrationFailure;

/// Identifies one orchestration call across all hook events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    pub trace_id: TraceId,
    pub tool: &'static str,
}

impl CallContext {
    pub fn new(tool: &'static str) -> Self {
        Self {
            trace_id: TraceId::generate(),
            tool,
        }
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = trace_id;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallOperation {
    Complete,
    GenerateImage,
    SynthesizeSpeech,
    Speak,
}

impl CallOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::GenerateImage => "generate_image",
            Self::SynthesizeSpeech => "synthesize_speech",
            Self::Speak => "speak",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Success,
    Fallback,
    Failure,
}

impl OutcomeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Fallback => "fallback",
            Self::Failure => "failure",
        }
    }
}

pub trait OrchestrationHooks: Send + Sync {
    fn on_session_check(&self, _context: &CallContext, _signed_in: bool) {}

    fn on_sign_in(&self, _context: &CallContext, _succeeded: bool) {}

    fn on_call_start(
        &self,
        _context: &CallContext,
        _backend: BackendId,
        _operation: CallOperation,
        _step: &str,
    ) {
    }

    fn on_call_success(
        &self,
        _context: &CallContext,
        _backend: BackendId,
        _operation: CallOperation,
        _step: &str,
        _elapsed: Duration,
    ) {
    }

    fn on_call_failure(
        &self,
        _context: &CallContext,
        _backend: BackendId,
        _operation: CallOperation,
        _step: &str,
        _failure: &OrchestrationFailure,
        _elapsed: Duration,
    ) {
    }

    fn on_fallback(
        &self,
        _context: &CallContext,
        _from: BackendId,
        _to: BackendId,
        _failure: &OrchestrationFailure,
    ) {
    }

    fn on_outcome(
        &self,
        _context: &CallContext,
        _outcome: OutcomeKind,
        _failure: Option<&OrchestrationFailure>,
        _elapsed: Duration,
    ) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopOrchestrationHooks;

impl OrchestrationHooks for NoopOrchestrationHooks {}
