//! Per-attempt backend invoker.
//!
//! A tool pipeline is plain sequential async code over one [`Invocation`]:
//! each sub-call is normalized and validated before it returns, so a later
//! step can only be built from an already validated earlier result.

use std::sync::Arc;
use std::time::Instant;

use kcontract::{Contract, normalize, validate};
use kprovider::{
    BackendId, CompletionRequest, GenerationCapability, LocalSpeechCapability, MediaArtifact,
    ProviderError, RawModelResponse,
};

use crate::{
    CallContext, CallOperation, ErrorKind, OrchestrationFailure, OrchestrationHooks,
    classify_provider_error,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptRole {
    Primary,
    Secondary,
}

pub struct Invocation {
    backend: Arc<dyn GenerationCapability>,
    hooks: Arc<dyn OrchestrationHooks>,
    context: CallContext,
    role: AttemptRole,
    responses: Vec<RawModelResponse>,
}

impl Invocation {
    pub fn new(
        backend: Arc<dyn GenerationCapability>,
        hooks: Arc<dyn OrchestrationHooks>,
        context: CallContext,
        role: AttemptRole,
    ) -> Self {
        Self {
            backend,
            hooks,
            context,
            role,
            responses: Vec::new(),
        }
    }

    pub fn backend_id(&self) -> BackendId {
        self.backend.id()
    }

    pub fn role(&self) -> AttemptRole {
        self.role
    }

    pub fn context(&self) -> &CallContext {
        &self.context
    }

    /// Raw responses recorded so far in this attempt, in call order.
    pub fn responses(&self) -> &[RawModelResponse] {
        &self.responses
    }

    /// Model name for a request. A secondary backend always uses its own
    /// default, since a requested model names a primary-backend model.
    pub fn model_for(&self, requested: Option<&str>) -> String {
        match self.role {
            AttemptRole::Primary => requested.unwrap_or_default().trim().to_string(),
            AttemptRole::Secondary => String::new(),
        }
    }

    pub async fn complete_json<T: Contract>(
        &mut self,
        step: &str,
        request: CompletionRequest,
    ) -> Result<T, OrchestrationFailure> {
        let started = self.start(CallOperation::Complete, step);
        let result = self.backend.complete(request).await;
        let response = self.record(CallOperation::Complete, step, started, result)?;

        let raw_text = response.raw_text.unwrap_or_default();
        let validated = validate::<T>(&normalize(&raw_text));
        self.settle(CallOperation::Complete, step, started, validated.map_err(Into::into))
    }

    /// Completion whose trimmed text is the result; only emptiness is checked.
    pub async fn complete_text(
        &mut self,
        step: &str,
        request: CompletionRequest,
    ) -> Result<String, OrchestrationFailure> {
        let started = self.start(CallOperation::Complete, step);
        let result = self.backend.complete(request).await;
        let response = self.record(CallOperation::Complete, step, started, result)?;

        let text = response.raw_text.unwrap_or_default().trim().to_string();
        let checked = if text.is_empty() {
            Err(OrchestrationFailure::malformed_response("backend returned empty text"))
        } else {
            Ok(text)
        };
        self.settle(CallOperation::Complete, step, started, checked)
    }

    pub async fn generate_image(
        &mut self,
        step: &str,
        prompt: String,
        model: Option<String>,
    ) -> Result<MediaArtifact, OrchestrationFailure> {
        let started = self.start(CallOperation::GenerateImage, step);
        let result = self.backend.generate_image(prompt, model).await;
        let response = self.record(CallOperation::GenerateImage, step, started, result)?;
        let artifact = non_empty_artifact(response);
        self.settle(CallOperation::GenerateImage, step, started, artifact)
    }

    pub async fn synthesize_speech(
        &mut self,
        step: &str,
        text: String,
        locale: Option<String>,
    ) -> Result<MediaArtifact, OrchestrationFailure> {
        let started = self.start(CallOperation::SynthesizeSpeech, step);
        let result = self.backend.synthesize_speech(text, locale).await;
        let response = self.record(CallOperation::SynthesizeSpeech, step, started, result)?;
        let artifact = non_empty_artifact(response);
        self.settle(CallOperation::SynthesizeSpeech, step, started, artifact)
    }

    fn start(&self, operation: CallOperation, step: &str) -> Instant {
        self.hooks
            .on_call_start(&self.context, self.backend.id(), operation, step);
        Instant::now()
    }

    /// Keeps a successful raw response; classifies and reports a backend error.
    fn record(
        &mut self,
        operation: CallOperation,
        step: &str,
        started: Instant,
        result: Result<RawModelResponse, ProviderError>,
    ) -> Result<RawModelResponse, OrchestrationFailure> {
        match result {
            Ok(response) => {
                self.responses.push(response.clone());
                Ok(response)
            }
            Err(error) => {
                let failure = OrchestrationFailure::new(classify_provider_error(&error), error.to_string());
                self.settle(operation, step, started, Err(failure))
            }
        }
    }

    fn settle<T>(
        &self,
        operation: CallOperation,
        step: &str,
        started: Instant,
        result: Result<T, OrchestrationFailure>,
    ) -> Result<T, OrchestrationFailure> {
        let backend = self.backend.id();
        match result {
            Ok(value) => {
                self.hooks.on_call_success(
                    &self.context,
                    backend,
                    operation,
                    step,
                    started.elapsed(),
                );
                Ok(value)
            }
            Err(failure) => {
                let failure = failure.with_backend(backend).with_step(step);
                self.hooks.on_call_failure(
                    &self.context,
                    backend,
                    operation,
                    step,
                    &failure,
                    started.elapsed(),
                );
                Err(failure)
            }
        }
    }
}

fn non_empty_artifact(response: RawModelResponse) -> Result<MediaArtifact, OrchestrationFailure> {
    match response.raw_binary {
        Some(artifact) if !artifact.is_empty() => Ok(artifact),
        _ => Err(OrchestrationFailure::new(
            ErrorKind::BackendRejected,
            "backend returned no media artifact",
        )),
    }
}

/// Invoker for a native playback capability used as a fallback route.
pub struct LocalSpeechInvocation {
    speech: Arc<dyn LocalSpeechCapability>,
    hooks: Arc<dyn OrchestrationHooks>,
    context: CallContext,
}

impl LocalSpeechInvocation {
    pub fn new(
        speech: Arc<dyn LocalSpeechCapability>,
        hooks: Arc<dyn OrchestrationHooks>,
        context: CallContext,
    ) -> Self {
        Self {
            speech,
            hooks,
            context,
        }
    }

    pub fn backend_id(&self) -> BackendId {
        self.speech.id()
    }

    pub async fn speak(
        &self,
        step: &str,
        text: String,
        locale: Option<String>,
    ) -> Result<(), OrchestrationFailure> {
        let backend = self.speech.id();
        self.hooks
            .on_call_start(&self.context, backend, CallOperation::Speak, step);
        let started = Instant::now();

        match self.speech.speak(text, locale).await {
            Ok(()) => {
                self.hooks.on_call_success(
                    &self.context,
                    backend,
                    CallOperation::Speak,
                    step,
                    started.elapsed(),
                );
                Ok(())
            }
            Err(error) => {
                let failure = OrchestrationFailure::new(classify_provider_error(&error), error.to_string())
                    .with_backend(backend)
                    .with_step(step);
                self.hooks.on_call_failure(
                    &self.context,
                    backend,
                    CallOperation::Speak,
                    step,
                    &failure,
                    started.elapsed(),
                );
                Err(failure)
            }
        }
    }
}
