use std::sync::Arc;
use std::time::Instant;

use kprovider::{BackendId, GenerationCapability, LocalSpeechCapability, SessionCapability};

use crate::{
    AttemptRole, AuthGate, CallContext, FallbackRoute, Invocation, LocalSpeechInvocation,
    NoopOrchestrationHooks, OrchestrationFailure, OrchestrationHooks, OrchestrationOutcome,
    Session, Tool, with_fallback,
};

pub struct OrchestratorBuilder {
    session: Arc<dyn SessionCapability>,
    primary: Arc<dyn GenerationCapability>,
    secondary: Option<Arc<dyn GenerationCapability>>,
    local_speech: Option<Arc<dyn LocalSpeechCapability>>,
    hooks: Arc<dyn OrchestrationHooks>,
}

impl OrchestratorBuilder {
    pub fn new(session: Arc<dyn SessionCapability>, primary: Arc<dyn GenerationCapability>) -> Self {
        Self {
            session,
            primary,
            secondary: None,
            local_speech: None,
            hooks: Arc::new(NoopOrchestrationHooks),
        }
    }

    pub fn secondary(mut self, secondary: Arc<dyn GenerationCapability>) -> Self {
        self.secondary = Some(secondary);
        self
    }

    pub fn local_speech(mut self, local_speech: Arc<dyn LocalSpeechCapability>) -> Self {
        self.local_speech = Some(local_speech);
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn OrchestrationHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn build(self) -> Orchestrator {
        Orchestrator {
            gate: AuthGate::new(self.session, self.hooks.clone()),
            primary: self.primary,
            secondary: self.secondary,
            local_speech: self.local_speech,
            hooks: self.hooks,
        }
    }
}

/// Runs tools against the primary backend behind the authentication gate,
/// falling back once per call when the failure is recoverable.
///
/// The session gate guards the primary backend only; the secondary and
/// local speech capabilities need no sign-in.
#[derive(Clone)]
pub struct Orchestrator {
    gate: AuthGate,
    primary: Arc<dyn GenerationCapability>,
    secondary: Option<Arc<dyn GenerationCapability>>,
    local_speech: Option<Arc<dyn LocalSpeechCapability>>,
    hooks: Arc<dyn OrchestrationHooks>,
}

impl Orchestrator {
    pub fn builder(
        session: Arc<dyn SessionCapability>,
        primary: Arc<dyn GenerationCapability>,
    ) -> OrchestratorBuilder {
        OrchestratorBuilder::new(session, primary)
    }

    pub fn primary_backend(&self) -> BackendId {
        self.primary.id()
    }

    pub fn secondary_backend(&self) -> Option<BackendId> {
        self.secondary.as_ref().map(|secondary| secondary.id())
    }

    pub fn has_local_speech(&self) -> bool {
        self.local_speech.is_some()
    }

    pub async fn ensure_session(&self) -> Result<Session, OrchestrationFailure> {
        self.gate.ensure_session(&CallContext::new("session")).await
    }

    pub async fn sign_out(&self) -> Result<(), OrchestrationFailure> {
        self.gate.sign_out().await
    }

    pub async fn run<T: Tool>(&self, tool: &T) -> OrchestrationOutcome<T::Output> {
        self.run_with_context(tool, CallContext::new(tool.kind()))
            .await
    }

    pub async fn run_with_context<T: Tool>(
        &self,
        tool: &T,
        context: CallContext,
    ) -> OrchestrationOutcome<T::Output> {
        let started = Instant::now();
        let outcome = match tool.validate_input() {
            Ok(()) => self.attempt(tool, &context).await,
            Err(reason) => OrchestrationOutcome::Failure(
                OrchestrationFailure::backend_rejected(reason).with_step("validate_input"),
            ),
        };

        self.hooks
            .on_outcome(&context, outcome.kind(), outcome.failure(), started.elapsed());
        outcome
    }

    async fn attempt<T: Tool>(
        &self,
        tool: &T,
        context: &CallContext,
    ) -> OrchestrationOutcome<T::Output> {
        let primary = || async {
            self.gate.ensure_session(context).await?;
            let mut invocation = Invocation::new(
                self.primary.clone(),
                self.hooks.clone(),
                context.clone(),
                AttemptRole::Primary,
            );
            tool.run(&mut invocation).await
        };

        match (tool.fallback_route(), &self.secondary, &self.local_speech) {
            (FallbackRoute::Secondary, Some(secondary), _)
                if tool
                    .required_media()
                    .is_none_or(|kind| secondary.supports_media(kind)) =>
            {
                with_fallback(primary, secondary.id(), |failure| async move {
                    self.hooks
                        .on_fallback(context, self.primary.id(), secondary.id(), &failure);
                    let mut invocation = Invocation::new(
                        secondary.clone(),
                        self.hooks.clone(),
                        context.clone(),
                        AttemptRole::Secondary,
                    );
                    tool.run(&mut invocation).await
                })
                .await
            }
            (FallbackRoute::LocalSpeech, _, Some(speech)) => {
                with_fallback(primary, speech.id(), |failure| async move {
                    self.hooks
                        .on_fallback(context, self.primary.id(), speech.id(), &failure);
                    let invocation =
                        LocalSpeechInvocation::new(speech.clone(), self.hooks.clone(), context.clone());
                    tool.run_local(&invocation).await
                })
                .await
            }
            _ => match primary().await {
                Ok(result) => OrchestrationOutcome::Success(result),
                Err(failure) => OrchestrationOutcome::Failure(failure),
            },
        }
    }
}
