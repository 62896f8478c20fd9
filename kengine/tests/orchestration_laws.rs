use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use kengine::prelude::*;
use kengine::{CallContext, OrchestrationHooks, OutcomeKind};
use kprovider::{
    GenerationCapability, LocalSpeechCapability, ProviderError, ProviderFuture, RawModelResponse,
    SessionCapability, StaticSession,
};
use serde::Deserialize;
use serde_json::json;

struct ScriptedBackend {
    id: BackendId,
    replies: Mutex<Vec<Result<String, ProviderError>>>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    fn new(id: BackendId, replies: Vec<Result<String, ProviderError>>) -> Arc<Self> {
        Arc::new(Self {
            id,
            replies: Mutex::new(replies),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl GenerationCapability for ScriptedBackend {
    fn id(&self) -> BackendId {
        self.id
    }

    fn complete<'a>(
        &'a self,
        _request: CompletionRequest,
    ) -> ProviderFuture<'a, Result<RawModelResponse, ProviderError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut replies = self.replies.lock().expect("replies lock");
            if replies.is_empty() {
                return Err(ProviderError::other("no scripted reply left"));
            }
            replies
                .remove(0)
                .map(|text| RawModelResponse::text(self.id, text))
        })
    }
}

struct DeniedSession {
    sign_in_calls: AtomicUsize,
}

impl SessionCapability for DeniedSession {
    fn is_available(&self) -> bool {
        true
    }

    fn is_signed_in<'a>(&'a self) -> ProviderFuture<'a, Result<bool, ProviderError>> {
        Box::pin(async move { Ok(false) })
    }

    fn sign_in<'a>(&'a self) -> ProviderFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    fn sign_out<'a>(&'a self) -> ProviderFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move { Ok(()) })
    }
}

#[derive(Default)]
struct RecordingHooks {
    events: Mutex<Vec<String>>,
}

impl RecordingHooks {
    fn events(&self) -> Vec<String> {
        self.events.lock().expect("events lock").clone()
    }
}

impl OrchestrationHooks for RecordingHooks {
    fn on_fallback(
        &self,
        _context: &CallContext,
        from: BackendId,
        to: BackendId,
        failure: &OrchestrationFailure,
    ) {
        self.events
            .lock()
            .expect("events lock")
            .push(format!("fallback:{from}->{to}:{}", failure.kind.as_str()));
    }

    fn on_outcome(
        &self,
        _context: &CallContext,
        outcome: OutcomeKind,
        _failure: Option<&OrchestrationFailure>,
        _elapsed: Duration,
    ) {
        self.events
            .lock()
            .expect("events lock")
            .push(format!("outcome:{}", outcome.as_str()));
    }
}

#[derive(Debug, Deserialize, PartialEq)]
struct Answer {
    result: String,
}

impl Contract for Answer {
    fn shape() -> ShapeDescriptor {
        ShapeDescriptor::new().required("result", FieldKind::String)
    }
}

struct AnswerTool;

impl Tool for AnswerTool {
    type Output = Answer;

    fn kind(&self) -> &'static str {
        "answer"
    }

    fn run<'a>(
        &'a self,
        invocation: &'a mut Invocation,
    ) -> BoxFuture<'a, Result<Self::Output, OrchestrationFailure>> {
        Box::pin(async move {
            let model = invocation.model_for(None);
            invocation
                .complete_json("answer", CompletionRequest::new(model, Prompt::new("answer")))
                .await
        })
    }
}

#[derive(Debug, Deserialize)]
struct Step {
    summary: String,
}

impl Contract for Step {
    fn shape() -> ShapeDescriptor {
        ShapeDescriptor::new().required("summary", FieldKind::String)
    }
}

struct ThreeStepTool;

impl Tool for ThreeStepTool {
    type Output = Answer;

    fn kind(&self) -> &'static str {
        "three_step"
    }

    fn fallback_route(&self) -> FallbackRoute {
        FallbackRoute::Disabled
    }

    fn run<'a>(
        &'a self,
        invocation: &'a mut Invocation,
    ) -> BoxFuture<'a, Result<Self::Output, OrchestrationFailure>> {
        Box::pin(async move {
            let first: Step = invocation
                .complete_json("first", CompletionRequest::new("", Prompt::new("one")))
                .await?;
            let second: Step = invocation
                .complete_json(
                    "second",
                    CompletionRequest::new("", Prompt::new(format!("two after {}", first.summary))),
                )
                .await?;
            invocation
                .complete_json(
                    "third",
                    CompletionRequest::new("", Prompt::new(format!("three after {}", second.summary))),
                )
                .await
        })
    }
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Diagnosis {
    findings: String,
    diagnosis: String,
}

impl Contract for Diagnosis {
    fn shape() -> ShapeDescriptor {
        ShapeDescriptor::new()
            .required("findings", FieldKind::String)
            .required("diagnosis", FieldKind::String)
    }
}

struct DiagnosisTool;

impl Tool for DiagnosisTool {
    type Output = Diagnosis;

    fn kind(&self) -> &'static str {
        "diagnosis"
    }

    fn fallback_route(&self) -> FallbackRoute {
        FallbackRoute::Disabled
    }

    fn run<'a>(
        &'a self,
        invocation: &'a mut Invocation,
    ) -> BoxFuture<'a, Result<Self::Output, OrchestrationFailure>> {
        Box::pin(async move {
            invocation
                .complete_json("analyze", CompletionRequest::new("", Prompt::new("analyze")))
                .await
        })
    }
}

struct EmptyInputTool;

impl Tool for EmptyInputTool {
    type Output = Answer;

    fn kind(&self) -> &'static str {
        "empty_input"
    }

    fn validate_input(&self) -> Result<(), String> {
        Err("text must not be empty".to_string())
    }

    fn run<'a>(
        &'a self,
        invocation: &'a mut Invocation,
    ) -> BoxFuture<'a, Result<Self::Output, OrchestrationFailure>> {
        Box::pin(async move {
            invocation
                .complete_json("never", CompletionRequest::new("", Prompt::new("never")))
                .await
        })
    }
}

struct PosterTool;

impl Tool for PosterTool {
    type Output = MediaArtifact;

    fn kind(&self) -> &'static str {
        "poster"
    }

    fn required_media(&self) -> Option<MediaKind> {
        Some(MediaKind::Image)
    }

    fn run<'a>(
        &'a self,
        invocation: &'a mut Invocation,
    ) -> BoxFuture<'a, Result<Self::Output, OrchestrationFailure>> {
        Box::pin(async move {
            let plan: Answer = invocation
                .complete_json("plan", CompletionRequest::new("", Prompt::new("plan a poster")))
                .await?;
            invocation.generate_image("render", plan.result, None).await
        })
    }
}

struct CountingSpeaker {
    spoken: Mutex<Vec<String>>,
}

impl LocalSpeechCapability for CountingSpeaker {
    fn id(&self) -> BackendId {
        BackendId::SystemSpeech
    }

    fn speak<'a>(
        &'a self,
        text: String,
        _locale: Option<String>,
    ) -> ProviderFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            self.spoken.lock().expect("spoken lock").push(text);
            Ok(())
        })
    }
}

struct ReadAloudTool;

impl Tool for ReadAloudTool {
    type Output = bool;

    fn kind(&self) -> &'static str {
        "read_aloud"
    }

    fn fallback_route(&self) -> FallbackRoute {
        FallbackRoute::LocalSpeech
    }

    fn run<'a>(
        &'a self,
        invocation: &'a mut Invocation,
    ) -> BoxFuture<'a, Result<Self::Output, OrchestrationFailure>> {
        Box::pin(async move {
            invocation
                .synthesize_speech("synthesize", "hello".to_string(), None)
                .await
                .map(|_| true)
        })
    }

    fn run_local<'a>(
        &'a self,
        speech: &'a LocalSpeechInvocation,
    ) -> BoxFuture<'a, Result<Self::Output, OrchestrationFailure>> {
        Box::pin(async move {
            speech.speak("speak", "hello".to_string(), None).await?;
            Ok(false)
        })
    }
}

#[tokio::test]
async fn denied_sign_in_never_reaches_any_backend() {
    let session = Arc::new(DeniedSession {
        sign_in_calls: AtomicUsize::new(0),
    });
    let primary = ScriptedBackend::new(BackendId::OpenAi, vec![Ok("{\"result\":\"p\"}".into())]);
    let secondary = ScriptedBackend::new(BackendId::Ollama, vec![Ok("{\"result\":\"s\"}".into())]);
    let orchestrator = Orchestrator::builder(session.clone(), primary.clone())
        .secondary(secondary.clone())
        .build();

    let outcome = orchestrator.run(&AnswerTool).await;

    assert_eq!(
        outcome.failure().map(|failure| failure.kind),
        Some(ErrorKind::AuthDenied)
    );
    assert_eq!(session.sign_in_calls.load(Ordering::SeqCst), 1);
    assert_eq!(primary.calls(), 0);
    assert_eq!(secondary.calls(), 0);
}

#[tokio::test]
async fn rejected_primary_falls_back_to_secondary() {
    let primary = ScriptedBackend::new(
        BackendId::OpenAi,
        vec![Err(ProviderError::rejected("model refused the request"))],
    );
    let secondary = ScriptedBackend::new(BackendId::Ollama, vec![Ok("{\"result\":\"ok\"}".into())]);
    let hooks = Arc::new(RecordingHooks::default());
    let orchestrator = Orchestrator::builder(Arc::new(StaticSession), primary.clone())
        .secondary(secondary.clone())
        .hooks(hooks.clone())
        .build();

    let outcome = orchestrator.run(&AnswerTool).await;

    assert_eq!(
        outcome,
        OrchestrationOutcome::Fallback {
            result: Answer {
                result: "ok".to_string()
            },
            backend: BackendId::Ollama,
        }
    );
    assert_eq!(secondary.calls(), 1);
    assert_eq!(
        hooks.events(),
        vec![
            "fallback:openai->ollama:backend_rejected".to_string(),
            "outcome:fallback".to_string(),
        ]
    );
}

#[tokio::test]
async fn permission_denied_envelope_is_recoverable() {
    let primary = ScriptedBackend::new(
        BackendId::OpenAi,
        vec![Err(ProviderError::permission_denied("permission denied")
            .with_envelope(json!({"error": {"message": "permission denied"}})))],
    );
    let secondary = ScriptedBackend::new(BackendId::Ollama, vec![Ok("{\"result\":\"ok\"}".into())]);
    let hooks = Arc::new(RecordingHooks::default());
    let orchestrator = Orchestrator::builder(Arc::new(StaticSession), primary)
        .secondary(secondary)
        .hooks(hooks.clone())
        .build();

    let outcome = orchestrator.run(&AnswerTool).await;

    assert!(outcome.is_fallback());
    assert_eq!(
        hooks.events()[0],
        "fallback:openai->ollama:quota_or_permission"
    );
}

#[tokio::test]
async fn secondary_failure_is_the_terminal_failure() {
    let primary = ScriptedBackend::new(
        BackendId::OpenAi,
        vec![Err(ProviderError::unavailable("upstream returned 503"))],
    );
    let secondary = ScriptedBackend::new(
        BackendId::Ollama,
        vec![Err(ProviderError::transport("connection refused"))],
    );
    let orchestrator = Orchestrator::builder(Arc::new(StaticSession), primary)
        .secondary(secondary)
        .build();

    let outcome = orchestrator.run(&AnswerTool).await;

    let failure = outcome.failure().expect("both attempts failed");
    assert_eq!(failure.kind, ErrorKind::Network);
    assert_eq!(failure.backend, Some(BackendId::Ollama));
    assert_eq!(failure.to_string(), kengine::to_user_message(ErrorKind::Network));
}

#[tokio::test]
async fn invalid_middle_step_stops_the_pipeline() {
    let primary = ScriptedBackend::new(
        BackendId::OpenAi,
        vec![
            Ok("{\"summary\":\"a cat on a sofa\"}".into()),
            Ok("{\"headline\":\"missing summary\"}".into()),
            Ok("{\"result\":\"never used\"}".into()),
        ],
    );
    let orchestrator = Orchestrator::builder(Arc::new(StaticSession), primary.clone()).build();

    let outcome = orchestrator.run(&ThreeStepTool).await;

    let failure = outcome.failure().expect("second step is invalid");
    assert_eq!(failure.kind, ErrorKind::MalformedResponse);
    assert_eq!(failure.step.as_deref(), Some("second"));
    assert_eq!(primary.calls(), 2);
}

#[tokio::test]
async fn fenced_report_missing_field_is_malformed() {
    let primary = ScriptedBackend::new(
        BackendId::OpenAi,
        vec![Ok("```json\n{\"findings\":\"x\"}\n```".into())],
    );
    let orchestrator = Orchestrator::builder(Arc::new(StaticSession), primary).build();

    let outcome = orchestrator.run(&DiagnosisTool).await;

    assert_eq!(
        outcome.failure().map(|failure| failure.kind),
        Some(ErrorKind::MalformedResponse)
    );
}

#[test]
fn empty_error_object_classifies_as_quota() {
    assert_eq!(
        kengine::classify(&kengine::FailureSignal::from(json!({}))),
        ErrorKind::QuotaOrPermission
    );
}

#[tokio::test]
async fn invalid_input_is_rejected_without_backend_calls() {
    let primary = ScriptedBackend::new(BackendId::OpenAi, Vec::new());
    let secondary = ScriptedBackend::new(BackendId::Ollama, Vec::new());
    let orchestrator = Orchestrator::builder(Arc::new(StaticSession), primary.clone())
        .secondary(secondary.clone())
        .build();

    let outcome = orchestrator.run(&EmptyInputTool).await;

    assert_eq!(
        outcome.failure().map(|failure| failure.kind),
        Some(ErrorKind::BackendRejected)
    );
    assert_eq!(primary.calls() + secondary.calls(), 0);
}

#[tokio::test]
async fn speech_failure_routes_to_local_playback() {
    let primary = ScriptedBackend::new(BackendId::OpenAi, Vec::new());
    let speaker = Arc::new(CountingSpeaker {
        spoken: Mutex::new(Vec::new()),
    });
    let orchestrator = Orchestrator::builder(Arc::new(StaticSession), primary)
        .local_speech(speaker.clone())
        .build();

    let outcome = orchestrator.run(&ReadAloudTool).await;

    assert_eq!(
        outcome,
        OrchestrationOutcome::Fallback {
            result: false,
            backend: BackendId::SystemSpeech,
        }
    );
    assert_eq!(
        speaker.spoken.lock().expect("spoken lock").as_slice(),
        ["hello".to_string()]
    );
}

#[tokio::test]
async fn secondary_without_image_support_is_not_tried_for_image_tools() {
    let primary = ScriptedBackend::new(
        BackendId::OpenAi,
        vec![Err(ProviderError::rejected("model refused the request"))],
    );
    let secondary = ScriptedBackend::new(BackendId::Ollama, vec![Ok("{\"result\":\"a\"}".into())]);
    let hooks = Arc::new(RecordingHooks::default());
    let orchestrator = Orchestrator::builder(Arc::new(StaticSession), primary.clone())
        .secondary(secondary.clone())
        .hooks(hooks.clone())
        .build();

    let outcome = orchestrator.run(&PosterTool).await;

    let failure = outcome.failure().expect("no usable fallback");
    assert_eq!(failure.kind, ErrorKind::BackendRejected);
    assert_eq!(failure.backend, Some(BackendId::OpenAi));
    assert_eq!(primary.calls(), 1);
    assert_eq!(secondary.calls(), 0);
    assert_eq!(hooks.events(), vec!["outcome:failure".to_string()]);
}
