//! Unified facade over the klutz workspace crates.
//!
//! This crate is meant to be the single dependency for most applications.
//! It re-exports the engine, tool catalog, providers, and observability
//! hooks, and wires them together from a [`RuntimeConfig`].
//!
//! ```rust,no_run
//! use klutz::prelude::*;
//!
//! # async fn demo() -> Result<(), ProviderError> {
//! let config = RuntimeConfig::new(BackendConfig::new(BackendId::OpenAi))
//!     .with_secondary(BackendConfig::new(BackendId::Ollama))
//!     .with_speech(SpeechConfig::default());
//! let runtime = KlutzRuntime::builder(config).build()?;
//!
//! let outcome = runtime
//!     .dispatch(ToolRequest::from(TranslationRequest::text("Bonjour", "en")))
//!     .await;
//! println!("{}", outcome_text(&outcome));
//! # Ok(())
//! # }
//! ```

mod config;

pub mod prelude;
pub mod runtime;
pub mod util;

pub use kcommon;
pub use kcontract;
pub use kengine;
pub use kobserve;
pub use kprovider;
pub use ktools;

pub use kcommon::{BoxFuture, MetadataMap, RequestOptions, TraceId};
pub use kcontract::{
    ContractError, ContractErrorKind, FieldKind, NormalizedPayload, ShapeDescriptor, normalize,
    parse_contract, validate,
};
pub use kengine::{
    AuthGate, CallContext, CallOperation, Contract, ErrorKind, FailureSignal, FallbackRoute,
    Invocation, LocalSpeechInvocation, NoopOrchestrationHooks, OrchestrationFailure,
    OrchestrationHooks, OrchestrationOutcome, Orchestrator, OrchestratorBuilder, OutcomeKind,
    Session, Tool, classify, to_user_message, with_fallback,
};
pub use kobserve::{
    CompositeHooks, MetricsObservabilityHooks, SafeOrchestrationHooks, TracingObservabilityHooks,
};
pub use kprovider::{
    ApiKeySession, BackendId, BackendRegistry, CompletionRequest, EnvKeyPrompt,
    GenerationCapability, ImageInput, LocalSpeechCapability, MediaArtifact, Prompt,
    ProviderError, ProviderErrorKind, ProviderFuture, RawModelResponse, SecretString,
    SecureCredentialManager, SessionCapability, SignInPrompt, StaticSession,
};
pub use ktools::{
    AnalysisDepth, AnalysisInput, ApplianceReport, Confidence, DateTimeQuery, DateTimeReport,
    ExtractionConfidence, GeneratedImageReport, GeneratedPrompt, HeatmapRequest,
    ImageHeatmapReport, ImageToTextReport, ImageToTextRequest, InfographicRequest,
    InfographicResponse, IngredientsReport, IngredientsRequest, MeasurementReport,
    MeasurementRequest, MedicalAnalysis, MedicalScanRequest, MemeRequest, NeurodiversityReport,
    NeurodiversityRequest, ProblemRequest, ProblemSolution, PromptGeneratorRequest, SpeechOutput,
    SpeechRequest, Spreadsheet, SpreadsheetPlan, SpreadsheetRequest, TextHeatmapReport,
    TextToImageRequest, ThumbnailAnalysis, ThumbnailCheckRequest, ToolCatalog, ToolKind,
    ToolPayload, ToolReport, ToolRequest, TranslationReport, TranslationRequest,
    TroubleshootRequest, UnitSystem, VehicleReport,
};

pub use config::{BackendConfig, DEFAULT_TIMEOUT, RuntimeConfig, SpeechConfig};
pub use runtime::{
    KlutzRuntime, OPENAI_API_KEY_VAR, RuntimeBuilder, default_hooks, tool_catalog,
};
pub use util::{image, outcome_text, parse_backend_id};
