//! Common imports for most klutz applications.

pub use crate::{
    BackendConfig, KlutzRuntime, RuntimeBuilder, RuntimeConfig, SpeechConfig, default_hooks,
    image, outcome_text, parse_backend_id, tool_catalog,
};
pub use crate::{
    BackendId, ErrorKind, ImageInput, MediaArtifact, OrchestrationFailure, OrchestrationOutcome,
    Orchestrator, ProviderError, RequestOptions, ToolCatalog, ToolKind, ToolPayload, ToolReport,
    ToolRequest,
};
pub use crate::{
    AnalysisInput, DateTimeQuery, HeatmapRequest, ImageToTextRequest, InfographicRequest,
    IngredientsRequest, MeasurementRequest, MedicalScanRequest, MemeRequest,
    NeurodiversityRequest, ProblemRequest, PromptGeneratorRequest, SpeechOutput, SpeechRequest,
    Spreadsheet, SpreadsheetRequest, TextToImageRequest, ThumbnailCheckRequest,
    TranslationRequest, TroubleshootRequest,
};
