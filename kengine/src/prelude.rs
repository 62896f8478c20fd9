//! Common `kengine` imports for tool implementations.

pub use crate::{
    Contract, ErrorKind, FallbackRoute, Invocation, LocalSpeechInvocation, OrchestrationFailure,
    OrchestrationOutcome, Orchestrator, OrchestratorBuilder, Tool,
};
pub use kcommon::BoxFuture;
pub use kcontract::{FieldKind, ShapeDescriptor};
pub use kprovider::{BackendId, CompletionRequest, ImageInput, MediaArtifact, MediaKind, Prompt};
