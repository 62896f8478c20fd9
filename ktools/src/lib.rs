//! The klutz tool catalog: prompts, response contracts, and pipelines for
//! each AI tool, plus [`ToolCatalog`] to dispatch a [`ToolRequest`].
//!
//! Tools can also be run one at a time through an
//! [`Orchestrator`](kengine::Orchestrator):
//!
//! ```rust
//! use kengine::Tool;
//! use ktools::{SpeechRequest, TextToSpeechTool, ToolKind, ToolRequest};
//!
//! let tool = TextToSpeechTool::new(SpeechRequest::new("Hello there").with_locale("en-GB"));
//! assert_eq!(tool.kind(), ToolKind::TextToSpeech.as_str());
//! assert!(tool.validate_input().is_ok());
//!
//! let request = ToolRequest::from(SpeechRequest::new("Hello there"));
//! assert_eq!(request.kind(), ToolKind::TextToSpeech);
//! ```

mod catalog;
mod common;
mod kind;
mod language;
mod request;
mod tools;

pub mod prelude {
    pub use crate::{
        AnalysisInput, Confidence, ExtractionConfidence, ToolCatalog, ToolKind, ToolPayload,
        ToolReport, ToolRequest,
    };
}

pub use catalog::ToolCatalog;
pub use common::{AnalysisInput, Confidence, ExtractionConfidence};
pub use kind::ToolKind;
pub use language::{AUTO_DETECT, LANGUAGES, is_auto_detect, language_name};
pub use request::{ToolPayload, ToolReport, ToolRequest};
pub use tools::*;
