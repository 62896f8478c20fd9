//! Small convenience helpers for callers of the runtime.

use crate::{BackendId, ImageInput, OrchestrationOutcome, ToolReport};

pub fn parse_backend_id(value: &str) -> Option<BackendId> {
    match value.trim().to_ascii_lowercase().as_str() {
        "openai" | "open-ai" | "gpt" => Some(BackendId::OpenAi),
        "ollama" | "local" => Some(BackendId::Ollama),
        "system-speech" | "system_speech" | "speech" => Some(BackendId::SystemSpeech),
        _ => None,
    }
}

/// Treats `data:` URIs as inline images and everything else as a URL.
pub fn image(reference: impl Into<String>) -> ImageInput {
    let reference = reference.into();
    if reference.trim_start().starts_with("data:") {
        ImageInput::data_uri(reference)
    } else {
        ImageInput::url(reference)
    }
}

/// Downloadable report text, or the user-safe message when the call failed.
pub fn outcome_text(outcome: &OrchestrationOutcome<ToolReport>) -> String {
    match outcome {
        OrchestrationOutcome::Success(report)
        | OrchestrationOutcome::Fallback { result: report, .. } => report.to_text_report(),
        OrchestrationOutcome::Failure(failure) => failure.user_message().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use crate::{ErrorKind, OrchestrationFailure, SpeechOutput, to_user_message};

    use super::*;

    #[test]
    fn parse_backend_id_supports_aliases() {
        assert_eq!(parse_backend_id("OpenAI"), Some(BackendId::OpenAi));
        assert_eq!(parse_backend_id(" local "), Some(BackendId::Ollama));
        assert_eq!(parse_backend_id("system_speech"), Some(BackendId::SystemSpeech));
        assert_eq!(parse_backend_id("gemini"), None);
    }

    #[test]
    fn image_detects_data_uris() {
        assert!(matches!(
            image("data:image/png;base64,AAAA"),
            ImageInput::DataUri(_)
        ));
        assert!(matches!(image("https://example.com/a.png"), ImageInput::Url(_)));
    }

    #[test]
    fn outcome_text_never_leaks_diagnostics() {
        let failure: OrchestrationOutcome<ToolReport> = OrchestrationOutcome::Failure(
            OrchestrationFailure::new(ErrorKind::Unknown, "stack trace at 0xdeadbeef"),
        );
        assert_eq!(outcome_text(&failure), to_user_message(ErrorKind::Unknown));

        let fallback = OrchestrationOutcome::Fallback {
            result: ToolReport::Speech(SpeechOutput::PlayedLocally),
            backend: BackendId::SystemSpeech,
        };
        assert!(outcome_text(&fallback).contains("played on this device"));
    }
}
