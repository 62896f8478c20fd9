use kcommon::{BoxFuture, RequestOptions};
use kengine::{FallbackRoute, Invocation, LocalSpeechInvocation, OrchestrationFailure, Tool};
use kprovider::{MediaArtifact, MediaKind};

pub const MAX_SPEECH_CHARS: usize = 3000;

#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub text: String,
    /// BCP 47 tag such as `en-US`; the backend default when absent.
    pub locale: Option<String>,
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            locale: None,
        }
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }
}

/// Either a retrievable audio artifact or confirmation that the text was
/// spoken on this machine.
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechOutput {
    Downloadable(MediaArtifact),
    PlayedLocally,
}

impl SpeechOutput {
    pub fn artifact(&self) -> Option<&MediaArtifact> {
        match self {
            Self::Downloadable(artifact) => Some(artifact),
            Self::PlayedLocally => None,
        }
    }

    pub fn to_text_report(&self) -> String {
        match self {
            Self::Downloadable(MediaArtifact::Url(url)) => format!("Audio available at {url}\n"),
            Self::Downloadable(MediaArtifact::Inline { mime_type, data }) => {
                format!("Audio generated: {mime_type}, {} bytes\n", data.len())
            }
            Self::PlayedLocally => "Audio played on this device; no file was produced.\n".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextToSpeechTool {
    request: SpeechRequest,
    options: RequestOptions,
}

impl TextToSpeechTool {
    pub fn new(request: SpeechRequest) -> Self {
        Self {
            request,
            options: RequestOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    fn locale(&self) -> Option<String> {
        self.request
            .locale
            .clone()
            .or_else(|| self.options.locale.clone())
    }
}

impl Tool for TextToSpeechTool {
    type Output = SpeechOutput;

    fn kind(&self) -> &'static str {
        "text_to_speech"
    }

    fn validate_input(&self) -> Result<(), String> {
        let text = self.request.text.trim();
        if text.is_empty() {
            return Err("no text provided for speech".to_string());
        }
        let length = text.chars().count();
        if length > MAX_SPEECH_CHARS {
            return Err(format!(
                "text is {length} characters; the limit is {MAX_SPEECH_CHARS}"
            ));
        }
        Ok(())
    }

    fn fallback_route(&self) -> FallbackRoute {
        FallbackRoute::LocalSpeech
    }

    fn required_media(&self) -> Option<MediaKind> {
        Some(MediaKind::Speech)
    }

    fn run<'a>(
        &'a self,
        invocation: &'a mut Invocation,
    ) -> BoxFuture<'a, Result<Self::Output, OrchestrationFailure>> {
        Box::pin(async move {
            let artifact = invocation
                .synthesize_speech("synthesize", self.request.text.trim().to_string(), self.locale())
                .await?;
            Ok(SpeechOutput::Downloadable(artifact))
        })
    }

    fn run_local<'a>(
        &'a self,
        speech: &'a LocalSpeechInvocation,
    ) -> BoxFuture<'a, Result<Self::Output, OrchestrationFailure>> {
        Box::pin(async move {
            speech
                .speak("speak", self.request.text.trim().to_string(), self.locale())
                .await?;
            Ok(SpeechOutput::PlayedLocally)
        })
    }
}
