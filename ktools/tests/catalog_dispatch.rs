use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use kengine::{ErrorKind, OrchestrationOutcome, Orchestrator};
use kprovider::{
    BackendId, CompletionRequest, GenerationCapability, ImageInput, LocalSpeechCapability,
    MediaArtifact, MediaKind, ProviderError, ProviderFuture, RawModelResponse, StaticSession,
};
use ktools::{
    AnalysisInput, DateTimeQuery, HeatmapRequest, InfographicRequest, MemeRequest, Severity,
    SpeechOutput, SpeechRequest, Spreadsheet, SpreadsheetRequest, TextToImageRequest,
    ThumbnailCheckRequest, ToolCatalog, ToolKind, ToolReport, ToolRequest, TranslationRequest,
    TroubleshootRequest,
};

/// Backend that answers completions from a script and records every prompt.
struct FakeBackend {
    id: BackendId,
    replies: Mutex<Vec<Result<String, ProviderError>>>,
    image: Option<MediaArtifact>,
    speech: Option<MediaArtifact>,
    prompts: Mutex<Vec<String>>,
    media_calls: AtomicUsize,
}

impl FakeBackend {
    fn new(id: BackendId, replies: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            id,
            replies: Mutex::new(replies),
            image: None,
            speech: None,
            prompts: Mutex::new(Vec::new()),
            media_calls: AtomicUsize::new(0),
        }
    }

    fn with_image(mut self, artifact: MediaArtifact) -> Self {
        self.image = Some(artifact);
        self
    }

    fn with_speech(mut self, artifact: MediaArtifact) -> Self {
        self.speech = Some(artifact);
        self
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompts lock").clone()
    }

    fn media_calls(&self) -> usize {
        self.media_calls.load(Ordering::SeqCst)
    }

    fn media(&self, artifact: Option<&MediaArtifact>) -> Result<RawModelResponse, ProviderError> {
        self.media_calls.fetch_add(1, Ordering::SeqCst);
        match artifact {
            Some(artifact) => Ok(RawModelResponse::binary(self.id, artifact.clone())),
            None => Err(ProviderError::unavailable("media backend offline")),
        }
    }
}

impl GenerationCapability for FakeBackend {
    fn id(&self) -> BackendId {
        self.id
    }

    fn complete<'a>(
        &'a self,
        request: CompletionRequest,
    ) -> ProviderFuture<'a, Result<RawModelResponse, ProviderError>> {
        Box::pin(async move {
            self.prompts
                .lock()
                .expect("prompts lock")
                .push(request.prompt.text.clone());
            let mut replies = self.replies.lock().expect("replies lock");
            if replies.is_empty() {
                return Err(ProviderError::other("no scripted reply left"));
            }
            replies
                .remove(0)
                .map(|text| RawModelResponse::text(self.id, text))
        })
    }

    fn supports_media(&self, kind: MediaKind) -> bool {
        match kind {
            MediaKind::Image => self.image.is_some(),
            MediaKind::Speech => self.speech.is_some(),
        }
    }

    fn generate_image<'a>(
        &'a self,
        prompt: String,
        _model: Option<String>,
    ) -> ProviderFuture<'a, Result<RawModelResponse, ProviderError>> {
        Box::pin(async move {
            self.prompts.lock().expect("prompts lock").push(prompt);
            self.media(self.image.as_ref())
        })
    }

    fn synthesize_speech<'a>(
        &'a self,
        text: String,
        _locale: Option<String>,
    ) -> ProviderFuture<'a, Result<RawModelResponse, ProviderError>> {
        Box::pin(async move {
            self.prompts.lock().expect("prompts lock").push(text);
            self.media(self.speech.as_ref())
        })
    }
}

#[derive(Default)]
struct FakeSpeaker {
    spoken: Mutex<Vec<(String, Option<String>)>>,
}

impl LocalSpeechCapability for FakeSpeaker {
    fn id(&self) -> BackendId {
        BackendId::SystemSpeech
    }

    fn speak<'a>(
        &'a self,
        text: String,
        locale: Option<String>,
    ) -> ProviderFuture<'a, Result<(), ProviderError>> {
        Box::pin(async move {
            self.spoken.lock().expect("spoken lock").push((text, locale));
            Ok(())
        })
    }
}

fn catalog(primary: Arc<FakeBackend>, secondary: Option<Arc<FakeBackend>>) -> ToolCatalog {
    let mut builder = Orchestrator::builder(Arc::new(StaticSession), primary);
    if let Some(secondary) = secondary {
        builder = builder.secondary(secondary);
    }
    ToolCatalog::new(builder.build())
}

fn thumbnail_request() -> ToolRequest {
    ToolRequest::from(ThumbnailCheckRequest::new(
        ImageInput::url("https://example.com/thumb.jpg"),
        "Ten minute pasta",
    ))
}

#[tokio::test]
async fn thumbnail_pipeline_threads_summaries_into_the_final_step() {
    let primary = Arc::new(FakeBackend::new(
        BackendId::OpenAi,
        vec![
            Ok("```json\n{\"image_summary\":\"A steaming bowl of pasta\"}\n```".to_string()),
            Ok("{\"title_summary\":\"A quick pasta recipe\"}".to_string()),
            Ok(
                "{\"is_consistent\":true,\"explanation\":\"Both show pasta.\",\"confidence_score\":0.9}"
                    .to_string(),
            ),
        ],
    ));

    let outcome = catalog(primary.clone(), None)
        .dispatch(thumbnail_request())
        .await;

    let analysis = match outcome {
        OrchestrationOutcome::Success(ToolReport::ThumbnailCheck(analysis)) => analysis,
        other => panic!("expected a thumbnail success, got {other:?}"),
    };
    assert!(analysis.consistency.is_consistent);
    assert_eq!(analysis.image_summary, "A steaming bowl of pasta");

    let prompts = primary.prompts();
    assert_eq!(prompts.len(), 3);
    assert!(prompts[1].contains("Ten minute pasta"));
    assert!(prompts[2].contains("A steaming bowl of pasta"));
    assert!(prompts[2].contains("A quick pasta recipe"));
}

#[tokio::test]
async fn malformed_middle_step_reruns_the_whole_pipeline_on_the_secondary() {
    let primary = Arc::new(FakeBackend::new(
        BackendId::OpenAi,
        vec![
            Ok("{\"image_summary\":\"pasta\"}".to_string()),
            Ok("Sure! The title is about pasta.".to_string()),
        ],
    ));
    let secondary = Arc::new(FakeBackend::new(
        BackendId::Ollama,
        vec![
            Ok("{\"image_summary\":\"pasta\"}".to_string()),
            Ok("{\"title_summary\":\"pasta recipe\"}".to_string()),
            Ok(
                "{\"is_consistent\":false,\"explanation\":\"Mismatch.\",\"confidence_score\":0.4}"
                    .to_string(),
            ),
        ],
    ));

    let outcome = catalog(primary.clone(), Some(secondary.clone()))
        .dispatch(thumbnail_request())
        .await;

    match outcome {
        OrchestrationOutcome::Fallback {
            result: ToolReport::ThumbnailCheck(analysis),
            backend,
        } => {
            assert_eq!(backend, BackendId::Ollama);
            assert!(!analysis.consistency.is_consistent);
        }
        other => panic!("expected a fallback, got {other:?}"),
    }
    assert_eq!(primary.prompts().len(), 2);
    assert_eq!(secondary.prompts().len(), 3);
}

#[tokio::test]
async fn meme_plan_feeds_image_generation() {
    let primary = Arc::new(
        FakeBackend::new(
            BackendId::OpenAi,
            vec![Ok(
                "{\"dalle_prompt\":\"cat typing frantically at a desk\",\"style_notes\":\"flat\",\"text_placement\":\"top\"}"
                    .to_string(),
            )],
        )
        .with_image(MediaArtifact::Url("https://images.example.com/meme.png".to_string())),
    );

    let outcome = catalog(primary.clone(), None)
        .dispatch(ToolRequest::from(MemeRequest::new("cat on a keyboard")))
        .await;

    let report = match outcome.into_result().expect("meme should render") {
        ToolReport::GeneratedImage(report) => report,
        other => panic!("unexpected report {other:?}"),
    };
    assert_eq!(
        report.generated_image,
        MediaArtifact::Url("https://images.example.com/meme.png".to_string())
    );
    assert_eq!(report.text_placement.as_deref(), Some("top"));
    assert_eq!(primary.media_calls(), 1);
    assert_eq!(primary.prompts()[1], "cat typing frantically at a desk");
}

#[tokio::test]
async fn meme_training_images_are_analysed_before_planning() {
    let primary = Arc::new(
        FakeBackend::new(
            BackendId::OpenAi,
            vec![
                Ok("Bold white caption across the top.".to_string()),
                Ok(
                    "{\"dalle_prompt\":\"surprised cat, plain background\",\"style_notes\":\"classic\",\"text_placement\":\"top and bottom\"}"
                        .to_string(),
                ),
            ],
        )
        .with_image(MediaArtifact::Url("https://images.example.com/meme.png".to_string())),
    );

    let outcome = catalog(primary.clone(), None)
        .dispatch(ToolRequest::from(
            MemeRequest::new("cat sees a cucumber")
                .with_training_image(ImageInput::url("https://example.com/classic.jpg")),
        ))
        .await;

    assert!(outcome.is_success(), "got {outcome:?}");
    let prompts = primary.prompts();
    assert_eq!(prompts.len(), 3);
    assert!(prompts[0].starts_with("Analyze this meme image."));
    assert!(prompts[1].contains("- Bold white caption across the top."));
    assert!(prompts[1].contains("Avoid any text in the image itself"));
    assert_eq!(prompts[2], "surprised cat, plain background");
    assert_eq!(primary.media_calls(), 1);
}

#[tokio::test]
async fn image_tools_fall_back_only_to_image_capable_backends() {
    let plan = "{\"dalle_prompt\":\"lighthouse\",\"style_notes\":\"oil\"}";
    let request = || ToolRequest::from(TextToImageRequest::new("a lighthouse at dusk"));

    let text_only = Arc::new(FakeBackend::new(BackendId::Ollama, vec![Ok(plan.to_string())]));
    let outcome = catalog(
        Arc::new(FakeBackend::new(
            BackendId::OpenAi,
            vec![Err(ProviderError::rejected("model refused the request"))],
        )),
        Some(text_only.clone()),
    )
    .dispatch(request())
    .await;
    assert!(outcome.failure().is_some(), "got {outcome:?}");
    assert!(text_only.prompts().is_empty());

    let capable = Arc::new(
        FakeBackend::new(BackendId::Ollama, vec![Ok(plan.to_string())])
            .with_image(MediaArtifact::Url("https://images.example.com/l.png".to_string())),
    );
    let outcome = catalog(
        Arc::new(FakeBackend::new(
            BackendId::OpenAi,
            vec![Err(ProviderError::rejected("model refused the request"))],
        )),
        Some(capable.clone()),
    )
    .dispatch(request())
    .await;
    assert!(outcome.is_fallback(), "got {outcome:?}");
    assert_eq!(capable.media_calls(), 1);
}

#[tokio::test]
async fn empty_generated_image_is_a_failure() {
    let primary = Arc::new(
        FakeBackend::new(
            BackendId::OpenAi,
            vec![Ok(
                "{\"dalle_prompt\":\"x\",\"style_notes\":\"y\",\"text_placement\":\"z\"}".to_string(),
            )],
        )
        .with_image(MediaArtifact::Url("  ".to_string())),
    );

    let outcome = catalog(primary, None)
        .dispatch(ToolRequest::from(MemeRequest::new("anything")))
        .await;

    let failure = outcome.failure().expect("empty image fails");
    assert_eq!(failure.kind, ErrorKind::BackendRejected);
    assert_eq!(failure.step.as_deref(), Some("render"));
}

#[tokio::test]
async fn speech_falls_back_to_local_playback() {
    let primary = Arc::new(FakeBackend::new(BackendId::OpenAi, Vec::new()));
    let speaker = Arc::new(FakeSpeaker::default());
    let orchestrator = Orchestrator::builder(Arc::new(StaticSession), primary.clone())
        .local_speech(speaker.clone())
        .build();

    let outcome = ToolCatalog::new(orchestrator)
        .dispatch(ToolRequest::from(
            SpeechRequest::new(" Good morning ").with_locale("en-GB"),
        ))
        .await;

    assert_eq!(
        outcome,
        OrchestrationOutcome::Fallback {
            result: ToolReport::Speech(SpeechOutput::PlayedLocally),
            backend: BackendId::SystemSpeech,
        }
    );
    assert_eq!(primary.media_calls(), 1);
    assert_eq!(
        *speaker.spoken.lock().expect("spoken lock"),
        vec![("Good morning".to_string(), Some("en-GB".to_string()))]
    );
}

#[tokio::test]
async fn speech_returns_a_downloadable_artifact_when_synthesis_works() {
    let audio = MediaArtifact::Inline {
        mime_type: "audio/mpeg".to_string(),
        data: vec![0xFF, 0xFB],
    };
    let primary = Arc::new(FakeBackend::new(BackendId::OpenAi, Vec::new()).with_speech(audio.clone()));

    let outcome = catalog(primary, None)
        .dispatch(ToolRequest::from(SpeechRequest::new("hello")))
        .await;

    assert_eq!(
        outcome,
        OrchestrationOutcome::Success(ToolReport::Speech(SpeechOutput::Downloadable(audio)))
    );
}

#[tokio::test]
async fn oversized_speech_is_rejected_without_any_call() {
    let primary = Arc::new(FakeBackend::new(BackendId::OpenAi, Vec::new()));

    let outcome = catalog(primary.clone(), None)
        .dispatch(ToolRequest::from(SpeechRequest::new("a".repeat(3001))))
        .await;

    let failure = outcome.failure().expect("too long");
    assert_eq!(failure.kind, ErrorKind::BackendRejected);
    assert_eq!(failure.step.as_deref(), Some("validate_input"));
    assert_eq!(primary.media_calls(), 0);
}

#[tokio::test]
async fn translation_failure_is_user_safe() {
    let primary = Arc::new(FakeBackend::new(
        BackendId::OpenAi,
        vec![Err(ProviderError::transport("connection reset by peer"))],
    ));

    let outcome = catalog(primary, None)
        .dispatch(ToolRequest::from(TranslationRequest::text("Hola", "en")))
        .await;

    let failure = outcome.failure().expect("transport error");
    assert_eq!(failure.kind, ErrorKind::Network);
    assert!(!failure.to_string().contains("connection reset"));
}

#[tokio::test]
async fn spreadsheet_prompt_carries_sheet_context() {
    let primary = Arc::new(FakeBackend::new(
        BackendId::OpenAi,
        vec![Ok(
            "{\"operations\":[{\"type\":\"add_column\",\"details\":{\"name\":\"Total\"}}],\"explanation\":\"Added a total column.\"}"
                .to_string(),
        )],
    ));
    let sheet = Spreadsheet::new("budget.xlsx", "Q1")
        .with_sheets(["Q1"])
        .with_rows(vec![vec!["Item".to_string(), "Cost".to_string()]]);

    let outcome = catalog(primary.clone(), None)
        .dispatch(ToolRequest::from(SpreadsheetRequest::new(sheet, "add a total column")))
        .await;

    let ToolReport::Spreadsheet(plan) = outcome.into_result().expect("plan") else {
        panic!("expected a spreadsheet plan");
    };
    assert_eq!(plan.operations.len(), 1);
    let prompt = &primary.prompts()[0];
    assert!(prompt.contains("Filename: budget.xlsx"));
    assert!(prompt.contains("Item\tCost"));
    assert!(prompt.contains("User request: add a total column"));
}

#[tokio::test]
async fn infographic_tolerates_a_failed_image_description() {
    let primary = Arc::new(FakeBackend::new(
        BackendId::OpenAi,
        vec![
            Err(ProviderError::rejected("vision not supported")),
            Ok("{\"message\":\"Here is a bar chart.\",\"visualization\":{\"type\":\"bar\",\"title\":\"Sales\",\"data\":[1,2,3]}}".to_string()),
        ],
    ));

    let outcome = catalog(primary.clone(), None)
        .dispatch(ToolRequest::from(
            InfographicRequest::new("chart this")
                .with_image(ImageInput::url("https://example.com/chart.png")),
        ))
        .await;

    assert!(outcome.is_success(), "got {outcome:?}");
    let prompts = primary.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(!prompts[1].contains("Based on the image analysis"));
}

#[tokio::test]
async fn heatmap_report_follows_the_input_kind() {
    let primary = Arc::new(FakeBackend::new(
        BackendId::OpenAi,
        vec![
            Ok("{\"overall_summary\":\"Punchy\",\"segments\":[{\"segment\":\"Act now\",\"engagement_level\":\"high\"}],\"confidence\":\"High\",\"disclaimer\":\"Subjective.\"}".to_string()),
            Ok("```json\n{\"image_description\":\"A poster\",\"high_attention_areas\":[],\"low_attention_areas\":[],\"confidence\":\"Low\",\"disclaimer\":\"Approximate.\"}\n```".to_string()),
        ],
    ));
    let catalog = catalog(primary.clone(), None);

    let request = ToolRequest::from(HeatmapRequest::new(AnalysisInput::text("Act now")));
    assert_eq!(request.kind(), ToolKind::Heatmap);
    let outcome = catalog.dispatch(request).await;
    assert!(
        matches!(outcome.into_result(), Ok(ToolReport::TextHeatmap(_))),
        "text input should produce a text heatmap"
    );

    let outcome = catalog
        .dispatch(ToolRequest::from(HeatmapRequest::new(ImageInput::url(
            "https://example.com/poster.png",
        ))))
        .await;
    assert!(
        matches!(outcome.into_result(), Ok(ToolReport::ImageHeatmap(_))),
        "image input should produce an image heatmap"
    );

    let prompts = primary.prompts();
    assert!(prompts[0].contains("predicted user engagement: \"Act now\""));
    assert!(prompts[1].contains("visual attention"));
}

#[tokio::test]
async fn vehicle_diagnosis_runs_through_the_catalog() {
    let primary = Arc::new(FakeBackend::new(
        BackendId::OpenAi,
        vec![Ok("{\"image_description\":\"Leaking hose\",\"vehicle_type\":\"car\",\"identified_issues\":[\"Coolant leak\"],\"possible_causes\":[\"Cracked hose\"],\"recommended_solutions\":[\"Replace the hose\"],\"estimated_severity\":\"Moderate\",\"confidence\":\"Medium\",\"disclaimer\":\"See a mechanic.\"}".to_string())],
    ));

    let outcome = catalog(primary.clone(), None)
        .dispatch(ToolRequest::vehicle(
            TroubleshootRequest::new(
                ImageInput::url("https://example.com/engine.jpg"),
                "car",
                "green puddle under the engine",
            )
            .with_subject_info("2012 hatchback"),
        ))
        .await;

    let Ok(ToolReport::Vehicle(report)) = outcome.into_result() else {
        panic!("expected a vehicle report");
    };
    assert_eq!(report.estimated_severity, Severity::Moderate);
    assert!(primary.prompts()[0].contains("Vehicle information: \"2012 hatchback\""));
}

#[tokio::test]
async fn impossible_calendar_date_is_rejected_without_any_call() {
    let primary = Arc::new(FakeBackend::new(BackendId::OpenAi, Vec::new()));

    let outcome = catalog(primary.clone(), None)
        .dispatch(ToolRequest::from(DateTimeQuery::date(2023, 2, 30)))
        .await;

    let failure = outcome.failure().expect("no such day");
    assert_eq!(failure.kind, ErrorKind::BackendRejected);
    assert_eq!(failure.step.as_deref(), Some("validate_input"));
    assert!(primary.prompts().is_empty());
}
