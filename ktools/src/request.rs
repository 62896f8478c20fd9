use kcommon::RequestOptions;

use crate::ToolKind;
use crate::tools::{
    ApplianceReport, DateTimeQuery, DateTimeReport, GeneratedImageReport, GeneratedPrompt,
    HeatmapRequest, ImageHeatmapReport, ImageToTextReport, ImageToTextRequest, InfographicRequest,
    InfographicResponse, IngredientsReport, IngredientsRequest, MeasurementReport,
    MeasurementRequest, MedicalAnalysis, MedicalScanRequest, MemeRequest, NeurodiversityReport,
    NeurodiversityRequest, ProblemRequest, ProblemSolution, PromptGeneratorRequest, SpeechOutput,
    SpeechRequest, SpreadsheetPlan, SpreadsheetRequest, TextHeatmapReport, TextToImageRequest,
    ThumbnailAnalysis, ThumbnailCheckRequest, TranslationReport, TranslationRequest,
    TroubleshootRequest, VehicleReport,
};

/// Tool-specific input; the variant decides which tool runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolPayload {
    MedicalScan(MedicalScanRequest),
    Translation(TranslationRequest),
    ImageToText(ImageToTextRequest),
    ThumbnailCheck(ThumbnailCheckRequest),
    MemeGenerator(MemeRequest),
    TextToImage(TextToImageRequest),
    TextToSpeech(SpeechRequest),
    Spreadsheet(SpreadsheetRequest),
    Infographic(InfographicRequest),
    IngredientsChecker(IngredientsRequest),
    VehicleTroubleshooter(TroubleshootRequest),
    ApplianceTroubleshooter(TroubleshootRequest),
    DateTimeChecker(DateTimeQuery),
    ProblemSolver(ProblemRequest),
    NeurodiversityChecker(NeurodiversityRequest),
    MeasuringTool(MeasurementRequest),
    /// Image input yields [`ToolReport::ImageHeatmap`], text [`ToolReport::TextHeatmap`].
    Heatmap(HeatmapRequest),
    PromptGenerator(PromptGeneratorRequest),
}

impl ToolPayload {
    pub fn kind(&self) -> ToolKind {
        match self {
            Self::MedicalScan(_) => ToolKind::MedicalScan,
            Self::Translation(_) => ToolKind::Translation,
            Self::ImageToText(_) => ToolKind::ImageToText,
            Self::ThumbnailCheck(_) => ToolKind::ThumbnailCheck,
            Self::MemeGenerator(_) => ToolKind::MemeGenerator,
            Self::TextToImage(_) => ToolKind::TextToImage,
            Self::TextToSpeech(_) => ToolKind::TextToSpeech,
            Self::Spreadsheet(_) => ToolKind::Spreadsheet,
            Self::Infographic(_) => ToolKind::Infographic,
            Self::IngredientsChecker(_) => ToolKind::IngredientsChecker,
            Self::VehicleTroubleshooter(_) => ToolKind::VehicleTroubleshooter,
            Self::ApplianceTroubleshooter(_) => ToolKind::ApplianceTroubleshooter,
            Self::DateTimeChecker(_) => ToolKind::DateTimeChecker,
            Self::ProblemSolver(_) => ToolKind::ProblemSolver,
            Self::NeurodiversityChecker(_) => ToolKind::NeurodiversityChecker,
            Self::MeasuringTool(_) => ToolKind::MeasuringTool,
            Self::Heatmap(_) => ToolKind::Heatmap,
            Self::PromptGenerator(_) => ToolKind::PromptGenerator,
        }
    }
}

/// One user action. Built once and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolRequest {
    pub payload: ToolPayload,
    pub options: RequestOptions,
}

impl ToolRequest {
    pub fn new(payload: ToolPayload) -> Self {
        Self {
            payload,
            options: RequestOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    pub fn kind(&self) -> ToolKind {
        self.payload.kind()
    }
}

macro_rules! payload_from {
    ($($request:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$request> for ToolRequest {
                fn from(request: $request) -> Self {
                    Self::new(ToolPayload::$variant(request))
                }
            }
        )+
    };
}

payload_from! {
    MedicalScanRequest => MedicalScan,
    TranslationRequest => Translation,
    ImageToTextRequest => ImageToText,
    ThumbnailCheckRequest => ThumbnailCheck,
    MemeRequest => MemeGenerator,
    TextToImageRequest => TextToImage,
    SpeechRequest => TextToSpeech,
    SpreadsheetRequest => Spreadsheet,
    InfographicRequest => Infographic,
    IngredientsRequest => IngredientsChecker,
    DateTimeQuery => DateTimeChecker,
    ProblemRequest => ProblemSolver,
    NeurodiversityRequest => NeurodiversityChecker,
    MeasurementRequest => MeasuringTool,
    HeatmapRequest => Heatmap,
    PromptGeneratorRequest => PromptGenerator,
}

impl ToolRequest {
    /// [`TroubleshootRequest`] serves two tools, so it has no `From` impl.
    pub fn vehicle(request: TroubleshootRequest) -> Self {
        Self::new(ToolPayload::VehicleTroubleshooter(request))
    }

    pub fn appliance(request: TroubleshootRequest) -> Self {
        Self::new(ToolPayload::ApplianceTroubleshooter(request))
    }
}

/// Validated result of any tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolReport {
    MedicalScan(MedicalAnalysis),
    Translation(TranslationReport),
    ImageToText(ImageToTextReport),
    ThumbnailCheck(ThumbnailAnalysis),
    /// Meme and text-to-image share one report shape.
    GeneratedImage(GeneratedImageReport),
    Speech(SpeechOutput),
    Spreadsheet(SpreadsheetPlan),
    Infographic(InfographicResponse),
    Ingredients(IngredientsReport),
    Vehicle(VehicleReport),
    Appliance(ApplianceReport),
    DateTime(DateTimeReport),
    ProblemSolution(ProblemSolution),
    Neurodiversity(NeurodiversityReport),
    Measurement(MeasurementReport),
    ImageHeatmap(ImageHeatmapReport),
    TextHeatmap(TextHeatmapReport),
    GeneratedPrompt(GeneratedPrompt),
}

impl ToolReport {
    /// Plain-text summary suitable for download.
    pub fn to_text_report(&self) -> String {
        match self {
            Self::MedicalScan(report) => report.to_text_report(),
            Self::Translation(report) => report.to_text_report(),
            Self::ImageToText(report) => report.to_text_report(),
            Self::ThumbnailCheck(report) => report.to_text_report(),
            Self::GeneratedImage(report) => report.to_text_report(),
            Self::Speech(output) => output.to_text_report(),
            Self::Spreadsheet(report) => report.to_text_report(),
            Self::Infographic(report) => report.to_text_report(),
            Self::Ingredients(report) => report.to_text_report(),
            Self::Vehicle(report) => report.to_text_report(),
            Self::Appliance(report) => report.to_text_report(),
            Self::DateTime(report) => report.to_text_report(),
            Self::ProblemSolution(report) => report.to_text_report(),
            Self::Neurodiversity(report) => report.to_text_report(),
            Self::Measurement(report) => report.to_text_report(),
            Self::ImageHeatmap(report) => report.to_text_report(),
            Self::TextHeatmap(report) => report.to_text_report(),
            Self::GeneratedPrompt(report) => report.to_text_report(),
        }
    }
}

#[cfg(test)]
mod tests {
    use kprovider::ImageInput;

    use super::*;

    #[test]
    fn kind_follows_payload() {
        let request = ToolRequest::from(SpeechRequest::new("hello"));
        assert_eq!(request.kind(), ToolKind::TextToSpeech);

        let request = ToolRequest::from(ThumbnailCheckRequest::new(
            ImageInput::url("https://example.com/t.png"),
            "title",
        ))
        .with_options(RequestOptions::default().with_model("gpt-4o-mini"));
        assert_eq!(request.kind(), ToolKind::ThumbnailCheck);
        assert_eq!(request.options.model.as_deref(), Some("gpt-4o-mini"));
    }

    #[test]
    fn shared_troubleshoot_request_keeps_the_chosen_tool() {
        let fault = TroubleshootRequest::new(
            ImageInput::url("https://example.com/fault.jpg"),
            "dishwasher",
            "won't drain",
        );
        assert_eq!(
            ToolRequest::appliance(fault.clone()).kind(),
            ToolKind::ApplianceTroubleshooter
        );
        assert_eq!(ToolRequest::vehicle(fault).kind(), ToolKind::VehicleTroubleshooter);
        assert_eq!(
            ToolRequest::from(DateTimeQuery::date(2024, 1, 1)).kind(),
            ToolKind::DateTimeChecker
        );
    }

    #[test]
    fn speech_report_renders_without_banner() {
        let report = ToolReport::Speech(SpeechOutput::PlayedLocally);
        assert!(report.to_text_report().contains("played on this device"));
    }
}
