//! Dispatch from a [`ToolRequest`] to the matching tool.

use kcommon::TraceId;
use kengine::{CallContext, OrchestrationOutcome, Orchestrator, Tool};

use crate::common::AnalysisInput;
use crate::tools::{
    ApplianceTroubleshooterTool, DateTimeCheckerTool, ImageHeatmapTool, ImageToTextTool,
    InfographicTool, IngredientsCheckerTool, MeasuringTool, MedicalScanTool, MemeGeneratorTool,
    NeurodiversityCheckerTool, ProblemSolverTool, PromptGeneratorTool, SpreadsheetTool,
    TextHeatmapTool, TextToImageTool, TextToSpeechTool, ThumbnailCheckTool, TranslationTool,
    VehicleTroubleshooterTool,
};
use crate::{ToolPayload, ToolReport, ToolRequest};

/// Runs any catalog tool through one shared [`Orchestrator`].
#[derive(Clone)]
pub struct ToolCatalog {
    orchestrator: Orchestrator,
}

impl ToolCatalog {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator }
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub async fn dispatch(&self, request: ToolRequest) -> OrchestrationOutcome<ToolReport> {
        let context = CallContext::new(request.kind().as_str());
        self.dispatch_with_context(request, context).await
    }

    /// Like [`dispatch`](Self::dispatch), tagging every hook event with `trace_id`.
    pub async fn dispatch_traced(
        &self,
        request: ToolRequest,
        trace_id: TraceId,
    ) -> OrchestrationOutcome<ToolReport> {
        let context = CallContext::new(request.kind().as_str()).with_trace_id(trace_id);
        self.dispatch_with_context(request, context).await
    }

    async fn dispatch_with_context(
        &self,
        request: ToolRequest,
        context: CallContext,
    ) -> OrchestrationOutcome<ToolReport> {
        let ToolRequest { payload, options } = request;
        match payload {
            ToolPayload::MedicalScan(request) => {
                let tool = MedicalScanTool::new(request).with_options(options);
                self.run(&tool, context, ToolReport::MedicalScan).await
            }
            ToolPayload::Translation(request) => {
                let tool = TranslationTool::new(request).with_options(options);
                self.run(&tool, context, ToolReport::Translation).await
            }
            ToolPayload::ImageToText(request) => {
                let tool = ImageToTextTool::new(request).with_options(options);
                self.run(&tool, context, ToolReport::ImageToText).await
            }
            ToolPayload::ThumbnailCheck(request) => {
                let tool = ThumbnailCheckTool::new(request).with_options(options);
                self.run(&tool, context, ToolReport::ThumbnailCheck).await
            }
            ToolPayload::MemeGenerator(request) => {
                let tool = MemeGeneratorTool::new(request).with_options(options);
                self.run(&tool, context, ToolReport::GeneratedImage).await
            }
            ToolPayload::TextToImage(request) => {
                let tool = TextToImageTool::new(request).with_options(options);
                self.run(&tool, context, ToolReport::GeneratedImage).await
            }
            ToolPayload::TextToSpeech(request) => {
                let tool = TextToSpeechTool::new(request).with_options(options);
                self.run(&tool, context, ToolReport::Speech).await
            }
            ToolPayload::Spreadsheet(request) => {
                let tool = SpreadsheetTool::new(request).with_options(options);
                self.run(&tool, context, ToolReport::Spreadsheet).await
            }
            ToolPayload::Infographic(request) => {
                let tool = InfographicTool::new(request).with_options(options);
                self.run(&tool, context, ToolReport::Infographic).await
            }
            ToolPayload::IngredientsChecker(request) => {
                let tool = IngredientsCheckerTool::new(request).with_options(options);
                self.run(&tool, context, ToolReport::Ingredients).await
            }
            ToolPayload::VehicleTroubleshooter(request) => {
                let tool = VehicleTroubleshooterTool::new(request).with_options(options);
                self.run(&tool, context, ToolReport::Vehicle).await
            }
            ToolPayload::ApplianceTroubleshooter(request) => {
                let tool = ApplianceTroubleshooterTool::new(request).with_options(options);
                self.run(&tool, context, ToolReport::Appliance).await
            }
            ToolPayload::DateTimeChecker(query) => {
                let tool = DateTimeCheckerTool::new(query).with_options(options);
                self.run(&tool, context, ToolReport::DateTime).await
            }
            ToolPayload::ProblemSolver(request) => {
                let tool = ProblemSolverTool::new(request).with_options(options);
                self.run(&tool, context, ToolReport::ProblemSolution).await
            }
            ToolPayload::NeurodiversityChecker(request) => {
                let tool = NeurodiversityCheckerTool::new(request).with_options(options);
                self.run(&tool, context, ToolReport::Neurodiversity).await
            }
            ToolPayload::MeasuringTool(request) => {
                let tool = MeasuringTool::new(request).with_options(options);
                self.run(&tool, context, ToolReport::Measurement).await
            }
            ToolPayload::Heatmap(request) => match request.input {
                AnalysisInput::Image(image) => {
                    let tool = ImageHeatmapTool::new(image).with_options(options);
                    self.run(&tool, context, ToolReport::ImageHeatmap).await
                }
                AnalysisInput::Text(text) => {
                    let tool = TextHeatmapTool::new(text).with_options(options);
                    self.run(&tool, context, ToolReport::TextHeatmap).await
                }
            },
            ToolPayload::PromptGenerator(request) => {
                let tool = PromptGeneratorTool::new(request).with_options(options);
                self.run(&tool, context, ToolReport::GeneratedPrompt).await
            }
        }
    }

    async fn run<T: Tool>(
        &self,
        tool: &T,
        context: CallContext,
        wrap: fn(T::Output) -> ToolReport,
    ) -> OrchestrationOutcome<ToolReport> {
        self.orchestrator
            .run_with_context(tool, context)
            .await
            .map(wrap)
    }
}
