mod date_time;
mod heatmap;
mod image_generation;
mod image_to_text;
mod infographic;
mod ingredients;
mod measuring;
mod medical;
mod neurodiversity;
mod problem_solver;
mod prompt_generator;
mod speech;
mod spreadsheet;
mod thumbnail;
mod translation;
mod troubleshoot;

pub use date_time::{
    DateInfo, DateTimeCheckerTool, DateTimeQuery, DateTimeReport, MONTH_NAMES, MatchingDates,
    QueryType, WEEKDAY_NAMES,
};
pub use heatmap::{
    AttentionArea, AttentionLevel, EngagementLevel, HeatmapRequest, ImageHeatmapReport,
    ImageHeatmapTool, SegmentEngagement, TextHeatmapReport, TextHeatmapTool,
};
pub use image_generation::{
    GeneratedImageReport, IMAGE_DISCLAIMER, ImagePlan, MEME_DISCLAIMER, MemeGeneratorTool,
    MemePlan, MemeRequest, TextToImageRequest, TextToImageTool,
};
pub use image_to_text::{
    AnalysisDepth, ImageToTextReport, ImageToTextRequest, ImageToTextTool, TextAnalysis,
    TextSegment,
};
pub use infographic::{
    ChartType, InfographicRequest, InfographicResponse, InfographicTool, Visualization,
};
pub use ingredients::{
    DietaryFlags, Ingredient, IngredientsCheckerTool, IngredientsReport, IngredientsRequest,
    OverallAssessment, OverallSafety, SafetyRating,
};
pub use measuring::{Measurement, MeasurementReport, MeasurementRequest, MeasuringTool, UnitSystem};
pub use medical::{
    MEDICAL_DISCLAIMER, MedicalAnalysis, MedicalReport, MedicalScanRequest, MedicalScanTool,
    NextSteps,
};
pub use neurodiversity::{
    AssessmentConfidence, NEURODIVERSITY_DISCLAIMER, NeurodiversityCheckerTool,
    NeurodiversityReport, NeurodiversityRequest,
};
pub use problem_solver::{
    Difficulty, ProblemRequest, ProblemSolution, ProblemSolverTool, SolutionStep,
};
pub use prompt_generator::{GeneratedPrompt, PromptGeneratorRequest, PromptGeneratorTool};
pub use speech::{MAX_SPEECH_CHARS, SpeechOutput, SpeechRequest, TextToSpeechTool};
pub use spreadsheet::{
    OperationType, Spreadsheet, SpreadsheetOperation, SpreadsheetPlan, SpreadsheetRequest,
    SpreadsheetTool,
};
pub use thumbnail::{
    ConsistencyReport, ImageSummary, ThumbnailAnalysis, ThumbnailCheckRequest, ThumbnailCheckTool,
    TitleSummary,
};
pub use translation::{TranslationInput, TranslationReport, TranslationRequest, TranslationTool};
pub use troubleshoot::{
    ApplianceReport, ApplianceTroubleshooterTool, Severity, TroubleshootRequest, VehicleReport,
    VehicleTroubleshooterTool,
};
