use std::fmt::{Display, Formatter};

/// Discriminates which tool, and therefore which contract, a request uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    MedicalScan,
    Translation,
    ImageToText,
    ThumbnailCheck,
    MemeGenerator,
    TextToImage,
    TextToSpeech,
    Spreadsheet,
    Infographic,
    IngredientsChecker,
    VehicleTroubleshooter,
    ApplianceTroubleshooter,
    DateTimeChecker,
    ProblemSolver,
    NeurodiversityChecker,
    MeasuringTool,
    Heatmap,
    PromptGenerator,
}

impl ToolKind {
    pub const ALL: [ToolKind; 18] = [
        Self::MedicalScan,
        Self::Translation,
        Self::ImageToText,
        Self::ThumbnailCheck,
        Self::MemeGenerator,
        Self::TextToImage,
        Self::TextToSpeech,
        Self::Spreadsheet,
        Self::Infographic,
        Self::IngredientsChecker,
        Self::VehicleTroubleshooter,
        Self::ApplianceTroubleshooter,
        Self::DateTimeChecker,
        Self::ProblemSolver,
        Self::NeurodiversityChecker,
        Self::MeasuringTool,
        Self::Heatmap,
        Self::PromptGenerator,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MedicalScan => "medical_scan",
            Self::Translation => "translation",
            Self::ImageToText => "image_to_text",
            Self::ThumbnailCheck => "thumbnail_check",
            Self::MemeGenerator => "meme_generator",
            Self::TextToImage => "text_to_image",
            Self::TextToSpeech => "text_to_speech",
            Self::Spreadsheet => "spreadsheet",
            Self::Infographic => "infographic",
            Self::IngredientsChecker => "ingredients_checker",
            Self::VehicleTroubleshooter => "vehicle_troubleshooter",
            Self::ApplianceTroubleshooter => "appliance_troubleshooter",
            Self::DateTimeChecker => "date_time_checker",
            Self::ProblemSolver => "problem_solver",
            Self::NeurodiversityChecker => "neurodiversity_checker",
            Self::MeasuringTool => "measuring_tool",
            Self::Heatmap => "heatmap",
            Self::PromptGenerator => "prompt_generator",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value))
    }
}

impl Display for ToolKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
