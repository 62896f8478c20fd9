use kcommon::{BoxFuture, RequestOptions};
use kcontract::{FieldKind, ShapeDescriptor};
use kengine::{Contract, Invocation, OrchestrationFailure, Tool};
use kprovider::Prompt;
use serde::{Deserialize, Serialize};

use crate::common::{AnalysisInput, TextReport, completion};

pub const NEURODIVERSITY_DISCLAIMER: &str = "AI-generated assessment. This is not a substitute for human review and consultation with neurodivergent individuals. Accuracy and comprehensiveness are not guaranteed.";

const ASSESSMENT_CONFIDENCE_LEVELS: &[&str] = &[
    "High",
    "Medium",
    "Low",
    "Not Applicable",
    "Unable to determine",
];

/// Extraction confidence plus an explicit "could not tell" answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssessmentConfidence {
    High,
    Medium,
    Low,
    #[serde(rename = "Not Applicable")]
    NotApplicable,
    #[serde(rename = "Unable to determine")]
    UnableToDetermine,
}

impl AssessmentConfidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::NotApplicable => "Not Applicable",
            Self::UnableToDetermine => "Unable to determine",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NeurodiversityRequest {
    pub input: AnalysisInput,
}

impl NeurodiversityRequest {
    pub fn new(input: impl Into<AnalysisInput>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeurodiversityReport {
    /// Present for image input only.
    #[serde(default)]
    pub image_description: Option<String>,
    pub neurodiversity_friendliness_assessment: String,
    pub positive_aspects: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub confidence: AssessmentConfidence,
    #[serde(default)]
    pub disclaimer: Option<String>,
}

impl Contract for NeurodiversityReport {
    fn shape() -> ShapeDescriptor {
        ShapeDescriptor::new()
            .optional("image_description", FieldKind::String)
            .required("neurodiversity_friendliness_assessment", FieldKind::String)
            .required("positive_aspects", FieldKind::array_of(FieldKind::String))
            .required("areas_for_improvement", FieldKind::array_of(FieldKind::String))
            .required("confidence", FieldKind::Enum(ASSESSMENT_CONFIDENCE_LEVELS))
            .optional("disclaimer", FieldKind::String)
    }
}

impl NeurodiversityReport {
    pub fn to_text_report(&self) -> String {
        let mut report = TextReport::new("Neurodiversity Friendliness Report")
            .field("Confidence", self.confidence.as_str())
            .gap();
        if let Some(description) = &self.image_description {
            report = report.section("Image Description", description);
        }
        report
            .section("Assessment", &self.neurodiversity_friendliness_assessment)
            .list("Positive Aspects", &self.positive_aspects)
            .list("Areas for Improvement", &self.areas_for_improvement)
            .finish(
                self.disclaimer
                    .as_deref()
                    .unwrap_or(NEURODIVERSITY_DISCLAIMER),
            )
    }
}

#[derive(Debug, Clone)]
pub struct NeurodiversityCheckerTool {
    request: NeurodiversityRequest,
    options: RequestOptions,
}

impl NeurodiversityCheckerTool {
    pub fn new(request: NeurodiversityRequest) -> Self {
        Self {
            request,
            options: RequestOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    fn prompt(&self) -> Prompt {
        let keys = "- \"neurodiversity_friendliness_assessment\": (string) Your overall assessment (e.g., \"Appears generally neurodiversity-friendly\", \"Some considerations for improvement\", \"Potential challenges for neurodivergent individuals\")\n\
- \"positive_aspects\": (array of strings) Elements that are positive for neurodiversity\n\
- \"areas_for_improvement\": (array of strings) Elements that could be challenging, with suggested improvements\n\
- \"confidence\": (string, one of \"High\", \"Medium\", \"Low\", \"Not Applicable\") Your confidence in this assessment\n";

        match &self.request.input {
            AnalysisInput::Image(image) => Prompt::new(format!(
                "You are an AI assistant specialized in evaluating content for neurodiversity-friendliness.\n\
First, provide a general description of the visual content of this image.\n\
Then, analyze this image for elements that might impact neurodivergent individuals. Consider:\n\
- Visual clarity and simplicity vs. clutter or excessive detail.\n\
- Use of colors, such as high contrast or overwhelming combinations.\n\
- Distracting patterns, textures, or implied animation.\n\
- Clarity of information conveyed visually.\n\
- Potential for sensory overload.\n\
Provide your findings in a JSON object with the following keys:\n\
- \"image_description\": (string) Your general description of the image content.\n\
{keys}\
- \"disclaimer\": (string) \"{NEURODIVERSITY_DISCLAIMER}\""
            ))
            .with_image(image.clone()),
            AnalysisInput::Text(text) => Prompt::new(format!(
                "You are an AI assistant specialized in evaluating content for neurodiversity-friendliness.\n\
Analyze the following text for neurodiversity-friendliness: \"{text}\"\n\
Consider:\n\
- Clarity and conciseness of language.\n\
- Sentence structure complexity.\n\
- Use of jargon, idioms, or ambiguous phrasing.\n\
- Predictability and logical flow of information.\n\
- Explicitness of communication.\n\
- Potential for information overload.\n\
Provide your findings in a JSON object with the following keys:\n\
{keys}\
- \"disclaimer\": (string) \"{NEURODIVERSITY_DISCLAIMER}\""
            )),
        }
    }
}

impl Tool for NeurodiversityCheckerTool {
    type Output = NeurodiversityReport;

    fn kind(&self) -> &'static str {
        "neurodiversity_checker"
    }

    fn validate_input(&self) -> Result<(), String> {
        self.request.input.ensure_present("a neurodiversity review")
    }

    fn run<'a>(
        &'a self,
        invocation: &'a mut Invocation,
    ) -> BoxFuture<'a, Result<Self::Output, OrchestrationFailure>> {
        Box::pin(async move {
            let request = completion(invocation, &self.options, self.prompt());
            invocation.complete_json("assess", request).await
        })
    }
}

#[cfg(test)]
mod tests {
    use kcontract::{ContractErrorKind, parse_contract};
    use kprovider::ImageInput;

    use super::*;

    const TEXT_REPORT: &str = r#"{
  "neurodiversity_friendliness_assessment": "Some considerations for improvement",
  "positive_aspects": ["Short sentences"],
  "areas_for_improvement": ["Define the idiom 'ballpark figure'"],
  "confidence": "Unable to determine"
}"#;

    #[test]
    fn text_assessment_parses_without_image_fields() {
        let report =
            parse_contract::<NeurodiversityReport>(TEXT_REPORT).expect("report should parse");
        assert_eq!(report.confidence, AssessmentConfidence::UnableToDetermine);
        assert!(report.image_description.is_none());
        assert!(report.disclaimer.is_none());
    }

    #[test]
    fn confidence_outside_the_scale_is_rejected() {
        let payload = TEXT_REPORT.replace("\"Unable to determine\"", "\"Unsure\"");
        let error = parse_contract::<NeurodiversityReport>(&payload).expect_err("bad confidence");
        assert_eq!(error.kind, ContractErrorKind::UnknownVariant);
        assert_eq!(error.field.as_deref(), Some("confidence"));
    }

    #[test]
    fn only_image_prompts_ask_for_a_description() {
        let image = NeurodiversityCheckerTool::new(NeurodiversityRequest::new(ImageInput::url(
            "https://example.com/p.png",
        )));
        let prompt = image.prompt();
        assert!(prompt.has_images());
        assert!(prompt.text.contains("\"image_description\""));

        let text = NeurodiversityCheckerTool::new(NeurodiversityRequest::new(AnalysisInput::text(
            "Read the manual.",
        )));
        let prompt = text.prompt();
        assert!(!prompt.has_images());
        assert!(!prompt.text.contains("\"image_description\""));
        assert!(prompt.text.contains("\"Read the manual.\""));
    }

    #[test]
    fn text_report_falls_back_to_the_standard_disclaimer() {
        let report =
            parse_contract::<NeurodiversityReport>(TEXT_REPORT).expect("report should parse");
        let text = report.to_text_report();
        assert!(text.contains("Confidence: Unable to determine\n"));
        assert!(text.ends_with(&format!("Disclaimer: {NEURODIVERSITY_DISCLAIMER}\n")));
    }
}
