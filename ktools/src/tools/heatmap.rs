//! Predicted attention for images and engagement for text.
//!
//! The two inputs produce different reports, so each has its own tool. Both
//! report under the `heatmap` kind.

use kcommon::{BoxFuture, RequestOptions};
use kcontract::{FieldKind, ShapeDescriptor};
use kengine::{Contract, Invocation, OrchestrationFailure, Tool};
use kprovider::{ImageInput, Prompt};
use serde::{Deserialize, Serialize};

use crate::common::{
    AnalysisInput, EXTRACTION_CONFIDENCE_LEVELS, ExtractionConfidence, TextReport, completion,
    or_placeholder,
};

const ATTENTION_LEVELS: &[&str] = &["high", "medium", "low"];
const ENGAGEMENT_LEVELS: &[&str] = &["high", "medium", "low", "neutral"];

/// Catalog input; the variant picks [`ImageHeatmapTool`] or [`TextHeatmapTool`].
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapRequest {
    pub input: AnalysisInput,
}

impl HeatmapRequest {
    pub fn new(input: impl Into<AnalysisInput>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttentionLevel {
    High,
    Medium,
    Low,
}

impl AttentionLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngagementLevel {
    High,
    Medium,
    Low,
    Neutral,
}

impl EngagementLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttentionArea {
    pub area_description: String,
    pub reason: String,
    pub attention_level: AttentionLevel,
    /// `center`, `top-left`, ... or a free-text hint.
    #[serde(default)]
    pub location_hint: Option<String>,
}

impl AttentionArea {
    fn line(&self) -> String {
        format!(
            "{} [{}, {}]: {}",
            self.area_description,
            self.attention_level.as_str(),
            or_placeholder(self.location_hint.as_deref(), "anywhere"),
            self.reason
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageHeatmapReport {
    pub image_description: String,
    pub high_attention_areas: Vec<AttentionArea>,
    pub low_attention_areas: Vec<AttentionArea>,
    pub confidence: ExtractionConfidence,
    pub disclaimer: String,
}

impl Contract for ImageHeatmapReport {
    fn shape() -> ShapeDescriptor {
        let area = || {
            FieldKind::array_of(FieldKind::Object(
                ShapeDescriptor::new()
                    .required("area_description", FieldKind::String)
                    .required("reason", FieldKind::String)
                    .required("attention_level", FieldKind::Enum(ATTENTION_LEVELS))
                    .optional("location_hint", FieldKind::String),
            ))
        };

        ShapeDescriptor::new()
            .required("image_description", FieldKind::String)
            .required("high_attention_areas", area())
            .required("low_attention_areas", area())
            .required("confidence", FieldKind::Enum(EXTRACTION_CONFIDENCE_LEVELS))
            .required("disclaimer", FieldKind::String)
    }
}

impl ImageHeatmapReport {
    pub fn to_text_report(&self) -> String {
        let high: Vec<String> = self.high_attention_areas.iter().map(AttentionArea::line).collect();
        let low: Vec<String> = self.low_attention_areas.iter().map(AttentionArea::line).collect();

        TextReport::new("Image Attention Report")
            .field("Confidence", self.confidence.as_str())
            .gap()
            .section("Image Description", &self.image_description)
            .list("High Attention Areas", &high)
            .list("Low Attention Areas", &low)
            .finish(&self.disclaimer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentEngagement {
    pub segment: String,
    pub engagement_level: EngagementLevel,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextHeatmapReport {
    pub overall_summary: String,
    pub segments: Vec<SegmentEngagement>,
    pub confidence: ExtractionConfidence,
    pub disclaimer: String,
}

impl Contract for TextHeatmapReport {
    fn shape() -> ShapeDescriptor {
        let segment = ShapeDescriptor::new()
            .required("segment", FieldKind::String)
            .required("engagement_level", FieldKind::Enum(ENGAGEMENT_LEVELS))
            .optional("reason", FieldKind::String);

        ShapeDescriptor::new()
            .required("overall_summary", FieldKind::String)
            .required("segments", FieldKind::array_of(FieldKind::Object(segment)))
            .required("confidence", FieldKind::Enum(EXTRACTION_CONFIDENCE_LEVELS))
            .required("disclaimer", FieldKind::String)
    }
}

impl TextHeatmapReport {
    pub fn to_text_report(&self) -> String {
        let segments: Vec<String> = self
            .segments
            .iter()
            .map(|segment| match segment.reason.as_deref() {
                Some(reason) => format!(
                    "[{}] {} ({reason})",
                    segment.engagement_level.as_str(),
                    segment.segment
                ),
                None => format!("[{}] {}", segment.engagement_level.as_str(), segment.segment),
            })
            .collect();

        TextReport::new("Text Engagement Report")
            .field("Confidence", self.confidence.as_str())
            .gap()
            .section("Overall Summary", &self.overall_summary)
            .list("Segments", &segments)
            .finish(&self.disclaimer)
    }
}

#[derive(Debug, Clone)]
pub struct ImageHeatmapTool {
    image: ImageInput,
    options: RequestOptions,
}

impl ImageHeatmapTool {
    pub fn new(image: ImageInput) -> Self {
        Self {
            image,
            options: RequestOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    fn prompt(&self) -> Prompt {
        Prompt::new(
            "You are an AI assistant specializing in predicting visual attention in images.\n\
First, provide a general description of the image content.\n\
Then, identify areas likely to attract high visual attention and areas likely to receive low \
visual attention. For each area, briefly explain why it is engaging or not.\n\
Give each area a location_hint using one of 'center', 'top-center', 'bottom-center', \
'left-center', 'right-center', 'top-left', 'top-right', 'bottom-left', 'bottom-right'. If a \
precise hint isn't possible, use a short textual description or leave it empty.\n\
Provide your findings in a JSON object with these keys:\n\
- \"image_description\": (string) A brief overall description of the image content\n\
- \"high_attention_areas\": (array of objects) each with \"area_description\", \"reason\", \"attention_level\" (\"high\") and \"location_hint\"\n\
- \"low_attention_areas\": (array of objects) each with \"area_description\", \"reason\", \"attention_level\" (\"low\") and \"location_hint\"\n\
- \"confidence\": (string, one of \"High\", \"Medium\", \"Low\")\n\
- \"disclaimer\": (string) AI-predicted engagement is subjective. Location hints are approximate.\n\
Focus on descriptive locations rather than precise coordinates.",
        )
        .with_image(self.image.clone())
    }
}

impl Tool for ImageHeatmapTool {
    type Output = ImageHeatmapReport;

    fn kind(&self) -> &'static str {
        "heatmap"
    }

    fn validate_input(&self) -> Result<(), String> {
        if self.image.is_empty() {
            return Err("an image is required for an attention heatmap".to_string());
        }
        Ok(())
    }

    fn run<'a>(
        &'a self,
        invocation: &'a mut Invocation,
    ) -> BoxFuture<'a, Result<Self::Output, OrchestrationFailure>> {
        Box::pin(async move {
            let request = completion(invocation, &self.options, self.prompt());
            invocation.complete_json("predict_attention", request).await
        })
    }
}

#[derive(Debug, Clone)]
pub struct TextHeatmapTool {
    text: String,
    options: RequestOptions,
}

impl TextHeatmapTool {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            options: RequestOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    fn prompt(&self) -> Prompt {
        Prompt::new(format!(
            "You are an AI assistant specializing in analyzing text engagement.\n\
Analyze the following text for predicted user engagement: \"{text}\"\n\
Segment the text into meaningful phrases or short sentences. For each segment, assign an \
engagement level ('high', 'medium', 'low', 'neutral') and optionally a brief reason.\n\
Also provide an overall summary of the text's engagement potential.\n\
Provide your findings in a JSON object with these keys:\n\
- \"overall_summary\": (string) The text's overall engagement potential\n\
- \"segments\": (array of objects) each with \"segment\", \"engagement_level\" (one of \"high\", \"medium\", \"low\", \"neutral\") and optional \"reason\"\n\
- \"confidence\": (string, one of \"High\", \"Medium\", \"Low\")\n\
- \"disclaimer\": (string) AI-predicted engagement is subjective. Use as a guide.",
            text = self.text.trim(),
        ))
    }
}

impl Tool for TextHeatmapTool {
    type Output = TextHeatmapReport;

    fn kind(&self) -> &'static str {
        "heatmap"
    }

    fn validate_input(&self) -> Result<(), String> {
        if self.text.trim().is_empty() {
            return Err("text is required for an engagement heatmap".to_string());
        }
        Ok(())
    }

    fn run<'a>(
        &'a self,
        invocation: &'a mut Invocation,
    ) -> BoxFuture<'a, Result<Self::Output, OrchestrationFailure>> {
        Box::pin(async move {
            let request = completion(invocation, &self.options, self.prompt());
            invocation.complete_json("predict_engagement", request).await
        })
    }
}
