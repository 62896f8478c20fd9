//! Infographic assistant: answers a data-visualization request with a chart
//! description the caller can render.
//!
//! An attached image is described first. That description is context only,
//! so a failed description step does not end the pipeline.

use kcommon::{BoxFuture, RequestOptions};
use kcontract::{FieldKind, ShapeDescriptor};
use kengine::{Contract, Invocation, OrchestrationFailure, Tool};
use kprovider::{ImageInput, Prompt};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::{TextReport, completion, text_completion};

const CHART_TYPES: &[&str] = &[
    "pie", "bar", "line", "area", "scatter", "tree", "heatmap", "custom",
];

const INFOGRAPHIC_DISCLAIMER: &str =
    "AI-suggested visualization. Verify the data before publishing.";

const IMAGE_ANALYSIS_PROMPT: &str = "Describe this image in detail, focusing on any charts, \
graphs, or data visualizations visible. If it contains data, extract and summarize it.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Pie,
    Bar,
    Line,
    Area,
    Scatter,
    Tree,
    Heatmap,
    Custom,
}

impl ChartType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pie => "pie",
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Area => "area",
            Self::Scatter => "scatter",
            Self::Tree => "tree",
            Self::Heatmap => "heatmap",
            Self::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visualization {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub data: Value,
    #[serde(default)]
    pub config: Option<Value>,
    /// Inline SVG markup for `custom` charts.
    #[serde(default)]
    pub svg_content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfographicResponse {
    pub message: String,
    #[serde(default)]
    pub visualization: Option<Visualization>,
}

impl Contract for InfographicResponse {
    fn shape() -> ShapeDescriptor {
        let visualization = ShapeDescriptor::new()
            .required("type", FieldKind::Enum(CHART_TYPES))
            .required("title", FieldKind::String)
            .optional("description", FieldKind::String)
            .required("data", FieldKind::Any)
            .optional("config", FieldKind::Any)
            .optional("svgContent", FieldKind::String);

        ShapeDescriptor::new()
            .required("message", FieldKind::String)
            .optional("visualization", FieldKind::Object(visualization))
    }
}

impl InfographicResponse {
    pub fn to_text_report(&self) -> String {
        let mut report = TextReport::new("Infographic Report");
        if let Some(visualization) = &self.visualization {
            report = report
                .field("Chart Type", visualization.chart_type.as_str())
                .field("Title", &visualization.title);
            if let Some(description) = &visualization.description {
                report = report.field("Description", description);
            }
            report = report.gap();
        }
        report
            .section("Response", &self.message)
            .finish(INFOGRAPHIC_DISCLAIMER)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InfographicRequest {
    pub message: String,
    pub image: Option<ImageInput>,
    /// Structured data the user already supplied, sent verbatim as JSON.
    pub context_data: Option<Value>,
    /// Visualization currently on screen, for follow-up edits.
    pub current: Option<Visualization>,
    /// Ask for recommendations on the user's data rather than a single chart.
    pub analyze: bool,
}

impl InfographicRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_image(mut self, image: ImageInput) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_context_data(mut self, data: Value) -> Self {
        self.context_data = Some(data);
        self
    }

    pub fn with_current(mut self, visualization: Visualization) -> Self {
        self.current = Some(visualization);
        self
    }

    pub fn analyze(mut self) -> Self {
        self.analyze = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct InfographicTool {
    request: InfographicRequest,
    options: RequestOptions,
}

impl InfographicTool {
    pub fn new(request: InfographicRequest) -> Self {
        Self {
            request,
            options: RequestOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    fn prompt(&self, image_analysis: Option<&str>) -> Prompt {
        let request = &self.request;
        let mut text = String::from(
            "You are an AI assistant specialized in creating data visualizations and infographics. ",
        );
        if request.analyze {
            text.push_str("Analyze the user's data and provide visualization recommendations. ");
        }
        if let Some(analysis) = image_analysis {
            text.push_str(&format!("Based on the image analysis: {analysis} "));
        }
        if let Some(data) = &request.context_data {
            text.push_str(&format!("\n\nContext data: {data}"));
        }
        if let Some(current) = &request.current {
            text.push_str(&format!(
                "\n\nCurrent visualization: type={}, title=\"{}\", description=\"{}\"",
                current.chart_type.as_str(),
                current.title,
                current.description.as_deref().unwrap_or(""),
            ));
        }
        text.push_str(&format!(
            "\n\nUser request: {message}\n\n\
Respond with a JSON object with these keys:\n\
- \"message\": (string) your reply to the user\n\
- \"visualization\": (object, optional) {{\n\
    \"type\": one of \"pie\", \"bar\", \"line\", \"area\", \"scatter\", \"tree\", \"heatmap\", \"custom\",\n\
    \"title\": (string),\n\
    \"description\": (string),\n\
    \"data\": the chart data,\n\
    \"config\": (object) chart options,\n\
    \"svgContent\": (string) SVG markup, only for \"custom\"\n\
  }}",
            message = request.message.trim(),
        ));
        Prompt::new(text)
    }

    async fn describe_image(&self, invocation: &mut Invocation, image: &ImageInput) -> Option<String> {
        let request = text_completion(
            invocation,
            &self.options,
            Prompt::new(IMAGE_ANALYSIS_PROMPT).with_image(image.clone()),
        );
        invocation.complete_text("image_analysis", request).await.ok()
    }
}

impl Tool for InfographicTool {
    type Output = InfographicResponse;

    fn kind(&self) -> &'static str {
        "infographic"
    }

    fn validate_input(&self) -> Result<(), String> {
        if self.request.message.trim().is_empty() && self.request.image.is_none() {
            return Err("a request message or an image is required".to_string());
        }
        if self.request.image.as_ref().is_some_and(ImageInput::is_empty) {
            return Err("the attached image is empty".to_string());
        }
        Ok(())
    }

    fn run<'a>(
        &'a self,
        invocation: &'a mut Invocation,
    ) -> BoxFuture<'a, Result<Self::Output, OrchestrationFailure>> {
        Box::pin(async move {
            let image_analysis = match &self.request.image {
                Some(image) => self.describe_image(invocation, image).await,
                None => None,
            };

            let request = completion(
                invocation,
                &self.options,
                self.prompt(image_analysis.as_deref()),
            );
            invocation.complete_json("visualize", request).await
        })
    }
}
