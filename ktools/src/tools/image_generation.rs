//! Plan-then-render image tools: a completion turns the user's description
//! into a generation prompt, then the image backend renders it.
//!
//! Meme captions never go into the render prompt. The plan returns placement
//! instructions and the caller overlays the caption on the rendered image.

use kcommon::{BoxFuture, RequestOptions};
use kcontract::{FieldKind, ShapeDescriptor};
use kengine::{Contract, Invocation, OrchestrationFailure, Tool};
use kprovider::{ImageInput, MediaArtifact, MediaKind, Prompt};
use serde::{Deserialize, Serialize};

use crate::common::{
    ExtractionConfidence, TextReport, completion, or_placeholder, text_completion,
};

pub const MEME_DISCLAIMER: &str =
    "AI-generated meme. Results may vary. For entertainment purposes only.";
pub const IMAGE_DISCLAIMER: &str =
    "AI-generated image. Results may vary. For creative and educational purposes.";

const STYLE_ANALYSIS_PROMPT: &str = "Analyze this meme image. Focus on: 1) Visual style \
2) Text placement 3) Humor elements 4) Overall composition. Provide insights in a concise format.";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MemeRequest {
    pub description: String,
    pub style: Option<String>,
    pub text_placement: Option<String>,
    pub context: Option<String>,
    /// Example memes whose style is analysed before planning.
    pub training_images: Vec<ImageInput>,
}

impl MemeRequest {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_text_placement(mut self, placement: impl Into<String>) -> Self {
        self.text_placement = Some(placement.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_training_image(mut self, image: ImageInput) -> Self {
        self.training_images.push(image);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextToImageRequest {
    pub description: String,
    pub style: Option<String>,
    /// e.g. "1:1", "16:9".
    pub aspect_ratio: Option<String>,
    pub context: Option<String>,
}

impl TextToImageRequest {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: impl Into<String>) -> Self {
        self.aspect_ratio = Some(aspect_ratio.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemePlan {
    pub dalle_prompt: String,
    pub style_notes: String,
    pub text_placement: String,
}

impl Contract for MemePlan {
    fn shape() -> ShapeDescriptor {
        ShapeDescriptor::new()
            .required("dalle_prompt", FieldKind::String)
            .required("style_notes", FieldKind::String)
            .required("text_placement", FieldKind::String)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePlan {
    pub dalle_prompt: String,
    pub style_notes: String,
}

impl Contract for ImagePlan {
    fn shape() -> ShapeDescriptor {
        ShapeDescriptor::new()
            .required("dalle_prompt", FieldKind::String)
            .required("style_notes", FieldKind::String)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedImageReport {
    #[serde(skip)]
    pub generated_image: MediaArtifact,
    pub prompt_used: String,
    pub style_applied: String,
    pub text_placement: Option<String>,
    pub confidence: ExtractionConfidence,
    pub disclaimer: String,
}

impl GeneratedImageReport {
    pub fn to_text_report(&self) -> String {
        let location = match &self.generated_image {
            MediaArtifact::Url(url) => url.clone(),
            MediaArtifact::Inline { mime_type, data } => {
                format!("inline {mime_type} ({} bytes)", data.len())
            }
        };

        let mut report = TextReport::new("Image Generation Report")
            .field("Confidence", self.confidence.as_str())
            .field("Image", location);
        if let Some(placement) = &self.text_placement {
            report = report.field("Text Placement", placement);
        }
        report
            .gap()
            .section("Prompt Used", &self.prompt_used)
            .section("Style Applied", &self.style_applied)
            .finish(&self.disclaimer)
    }
}

async fn render(
    invocation: &mut Invocation,
    prompt: &str,
) -> Result<MediaArtifact, OrchestrationFailure> {
    invocation
        .generate_image("render", prompt.to_string(), None)
        .await
}

#[derive(Debug, Clone)]
pub struct MemeGeneratorTool {
    request: MemeRequest,
    options: RequestOptions,
}

impl MemeGeneratorTool {
    pub fn new(request: MemeRequest) -> Self {
        Self {
            request,
            options: RequestOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    fn plan_prompt(&self, style_insights: &[String]) -> Prompt {
        let request = &self.request;
        let mut text = format!(
            "You are an expert meme creator. Turn the user's idea into a detailed prompt for an \
image generation model.\n\
Meme description: {description}\n\
Style: {style}\n\
Text placement: {placement}\n\
Additional context: {context}\n",
            description = request.description.trim(),
            style = or_placeholder(request.style.as_deref(), "Not specified"),
            placement = or_placeholder(request.text_placement.as_deref(), "Not specified"),
            context = or_placeholder(request.context.as_deref(), "None provided"),
        );
        if !style_insights.is_empty() {
            text.push_str("\nStyle insights from example memes:\n");
            for insight in style_insights {
                text.push_str("- ");
                text.push_str(insight.trim());
                text.push('\n');
            }
        }
        text.push_str(
            "\nThe prompt should be clear, specific, and focus on visual elements.\n\
Avoid any text in the image itself - the caption is added separately.\n\
Respond with a JSON object with these keys:\n\
- \"dalle_prompt\": (string) the image generation prompt, visual elements only\n\
- \"style_notes\": (string) the visual style you applied\n\
- \"text_placement\": (string) specific instructions for placing the caption",
        );
        Prompt::new(text)
    }

    async fn analyse_style(
        &self,
        invocation: &mut Invocation,
    ) -> Result<Vec<String>, OrchestrationFailure> {
        let mut insights = Vec::with_capacity(self.request.training_images.len());
        for image in &self.request.training_images {
            let request = text_completion(
                invocation,
                &self.options,
                Prompt::new(STYLE_ANALYSIS_PROMPT).with_image(image.clone()),
            );
            insights.push(invocation.complete_text("style_analysis", request).await?);
        }
        Ok(insights)
    }
}

impl Tool for MemeGeneratorTool {
    type Output = GeneratedImageReport;

    fn kind(&self) -> &'static str {
        "meme_generator"
    }

    fn required_media(&self) -> Option<MediaKind> {
        Some(MediaKind::Image)
    }

    fn validate_input(&self) -> Result<(), String> {
        if self.request.description.trim().is_empty() {
            return Err("a meme description is required".to_string());
        }
        if self.request.training_images.iter().any(ImageInput::is_empty) {
            return Err("a training image is empty".to_string());
        }
        Ok(())
    }

    fn run<'a>(
        &'a self,
        invocation: &'a mut Invocation,
    ) -> BoxFuture<'a, Result<Self::Output, OrchestrationFailure>> {
        Box::pin(async move {
            let style_insights = self.analyse_style(invocation).await?;
            let request = completion(invocation, &self.options, self.plan_prompt(&style_insights));
            let plan: MemePlan = invocation.complete_json("plan", request).await?;
            let generated_image = render(invocation, &plan.dalle_prompt).await?;

            Ok(GeneratedImageReport {
                generated_image,
                prompt_used: plan.dalle_prompt,
                style_applied: plan.style_notes,
                text_placement: Some(plan.text_placement),
                confidence: ExtractionConfidence::High,
                disclaimer: MEME_DISCLAIMER.to_string(),
            })
        })
    }
}

#[derive(Debug, Clone)]
pub struct TextToImageTool {
    request: TextToImageRequest,
    options: RequestOptions,
}

impl TextToImageTool {
    pub fn new(request: TextToImageRequest) -> Self {
        Self {
            request,
            options: RequestOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    fn plan_prompt(&self) -> Prompt {
        let request = &self.request;
        Prompt::new(format!(
            "You are an expert at writing prompts for image generation models.\n\
Image description: {description}\n\
Style: {style}\n\
Aspect ratio: {aspect_ratio}\n\
Additional context: {context}\n\n\
Write a vivid, specific prompt that captures the subject, composition, lighting and style.\n\
Respond with a JSON object with these keys:\n\
- \"dalle_prompt\": (string) the full image generation prompt\n\
- \"style_notes\": (string) the visual style you applied",
            description = request.description.trim(),
            style = or_placeholder(request.style.as_deref(), "Not specified"),
            aspect_ratio = or_placeholder(request.aspect_ratio.as_deref(), "1:1"),
            context = or_placeholder(request.context.as_deref(), "None provided"),
        ))
    }
}

impl Tool for TextToImageTool {
    type Output = GeneratedImageReport;

    fn kind(&self) -> &'static str {
        "text_to_image"
    }

    fn required_media(&self) -> Option<MediaKind> {
        Some(MediaKind::Image)
    }

    fn validate_input(&self) -> Result<(), String> {
        if self.request.description.trim().is_empty() {
            return Err("an image description is required".to_string());
        }
        Ok(())
    }

    fn run<'a>(
        &'a self,
        invocation: &'a mut Invocation,
    ) -> BoxFuture<'a, Result<Self::Output, OrchestrationFailure>> {
        Box::pin(async move {
            let request = completion(invocation, &self.options, self.plan_prompt());
            let plan: ImagePlan = invocation.complete_json("plan", request).await?;
            let generated_image = render(invocation, &plan.dalle_prompt).await?;

            Ok(GeneratedImageReport {
                generated_image,
                prompt_used: plan.dalle_prompt,
                style_applied: plan.style_notes,
                text_placement: None,
                confidence: ExtractionConfidence::High,
                disclaimer: IMAGE_DISCLAIMER.to_string(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use kcontract::{ContractErrorKind, parse_contract};

    use super::*;

    #[test]
    fn meme_plan_requires_text_placement() {
        let error = parse_contract::<MemePlan>(
            "```json\n{\"dalle_prompt\":\"a cat\",\"style_notes\":\"flat\"}\n```",
        )
        .expect_err("placement missing");
        assert_eq!(error.kind, ContractErrorKind::MissingField);
        assert_eq!(error.field.as_deref(), Some("text_placement"));
    }

    #[test]
    fn meme_prompt_fills_placeholders() {
        let tool = MemeGeneratorTool::new(MemeRequest::new("cat on a keyboard").with_style("pixel"));
        let text = tool.plan_prompt(&[]).text;
        assert!(text.contains("Meme description: cat on a keyboard"));
        assert!(text.contains("Style: pixel"));
        assert!(text.contains("Text placement: Not specified"));
        assert!(text.contains("Additional context: None provided"));
        assert!(!text.contains("Style insights"));
    }

    #[test]
    fn meme_prompt_keeps_captions_out_of_the_image() {
        let tool = MemeGeneratorTool::new(MemeRequest::new("cat on a keyboard"));
        let text = tool.plan_prompt(&["Bold impact font at the top".to_string()]).text;
        assert!(text.contains("Avoid any text in the image itself"));
        assert!(text.contains("visual elements only"));
        assert!(!text.contains("including the caption"));
        assert!(text.contains("Style insights from example memes:\n- Bold impact font at the top\n"));
    }

    #[test]
    fn image_prompt_defaults_aspect_ratio() {
        let tool = TextToImageTool::new(TextToImageRequest::new("a lighthouse at dusk"));
        assert!(tool.plan_prompt().text.contains("Aspect ratio: 1:1"));
    }

    #[test]
    fn blank_descriptions_are_rejected() {
        assert!(MemeGeneratorTool::new(MemeRequest::new(" ")).validate_input().is_err());
        assert!(
            MemeGeneratorTool::new(MemeRequest::new("cat").with_training_image(ImageInput::url("")))
                .validate_input()
                .is_err()
        );
        assert!(TextToImageTool::new(TextToImageRequest::new("")).validate_input().is_err());
    }

    #[test]
    fn text_report_names_inline_images_by_size() {
        let report = GeneratedImageReport {
            generated_image: MediaArtifact::Inline {
                mime_type: "image/png".to_string(),
                data: vec![1, 2, 3],
            },
            prompt_used: "a lighthouse".to_string(),
            style_applied: "watercolor".to_string(),
            text_placement: None,
            confidence: ExtractionConfidence::High,
            disclaimer: IMAGE_DISCLAIMER.to_string(),
        };
        let text = report.to_text_report();
        assert!(text.contains("Image: inline image/png (3 bytes)\n"));
        assert!(!text.contains("Text Placement"));
    }
}
