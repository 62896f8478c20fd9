//! Three-step check that a video thumbnail matches its title.
//!
//! The image and the title are summarized independently, then a third call
//! compares the two summaries. Each step sees only the validated output of the
//! steps before it.

use kcommon::{BoxFuture, RequestOptions};
use kcontract::{ContractError, FieldKind, ShapeDescriptor};
use kengine::{Contract, Invocation, OrchestrationFailure, Tool};
use kprovider::{ImageInput, Prompt};
use serde::{Deserialize, Serialize};

use crate::common::{TextReport, completion};

const THUMBNAIL_DISCLAIMER: &str =
    "AI-generated consistency check. Use it as a guide, not a final editorial judgement.";

#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailCheckRequest {
    pub thumbnail: ImageInput,
    pub title: String,
}

impl ThumbnailCheckRequest {
    pub fn new(thumbnail: ImageInput, title: impl Into<String>) -> Self {
        Self {
            thumbnail,
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSummary {
    pub image_summary: String,
}

impl Contract for ImageSummary {
    fn shape() -> ShapeDescriptor {
        ShapeDescriptor::new().required("image_summary", FieldKind::String)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleSummary {
    pub title_summary: String,
}

impl Contract for TitleSummary {
    fn shape() -> ShapeDescriptor {
        ShapeDescriptor::new().required("title_summary", FieldKind::String)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub is_consistent: bool,
    pub explanation: String,
    pub confidence_score: f64,
}

impl Contract for ConsistencyReport {
    fn shape() -> ShapeDescriptor {
        ShapeDescriptor::new()
            .required("is_consistent", FieldKind::Boolean)
            .required("explanation", FieldKind::String)
            .required("confidence_score", FieldKind::Number)
    }

    fn check(&self) -> Result<(), ContractError> {
        if !(0.0..=1.0).contains(&self.confidence_score) {
            return Err(ContractError::constraint(
                "confidence_score",
                format!("{} is outside 0..=1", self.confidence_score),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThumbnailAnalysis {
    pub title: String,
    pub image_summary: String,
    pub title_summary: String,
    pub consistency: ConsistencyReport,
}

impl ThumbnailAnalysis {
    pub fn to_text_report(&self) -> String {
        let verdict = if self.consistency.is_consistent {
            "Consistent"
        } else {
            "Inconsistent"
        };

        TextReport::new("Thumbnail Consistency Report")
            .field("Title", &self.title)
            .field("Verdict", verdict)
            .field(
                "Confidence",
                format!("{:.0}%", self.consistency.confidence_score * 100.0),
            )
            .gap()
            .section("Thumbnail Summary", &self.image_summary)
            .section("Title Summary", &self.title_summary)
            .section("Explanation", &self.consistency.explanation)
            .finish(THUMBNAIL_DISCLAIMER)
    }
}

#[derive(Debug, Clone)]
pub struct ThumbnailCheckTool {
    request: ThumbnailCheckRequest,
    options: RequestOptions,
}

impl ThumbnailCheckTool {
    pub fn new(request: ThumbnailCheckRequest) -> Self {
        Self {
            request,
            options: RequestOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    fn image_prompt(&self) -> Prompt {
        Prompt::new(
            "Describe the key visual elements, objects, and the overall theme or message \
conveyed by this thumbnail image. Respond with a concise JSON object: \
{\"image_summary\": \"<your description>\"}",
        )
        .with_image(self.request.thumbnail.clone())
    }

    fn title_prompt(&self) -> Prompt {
        Prompt::new(format!(
            "Analyze the following video title and describe the main topic, the promise it \
makes to the viewer, and the expected content.\n\
Title: \"{title}\"\n\
Respond with a concise JSON object: {{\"title_summary\": \"<your analysis>\"}}",
            title = self.request.title.trim(),
        ))
    }

    fn consistency_prompt(&self, image: &ImageSummary, title: &TitleSummary) -> Prompt {
        Prompt::new(format!(
            "You are checking whether a video thumbnail is consistent with its title.\n\
Thumbnail summary: {image}\n\
Title summary: {title}\n\n\
Decide whether the thumbnail accurately represents what the title promises.\n\
Respond with a JSON object with these keys:\n\
- \"is_consistent\": (boolean)\n\
- \"explanation\": (string) 2-3 sentences explaining your decision\n\
- \"confidence_score\": (number between 0 and 1)",
            image = image.image_summary,
            title = title.title_summary,
        ))
    }
}

impl Tool for ThumbnailCheckTool {
    type Output = ThumbnailAnalysis;

    fn kind(&self) -> &'static str {
        "thumbnail_check"
    }

    fn validate_input(&self) -> Result<(), String> {
        if self.request.thumbnail.is_empty() {
            return Err("a thumbnail image is required".to_string());
        }
        if self.request.title.trim().is_empty() {
            return Err("a video title is required".to_string());
        }
        Ok(())
    }

    fn run<'a>(
        &'a self,
        invocation: &'a mut Invocation,
    ) -> BoxFuture<'a, Result<Self::Output, OrchestrationFailure>> {
        Box::pin(async move {
            let request = completion(invocation, &self.options, self.image_prompt());
            let image: ImageSummary = invocation.complete_json("image_summary", request).await?;

            let request = completion(invocation, &self.options, self.title_prompt());
            let title: TitleSummary = invocation.complete_json("title_summary", request).await?;

            let request = completion(
                invocation,
                &self.options,
                self.consistency_prompt(&image, &title),
            );
            let consistency: ConsistencyReport =
                invocation.complete_json("consistency", request).await?;

            Ok(ThumbnailAnalysis {
                title: self.request.title.trim().to_string(),
                image_summary: image.image_summary,
                title_summary: title.title_summary,
                consistency,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use kcontract::{ContractErrorKind, parse_contract};

    use super::*;

    #[test]
    fn confidence_score_must_be_a_probability() {
        let error = parse_contract::<ConsistencyReport>(
            "{\"is_consistent\":true,\"explanation\":\"ok\",\"confidence_score\":1.5}",
        )
        .expect_err("score out of range");
        assert_eq!(error.kind, ContractErrorKind::Constraint);
        assert_eq!(error.field.as_deref(), Some("confidence_score"));
    }

    #[test]
    fn verdict_must_be_boolean() {
        let error = parse_contract::<ConsistencyReport>(
            "{\"is_consistent\":\"yes\",\"explanation\":\"ok\",\"confidence_score\":0.5}",
        )
        .expect_err("verdict is a string");
        assert_eq!(error.kind, ContractErrorKind::WrongType);
    }

    #[test]
    fn consistency_prompt_threads_both_summaries() {
        let tool = ThumbnailCheckTool::new(ThumbnailCheckRequest::new(
            ImageInput::url("https://example.com/thumb.jpg"),
            "Ten minute pasta",
        ));
        let prompt = tool.consistency_prompt(
            &ImageSummary {
                image_summary: "A bowl of pasta".to_string(),
            },
            &TitleSummary {
                title_summary: "Quick cooking tutorial".to_string(),
            },
        );
        assert!(prompt.text.contains("Thumbnail summary: A bowl of pasta"));
        assert!(prompt.text.contains("Title summary: Quick cooking tutorial"));
        assert!(!prompt.has_images());
    }

    #[test]
    fn blank_title_is_rejected() {
        let tool = ThumbnailCheckTool::new(ThumbnailCheckRequest::new(
            ImageInput::url("https://example.com/thumb.jpg"),
            "  ",
        ));
        assert!(tool.validate_input().is_err());
    }

    #[test]
    fn text_report_shows_verdict_and_percentage() {
        let analysis = ThumbnailAnalysis {
            title: "Ten minute pasta".to_string(),
            image_summary: "A bowl of pasta".to_string(),
            title_summary: "Quick cooking tutorial".to_string(),
            consistency: ConsistencyReport {
                is_consistent: true,
                explanation: "Both are about pasta.".to_string(),
                confidence_score: 0.85,
            },
        };
        let text = analysis.to_text_report();
        assert!(text.contains("Verdict: Consistent\n"));
        assert!(text.contains("Confidence: 85%\n"));
    }
}
