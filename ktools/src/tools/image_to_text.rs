use kcommon::{BoxFuture, RequestOptions};
use kcontract::{FieldKind, ShapeDescriptor};
use kengine::{Contract, Invocation, OrchestrationFailure, Tool};
use kprovider::{ImageInput, Prompt};
use serde::{Deserialize, Serialize};

use crate::common::{
    CONFIDENCE_LEVELS, Confidence, EXTRACTION_CONFIDENCE_LEVELS, ExtractionConfidence, TextReport,
    completion,
};
use crate::language::{is_auto_detect, language_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisDepth {
    #[default]
    Basic,
    Detailed,
}

impl AnalysisDepth {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Detailed => "detailed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageToTextRequest {
    pub image: ImageInput,
    pub depth: AnalysisDepth,
    /// Preferred language code, or `auto`.
    pub language: String,
}

impl ImageToTextRequest {
    pub fn new(image: ImageInput) -> Self {
        Self {
            image,
            depth: AnalysisDepth::Basic,
            language: "auto".to_string(),
        }
    }

    pub fn with_depth(mut self, depth: AnalysisDepth) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnalysis {
    pub word_count: u64,
    pub character_count: u64,
    #[serde(default)]
    pub language_detected: Option<String>,
    pub text_quality: Confidence,
    pub formatting_notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSegment {
    pub content: String,
    pub confidence: f64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub formatting: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageToTextReport {
    pub image_description: String,
    pub extracted_text: String,
    pub text_analysis: TextAnalysis,
    #[serde(default)]
    pub text_segments: Vec<TextSegment>,
    pub confidence: ExtractionConfidence,
    pub limitations: Vec<String>,
    pub disclaimer: String,
}

impl Contract for ImageToTextReport {
    fn shape() -> ShapeDescriptor {
        let text_analysis = ShapeDescriptor::new()
            .required("word_count", FieldKind::Number)
            .required("character_count", FieldKind::Number)
            .optional("language_detected", FieldKind::String)
            .required("text_quality", FieldKind::Enum(CONFIDENCE_LEVELS))
            .required("formatting_notes", FieldKind::array_of(FieldKind::String));
        let segment = ShapeDescriptor::new()
            .required("content", FieldKind::String)
            .required("confidence", FieldKind::Number)
            .optional("location", FieldKind::String)
            .optional("formatting", FieldKind::String);

        ShapeDescriptor::new()
            .required("image_description", FieldKind::String)
            .required("extracted_text", FieldKind::String)
            .required("text_analysis", FieldKind::Object(text_analysis))
            .optional("text_segments", FieldKind::array_of(FieldKind::Object(segment)))
            .required("confidence", FieldKind::Enum(EXTRACTION_CONFIDENCE_LEVELS))
            .required("limitations", FieldKind::array_of(FieldKind::String))
            .required("disclaimer", FieldKind::String)
    }
}

impl ImageToTextReport {
    pub fn to_text_report(&self) -> String {
        let analysis = &self.text_analysis;
        TextReport::new("Image to Text Report")
            .field("Confidence", self.confidence.as_str())
            .field("Word Count", analysis.word_count.to_string())
            .field("Character Count", analysis.character_count.to_string())
            .field(
                "Language Detected",
                analysis.language_detected.as_deref().unwrap_or("Not detected"),
            )
            .field("Text Quality", analysis.text_quality.as_str())
            .gap()
            .section("Image Description", &self.image_description)
            .section("Extracted Text", &self.extracted_text)
            .list("Formatting Notes", &analysis.formatting_notes)
            .list("Limitations", &self.limitations)
            .finish(&self.disclaimer)
    }
}

#[derive(Debug, Clone)]
pub struct ImageToTextTool {
    request: ImageToTextRequest,
    options: RequestOptions,
}

impl ImageToTextTool {
    pub fn new(request: ImageToTextRequest) -> Self {
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
        let language = if is_auto_detect(&self.request.language) {
            "Auto-detect"
        } else {
            language_name(&self.request.language).unwrap_or(self.request.language.trim())
        };

        Prompt::new(format!(
            "You are an AI assistant specialized in extracting and analyzing text from images.\n\
Analyze this image and extract all visible text content.\n\
Analysis type: {depth}\n\
Preferred language: {language}\n\n\
Please provide a comprehensive analysis including:\n\
1. Extract ALL visible text from the image accurately\n\
2. Describe the image content and context\n\
3. Analyze the extracted text quality and formatting\n\
4. Provide text statistics and language detection\n\
5. Note any limitations or challenges in text extraction\n\n\
Return the analysis in a JSON object with these keys:\n\
- \"image_description\": (string) Brief description of the image and its content\n\
- \"extracted_text\": (string) All text extracted from the image, preserving formatting where possible\n\
- \"text_analysis\": (object) {{\n\
    \"word_count\": (number) Number of words extracted,\n\
    \"character_count\": (number) Number of characters extracted,\n\
    \"language_detected\": (string) Detected language of the text,\n\
    \"text_quality\": (string, one of \"High\", \"Medium\", \"Low\") Quality of text extraction,\n\
    \"formatting_notes\": (array of strings) Notes about text formatting, layout, fonts, etc.\n\
  }}\n\
- \"confidence\": (string, one of \"High\", \"Medium\", \"Low\", \"Not Applicable\") Your confidence in text extraction accuracy\n\
- \"limitations\": (array of strings) Any factors that affected text extraction quality\n\
- \"disclaimer\": (string) Standard disclaimer about AI text extraction limitations",
            depth = self.request.depth.as_str(),
        ))
        .with_image(self.request.image.clone())
    }
}

impl Tool for ImageToTextTool {
    type Output = ImageToTextReport;

    fn kind(&self) -> &'static str {
        "image_to_text"
    }

    fn validate_input(&self) -> Result<(), String> {
        if self.request.image.is_empty() {
            return Err("an image is required for text extraction".to_string());
        }
        Ok(())
    }

    fn run<'a>(
        &'a self,
        invocation: &'a mut Invocation,
    ) -> BoxFuture<'a, Result<Self::Output, OrchestrationFailure>> {
        Box::pin(async move {
            let request = completion(invocation, &self.options, self.prompt());
            invocation.complete_json("extract_text", request).await
        })
    }
}

#[cfg(test)]
mod tests {
    use kcontract::{ContractErrorKind, parse_contract};

    use super::*;

    const REPORT: &str = r#"```json
{
  "image_description": "A street sign",
  "extracted_text": "MAIN ST",
  "text_analysis": {
    "word_count": 2,
    "character_count": 7,
    "language_detected": "English",
    "text_quality": "High",
    "formatting_notes": ["Uppercase"]
  },
  "confidence": "Not Applicable",
  "limitations": [],
  "disclaimer": "Extraction may be incomplete."
}
```"#;

    #[test]
    fn fenced_report_with_nested_analysis_parses() {
        let report = parse_contract::<ImageToTextReport>(REPORT).expect("report should parse");
        assert_eq!(report.text_analysis.word_count, 2);
        assert_eq!(report.confidence, ExtractionConfidence::NotApplicable);
        assert!(report.text_segments.is_empty());
    }

    #[test]
    fn nested_enum_violation_reports_its_path() {
        let payload = REPORT.replace("\"text_quality\": \"High\"", "\"text_quality\": \"Great\"");
        let error = parse_contract::<ImageToTextReport>(&payload).expect_err("bad quality");
        assert_eq!(error.kind, ContractErrorKind::UnknownVariant);
        assert_eq!(error.field.as_deref(), Some("text_analysis.text_quality"));
    }

    #[test]
    fn prompt_carries_depth_and_language() {
        let tool = ImageToTextTool::new(
            ImageToTextRequest::new(ImageInput::url("https://example.com/a.png"))
                .with_depth(AnalysisDepth::Detailed)
                .with_language("ja"),
        );
        let prompt = tool.prompt();
        assert!(prompt.text.contains("Analysis type: detailed"));
        assert!(prompt.text.contains("Preferred language: Japanese"));
        assert!(prompt.has_images());
    }

    #[test]
    fn text_report_has_statistics() {
        let report = parse_contract::<ImageToTextReport>(REPORT).expect("report should parse");
        let text = report.to_text_report();
        assert!(text.contains("Word Count: 2\n"));
        assert!(text.contains("Confidence: Not Applicable\n"));
        assert!(!text.contains("Limitations:"));
    }
}
