use kcommon::{BoxFuture, RequestOptions};
use kcontract::{FieldKind, ShapeDescriptor};
use kengine::{Contract, Invocation, OrchestrationFailure, Tool};
use kprovider::{ImageInput, Prompt};
use serde::{Deserialize, Serialize};

use crate::common::{CONFIDENCE_LEVELS, Confidence, TextReport, completion};
use crate::language::{is_auto_detect, language_name};

#[derive(Debug, Clone, PartialEq)]
pub enum TranslationInput {
    Text(String),
    /// Text is extracted from the image before translation.
    Image(ImageInput),
}

impl TranslationInput {
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRequest {
    pub input: TranslationInput,
    /// Language code, or `auto` to let the model detect it.
    pub source_language: String,
    pub target_language: String,
}

impl TranslationRequest {
    pub fn text(text: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            input: TranslationInput::Text(text.into()),
            source_language: "auto".to_string(),
            target_language: target_language.into(),
        }
    }

    pub fn image(image: ImageInput, target_language: impl Into<String>) -> Self {
        Self {
            input: TranslationInput::Image(image),
            source_language: "auto".to_string(),
            target_language: target_language.into(),
        }
    }

    pub fn from_language(mut self, source_language: impl Into<String>) -> Self {
        self.source_language = source_language.into();
        self
    }

    fn source_name(&self) -> &str {
        language_name(&self.source_language).unwrap_or(self.source_language.trim())
    }

    /// Catalog name of the target. Only reached after `check_languages`.
    fn target_name(&self) -> &str {
        language_name(&self.target_language).unwrap_or(self.target_language.trim())
    }

    fn check_languages(&self) -> Result<(), String> {
        if is_auto_detect(&self.target_language) || language_name(&self.target_language).is_none() {
            return Err(format!(
                "unsupported target language `{}`",
                self.target_language.trim()
            ));
        }
        if language_name(&self.source_language).is_none() {
            return Err(format!(
                "unsupported source language `{}`",
                self.source_language.trim()
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationReport {
    pub original_text: String,
    pub translated_text: String,
    #[serde(default)]
    pub source_language_detected: Option<String>,
    pub target_language: String,
    pub translation_confidence: Confidence,
    #[serde(default)]
    pub context_notes: Vec<String>,
    #[serde(default)]
    pub alternative_translations: Vec<String>,
    #[serde(default)]
    pub image_description: Option<String>,
    #[serde(default)]
    pub text_extraction_quality: Option<Confidence>,
    pub disclaimer: String,
}

impl Contract for TranslationReport {
    fn shape() -> ShapeDescriptor {
        ShapeDescriptor::new()
            .required("original_text", FieldKind::String)
            .required("translated_text", FieldKind::String)
            .optional("source_language_detected", FieldKind::String)
            .required("target_language", FieldKind::String)
            .required("translation_confidence", FieldKind::Enum(CONFIDENCE_LEVELS))
            .optional("context_notes", FieldKind::array_of(FieldKind::String))
            .optional("alternative_translations", FieldKind::array_of(FieldKind::String))
            .optional("image_description", FieldKind::String)
            .optional("text_extraction_quality", FieldKind::Enum(CONFIDENCE_LEVELS))
            .required("disclaimer", FieldKind::String)
    }
}

impl TranslationReport {
    pub fn to_text_report(&self) -> String {
        let input_type = if self.image_description.is_some() || self.text_extraction_quality.is_some()
        {
            "Image"
        } else {
            "Text"
        };

        let mut report = TextReport::new("AI Translator Report")
            .field("Input Type", input_type)
            .field(
                "Source Language",
                self.source_language_detected.as_deref().unwrap_or("Not detected"),
            )
            .field("Target Language", &self.target_language)
            .field("Translation Confidence", self.translation_confidence.as_str())
            .gap();

        if let Some(description) = &self.image_description {
            report = report.section("Image Description", description);
        }
        if let Some(quality) = self.text_extraction_quality {
            report = report.field("Text Extraction Quality", quality.as_str()).gap();
        }

        report
            .section("Original Text", &self.original_text)
            .section("Translated Text", &self.translated_text)
            .list("Context Notes", &self.context_notes)
            .list("Alternative Translations", &self.alternative_translations)
            .finish(&self.disclaimer)
    }
}

const COMMON_KEYS: &str = "- \"source_language_detected\": (string) The detected language of the original text\n\
- \"target_language\": (string) The target language name\n\
- \"translation_confidence\": (string, one of \"High\", \"Medium\", \"Low\") Your confidence in the translation accuracy\n\
- \"context_notes\": (array of strings) Any important context or cultural notes about the translation\n\
- \"alternative_translations\": (array of strings) Alternative ways to translate key phrases (max 3)\n";

#[derive(Debug, Clone)]
pub struct TranslationTool {
    request: TranslationRequest,
    options: RequestOptions,
}

impl TranslationTool {
    pub fn new(request: TranslationRequest) -> Self {
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
        let source = self.request.source_name();
        let target = self.request.target_name();

        match &self.request.input {
            TranslationInput::Image(image) => Prompt::new(format!(
                "You are an AI assistant specialized in text extraction and translation.\n\
First, extract all visible text from this image accurately.\n\
Then, translate the extracted text from {source} to {target}.\n\n\
Provide your analysis in a JSON object with these keys:\n\
- \"original_text\": (string) All text extracted from the image\n\
- \"translated_text\": (string) The translation of the extracted text\n\
{COMMON_KEYS}\
- \"image_description\": (string) Brief description of the image content\n\
- \"text_extraction_quality\": (string, one of \"High\", \"Medium\", \"Low\") Quality of text extraction from the image\n\
- \"disclaimer\": (string) Standard disclaimer about AI translation limitations"
            ))
            .with_image(image.clone()),
            TranslationInput::Text(text) => Prompt::new(format!(
                "You are an AI assistant specialized in translation.\n\
Translate the following text from {source} to {target}:\n\
\"{text}\"\n\n\
Provide your analysis in a JSON object with these keys:\n\
- \"original_text\": (string) The original text provided\n\
- \"translated_text\": (string) The translation of the text\n\
{COMMON_KEYS}\
- \"disclaimer\": (string) Standard disclaimer about AI translation limitations"
            )),
        }
    }
}

impl Tool for TranslationTool {
    type Output = TranslationReport;

    fn kind(&self) -> &'static str {
        "translation"
    }

    fn validate_input(&self) -> Result<(), String> {
        match &self.request.input {
            TranslationInput::Text(text) if text.trim().is_empty() => {
                Err("no text provided for translation".to_string())
            }
            TranslationInput::Image(image) if image.is_empty() => {
                Err("no image provided for translation".to_string())
            }
            _ => self.request.check_languages(),
        }
    }

    fn run<'a>(
        &'a self,
        invocation: &'a mut Invocation,
    ) -> BoxFuture<'a, Result<Self::Output, OrchestrationFailure>> {
        Box::pin(async move {
            let request = completion(invocation, &self.options, self.prompt());
            invocation.complete_json("translate", request).await
        })
    }
}
