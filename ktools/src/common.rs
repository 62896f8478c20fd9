use kcommon::RequestOptions;
use kengine::Invocation;
use kprovider::{CompletionRequest, ImageInput, Prompt};
use serde::{Deserialize, Serialize};

pub(crate) const JSON_ONLY_SYSTEM: &str =
    "Respond with a single JSON object only. Do not add commentary before or after it.";

pub(crate) const CONFIDENCE_LEVELS: &[&str] = &["High", "Medium", "Low"];

pub(crate) const EXTRACTION_CONFIDENCE_LEVELS: &[&str] = &["High", "Medium", "Low", "Not Applicable"];

/// Three-level confidence the model attaches to a judgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// Confidence that may not apply, e.g. an image with no text in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionConfidence {
    High,
    Medium,
    Low,
    #[serde(rename = "Not Applicable")]
    NotApplicable,
}

impl ExtractionConfidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::NotApplicable => "Not Applicable",
        }
    }
}

/// Content submitted for analysis: a picture, or text pasted by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisInput {
    Image(ImageInput),
    Text(String),
}

impl AnalysisInput {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image(_))
    }

    pub(crate) fn ensure_present(&self, purpose: &str) -> Result<(), String> {
        match self {
            Self::Image(image) if image.is_empty() => {
                Err(format!("an image is required for {purpose}"))
            }
            Self::Text(text) if text.trim().is_empty() => {
                Err(format!("text is required for {purpose}"))
            }
            _ => Ok(()),
        }
    }
}

impl From<ImageInput> for AnalysisInput {
    fn from(image: ImageInput) -> Self {
        Self::Image(image)
    }
}

/// Builds a completion request for the current attempt, applying caller options.
pub(crate) fn completion(
    invocation: &Invocation,
    options: &RequestOptions,
    prompt: Prompt,
) -> CompletionRequest {
    text_completion(invocation, options, prompt).with_system(JSON_ONLY_SYSTEM)
}

/// Free-text variant of [`completion`] for steps whose answer is only context.
pub(crate) fn text_completion(
    invocation: &Invocation,
    options: &RequestOptions,
    prompt: Prompt,
) -> CompletionRequest {
    let mut request = CompletionRequest::new(invocation.model_for(options.model.as_deref()), prompt);
    if let Some(temperature) = options.temperature {
        request = request.with_temperature(temperature);
    }
    if let Some(max_tokens) = options.max_tokens {
        request = request.with_max_tokens(max_tokens);
    }
    request
}

pub(crate) fn or_placeholder<'a>(value: Option<&'a str>, placeholder: &'a str) -> &'a str {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(placeholder)
}

/// Plain-text report with a title banner and underlined sections.
pub(crate) struct TextReport {
    out: String,
}

impl TextReport {
    pub(crate) fn new(title: &str) -> Self {
        let banner = format!("KLUTZ {title}");
        let mut out = String::new();
        out.push_str(&banner);
        out.push('\n');
        out.push_str(&"=".repeat(banner.chars().count()));
        out.push_str("\n\n");
        Self { out }
    }

    pub(crate) fn field(mut self, label: &str, value: impl AsRef<str>) -> Self {
        self.out.push_str(label);
        self.out.push_str(": ");
        self.out.push_str(value.as_ref());
        self.out.push('\n');
        self
    }

    pub(crate) fn gap(mut self) -> Self {
        self.out.push('\n');
        self
    }

    pub(crate) fn section(mut self, heading: &str, body: impl AsRef<str>) -> Self {
        self.heading(heading);
        self.out.push_str(body.as_ref());
        self.out.push_str("\n\n");
        self
    }

    /// Bulleted section; skipped entirely when `items` is empty.
    pub(crate) fn list(mut self, heading: &str, items: &[String]) -> Self {
        if items.is_empty() {
            return self;
        }
        self.heading(heading);
        for item in items {
            self.out.push_str("- ");
            self.out.push_str(item);
            self.out.push('\n');
        }
        self.out.push('\n');
        self
    }

    pub(crate) fn finish(self, disclaimer: &str) -> String {
        let mut out = self.out;
        out.push_str("Disclaimer: ");
        out.push_str(disclaimer);
        out.push('\n');
        out
    }

    fn heading(&mut self, heading: &str) {
        self.out.push_str(heading);
        self.out.push_str(":\n");
        self.out.push_str(&"-".repeat(heading.chars().count() + 1));
        self.out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_report_layout() {
        let text = TextReport::new("Demo Report")
            .field("Input Type", "Text")
            .gap()
            .section("Summary", "all good")
            .list("Notes", &["one".to_string(), "two".to_string()])
            .list("Empty", &[])
            .finish("Informational only.");

        assert_eq!(
            text,
            "KLUTZ Demo Report\n=================\n\nInput Type: Text\n\nSummary:\n--------\nall good\n\nNotes:\n------\n- one\n- two\n\nDisclaimer: Informational only.\n"
        );
    }

    #[test]
    fn placeholder_applies_to_blank_values() {
        assert_eq!(or_placeholder(None, "Not specified"), "Not specified");
        assert_eq!(or_placeholder(Some("  "), "Not specified"), "Not specified");
        assert_eq!(or_placeholder(Some(" retro "), "Not specified"), "retro");
    }

    #[test]
    fn blank_analysis_input_is_rejected() {
        assert_eq!(
            AnalysisInput::text("  ").ensure_present("solving"),
            Err("text is required for solving".to_string())
        );
        assert!(AnalysisInput::text("2 + 2").ensure_present("solving").is_ok());
        let image = AnalysisInput::from(ImageInput::url("https://example.com/a.png"));
        assert!(image.is_image());
        assert!(image.ensure_present("solving").is_ok());
    }

    #[test]
    fn confidence_literals_match_declared_sets() {
        for (literal, level) in CONFIDENCE_LEVELS
            .iter()
            .zip([Confidence::High, Confidence::Medium, Confidence::Low])
        {
            assert_eq!(*literal, level.as_str());
        }
        assert_eq!(
            serde_json::from_str::<ExtractionConfidence>("\"Not Applicable\"")
                .expect("literal should parse"),
            ExtractionConfidence::NotApplicable
        );
        assert_eq!(EXTRACTION_CONFIDENCE_LEVELS.len(), 4);
    }
}
