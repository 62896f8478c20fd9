//! Food ingredient safety review from a label photo, a dish photo, or a pasted list.

use kcommon::{BoxFuture, RequestOptions};
use kcontract::{FieldKind, ShapeDescriptor};
use kengine::{Contract, Invocation, OrchestrationFailure, Tool};
use kprovider::Prompt;
use serde::{Deserialize, Serialize};

use crate::common::{
    AnalysisInput, EXTRACTION_CONFIDENCE_LEVELS, ExtractionConfidence, TextReport, completion,
    or_placeholder,
};

const INGREDIENT_RATINGS: &[&str] = &["Safe", "Caution", "Warning", "Unknown"];
const OVERALL_RATINGS: &[&str] = &["Safe", "Moderate Concern", "High Concern", "Insufficient Data"];
const INGREDIENT_SOURCES: &[&str] = &[
    "visible",
    "typical_recipe",
    "likely_additive",
    "provided",
    "uncertain",
    "unknown",
];
const ANALYSIS_TYPES: &[&str] = &[
    "ingredients_label",
    "food_item",
    "raw_ingredients",
    "text_input",
    "unknown",
];

#[derive(Debug, Clone, PartialEq)]
pub struct IngredientsRequest {
    pub input: AnalysisInput,
    pub manufacturer: Option<String>,
}

impl IngredientsRequest {
    pub fn new(input: impl Into<AnalysisInput>) -> Self {
        Self {
            input: input.into(),
            manufacturer: None,
        }
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafetyRating {
    Safe,
    Caution,
    Warning,
    Unknown,
}

impl SafetyRating {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "Safe",
            Self::Caution => "Caution",
            Self::Warning => "Warning",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallSafety {
    Safe,
    #[serde(rename = "Moderate Concern")]
    ModerateConcern,
    #[serde(rename = "High Concern")]
    HighConcern,
    #[serde(rename = "Insufficient Data")]
    InsufficientData,
}

impl OverallSafety {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "Safe",
            Self::ModerateConcern => "Moderate Concern",
            Self::HighConcern => "High Concern",
            Self::InsufficientData => "Insufficient Data",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub description: String,
    pub safety_rating: SafetyRating,
    #[serde(default)]
    pub common_uses: Vec<String>,
    #[serde(default)]
    pub potential_concerns: Vec<String>,
    #[serde(default)]
    pub alternatives: Vec<String>,
    /// Where the ingredient came from: `visible`, `typical_recipe`, `provided`, ...
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub confidence_note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallAssessment {
    pub safety_rating: OverallSafety,
    pub summary: String,
    pub key_concerns: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietaryFlags {
    #[serde(default)]
    pub vegan: Option<bool>,
    #[serde(default)]
    pub vegetarian: Option<bool>,
    #[serde(default)]
    pub gluten_free: Option<bool>,
    #[serde(default)]
    pub common_allergens: Vec<String>,
    #[serde(default)]
    pub reliability_note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientsReport {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub analysis_type: Option<String>,
    pub ingredients_list: Vec<Ingredient>,
    pub overall_assessment: OverallAssessment,
    #[serde(default)]
    pub dietary_flags: Option<DietaryFlags>,
    #[serde(default)]
    pub analysis_limitations: Vec<String>,
    pub confidence: ExtractionConfidence,
    pub disclaimer: String,
}

impl Contract for IngredientsReport {
    fn shape() -> ShapeDescriptor {
        let ingredient = ShapeDescriptor::new()
            .required("name", FieldKind::String)
            .required("description", FieldKind::String)
            .required("safety_rating", FieldKind::Enum(INGREDIENT_RATINGS))
            .optional("common_uses", FieldKind::array_of(FieldKind::String))
            .optional("potential_concerns", FieldKind::array_of(FieldKind::String))
            .optional("alternatives", FieldKind::array_of(FieldKind::String))
            .optional("source", FieldKind::Enum(INGREDIENT_SOURCES))
            .optional("confidence_note", FieldKind::String);
        let overall = ShapeDescriptor::new()
            .required("safety_rating", FieldKind::Enum(OVERALL_RATINGS))
            .required("summary", FieldKind::String)
            .required("key_concerns", FieldKind::array_of(FieldKind::String))
            .required("recommendations", FieldKind::array_of(FieldKind::String));
        let flags = ShapeDescriptor::new()
            .optional("vegan", FieldKind::Boolean)
            .optional("vegetarian", FieldKind::Boolean)
            .optional("gluten_free", FieldKind::Boolean)
            .optional("common_allergens", FieldKind::array_of(FieldKind::String))
            .optional("reliability_note", FieldKind::String);

        ShapeDescriptor::new()
            .optional("product_name", FieldKind::String)
            .optional("manufacturer", FieldKind::String)
            .optional("analysis_type", FieldKind::Enum(ANALYSIS_TYPES))
            .required("ingredients_list", FieldKind::array_of(FieldKind::Object(ingredient)))
            .required("overall_assessment", FieldKind::Object(overall))
            .optional("dietary_flags", FieldKind::Object(flags))
            .optional("analysis_limitations", FieldKind::array_of(FieldKind::String))
            .required("confidence", FieldKind::Enum(EXTRACTION_CONFIDENCE_LEVELS))
            .required("disclaimer", FieldKind::String)
    }
}

fn flag(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "Yes",
        Some(false) => "No",
        None => "Unknown",
    }
}

impl IngredientsReport {
    pub fn to_text_report(&self) -> String {
        let overall = &self.overall_assessment;
        let ingredients: Vec<String> = self
            .ingredients_list
            .iter()
            .map(|ingredient| {
                format!(
                    "{} [{}]: {}",
                    ingredient.name,
                    ingredient.safety_rating.as_str(),
                    ingredient.description
                )
            })
            .collect();

        let mut report = TextReport::new("Ingredients Report")
            .field(
                "Product",
                or_placeholder(self.product_name.as_deref(), "Not identified"),
            )
            .field(
                "Manufacturer",
                or_placeholder(self.manufacturer.as_deref(), "Not specified"),
            )
            .field("Overall Safety", overall.safety_rating.as_str())
            .field("Confidence", self.confidence.as_str())
            .gap()
            .section("Summary", &overall.summary)
            .list("Ingredients", &ingredients)
            .list("Key Concerns", &overall.key_concerns)
            .list("Recommendations", &overall.recommendations);

        if let Some(flags) = &self.dietary_flags {
            report = report
                .field("Vegan", flag(flags.vegan))
                .field("Vegetarian", flag(flags.vegetarian))
                .field("Gluten Free", flag(flags.gluten_free))
                .gap()
                .list("Common Allergens", &flags.common_allergens);
        }

        report
            .list("Analysis Limitations", &self.analysis_limitations)
            .finish(&self.disclaimer)
    }
}

const REPORT_KEYS: &str = "- \"product_name\": (string or null)\n\
- \"manufacturer\": (string or null)\n\
- \"analysis_type\": (string, one of \"ingredients_label\", \"food_item\", \"raw_ingredients\", \"text_input\")\n\
- \"ingredients_list\": (array of objects) each with \"name\", \"description\", \"safety_rating\" (one of \"Safe\", \"Caution\", \"Warning\", \"Unknown\"), \"common_uses\", \"potential_concerns\", \"alternatives\" (arrays of strings), \"source\" (one of \"visible\", \"typical_recipe\", \"likely_additive\", \"provided\", \"uncertain\") and \"confidence_note\"\n\
- \"overall_assessment\": (object) with \"safety_rating\" (one of \"Safe\", \"Moderate Concern\", \"High Concern\", \"Insufficient Data\"), \"summary\", \"key_concerns\" and \"recommendations\"\n\
- \"dietary_flags\": (object) with \"vegan\", \"vegetarian\", \"gluten_free\" (booleans), \"common_allergens\" (array of strings) and \"reliability_note\"\n\
- \"analysis_limitations\": (array of strings)\n\
- \"confidence\": (string, one of \"High\", \"Medium\", \"Low\", \"Not Applicable\")\n\
- \"disclaimer\": (string)";

#[derive(Debug, Clone)]
pub struct IngredientsCheckerTool {
    request: IngredientsRequest,
    options: RequestOptions,
}

impl IngredientsCheckerTool {
    pub fn new(request: IngredientsRequest) -> Self {
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
        let manufacturer = match self.request.manufacturer.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => format!("Manufacturer: {name}\n"),
            _ => String::new(),
        };

        match &self.request.input {
            AnalysisInput::Image(image) => Prompt::new(format!(
                "You are an AI assistant specialized in analyzing food ingredients. \
You must be EXTREMELY CAREFUL and HONEST about your limitations.\n\
Analyze this image, which may be an ingredients label, a prepared food item, or raw ingredients.\n\
{manufacturer}\n\
If this is an ingredients label, extract and analyze the listed ingredients accurately.\n\
If this is an actual food item, only identify ingredients you can clearly see and are certain about. \
Recipes vary between cultures, so do not guess ingredients from appearance alone and set \
confidence to \"Low\" unless you are certain.\n\n\
Return ONLY a JSON object with these keys:\n{REPORT_KEYS}"
            ))
            .with_image(image.clone()),
            AnalysisInput::Text(text) => Prompt::new(format!(
                "You are an AI assistant specialized in analyzing food ingredients.\n\
Analyze these ingredients: \"{text}\"\n\
{manufacturer}\n\
Provide a safety assessment for each ingredient, an overall evaluation, dietary \
considerations and potential allergens. Use \"text_input\" as the analysis_type and \
\"provided\" as each ingredient's source.\n\n\
Return ONLY a JSON object with these keys:\n{REPORT_KEYS}"
            )),
        }
    }
}

impl Tool for IngredientsCheckerTool {
    type Output = IngredientsReport;

    fn kind(&self) -> &'static str {
        "ingredients_checker"
    }

    fn validate_input(&self) -> Result<(), String> {
        self.request.input.ensure_present("ingredient analysis")
    }

    fn run<'a>(
        &'a self,
        invocation: &'a mut Invocation,
    ) -> BoxFuture<'a, Result<Self::Output, OrchestrationFailure>> {
        Box::pin(async move {
            let request = completion(invocation, &self.options, self.prompt());
            invocation.complete_json("analyse_ingredients", request).await
        })
    }
}

#[cfg(test)]
mod tests {
    use kcontract::{ContractErrorKind, parse_contract};
    use kprovider::ImageInput;

    use super::*;

    const REPORT: &str = r#"```json
{
  "product_name": "Oat Crunch",
  "manufacturer": null,
  "analysis_type": "ingredients_label",
  "ingredients_list": [
    {
      "name": "Rolled oats",
      "description": "Whole grain oats",
      "safety_rating": "Safe",
      "common_uses": ["Cereal"],
      "potential_concerns": [],
      "alternatives": [],
      "source": "visible",
      "confidence_note": "Printed on the label"
    },
    {
      "name": "BHT",
      "description": "Synthetic antioxidant",
      "safety_rating": "Caution",
      "source": "likely_additive"
    }
  ],
  "overall_assessment": {
    "safety_rating": "Moderate Concern",
    "summary": "Mostly whole foods with one preservative.",
    "key_concerns": ["Contains BHT"],
    "recommendations": ["Look for a preservative-free variant"]
  },
  "dietary_flags": {
    "vegan": true,
    "vegetarian": true,
    "gluten_free": false,
    "common_allergens": ["Oats (possible gluten cross-contact)"]
  },
  "analysis_limitations": ["Label partially obscured"],
  "confidence": "Medium",
  "disclaimer": "Not a substitute for professional dietary advice."
}
```"#;

    #[test]
    fn label_report_parses_with_nested_ratings() {
        let report = parse_contract::<IngredientsReport>(REPORT).expect("report should parse");
        assert_eq!(report.ingredients_list.len(), 2);
        assert_eq!(report.ingredients_list[1].safety_rating, SafetyRating::Caution);
        assert_eq!(
            report.overall_assessment.safety_rating,
            OverallSafety::ModerateConcern
        );
        assert_eq!(report.dietary_flags.as_ref().and_then(|f| f.gluten_free), Some(false));
    }

    #[test]
    fn unknown_ingredient_rating_is_rejected_at_its_path() {
        let payload = REPORT.replace("\"safety_rating\": \"Caution\"", "\"safety_rating\": \"Risky\"");
        let error = parse_contract::<IngredientsReport>(&payload).expect_err("bad rating");
        assert_eq!(error.kind, ContractErrorKind::UnknownVariant);
        assert_eq!(
            error.field.as_deref(),
            Some("ingredients_list[1].safety_rating")
        );
    }

    #[test]
    fn overall_rating_outside_the_scale_is_rejected() {
        let payload = REPORT.replace("\"Moderate Concern\"", "\"Fine\"");
        let error = parse_contract::<IngredientsReport>(&payload).expect_err("bad overall");
        assert_eq!(error.kind, ContractErrorKind::UnknownVariant);
    }

    #[test]
    fn prompts_differ_by_input_and_carry_the_manufacturer() {
        let tool = IngredientsCheckerTool::new(
            IngredientsRequest::new(ImageInput::url("https://example.com/label.png"))
                .with_manufacturer("Acme Foods"),
        );
        let prompt = tool.prompt();
        assert!(prompt.has_images());
        assert!(prompt.text.contains("Manufacturer: Acme Foods"));

        let tool = IngredientsCheckerTool::new(IngredientsRequest::new(AnalysisInput::text(
            "water, sugar",
        )));
        let prompt = tool.prompt();
        assert!(!prompt.has_images());
        assert!(prompt.text.contains("\"water, sugar\""));
        assert!(!prompt.text.contains("Manufacturer:"));
    }

    #[test]
    fn blank_text_is_rejected() {
        let tool = IngredientsCheckerTool::new(IngredientsRequest::new(AnalysisInput::text(" ")));
        assert!(tool.validate_input().is_err());
    }

    #[test]
    fn text_report_lists_ingredients_and_flags() {
        let report = parse_contract::<IngredientsReport>(REPORT).expect("report should parse");
        let text = report.to_text_report();
        assert!(text.contains("Manufacturer: Not specified\n"));
        assert!(text.contains("- BHT [Caution]: Synthetic antioxidant\n"));
        assert!(text.contains("Gluten Free: No\n"));
    }
}
