//! Photo-based fault diagnosis for vehicles and household devices.
//!
//! Both tools send one photo with the reported symptom and get back a list of
//! likely causes and fixes. The vehicle report adds a severity grade and
//! maintenance tips.

use kcommon::{BoxFuture, RequestOptions};
use kcontract::{FieldKind, ShapeDescriptor};
use kengine::{Contract, Invocation, OrchestrationFailure, Tool};
use kprovider::{ImageInput, Prompt};
use serde::{Deserialize, Serialize};

use crate::common::{
    EXTRACTION_CONFIDENCE_LEVELS, ExtractionConfidence, TextReport, completion, or_placeholder,
};

const SEVERITY_LEVELS: &[&str] = &["Minor", "Moderate", "Severe", "Critical"];

#[derive(Debug, Clone, PartialEq)]
pub struct TroubleshootRequest {
    pub image: ImageInput,
    /// What is being diagnosed, e.g. `car`, `motorcycle`, `washing machine`.
    pub subject_type: String,
    pub issue: String,
    /// Make, model, year or mileage. Only used by the vehicle tool.
    pub subject_info: Option<String>,
    pub details: Option<String>,
}

impl TroubleshootRequest {
    pub fn new(
        image: ImageInput,
        subject_type: impl Into<String>,
        issue: impl Into<String>,
    ) -> Self {
        Self {
            image,
            subject_type: subject_type.into(),
            issue: issue.into(),
            subject_info: None,
            details: None,
        }
    }

    pub fn with_subject_info(mut self, info: impl Into<String>) -> Self {
        self.subject_info = Some(info.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    fn validate(&self) -> Result<(), String> {
        if self.image.is_empty() {
            return Err("a photo of the problem is required".to_string());
        }
        if self.subject_type.trim().is_empty() {
            return Err("the type of item must be specified".to_string());
        }
        if self.issue.trim().is_empty() {
            return Err("describe the issue to diagnose".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Minor,
    Moderate,
    Severe,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minor => "Minor",
            Self::Moderate => "Moderate",
            Self::Severe => "Severe",
            Self::Critical => "Critical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleReport {
    pub image_description: String,
    pub vehicle_type: String,
    pub identified_issues: Vec<String>,
    pub possible_causes: Vec<String>,
    pub recommended_solutions: Vec<String>,
    #[serde(default)]
    pub safety_warnings: Vec<String>,
    #[serde(default)]
    pub maintenance_tips: Vec<String>,
    pub estimated_severity: Severity,
    pub confidence: ExtractionConfidence,
    pub disclaimer: String,
}

fn diagnosis_shape() -> ShapeDescriptor {
    ShapeDescriptor::new()
        .required("image_description", FieldKind::String)
        .required("identified_issues", FieldKind::array_of(FieldKind::String))
        .required("possible_causes", FieldKind::array_of(FieldKind::String))
        .required("recommended_solutions", FieldKind::array_of(FieldKind::String))
        .optional("safety_warnings", FieldKind::array_of(FieldKind::String))
        .required("confidence", FieldKind::Enum(EXTRACTION_CONFIDENCE_LEVELS))
        .required("disclaimer", FieldKind::String)
}

impl Contract for VehicleReport {
    fn shape() -> ShapeDescriptor {
        diagnosis_shape()
            .required("vehicle_type", FieldKind::String)
            .optional("maintenance_tips", FieldKind::array_of(FieldKind::String))
            .required("estimated_severity", FieldKind::Enum(SEVERITY_LEVELS))
    }
}

impl VehicleReport {
    pub fn to_text_report(&self) -> String {
        TextReport::new("Vehicle Troubleshooting Report")
            .field("Vehicle Type", &self.vehicle_type)
            .field("Estimated Severity", self.estimated_severity.as_str())
            .field("Confidence", self.confidence.as_str())
            .gap()
            .section("Image Description", &self.image_description)
            .list("Identified Issues", &self.identified_issues)
            .list("Possible Causes", &self.possible_causes)
            .list("Recommended Solutions", &self.recommended_solutions)
            .list("Safety Warnings", &self.safety_warnings)
            .list("Maintenance Tips", &self.maintenance_tips)
            .finish(&self.disclaimer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplianceReport {
    pub image_description: String,
    pub device_type: String,
    pub identified_issues: Vec<String>,
    pub possible_causes: Vec<String>,
    pub recommended_solutions: Vec<String>,
    #[serde(default)]
    pub safety_warnings: Vec<String>,
    pub confidence: ExtractionConfidence,
    pub disclaimer: String,
}

impl Contract for ApplianceReport {
    fn shape() -> ShapeDescriptor {
        diagnosis_shape().required("device_type", FieldKind::String)
    }
}

impl ApplianceReport {
    pub fn to_text_report(&self) -> String {
        TextReport::new("Appliance Troubleshooting Report")
            .field("Device Type", &self.device_type)
            .field("Confidence", self.confidence.as_str())
            .gap()
            .section("Image Description", &self.image_description)
            .list("Identified Issues", &self.identified_issues)
            .list("Possible Causes", &self.possible_causes)
            .list("Recommended Solutions", &self.recommended_solutions)
            .list("Safety Warnings", &self.safety_warnings)
            .finish(&self.disclaimer)
    }
}

const DIAGNOSIS_KEYS: &str = "- \"image_description\": (string) Detailed description of what you see in the image\n\
- \"identified_issues\": (array of strings) List of visible problems or symptoms\n\
- \"possible_causes\": (array of strings) Potential causes of the malfunction\n\
- \"recommended_solutions\": (array of strings) Step-by-step troubleshooting or repair suggestions\n\
- \"safety_warnings\": (array of strings) Any safety concerns or precautions\n\
- \"confidence\": (string, one of \"High\", \"Medium\", \"Low\", \"Not Applicable\") Your confidence in this assessment\n";

#[derive(Debug, Clone)]
pub struct VehicleTroubleshooterTool {
    request: TroubleshootRequest,
    options: RequestOptions,
}

impl VehicleTroubleshooterTool {
    pub fn new(request: TroubleshootRequest) -> Self {
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
        let request = &self.request;
        Prompt::new(format!(
            "You are an AI assistant specialized in diagnosing vehicle issues.\n\
Analyze this image of a {vehicle} with the following reported issue: \"{issue}\"\n\
Vehicle information: \"{info}\"\n\
Additional context: \"{details}\"\n\n\
Cover a visual inspection of the part, visible damage, likely causes, repair steps, \
safety considerations and maintenance recommendations.\n\n\
Return the analysis in a JSON object with these keys:\n\
{DIAGNOSIS_KEYS}\
- \"vehicle_type\": (string) Confirmed vehicle type based on the image\n\
- \"maintenance_tips\": (array of strings) Preventive maintenance recommendations\n\
- \"estimated_severity\": (string, one of \"Minor\", \"Moderate\", \"Severe\", \"Critical\") Assessment of issue severity\n\
- \"disclaimer\": (string) Standard disclaimer about AI limitations and professional mechanic consultation",
            vehicle = request.subject_type.trim(),
            issue = request.issue.trim(),
            info = or_placeholder(request.subject_info.as_deref(), "Not provided"),
            details = or_placeholder(request.details.as_deref(), "None provided"),
        ))
        .with_image(request.image.clone())
    }
}

impl Tool for VehicleTroubleshooterTool {
    type Output = VehicleReport;

    fn kind(&self) -> &'static str {
        "vehicle_troubleshooter"
    }

    fn validate_input(&self) -> Result<(), String> {
        self.request.validate()
    }

    fn run<'a>(
        &'a self,
        invocation: &'a mut Invocation,
    ) -> BoxFuture<'a, Result<Self::Output, OrchestrationFailure>> {
        Box::pin(async move {
            let request = completion(invocation, &self.options, self.prompt());
            invocation.complete_json("diagnose_vehicle", request).await
        })
    }
}

#[derive(Debug, Clone)]
pub struct ApplianceTroubleshooterTool {
    request: TroubleshootRequest,
    options: RequestOptions,
}

impl ApplianceTroubleshooterTool {
    pub fn new(request: TroubleshootRequest) -> Self {
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
        let request = &self.request;
        Prompt::new(format!(
            "You are an AI assistant specialized in diagnosing electronic device issues.\n\
Analyze this image of a {device} with the following reported issue: \"{issue}\"\n\
Additional context provided: \"{details}\"\n\n\
Cover a visual inspection of the device, visible damage, likely causes, \
troubleshooting steps and any safety considerations.\n\n\
Return the analysis in a JSON object with these keys:\n\
{DIAGNOSIS_KEYS}\
- \"device_type\": (string) Confirmed device type based on the image\n\
- \"disclaimer\": (string) Standard disclaimer about AI limitations and professional repair advice",
            device = request.subject_type.trim(),
            issue = request.issue.trim(),
            details = or_placeholder(request.details.as_deref(), "None provided"),
        ))
        .with_image(request.image.clone())
    }
}

impl Tool for ApplianceTroubleshooterTool {
    type Output = ApplianceReport;

    fn kind(&self) -> &'static str {
        "appliance_troubleshooter"
    }

    fn validate_input(&self) -> Result<(), String> {
        self.request.validate()
    }

    fn run<'a>(
        &'a self,
        invocation: &'a mut Invocation,
    ) -> BoxFuture<'a, Result<Self::Output, OrchestrationFailure>> {
        Box::pin(async move {
            let request = completion(invocation, &self.options, self.prompt());
            invocation.complete_json("diagnose_appliance", request).await
        })
    }
}

#[cfg(test)]
mod tests {
    use kcontract::{ContractErrorKind, parse_contract};

    use super::*;

    const VEHICLE: &str = r#"{
  "image_description": "Front brake disc with deep scoring",
  "vehicle_type": "car",
  "identified_issues": ["Scored brake disc"],
  "possible_causes": ["Worn pads"],
  "recommended_solutions": ["Replace pads and skim or replace the disc"],
  "safety_warnings": ["Do not drive until inspected"],
  "estimated_severity": "Severe",
  "confidence": "Medium",
  "disclaimer": "Consult a qualified mechanic."
}"#;

    const APPLIANCE: &str = r#"```json
{
  "image_description": "Washing machine door seal with mould",
  "device_type": "washing machine",
  "identified_issues": ["Mould on door gasket"],
  "possible_causes": ["Door kept closed between washes"],
  "recommended_solutions": ["Clean the gasket", "Leave the door ajar"],
  "confidence": "High",
  "disclaimer": "Consult a repair technician."
}
```"#;

    fn photo() -> ImageInput {
        ImageInput::url("https://example.com/fault.jpg")
    }

    #[test]
    fn vehicle_report_parses_with_severity() {
        let report = parse_contract::<VehicleReport>(VEHICLE).expect("report should parse");
        assert_eq!(report.estimated_severity, Severity::Severe);
        assert!(report.maintenance_tips.is_empty());
    }

    #[test]
    fn unknown_severity_is_rejected() {
        let payload = VEHICLE.replace("\"Severe\"", "\"Catastrophic\"");
        let error = parse_contract::<VehicleReport>(&payload).expect_err("bad severity");
        assert_eq!(error.kind, ContractErrorKind::UnknownVariant);
        assert_eq!(error.field.as_deref(), Some("estimated_severity"));
    }

    #[test]
    fn appliance_report_needs_device_type() {
        let report = parse_contract::<ApplianceReport>(APPLIANCE).expect("report should parse");
        assert_eq!(report.recommended_solutions.len(), 2);

        let payload = APPLIANCE.replace("\"device_type\": \"washing machine\",", "");
        let error = parse_contract::<ApplianceReport>(&payload).expect_err("missing device");
        assert_eq!(error.kind, ContractErrorKind::MissingField);
        assert_eq!(error.field.as_deref(), Some("device_type"));
    }

    #[test]
    fn prompts_fill_placeholders_for_missing_context() {
        let request = TroubleshootRequest::new(photo(), "car", "squealing brakes");
        let prompt = VehicleTroubleshooterTool::new(request.clone()).prompt();
        assert!(prompt.has_images());
        assert!(
            prompt
                .text
                .contains("image of a car with the following reported issue: \"squealing brakes\"")
        );
        assert!(prompt.text.contains("Vehicle information: \"Not provided\""));
        assert!(prompt.text.contains("estimated_severity"));

        let prompt =
            ApplianceTroubleshooterTool::new(request.with_details("only when cold")).prompt();
        assert!(prompt.text.contains("Additional context provided: \"only when cold\""));
        assert!(!prompt.text.contains("estimated_severity"));
    }

    #[test]
    fn issue_and_type_are_required() {
        let tool =
            ApplianceTroubleshooterTool::new(TroubleshootRequest::new(photo(), "kettle", ""));
        assert!(tool.validate_input().is_err());
        let tool = VehicleTroubleshooterTool::new(TroubleshootRequest::new(photo(), " ", "noise"));
        assert!(tool.validate_input().is_err());
        let tool = VehicleTroubleshooterTool::new(TroubleshootRequest::new(
            ImageInput::url(""),
            "car",
            "noise",
        ));
        assert!(tool.validate_input().is_err());
    }

    #[test]
    fn vehicle_text_report_shows_severity() {
        let report = parse_contract::<VehicleReport>(VEHICLE).expect("report should parse");
        let text = report.to_text_report();
        assert!(text.contains("Estimated Severity: Severe\n"));
        assert!(!text.contains("Maintenance Tips:"));
    }
}
