//! Two-step medical image analysis: structured report, then next steps.

use kcommon::{BoxFuture, RequestOptions};
use kcontract::{ContractError, FieldKind, ShapeDescriptor};
use kengine::{Contract, Invocation, OrchestrationFailure, Tool};
use kprovider::{ImageInput, Prompt};
use serde::{Deserialize, Serialize};

use crate::common::{TextReport, completion, or_placeholder};

pub const MEDICAL_DISCLAIMER: &str = "This AI-generated analysis is for informational purposes \
only and is not a medical diagnosis. Always consult a qualified healthcare professional.";

#[derive(Debug, Clone, PartialEq)]
pub struct MedicalScanRequest {
    pub image: ImageInput,
    /// Imaging modality, e.g. "X-ray", "MRI", "CT scan".
    pub modality: String,
    pub patient_details: Option<String>,
}

impl MedicalScanRequest {
    pub fn new(image: ImageInput, modality: impl Into<String>) -> Self {
        Self {
            image,
            modality: modality.into(),
            patient_details: None,
        }
    }

    pub fn with_patient_details(mut self, details: impl Into<String>) -> Self {
        self.patient_details = Some(details.into());
        self
    }

    fn patient_details(&self) -> &str {
        or_placeholder(self.patient_details.as_deref(), "Not provided")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalReport {
    pub findings: String,
    pub possible_diagnoses: Vec<String>,
    pub recommendations: String,
}

impl Contract for MedicalReport {
    fn shape() -> ShapeDescriptor {
        ShapeDescriptor::new()
            .required("findings", FieldKind::String)
            .required("possibleDiagnoses", FieldKind::array_of(FieldKind::String))
            .required("recommendations", FieldKind::String)
    }

    fn check(&self) -> Result<(), ContractError> {
        if self.findings.trim().is_empty() {
            return Err(ContractError::constraint(
                "findings",
                "report findings must not be empty",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextSteps {
    pub next_steps: String,
}

impl Contract for NextSteps {
    fn shape() -> ShapeDescriptor {
        ShapeDescriptor::new().required("nextSteps", FieldKind::String)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicalAnalysis {
    pub modality: String,
    pub report: MedicalReport,
    pub next_steps: NextSteps,
}

impl MedicalAnalysis {
    pub fn to_text_report(&self) -> String {
        TextReport::new("MediScan Report")
            .field("Modality", &self.modality)
            .gap()
            .section("Findings", &self.report.findings)
            .list("Possible Diagnoses", &self.report.possible_diagnoses)
            .section("Recommendations", &self.report.recommendations)
            .section("Suggested Next Steps", &self.next_steps.next_steps)
            .finish(MEDICAL_DISCLAIMER)
    }
}

#[derive(Debug, Clone)]
pub struct MedicalScanTool {
    request: MedicalScanRequest,
    options: RequestOptions,
}

impl MedicalScanTool {
    pub fn new(request: MedicalScanRequest) -> Self {
        Self {
            request,
            options: RequestOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    fn report_prompt(&self) -> Prompt {
        Prompt::new(format!(
            "You are an AI assistant specializing in analyzing medical images and generating \
medical reports for doctors.\n\
Analyze the provided medical image and produce a structured report with:\n\
1. Findings: the key findings, including any abnormalities or notable anatomical features.\n\
2. Possible Diagnoses: a list of possible differential diagnoses based on the findings.\n\
3. Recommendations: relevant recommendations for further investigation or treatment.\n\n\
Modality: {modality}\n\
Patient Details: {details}\n\n\
Return a JSON object with these keys:\n\
- \"findings\": (string)\n\
- \"possibleDiagnoses\": (array of strings)\n\
- \"recommendations\": (string)",
            modality = self.request.modality.trim(),
            details = self.request.patient_details(),
        ))
        .with_image(self.request.image.clone())
    }

    fn next_steps_prompt(&self, report: &MedicalReport) -> Prompt {
        Prompt::new(format!(
            "You are an AI assistant that suggests actionable next steps for medical \
professionals based on medical image analysis and findings.\n\
Be specific and provide clear instructions.\n\n\
Image Analysis: Modality: {modality}. Patient Details: {details}.\n\n\
Findings: {findings}\n\n\
Return a JSON object with the key \"nextSteps\": (string) the actionable next steps.",
            modality = self.request.modality.trim(),
            details = self.request.patient_details(),
            findings = report.findings,
        ))
    }
}

impl Tool for MedicalScanTool {
    type Output = MedicalAnalysis;

    fn kind(&self) -> &'static str {
        "medical_scan"
    }

    fn validate_input(&self) -> Result<(), String> {
        if self.request.image.is_empty() {
            return Err("a medical image is required".to_string());
        }
        if self.request.modality.trim().is_empty() {
            return Err("an imaging modality is required".to_string());
        }
        Ok(())
    }

    fn run<'a>(
        &'a self,
        invocation: &'a mut Invocation,
    ) -> BoxFuture<'a, Result<Self::Output, OrchestrationFailure>> {
        Box::pin(async move {
            let request = completion(invocation, &self.options, self.report_prompt());
            let report: MedicalReport = invocation.complete_json("report", request).await?;

            let request = completion(invocation, &self.options, self.next_steps_prompt(&report));
            let next_steps: NextSteps = invocation.complete_json("next_steps", request).await?;

            Ok(MedicalAnalysis {
                modality: self.request.modality.trim().to_string(),
                report,
                next_steps,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use kcontract::{ContractErrorKind, parse_contract};

    use super::*;

    #[test]
    fn report_requires_every_section() {
        let error = parse_contract::<MedicalReport>(
            "{\"findings\":\"opacity\",\"recommendations\":\"follow up\"}",
        )
        .expect_err("diagnoses missing");
        assert_eq!(error.kind, ContractErrorKind::MissingField);
        assert_eq!(error.field.as_deref(), Some("possibleDiagnoses"));
    }

    #[test]
    fn blank_findings_violate_the_contract() {
        let error = parse_contract::<MedicalReport>(
            "{\"findings\":\"  \",\"possibleDiagnoses\":[],\"recommendations\":\"none\"}",
        )
        .expect_err("findings blank");
        assert_eq!(error.kind, ContractErrorKind::Constraint);
    }

    #[test]
    fn input_needs_image_and_modality() {
        let tool = MedicalScanTool::new(MedicalScanRequest::new(ImageInput::url(""), "MRI"));
        assert!(tool.validate_input().is_err());

        let tool = MedicalScanTool::new(MedicalScanRequest::new(
            ImageInput::data_uri("data:image/png;base64,AAAA"),
            " ",
        ));
        assert!(tool.validate_input().is_err());
    }

    #[test]
    fn text_report_lists_diagnoses() {
        let analysis = MedicalAnalysis {
            modality: "X-ray".to_string(),
            report: MedicalReport {
                findings: "Mild opacity in the left lower lobe.".to_string(),
                possible_diagnoses: vec!["Pneumonia".to_string(), "Atelectasis".to_string()],
                recommendations: "Clinical correlation.".to_string(),
            },
            next_steps: NextSteps {
                next_steps: "Repeat imaging in 6 weeks.".to_string(),
            },
        };

        let text = analysis.to_text_report();
        assert!(text.starts_with("KLUTZ MediScan Report\n"));
        assert!(text.contains("Modality: X-ray\n"));
        assert!(text.contains("- Pneumonia\n- Atelectasis\n"));
        assert!(text.ends_with(&format!("Disclaimer: {MEDICAL_DISCLAIMER}\n")));
    }
}
