//! Size estimation from a single photo, using visible objects for scale.

use kcommon::{BoxFuture, RequestOptions};
use kcontract::{ContractError, FieldKind, ShapeDescriptor};
use kengine::{Contract, Invocation, OrchestrationFailure, Tool};
use kprovider::{ImageInput, Prompt};
use serde::{Deserialize, Serialize};

use crate::common::{
    EXTRACTION_CONFIDENCE_LEVELS, ExtractionConfidence, TextReport, completion, or_placeholder,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRequest {
    pub image: ImageInput,
    /// What to measure, e.g. `the width of the door`.
    pub target: String,
    pub units: UnitSystem,
    pub context: Option<String>,
}

impl MeasurementRequest {
    pub fn new(image: ImageInput, target: impl Into<String>) -> Self {
        Self {
            image,
            target: target.into(),
            units: UnitSystem::Metric,
            context: None,
        }
    }

    pub fn with_units(mut self, units: UnitSystem) -> Self {
        self.units = units;
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub target: String,
    pub value: f64,
    pub unit: String,
    /// Model confidence in `0..=1`.
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementReport {
    pub image_description: String,
    pub measurements: Vec<Measurement>,
    pub visual_reference_points: Vec<String>,
    pub confidence: ExtractionConfidence,
    pub limitations: Vec<String>,
    pub disclaimer: String,
}

impl Contract for MeasurementReport {
    fn shape() -> ShapeDescriptor {
        let measurement = ShapeDescriptor::new()
            .required("target", FieldKind::String)
            .required("value", FieldKind::Number)
            .required("unit", FieldKind::String)
            .required("confidence", FieldKind::Number);

        ShapeDescriptor::new()
            .required("image_description", FieldKind::String)
            .required("measurements", FieldKind::array_of(FieldKind::Object(measurement)))
            .required("visual_reference_points", FieldKind::array_of(FieldKind::String))
            .required("confidence", FieldKind::Enum(EXTRACTION_CONFIDENCE_LEVELS))
            .required("limitations", FieldKind::array_of(FieldKind::String))
            .required("disclaimer", FieldKind::String)
    }

    fn check(&self) -> Result<(), ContractError> {
        for (index, measurement) in self.measurements.iter().enumerate() {
            if !(0.0..=1.0).contains(&measurement.confidence) {
                return Err(ContractError::constraint(
                    format!("measurements[{index}].confidence"),
                    format!("{} is outside 0..=1", measurement.confidence),
                ));
            }
            if measurement.value < 0.0 {
                return Err(ContractError::constraint(
                    format!("measurements[{index}].value"),
                    format!("{} is negative", measurement.value),
                ));
            }
        }
        Ok(())
    }
}

impl MeasurementReport {
    pub fn to_text_report(&self) -> String {
        let measurements: Vec<String> = self
            .measurements
            .iter()
            .map(|m| {
                format!(
                    "{}: {} {} ({:.0}% confidence)",
                    m.target,
                    m.value,
                    m.unit,
                    m.confidence * 100.0
                )
            })
            .collect();

        TextReport::new("Measurement Report")
            .field("Confidence", self.confidence.as_str())
            .gap()
            .section("Image Description", &self.image_description)
            .list("Measurements", &measurements)
            .list("Reference Points", &self.visual_reference_points)
            .list("Limitations", &self.limitations)
            .finish(&self.disclaimer)
    }
}

#[derive(Debug, Clone)]
pub struct MeasuringTool {
    request: MeasurementRequest,
    options: RequestOptions,
}

impl MeasuringTool {
    pub fn new(request: MeasurementRequest) -> Self {
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
            "You are an AI assistant specialized in analyzing images to estimate measurements.\n\
Analyze this image and provide measurements for: \"{target}\"\n\
Preferred measurement system: {units}\n\
Additional context: \"{context}\"\n\n\
Consider:\n\
1. Use visible reference objects or markers if present\n\
2. Look for standard-sized objects that could help with scale\n\
3. Consider perspective and depth\n\
4. Note any limitations in accuracy\n\n\
Return a JSON object with these keys:\n\
- \"image_description\": (string) Brief description of the image and object to be measured\n\
- \"measurements\": (array of objects) each with \"target\" (string), \"value\" (number), \"unit\" (string) and \"confidence\" (number between 0 and 1)\n\
- \"visual_reference_points\": (array of strings) Objects used as reference points\n\
- \"confidence\": (string, one of \"High\", \"Medium\", \"Low\", \"Not Applicable\")\n\
- \"limitations\": (array of strings) Factors affecting measurement accuracy\n\
- \"disclaimer\": (string) Standard measurement accuracy disclaimer",
            target = request.target.trim(),
            units = request.units.as_str(),
            context = or_placeholder(request.context.as_deref(), "None provided"),
        ))
        .with_image(request.image.clone())
    }
}

impl Tool for MeasuringTool {
    type Output = MeasurementReport;

    fn kind(&self) -> &'static str {
        "measuring_tool"
    }

    fn validate_input(&self) -> Result<(), String> {
        if self.request.image.is_empty() {
            return Err("an image is required for measuring".to_string());
        }
        if self.request.target.trim().is_empty() {
            return Err("say what should be measured".to_string());
        }
        Ok(())
    }

    fn run<'a>(
        &'a self,
        invocation: &'a mut Invocation,
    ) -> BoxFuture<'a, Result<Self::Output, OrchestrationFailure>> {
        Box::pin(async move {
            let request = completion(invocation, &self.options, self.prompt());
            invocation.complete_json("measure", request).await
        })
    }
}
