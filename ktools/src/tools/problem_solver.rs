use kcommon::{BoxFuture, RequestOptions};
use kcontract::{ContractError, FieldKind, ShapeDescriptor};
use kengine::{Contract, Invocation, OrchestrationFailure, Tool};
use kprovider::Prompt;
use serde::{Deserialize, Serialize};

use crate::common::{
    AnalysisInput, EXTRACTION_CONFIDENCE_LEVELS, ExtractionConfidence, TextReport, completion,
    or_placeholder,
};

const DIFFICULTY_LEVELS: &[&str] = &["Beginner", "Intermediate", "Advanced", "Expert"];

#[derive(Debug, Clone, PartialEq)]
pub struct ProblemRequest {
    pub input: AnalysisInput,
    /// Subject area such as `Mathematics` or `Physics`; `General` when blank.
    pub problem_type: String,
    pub context: Option<String>,
}

impl ProblemRequest {
    pub fn new(input: impl Into<AnalysisInput>, problem_type: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            problem_type: problem_type.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionStep {
    pub step_number: u32,
    pub description: String,
    pub explanation: String,
    #[serde(default)]
    pub formula_used: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemSolution {
    pub problem_description: String,
    pub problem_type: String,
    pub solution_steps: Vec<SolutionStep>,
    pub final_answer: String,
    pub key_concepts: Vec<String>,
    pub difficulty_level: Difficulty,
    #[serde(default)]
    pub alternative_methods: Vec<String>,
    #[serde(default)]
    pub common_mistakes: Vec<String>,
    #[serde(default)]
    pub related_topics: Vec<String>,
    #[serde(default)]
    pub image_description: Option<String>,
    pub confidence: ExtractionConfidence,
    pub disclaimer: String,
}

impl Contract for ProblemSolution {
    fn shape() -> ShapeDescriptor {
        let step = ShapeDescriptor::new()
            .required("step_number", FieldKind::Number)
            .required("description", FieldKind::String)
            .required("explanation", FieldKind::String)
            .optional("formula_used", FieldKind::String);

        ShapeDescriptor::new()
            .required("problem_description", FieldKind::String)
            .required("problem_type", FieldKind::String)
            .required("solution_steps", FieldKind::array_of(FieldKind::Object(step)))
            .required("final_answer", FieldKind::String)
            .required("key_concepts", FieldKind::array_of(FieldKind::String))
            .required("difficulty_level", FieldKind::Enum(DIFFICULTY_LEVELS))
            .optional("alternative_methods", FieldKind::array_of(FieldKind::String))
            .optional("common_mistakes", FieldKind::array_of(FieldKind::String))
            .optional("related_topics", FieldKind::array_of(FieldKind::String))
            .optional("image_description", FieldKind::String)
            .required("confidence", FieldKind::Enum(EXTRACTION_CONFIDENCE_LEVELS))
            .required("disclaimer", FieldKind::String)
    }

    fn check(&self) -> Result<(), ContractError> {
        if self.solution_steps.is_empty() {
            return Err(ContractError::constraint(
                "solution_steps",
                "a solution needs at least one step",
            ));
        }
        Ok(())
    }
}

impl ProblemSolution {
    pub fn to_text_report(&self) -> String {
        let steps: Vec<String> = self
            .solution_steps
            .iter()
            .map(|step| {
                let mut line = format!(
                    "Step {}: {} ({})",
                    step.step_number, step.description, step.explanation
                );
                if let Some(formula) = step.formula_used.as_deref() {
                    line.push_str(" [");
                    line.push_str(formula);
                    line.push(']');
                }
                line
            })
            .collect();

        let mut report = TextReport::new("Problem Solution")
            .field("Problem Type", &self.problem_type)
            .field("Difficulty", self.difficulty_level.as_str())
            .field("Confidence", self.confidence.as_str())
            .gap()
            .section("Problem", &self.problem_description);
        if let Some(description) = &self.image_description {
            report = report.section("Image Description", description);
        }
        report
            .list("Solution Steps", &steps)
            .section("Final Answer", &self.final_answer)
            .list("Key Concepts", &self.key_concepts)
            .list("Alternative Methods", &self.alternative_methods)
            .list("Common Mistakes", &self.common_mistakes)
            .list("Related Topics", &self.related_topics)
            .finish(&self.disclaimer)
    }
}

#[derive(Debug, Clone)]
pub struct ProblemSolverTool {
    request: ProblemRequest,
    options: RequestOptions,
}

impl ProblemSolverTool {
    pub fn new(request: ProblemRequest) -> Self {
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
        let problem_type = or_placeholder(Some(self.request.problem_type.as_str()), "General");
        let context = or_placeholder(self.request.context.as_deref(), "None provided");
        let (task, image) = match &self.request.input {
            AnalysisInput::Image(image) => (
                format!(
                    "Analyze this image containing a {problem_type} problem and provide a complete solution."
                ),
                Some(image.clone()),
            ),
            AnalysisInput::Text(text) => {
                (format!("Solve this {problem_type} problem: \"{text}\""), None)
            }
        };

        let prompt = Prompt::new(format!(
            "You are an AI assistant specialized in solving academic problems across mathematics, science, and other subjects.\n\
{task}\n\
Problem type: {problem_type}\n\
Additional context: \"{context}\"\n\n\
Provide a step-by-step solution focused on clarity and educational value. Explain the \
reasoning behind each calculation or decision.\n\n\
Return the solution in a JSON object with these keys:\n\
- \"problem_description\": (string) The problem restated in your own words\n\
- \"problem_type\": (string) The subject area of the problem\n\
- \"solution_steps\": (array of objects) each with \"step_number\" (number), \"description\", \"explanation\" and optional \"formula_used\"\n\
- \"final_answer\": (string)\n\
- \"key_concepts\": (array of strings)\n\
- \"difficulty_level\": (string, one of \"Beginner\", \"Intermediate\", \"Advanced\", \"Expert\")\n\
- \"alternative_methods\": (array of strings)\n\
- \"common_mistakes\": (array of strings)\n\
- \"related_topics\": (array of strings)\n\
- \"image_description\": (string) What the image shows, for image input only\n\
- \"confidence\": (string, one of \"High\", \"Medium\", \"Low\", \"Not Applicable\")\n\
- \"disclaimer\": (string) Standard disclaimer about checking AI solutions"
        ));
        match image {
            Some(image) => prompt.with_image(image),
            None => prompt,
        }
    }
}

impl Tool for ProblemSolverTool {
    type Output = ProblemSolution;

    fn kind(&self) -> &'static str {
        "problem_solver"
    }

    fn validate_input(&self) -> Result<(), String> {
        self.request.input.ensure_present("problem solving")
    }

    fn run<'a>(
        &'a self,
        invocation: &'a mut Invocation,
    ) -> BoxFuture<'a, Result<Self::Output, OrchestrationFailure>> {
        Box::pin(async move {
            let request = completion(invocation, &self.options, self.prompt());
            invocation.complete_json("solve", request).await
        })
    }
}
