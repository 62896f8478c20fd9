use kcommon::{BoxFuture, RequestOptions};
use kcontract::{ContractError, FieldKind, ShapeDescriptor};
use kengine::{Contract, Invocation, OrchestrationFailure, Tool};
use kprovider::Prompt;
use serde::{Deserialize, Serialize};

use crate::common::{AnalysisInput, TextReport, completion};

const PROMPT_DISCLAIMER: &str = "AI-generated prompt. Review and adjust it before use.";

#[derive(Debug, Clone, PartialEq)]
pub struct PromptGeneratorRequest {
    /// An image to recreate, or text whose style the prompt should capture.
    pub input: AnalysisInput,
}

impl PromptGeneratorRequest {
    pub fn new(input: impl Into<AnalysisInput>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

/// The key keeps its image-model name for text input too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPrompt {
    pub dalle_prompt: String,
}

impl Contract for GeneratedPrompt {
    fn shape() -> ShapeDescriptor {
        ShapeDescriptor::new().required("dalle_prompt", FieldKind::String)
    }

    fn check(&self) -> Result<(), ContractError> {
        if self.dalle_prompt.trim().is_empty() {
            return Err(ContractError::constraint("dalle_prompt", "prompt is empty"));
        }
        Ok(())
    }
}

impl GeneratedPrompt {
    pub fn to_text_report(&self) -> String {
        TextReport::new("Generated Prompt")
            .section("Prompt", self.dalle_prompt.trim())
            .finish(PROMPT_DISCLAIMER)
    }
}

#[derive(Debug, Clone)]
pub struct PromptGeneratorTool {
    request: PromptGeneratorRequest,
    options: RequestOptions,
}

impl PromptGeneratorTool {
    pub fn new(request: PromptGeneratorRequest) -> Self {
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
        match &self.request.input {
            AnalysisInput::Image(image) => Prompt::new(
                "Analyze the following image and generate a detailed, high-quality DALL-E 3 \
text-to-image prompt to recreate a similar image. Focus on key visual elements, style, mood, \
lighting, and composition. Provide the prompt directly as a string in a JSON object like this: \
{\"dalle_prompt\": \"Your generated prompt here\"}.",
            )
            .with_image(image.clone()),
            AnalysisInput::Text(text) => Prompt::new(format!(
                "Analyze the following text and generate a creative and detailed prompt for a text \
generation model that captures the core themes, style, and mood of the input text. The generated \
prompt should be suitable for creating similar textual content. Structure the output as a JSON \
object like this: {{\"dalle_prompt\": \"Your generated prompt here\"}}. The key name does not mean \
the prompt is for an image model. Text: \"{text}\""
            )),
        }
    }
}

impl Tool for PromptGeneratorTool {
    type Output = GeneratedPrompt;

    fn kind(&self) -> &'static str {
        "prompt_generator"
    }

    fn validate_input(&self) -> Result<(), String> {
        self.request.input.ensure_present("prompt generation")
    }

    fn run<'a>(
        &'a self,
        invocation: &'a mut Invocation,
    ) -> BoxFuture<'a, Result<Self::Output, OrchestrationFailure>> {
        Box::pin(async move {
            let request = completion(invocation, &self.options, self.prompt());
            invocation.complete_json("generate_prompt", request).await
        })
    }
}
