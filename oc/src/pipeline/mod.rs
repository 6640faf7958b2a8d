//! LLM pipeline stages
//!
//! Each stage renders its prompt, makes a single model call and extracts a
//! typed result. Stages hold no state between calls; a [`Pipeline`] is built
//! once at startup around an injected client and shared by reference.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::config::{StageSettings, StagesConfig};
use crate::error::PipelineError;
use crate::llm::{self, CompletionRequest, LlmClient, Message};
use crate::prompts::PromptLoader;

mod classify_persona;
mod coach;
mod extract_okr;
mod generate_vision;
mod weekly_plan;

pub use weekly_plan::WeeklyPlanInput;

/// The four generation stages plus the coaching chat
pub struct Pipeline {
    llm: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    stages: StagesConfig,
}

impl Pipeline {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: PromptLoader, stages: StagesConfig) -> Self {
        debug!(model = %llm.model(), "Pipeline::new: called");
        Self { llm, prompts, stages }
    }

    /// Pipeline with embedded prompts and default stage settings
    pub fn with_defaults(llm: Arc<dyn LlmClient>) -> Self {
        Self::new(llm, PromptLoader::embedded_only(), StagesConfig::default())
    }

    pub fn stages(&self) -> &StagesConfig {
        &self.stages
    }

    /// Render a stage template
    fn render<C: Serialize>(&self, template: &str, context: &C) -> Result<String, PipelineError> {
        self.prompts
            .render(template, context)
            .map_err(|e| PipelineError::Prompt(format!("{:#}", e)))
    }

    /// Render, then invoke the model once; `context` names the operation in errors
    async fn call<C: Serialize>(
        &self,
        template: &str,
        prompt_context: &C,
        settings: &StageSettings,
        context: &str,
    ) -> Result<String, PipelineError> {
        let prompt = self.render(template, prompt_context)?;
        debug!(%template, prompt_len = prompt.len(), "Pipeline::call: invoking model");
        llm::invoke(&self.llm, prompt, settings)
            .await
            .map_err(|e| PipelineError::from_llm(context, e))
    }

    /// Render `template` as the system prompt and send it with prior turns
    async fn converse<C: Serialize>(
        &self,
        template: &str,
        prompt_context: &C,
        turns: Vec<Message>,
        settings: &StageSettings,
        context: &str,
    ) -> Result<String, PipelineError> {
        let system = self.render(template, prompt_context)?;
        debug!(%template, turns = turns.len(), "Pipeline::converse: invoking model");
        let request = CompletionRequest::conversation(system, turns, settings.max_tokens);
        llm::send(&self.llm, request, settings)
            .await
            .map_err(|e| PipelineError::from_llm(context, e))
    }
}
