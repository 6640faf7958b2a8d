//! Request/response operations exposed to presentation layers
//!
//! Both the HTTP surface and the `oc call` command go through [`Api`]. DTOs
//! use camelCase JSON; a missing required field is an `InvalidRequest`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use eyre::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calendar::{CalendarSource, CalendarSummary, GoogleCalendarClient};
use crate::config::Config;
use crate::domain::{ChatMessage, FutureVision, Okr, OkrExtraction, Persona, PersonaCode, PersonaProfile, VisionAnswers, WeeklyPlan};
use crate::error::PipelineError;
use crate::feedback::{FeedbackReceipt, FeedbackRecord, FeedbackSink, JsonlFeedbackSink};
use crate::llm::create_client;
use crate::pipeline::{Pipeline, WeeklyPlanInput};
use crate::prompts::PromptLoader;
use crate::session::Session;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: Option<String>,
    #[serde(default)]
    pub conversation_history: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractOkrRequest {
    pub conversation_history: Option<Vec<ChatMessage>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyPersonaRequest {
    pub okr_data: Option<Okr>,
    pub vision_data: Option<VisionAnswers>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifyPersonaResponse {
    pub persona: Persona,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVisionRequest {
    pub okr_data: Option<Okr>,
    pub vision_data: Option<VisionAnswers>,
    pub persona: Option<Persona>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPlanRequest {
    pub calendar_events: Option<CalendarSummary>,
    pub okr_data: Option<Okr>,
    pub persona: Option<Persona>,
    pub vision_data: Option<VisionAnswers>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPlanResponse {
    pub weekly_plan: WeeklyPlan,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub rating: Option<u8>,
    pub comment: Option<String>,
    pub okr_data: Option<Okr>,
    pub persona: Option<Persona>,
}

/// Require an OKR with a non-blank objective
fn require_okr(okr: Option<Okr>) -> Result<Okr, PipelineError> {
    match okr {
        Some(okr) if !okr.objective.trim().is_empty() => Ok(okr),
        _ => Err(PipelineError::InvalidRequest("okrData with an objective is required".to_string())),
    }
}

/// The pipeline plus its external collaborators
pub struct Api {
    pipeline: Arc<Pipeline>,
    calendar: Option<Arc<dyn CalendarSource>>,
    feedback: Arc<dyn FeedbackSink>,
}

impl Api {
    pub fn new(
        pipeline: Arc<Pipeline>,
        calendar: Option<Arc<dyn CalendarSource>>,
        feedback: Arc<dyn FeedbackSink>,
    ) -> Self {
        debug!(has_calendar = calendar.is_some(), "Api::new: called");
        Self {
            pipeline,
            calendar,
            feedback,
        }
    }

    /// Wire up the configured model, prompts, calendar and feedback store
    pub fn from_config(config: &Config) -> eyre::Result<Self> {
        debug!(provider = %config.llm.provider, "Api::from_config: called");
        let llm = create_client(&config.llm).context("Failed to create LLM client")?;
        let prompts = PromptLoader::new(config.prompts_dir.as_deref());
        let pipeline = Arc::new(Pipeline::new(llm, prompts, config.stages.clone()));
        let calendar: Arc<dyn CalendarSource> = Arc::new(GoogleCalendarClient::from_config(&config.calendar));
        let feedback = JsonlFeedbackSink::open(&config.feedback.store_dir, config.feedback.collection.clone())?;
        Ok(Self::new(pipeline, Some(calendar), Arc::new(feedback)))
    }

    pub async fn chat(&self, req: ChatRequest) -> Result<ChatResponse, PipelineError> {
        let message = req
            .message
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| PipelineError::InvalidRequest("message is required".to_string()))?;
        let reply = self.pipeline.coach(&message, &req.conversation_history).await?;
        Ok(ChatResponse { message: reply })
    }

    pub async fn extract_okr(&self, req: ExtractOkrRequest) -> Result<OkrExtraction, PipelineError> {
        let history = req
            .conversation_history
            .filter(|h| !h.is_empty())
            .ok_or_else(|| PipelineError::InvalidRequest("conversationHistory is required".to_string()))?;
        self.pipeline.extract_okr(&history).await
    }

    pub async fn classify_persona(&self, req: ClassifyPersonaRequest) -> Result<ClassifyPersonaResponse, PipelineError> {
        let okr = require_okr(req.okr_data)?;
        let vision = req.vision_data.unwrap_or_default();
        let persona = self.pipeline.classify_persona(&okr, &vision).await?;
        Ok(ClassifyPersonaResponse { persona })
    }

    pub async fn generate_vision(&self, req: GenerateVisionRequest) -> Result<FutureVision, PipelineError> {
        let okr = require_okr(req.okr_data)?;
        let persona = req
            .persona
            .ok_or_else(|| PipelineError::InvalidRequest("persona is required".to_string()))?;
        let vision = req.vision_data.unwrap_or_default();
        self.pipeline.generate_vision(&okr, &vision, &persona).await
    }

    pub async fn generate_weekly_plan(&self, req: WeeklyPlanRequest) -> Result<WeeklyPlanResponse, PipelineError> {
        let input = WeeklyPlanInput {
            calendar: req.calendar_events.as_ref(),
            okr: req.okr_data.as_ref(),
            persona: req.persona.as_ref(),
            vision: req.vision_data.as_ref(),
        };
        let weekly_plan = self.pipeline.generate_weekly_plan(input).await?;
        Ok(WeeklyPlanResponse {
            weekly_plan,
            generated_at: Utc::now(),
        })
    }

    /// Recent calendar activity for the session's user
    pub async fn calendar(&self, session: &Session) -> Result<CalendarSummary, PipelineError> {
        let source = self
            .calendar
            .as_ref()
            .ok_or_else(|| PipelineError::upstream("Failed to fetch calendar events", "no calendar configured"))?;
        Ok(source.fetch(session.access_token.as_deref()).await?)
    }

    pub async fn submit_feedback(&self, session: &Session, req: FeedbackRequest) -> Result<FeedbackReceipt, PipelineError> {
        let record = FeedbackRecord::new(
            req.rating,
            req.comment.as_deref(),
            req.okr_data.as_ref(),
            req.persona.as_ref(),
            &session.identity,
        )?;
        let id = self.feedback.submit(record).await?;
        info!(%id, "Feedback submitted");
        Ok(FeedbackReceipt::saved(id))
    }

    pub fn personas(&self) -> Vec<PersonaProfile> {
        PersonaCode::catalog()
    }
}
