//! WizardController: forward-only stage machine over the pipeline
//!
//! Every operation takes `&mut self` for its whole duration, including the
//! awaits on model calls, so a second submission cannot start while one is
//! in flight and no result can land after the user has navigated away.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::state::{CalendarStatus, Stage, Toast, WizardState};
use crate::api::{
    Api, ChatRequest, ClassifyPersonaRequest, ExtractOkrRequest, FeedbackRequest, GenerateVisionRequest,
    WeeklyPlanRequest,
};
use crate::config::WizardConfig;
use crate::domain::{ChatMessage, OkrExtraction, VisionCategory, WeeklyPlan};
use crate::error::PipelineError;
use crate::feedback::FeedbackReceipt;
use crate::session::Session;

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("This action is only available on the {expected} screen (currently on {actual})")]
    WrongStage { expected: Stage, actual: Stage },

    #[error("Stage {0} has not been reached yet")]
    StageNotReached(Stage),

    #[error("Stage {0} cannot be opened directly")]
    NotNavigable(Stage),

    #[error("Extract an OKR before continuing")]
    MissingOkr,

    #[error("Message is empty")]
    EmptyMessage,

    #[error("Unknown vision field: {category}.{key}")]
    UnknownField { category: VisionCategory, key: String },

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

pub struct WizardController {
    api: Arc<Api>,
    session: Session,
    state: WizardState,
    toast: Option<Toast>,
    analyzing_delay: Duration,
    toast_ttl: Duration,
}

impl WizardController {
    pub fn new(api: Arc<Api>, session: Session, config: &WizardConfig) -> Self {
        debug!(?config, "WizardController::new: called");
        Self {
            api,
            session,
            state: WizardState::default(),
            toast: None,
            analyzing_delay: Duration::from_millis(config.analyzing_delay_ms),
            toast_ttl: Duration::from_millis(config.toast_ttl_ms),
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    fn expect_stage(&self, expected: Stage) -> Result<(), WizardError> {
        if self.state.stage == expected {
            Ok(())
        } else {
            Err(WizardError::WrongStage {
                expected,
                actual: self.state.stage,
            })
        }
    }

    /// Raise a toast for a pipeline failure and wrap it
    fn fail(&mut self, err: PipelineError) -> WizardError {
        warn!(status = err.status(), error = %err, "WizardController: operation failed");
        self.toast = Some(Toast::new(err.to_string(), err.is_rate_limit()));
        WizardError::Pipeline(err)
    }

    /// The current toast, unless it has outlived its TTL
    pub fn active_toast(&self) -> Option<&Toast> {
        self.toast.as_ref().filter(|t| !t.is_expired(self.toast_ttl))
    }

    pub fn dismiss_toast(&mut self) {
        self.toast = None;
    }

    /// Back to the first screen with every accumulated value cleared
    pub fn reset(&mut self) {
        info!(from = %self.state.stage, "Wizard reset");
        self.state = WizardState::default();
        self.toast = None;
    }

    /// Show a previously reached stage; Coaching resets the wizard
    pub fn navigate(&mut self, stage: Stage) -> Result<(), WizardError> {
        debug!(%stage, furthest = %self.state.furthest, "WizardController::navigate: called");
        match stage {
            Stage::Coaching => {
                self.reset();
                Ok(())
            }
            Stage::Analyzing => Err(WizardError::NotNavigable(stage)),
            _ if stage > self.state.furthest => Err(WizardError::StageNotReached(stage)),
            _ => {
                self.state.stage = stage;
                Ok(())
            }
        }
    }

    // === Stage 1: coaching ===

    /// Send a chat message and append the coach's reply
    ///
    /// On failure the user's message stays in the transcript and a toast is raised.
    pub async fn send_message(&mut self, text: &str) -> Result<String, WizardError> {
        self.expect_stage(Stage::Coaching)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(WizardError::EmptyMessage);
        }

        let history = self.state.messages.clone();
        self.state.messages.push(ChatMessage::user(text));

        let req = ChatRequest {
            message: Some(text.to_string()),
            conversation_history: history,
        };
        match self.api.chat(req).await {
            Ok(resp) => {
                self.state.messages.push(ChatMessage::ai(resp.message.clone()));
                Ok(resp.message)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Summarize the transcript as an OKR
    pub async fn extract_okr(&mut self) -> Result<OkrExtraction, WizardError> {
        self.expect_stage(Stage::Coaching)?;
        let req = ExtractOkrRequest {
            conversation_history: Some(self.state.messages.clone()),
        };
        match self.api.extract_okr(req).await {
            Ok(extraction) => {
                self.state.okr = Some(extraction.okr());
                self.state.okr_summary = extraction.summary.clone();
                Ok(extraction)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub fn start_vision(&mut self) -> Result<(), WizardError> {
        self.expect_stage(Stage::Coaching)?;
        if self.state.okr.is_none() {
            return Err(WizardError::MissingOkr);
        }
        self.state.advance(Stage::VisionIntake);
        Ok(())
    }

    // === Stage 2: vision intake ===

    pub fn set_vision_answer(&mut self, category: VisionCategory, key: &str, value: &str) -> Result<(), WizardError> {
        self.expect_stage(Stage::VisionIntake)?;
        if self.state.vision_answers.set(category, key, value) {
            Ok(())
        } else {
            Err(WizardError::UnknownField {
                category,
                key: key.to_string(),
            })
        }
    }

    /// Classify the persona, generate the vision, then show the outcome
    ///
    /// Any failure returns to the vision form with a toast.
    pub async fn submit_vision(&mut self) -> Result<(), WizardError> {
        self.expect_stage(Stage::VisionIntake)?;
        let okr = self.state.okr.clone().ok_or(WizardError::MissingOkr)?;
        let vision = self.state.vision_answers.clone();
        self.state.advance(Stage::Analyzing);

        let classify = ClassifyPersonaRequest {
            okr_data: Some(okr.clone()),
            vision_data: Some(vision.clone()),
        };
        let persona = match self.api.classify_persona(classify).await {
            Ok(resp) => resp.persona,
            Err(e) => {
                self.state.abandon_analysis();
                return Err(self.fail(e));
            }
        };

        let generate = GenerateVisionRequest {
            okr_data: Some(okr),
            vision_data: Some(vision),
            persona: Some(persona.clone()),
        };
        let future = match self.api.generate_vision(generate).await {
            Ok(future) => future,
            Err(e) => {
                self.state.abandon_analysis();
                return Err(self.fail(e));
            }
        };

        tokio::time::sleep(self.analyzing_delay).await;

        self.state.persona = Some(persona);
        self.state.future_vision = Some(future);
        self.state.weekly_plan = None;
        self.state.plan_generated_at = None;
        self.state.furthest = Stage::Outcome;
        self.state.advance(Stage::Outcome);
        info!("Vision ready");
        Ok(())
    }

    // === Stage 5: weekly plan ===

    /// Open the weekly plan, generating it only if none is cached
    pub async fn open_weekly_plan(&mut self) -> Result<(), WizardError> {
        self.expect_stage(Stage::Outcome)?;
        self.state.advance(Stage::WeeklyPlan);
        if self.state.weekly_plan.is_some() {
            debug!("WizardController::open_weekly_plan: using cached plan");
            return Ok(());
        }
        self.generate_plan().await
    }

    /// Always recompute; the previous plan survives a failed refresh
    pub async fn refresh_weekly_plan(&mut self) -> Result<(), WizardError> {
        self.expect_stage(Stage::WeeklyPlan)?;
        self.generate_plan().await
    }

    async fn generate_plan(&mut self) -> Result<(), WizardError> {
        let calendar = match self.api.calendar(&self.session).await {
            Ok(summary) => {
                self.state.calendar_status = CalendarStatus::Loaded {
                    events: summary.total_events,
                };
                Some(summary)
            }
            Err(e) => {
                debug!(error = %e, "WizardController::generate_plan: planning without calendar");
                self.state.calendar_status = CalendarStatus::Unavailable { reason: e.to_string() };
                None
            }
        };

        let req = WeeklyPlanRequest {
            calendar_events: calendar,
            okr_data: self.state.okr.clone(),
            persona: self.state.persona.clone(),
            vision_data: Some(self.state.vision_answers.clone()),
        };
        match self.api.generate_weekly_plan(req).await {
            Ok(resp) => {
                self.state.weekly_plan = Some(resp.weekly_plan);
                self.state.plan_generated_at = Some(resp.generated_at);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub fn weekly_plan(&self) -> Option<&WeeklyPlan> {
        self.state.weekly_plan.as_ref()
    }

    // === Stage 6: feedback ===

    pub fn open_feedback(&mut self) -> Result<(), WizardError> {
        self.expect_stage(Stage::WeeklyPlan)?;
        self.state.advance(Stage::Feedback);
        Ok(())
    }

    /// Store the rating and comment, then start over
    pub async fn submit_feedback(&mut self, rating: u8, comment: Option<&str>) -> Result<FeedbackReceipt, WizardError> {
        self.expect_stage(Stage::Feedback)?;
        let req = FeedbackRequest {
            rating: Some(rating),
            comment: comment.map(str::to_string),
            okr_data: self.state.okr.clone(),
            persona: self.state.persona.clone(),
        };
        match self.api.submit_feedback(&self.session, req).await {
            Ok(receipt) => {
                self.reset();
                Ok(receipt)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    // === Persistence ===

    pub fn save(&self, path: &Path) -> eyre::Result<()> {
        self.state.save(path)
    }

    pub fn restore(&mut self, path: &Path) -> eyre::Result<()> {
        self.state = WizardState::load(path)?;
        self.toast = None;
        info!(stage = %self.state.stage, "Wizard state restored");
        Ok(())
    }
}
