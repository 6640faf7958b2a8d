//! Wizard state: stages, accumulated results and the transient toast

use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{COACH_GREETING, ChatMessage, FutureVision, Okr, Persona, VisionAnswers, WeeklyPlan};

/// The six wizard screens, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Coaching,
    VisionIntake,
    Analyzing,
    Outcome,
    WeeklyPlan,
    Feedback,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Coaching,
        Stage::VisionIntake,
        Stage::Analyzing,
        Stage::Outcome,
        Stage::WeeklyPlan,
        Stage::Feedback,
    ];

    /// 1-based position
    pub fn number(self) -> u8 {
        match self {
            Stage::Coaching => 1,
            Stage::VisionIntake => 2,
            Stage::Analyzing => 3,
            Stage::Outcome => 4,
            Stage::WeeklyPlan => 5,
            Stage::Feedback => 6,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.number() == n)
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Coaching => "OKR Coaching",
            Stage::VisionIntake => "Life Vision",
            Stage::Analyzing => "Analyzing",
            Stage::Outcome => "Future Report",
            Stage::WeeklyPlan => "Weekly Plan",
            Stage::Feedback => "Feedback",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.label())
    }
}

/// Outcome of the last calendar fetch for the weekly plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum CalendarStatus {
    #[default]
    NotFetched,
    Loaded {
        events: usize,
    },
    Unavailable {
        reason: String,
    },
}

/// Everything the wizard has accumulated; serializable for save/restore
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    pub stage: Stage,
    /// Deepest stage reached since the last reset
    pub furthest: Stage,
    pub messages: Vec<ChatMessage>,
    pub okr: Option<Okr>,
    #[serde(default)]
    pub okr_summary: String,
    #[serde(default)]
    pub vision_answers: VisionAnswers,
    pub persona: Option<Persona>,
    pub future_vision: Option<FutureVision>,
    pub weekly_plan: Option<WeeklyPlan>,
    pub plan_generated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub calendar_status: CalendarStatus,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            stage: Stage::Coaching,
            furthest: Stage::Coaching,
            messages: vec![ChatMessage::ai(COACH_GREETING)],
            okr: None,
            okr_summary: String::new(),
            vision_answers: VisionAnswers::default(),
            persona: None,
            future_vision: None,
            weekly_plan: None,
            plan_generated_at: None,
            calendar_status: CalendarStatus::NotFetched,
        }
    }
}

impl WizardState {
    /// Move to `stage`, extending `furthest` if needed
    pub(super) fn advance(&mut self, stage: Stage) {
        debug!(from = %self.stage, to = %stage, "WizardState::advance: called");
        self.stage = stage;
        self.furthest = self.furthest.max(stage);
    }

    /// Leave an unfinished analysis for the vision form; Analyzing is never kept as a reached stage
    pub(super) fn abandon_analysis(&mut self) {
        debug!(furthest = %self.furthest, "WizardState::abandon_analysis: called");
        self.stage = Stage::VisionIntake;
        if self.furthest == Stage::Analyzing {
            self.furthest = Stage::VisionIntake;
        }
    }

    /// Write as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).context(format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize wizard state")?;
        std::fs::write(path, json).context(format!("Failed to write wizard state to {}", path.display()))?;
        debug!(?path, "WizardState::save: saved");
        Ok(())
    }

    /// Read a saved state; an interrupted analysis resumes at the vision form
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).context(format!("Failed to read wizard state from {}", path.display()))?;
        let mut state: Self = serde_json::from_str(&content).context("Failed to parse wizard state")?;
        if state.stage == Stage::Analyzing || state.furthest == Stage::Analyzing {
            debug!("WizardState::load: interrupted analysis, back to vision intake");
            state.abandon_analysis();
        }
        Ok(state)
    }
}

/// A dismissible error message
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub is_rate_limit: bool,
    pub raised_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>, is_rate_limit: bool) -> Self {
        Self {
            message: message.into(),
            is_rate_limit,
            raised_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.raised_at.elapsed() >= ttl
    }
}
