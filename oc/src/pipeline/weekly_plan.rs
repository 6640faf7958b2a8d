//! Generate-weekly-plan stage

use serde::Serialize;
use tracing::{debug, info};

use super::Pipeline;
use crate::calendar::CalendarSummary;
use crate::domain::{OBJECTIVE_NOT_SET, Okr, Persona, VisionAnswers, WeeklyPlan, or_placeholder};
use crate::error::PipelineError;
use crate::extract::extract;

const NO_CALENDAR: &str = "No calendar data";
const NO_VISION: &str = "No vision data";
const NO_PERSONA: &str = "Someone who keeps growing steadily toward their goals.";

/// Everything the weekly plan is derived from; all parts optional
#[derive(Debug, Clone, Copy, Default)]
pub struct WeeklyPlanInput<'a> {
    pub calendar: Option<&'a CalendarSummary>,
    pub okr: Option<&'a Okr>,
    pub persona: Option<&'a Persona>,
    pub vision: Option<&'a VisionAnswers>,
}

#[derive(Debug, Serialize)]
struct WeeklyPlanContext {
    objective: String,
    key_results: String,
    persona: String,
    vision: String,
    calendar: String,
}

fn weekly_plan_context(input: &WeeklyPlanInput<'_>) -> WeeklyPlanContext {
    let objective = input
        .okr
        .map(|o| or_placeholder(&o.objective, OBJECTIVE_NOT_SET).to_string())
        .unwrap_or_else(|| OBJECTIVE_NOT_SET.to_string());

    let numbered: Vec<String> = input
        .okr
        .map(|o| o.key_results.as_slice())
        .unwrap_or_default()
        .iter()
        .filter(|kr| !kr.trim().is_empty())
        .enumerate()
        .map(|(i, kr)| format!("  {}. {}", i + 1, kr.trim()))
        .collect();
    let key_results = if numbered.is_empty() {
        format!("  - key results {}", OBJECTIVE_NOT_SET)
    } else {
        numbered.join("\n")
    };

    let persona = input
        .persona
        .map(|p| format!("{} ({}): {}. Traits: {}.", p.name, p.code, p.description, p.traits.join(", ")))
        .unwrap_or_else(|| NO_PERSONA.to_string());

    WeeklyPlanContext {
        objective,
        key_results,
        persona,
        vision: input
            .vision
            .and_then(VisionAnswers::render_highlights)
            .unwrap_or_else(|| NO_VISION.to_string()),
        calendar: input
            .calendar
            .map(CalendarSummary::render)
            .unwrap_or_else(|| NO_CALENDAR.to_string()),
    }
}

impl Pipeline {
    /// Plan Monday to Friday; an unparseable reply yields the full default plan
    pub async fn generate_weekly_plan(&self, input: WeeklyPlanInput<'_>) -> Result<WeeklyPlan, PipelineError> {
        debug!(has_calendar = input.calendar.is_some(), has_okr = input.okr.is_some(), "Pipeline::generate_weekly_plan: called");
        let ctx = weekly_plan_context(&input);
        let raw = self
            .call(
                "weekly-plan",
                &ctx,
                &self.stages.weekly_plan,
                "Failed to generate weekly plan",
            )
            .await?;

        let extraction = extract::<WeeklyPlan>("weekly-plan", &raw);
        let plan = extraction.value.completed();
        info!(theme = %plan.weekly_theme, source = ?extraction.source, "Weekly plan generated");
        Ok(plan)
    }
}
