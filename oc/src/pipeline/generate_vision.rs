//! Generate-vision stage: structured horizons, then action tasks

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::Pipeline;
use super::classify_persona::joined_key_results;
use crate::domain::{ActionTasks, FutureVision, OBJECTIVE_NOT_SET, Okr, Persona, VisionAnswers, VisionDraft, or_placeholder};
use crate::error::PipelineError;
use crate::extract::{Fallback, extract, parse_json};

const TASK_COUNT: usize = 3;

#[derive(Debug, Serialize)]
struct VisionContext {
    objective: String,
    key_results: String,
    persona_name: String,
    persona_traits: String,
    persona_focus: String,
    vision: String,
}

#[derive(Debug, Serialize)]
struct TasksContext {
    vision_text: String,
    persona_name: String,
    persona_traits: String,
    career_goal: String,
    learning_goal: String,
    core_value: String,
    task_count: usize,
}

/// First non-blank value, or `default`
fn first_filled(values: &[&str], default: &str) -> String {
    values
        .iter()
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn vision_context(okr: &Okr, vision: &VisionAnswers, persona: &Persona) -> VisionContext {
    VisionContext {
        objective: or_placeholder(&okr.objective, OBJECTIVE_NOT_SET).to_string(),
        key_results: joined_key_results(okr),
        persona_name: persona.name.clone(),
        persona_traits: persona.traits.join(", "),
        persona_focus: persona.vision_focus.clone(),
        vision: vision.render_full(),
    }
}

fn tasks_context(draft: &VisionDraft, vision: &VisionAnswers, persona: &Persona) -> TasksContext {
    TasksContext {
        vision_text: format!("{}\n\n{}", draft.horizons.render(), draft.narrative),
        persona_name: persona.name.clone(),
        persona_traits: persona.traits.join(", "),
        career_goal: first_filled(&[vision.career.achievement.as_str(), vision.career.position.as_str()], "growth"),
        learning_goal: first_filled(
            &[vision.learning.expertise.as_str(), vision.learning.new_things.as_str()],
            "deeper expertise",
        ),
        core_value: first_filled(&[vision.values.important.as_str()], "a balanced life"),
        task_count: TASK_COUNT,
    }
}

/// JSON first, then `**Task NN:**` lines, then the defaults
fn recover_tasks(raw: &str) -> ActionTasks {
    if let Some((tasks, source)) = parse_json::<ActionTasks>(raw) {
        debug!(?source, "recover_tasks: parsed JSON");
        return tasks.normalized();
    }
    if let Some(tasks) = ActionTasks::from_prose(raw) {
        debug!("recover_tasks: harvested task lines");
        return tasks.normalized();
    }
    warn!(stage = "vision-tasks", raw_len = raw.len(), "recover_tasks: unparseable model reply, using fallback");
    ActionTasks::fallback()
}

impl Pipeline {
    /// Project the user's future in four horizons and derive three action tasks
    ///
    /// The two model calls run in sequence. A failed second call leaves the
    /// horizons intact and substitutes the default tasks.
    pub async fn generate_vision(
        &self,
        okr: &Okr,
        vision: &VisionAnswers,
        persona: &Persona,
    ) -> Result<FutureVision, PipelineError> {
        debug!(persona = %persona.code, "Pipeline::generate_vision: called");
        let ctx = vision_context(okr, vision, persona);
        let raw = self
            .call(
                "generate-vision",
                &ctx,
                &self.stages.generate_vision,
                "Failed to generate vision",
            )
            .await?;
        let draft = extract::<VisionDraft>("generate-vision", &raw).value.completed();

        let tasks_ctx = tasks_context(&draft, vision, persona);
        let tasks = match self
            .call(
                "vision-tasks",
                &tasks_ctx,
                &self.stages.vision_tasks,
                "Failed to generate action tasks",
            )
            .await
        {
            Ok(raw) => recover_tasks(&raw),
            Err(e) => {
                warn!(error = %e, "Pipeline::generate_vision: action task call failed, using defaults");
                ActionTasks::fallback()
            }
        };

        info!(persona = %persona.code, tasks = tasks.tasks.len(), "Vision generated");
        Ok(FutureVision {
            persona: persona.clone(),
            horizons: draft.horizons,
            narrative: draft.narrative,
            action_tasks: tasks.tasks,
            generated_at: Utc::now(),
            okr_reference: okr.objective.clone(),
        })
    }
}
