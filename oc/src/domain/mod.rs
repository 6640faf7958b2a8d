//! Domain types for OKR Coach
//!
//! Data handed between pipeline stages and held by the wizard: the coaching
//! transcript, the extracted OKR, vision answers, persona, future vision,
//! weekly plan and the feedback record. JSON shapes are camelCase.

mod chat;
mod future;
mod okr;
mod persona;
mod plan;
mod vision;

pub use chat::{COACH_APOLOGY, COACH_GREETING, ChatMessage, ChatRole, render_transcript};
pub use future::{ActionTasks, Exchange, FutureVision, Horizons, OneYear, SixMonths, ThreeYears, VisionDraft};
pub use okr::{KEY_RESULT_COUNT, Okr, OkrExtraction};
pub use persona::{DEFAULT_PERSONA, Persona, PersonaClassification, PersonaCode, PersonaProfile};
pub use plan::{DayPlan, PlannedTask, WeekDay, WeeklyPlan};
pub use vision::{NOT_ENTERED, VisionAnswers, VisionCategory};

/// Placeholder for an objective that has not been set
pub const OBJECTIVE_NOT_SET: &str = "not set";

/// Return `value` trimmed, or `placeholder` when it is blank
pub fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() { placeholder } else { trimmed }
}
