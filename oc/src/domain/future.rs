//! Future-vision types: four horizons, narrative and action tasks

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

use super::Persona;
use crate::extract::Fallback;

/// Number of action tasks attached to every vision
pub const ACTION_TASK_COUNT: usize = 3;

const DEFAULT_TASKS: [&str; ACTION_TASK_COUNT] = [
    "Identify the key data collection points and set up a clean-up process",
    "Model the main bottlenecks and validate the hypotheses behind them",
    "Settle the expert group's governance and finalize the technology stack",
];

/// `**Task 01:** text` lines in a prose reply
static TASK_LINE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\*\*Task\s*\d+[:*]*\*?\*?\s*(.+)").ok());

fn fill(value: &mut String, default: &str) {
    if value.trim().is_empty() {
        *value = default.to_string();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SixMonths {
    pub work: String,
    pub growth: String,
    pub relationships: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OneYear {
    pub career: String,
    pub expertise: String,
    pub lifestyle: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThreeYears {
    pub achievement: String,
    pub influence: String,
    pub life: String,
}

/// What to give up, what to invest in, which habits to build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Exchange {
    pub give_up: String,
    pub invest: String,
    pub habits: String,
}

/// The four time horizons of a vision
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Horizons {
    pub six_months: SixMonths,
    pub one_year: OneYear,
    pub three_years: ThreeYears,
    pub exchange: Exchange,
}

impl Horizons {
    /// Replace every blank field with its static default
    pub fn fill_gaps(&mut self) {
        let d = Self::fallback();
        fill(&mut self.six_months.work, &d.six_months.work);
        fill(&mut self.six_months.growth, &d.six_months.growth);
        fill(&mut self.six_months.relationships, &d.six_months.relationships);
        fill(&mut self.one_year.career, &d.one_year.career);
        fill(&mut self.one_year.expertise, &d.one_year.expertise);
        fill(&mut self.one_year.lifestyle, &d.one_year.lifestyle);
        fill(&mut self.three_years.achievement, &d.three_years.achievement);
        fill(&mut self.three_years.influence, &d.three_years.influence);
        fill(&mut self.three_years.life, &d.three_years.life);
        fill(&mut self.exchange.give_up, &d.exchange.give_up);
        fill(&mut self.exchange.invest, &d.exchange.invest);
        fill(&mut self.exchange.habits, &d.exchange.habits);
    }

    /// Plain-text rendering handed to the action-task prompt
    pub fn render(&self) -> String {
        format!(
            "## In 6 months\n- Work: {}\n- Growth: {}\n- Relationships: {}\n\n\
             ## In 1 year\n- Career: {}\n- Expertise: {}\n- Lifestyle: {}\n\n\
             ## In 3 years\n- Achievement: {}\n- Influence: {}\n- Life: {}\n\n\
             ## Exchange\n- Give up: {}\n- Invest: {}\n- New habits: {}",
            self.six_months.work,
            self.six_months.growth,
            self.six_months.relationships,
            self.one_year.career,
            self.one_year.expertise,
            self.one_year.lifestyle,
            self.three_years.achievement,
            self.three_years.influence,
            self.three_years.life,
            self.exchange.give_up,
            self.exchange.invest,
            self.exchange.habits,
        )
    }
}

impl Fallback for Horizons {
    fn fallback() -> Self {
        Self {
            six_months: SixMonths {
                work: "Lay the groundwork for reaching the objective".to_string(),
                growth: "Start building the core capabilities".to_string(),
                relationships: "Widen the collaboration network".to_string(),
            },
            one_year: OneYear {
                career: "Establish a standing as an expert".to_string(),
                expertise: "Gain deep expertise".to_string(),
                lifestyle: "Live a balanced everyday routine".to_string(),
            },
            three_years: ThreeYears {
                achievement: "Grow into an industry leader".to_string(),
                influence: "Be recognized as key talent in the organization".to_string(),
                life: "Realize the life you envision".to_string(),
            },
            exchange: Exchange {
                give_up: "Inefficient habits and wasted time".to_string(),
                invest: "Time spent on learning and networking".to_string(),
                habits: "A steady self-development routine".to_string(),
            },
        }
    }
}

/// Reply shape of the first vision call
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionDraft {
    #[serde(flatten)]
    pub horizons: Horizons,
    #[serde(default)]
    pub narrative: String,
}

impl VisionDraft {
    /// Fill blank horizon fields; a blank narrative becomes the rendered horizons
    pub fn completed(mut self) -> Self {
        self.horizons.fill_gaps();
        if self.narrative.trim().is_empty() {
            self.narrative = self.horizons.render();
        }
        self
    }
}

impl Fallback for VisionDraft {
    fn fallback() -> Self {
        let horizons = Horizons::fallback();
        Self {
            narrative: horizons.render(),
            horizons,
        }
    }
}

/// Reply shape of the second vision call
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActionTasks {
    pub tasks: Vec<String>,
}

impl ActionTasks {
    /// Harvest `**Task NN:** text` lines from a prose reply
    pub fn from_prose(text: &str) -> Option<Self> {
        let pattern = TASK_LINE.as_ref()?;
        let tasks: Vec<String> = text
            .lines()
            .filter_map(|line| pattern.captures(line))
            .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim().to_string()))
            .filter(|t| !t.is_empty())
            .collect();
        debug!(count = tasks.len(), "ActionTasks::from_prose: harvested");
        if tasks.is_empty() { None } else { Some(Self { tasks }) }
    }

    /// Exactly [`ACTION_TASK_COUNT`] non-blank tasks, padded from the defaults
    pub fn normalized(mut self) -> Self {
        self.tasks.retain(|t| !t.trim().is_empty());
        self.tasks.truncate(ACTION_TASK_COUNT);
        for default in DEFAULT_TASKS.iter().skip(self.tasks.len()) {
            self.tasks.push(default.to_string());
        }
        self
    }
}

impl Fallback for ActionTasks {
    fn fallback() -> Self {
        Self {
            tasks: DEFAULT_TASKS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// The generated vision as shown on the outcome screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FutureVision {
    pub persona: Persona,
    pub horizons: Horizons,
    pub narrative: String,
    pub action_tasks: Vec<String>,
    pub generated_at: DateTime<Utc>,
    pub okr_reference: String,
}
