//! Weekly plan types and the hand-authored default plan

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::extract::Fallback;

/// Working days covered by a weekly plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeekDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl WeekDay {
    pub const ALL: [WeekDay; 5] = [
        WeekDay::Monday,
        WeekDay::Tuesday,
        WeekDay::Wednesday,
        WeekDay::Thursday,
        WeekDay::Friday,
    ];
}

impl fmt::Display for WeekDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WeekDay::Monday => "Monday",
            WeekDay::Tuesday => "Tuesday",
            WeekDay::Wednesday => "Wednesday",
            WeekDay::Thursday => "Thursday",
            WeekDay::Friday => "Friday",
        };
        f.write_str(name)
    }
}

/// One time-boxed entry in a day plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannedTask {
    pub time: String,
    pub task: String,
    pub category: String,
}

impl PlannedTask {
    fn new(time: &str, task: &str, category: &str) -> Self {
        Self {
            time: time.to_string(),
            task: task.to_string(),
            category: category.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayPlan {
    pub focus: String,
    pub tasks: Vec<PlannedTask>,
    pub tip: String,
}

/// Monday to Friday plan with a theme and closing insight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPlan {
    pub weekly_theme: String,
    #[serde(default)]
    pub monday: DayPlan,
    #[serde(default)]
    pub tuesday: DayPlan,
    #[serde(default)]
    pub wednesday: DayPlan,
    #[serde(default)]
    pub thursday: DayPlan,
    #[serde(default)]
    pub friday: DayPlan,
    #[serde(default)]
    pub weekly_insight: String,
}

impl WeeklyPlan {
    pub fn day(&self, day: WeekDay) -> &DayPlan {
        match day {
            WeekDay::Monday => &self.monday,
            WeekDay::Tuesday => &self.tuesday,
            WeekDay::Wednesday => &self.wednesday,
            WeekDay::Thursday => &self.thursday,
            WeekDay::Friday => &self.friday,
        }
    }

    fn day_mut(&mut self, day: WeekDay) -> &mut DayPlan {
        match day {
            WeekDay::Monday => &mut self.monday,
            WeekDay::Tuesday => &mut self.tuesday,
            WeekDay::Wednesday => &mut self.wednesday,
            WeekDay::Thursday => &mut self.thursday,
            WeekDay::Friday => &mut self.friday,
        }
    }

    /// Ensure every day has a non-empty task list and the text fields are set
    ///
    /// Days whose tasks are all blank are replaced by the default plan's day.
    pub fn completed(mut self) -> Self {
        let defaults = Self::fallback();
        for day in WeekDay::ALL {
            let plan = self.day_mut(day);
            plan.tasks.retain(|t| !t.task.trim().is_empty());
            if plan.tasks.is_empty() {
                debug!(%day, "WeeklyPlan::completed: empty day, using default");
                *plan = defaults.day(day).clone();
                continue;
            }
            if plan.focus.trim().is_empty() {
                plan.focus = defaults.day(day).focus.clone();
            }
            if plan.tip.trim().is_empty() {
                plan.tip = defaults.day(day).tip.clone();
            }
        }
        if self.weekly_theme.trim().is_empty() {
            self.weekly_theme = defaults.weekly_theme;
        }
        if self.weekly_insight.trim().is_empty() {
            self.weekly_insight = defaults.weekly_insight;
        }
        self
    }
}

impl Fallback for WeeklyPlan {
    fn fallback() -> Self {
        Self {
            weekly_theme: "A focused week for reaching your OKR".to_string(),
            monday: DayPlan {
                focus: "Plan the week and sort priorities".to_string(),
                tasks: vec![
                    PlannedTask::new("09:00", "Review weekly goals and set priorities", "OKR"),
                    PlannedTask::new("10:00", "Kick off the core work", "OKR"),
                    PlannedTask::new("14:00", "Team meeting and collaboration", "Meeting"),
                ],
                tip: "Use Monday to look at the big picture and set the week's direction.".to_string(),
            },
            tuesday: DayPlan {
                focus: "Focused work on the key results".to_string(),
                tasks: vec![
                    PlannedTask::new("09:00", "Deep work on the core project", "OKR"),
                    PlannedTask::new("14:00", "Check progress", "OKR"),
                ],
                tip: "Spend your mornings on the most important work.".to_string(),
            },
            wednesday: DayPlan {
                focus: "Mid-week check and adjustment".to_string(),
                tasks: vec![
                    PlannedTask::new("09:00", "Mid-week review", "OKR"),
                    PlannedTask::new("11:00", "Learning and skill development", "Self-development"),
                ],
                tip: "Wednesday is for checking in; adjust the plan if needed.".to_string(),
            },
            thursday: DayPlan {
                focus: "Accelerate toward the finish".to_string(),
                tasks: vec![
                    PlannedTask::new("09:00", "Work on key result delivery", "OKR"),
                    PlannedTask::new("15:00", "Collaboration and feedback", "Meeting"),
                ],
                tip: "Aim to have 80% done by Thursday.".to_string(),
            },
            friday: DayPlan {
                focus: "Wrap up and reflect on the week".to_string(),
                tasks: vec![
                    PlannedTask::new("09:00", "Finish outstanding work", "OKR"),
                    PlannedTask::new("15:00", "Weekly retrospective and next-week prep", "Routine"),
                ],
                tip: "Invest Friday afternoon in reflection and preparing next week.".to_string(),
            },
            weekly_insight: "Focus on the single most important task every day to move your OKR forward.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_days_non_empty() {
        let plan = WeeklyPlan::fallback();
        for day in WeekDay::ALL {
            assert!(!plan.day(day).tasks.is_empty(), "{} has no tasks", day);
        }
    }

    #[test]
    fn test_completed_fills_missing_days() {
        let raw = r#"{
            "weeklyTheme": "Ship it",
            "monday": {"focus": "Start", "tasks": [{"time": "09:00", "task": "Plan", "category": "OKR"}], "tip": "Go"},
            "tuesday": {"focus": "Nothing", "tasks": []}
        }"#;
        let plan: WeeklyPlan = serde_json::from_str(raw).unwrap();
        let plan = plan.completed();
        let defaults = WeeklyPlan::fallback();

        assert_eq!(plan.weekly_theme, "Ship it");
        assert_eq!(plan.monday.tasks[0].task, "Plan");
        assert_eq!(plan.tuesday, defaults.tuesday);
        assert_eq!(plan.friday, defaults.friday);
        assert_eq!(plan.weekly_insight, defaults.weekly_insight);
    }

    #[test]
    fn test_completed_fills_blank_tip() {
        let mut plan = WeeklyPlan::fallback();
        plan.wednesday.tip = String::new();
        plan.wednesday.tasks = vec![PlannedTask::new("08:00", "Run", "Personal")];
        let plan = plan.completed();
        assert_eq!(plan.wednesday.tasks.len(), 1);
        assert_eq!(plan.wednesday.tip, WeeklyPlan::fallback().wednesday.tip);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(WeeklyPlan::fallback()).unwrap();
        assert!(json.get("weeklyTheme").is_some());
        assert!(json.get("weeklyInsight").is_some());
        assert_eq!(json["monday"]["tasks"][0]["time"], "09:00");
    }
}
