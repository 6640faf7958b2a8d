//! Calendar adapter
//!
//! Fetches recent events from a calendar service and buckets them into
//! meetings, tasks, personal and other by keyword and attendee heuristics.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

mod google;

pub use google::GoogleCalendarClient;

/// Number of events listed by name in the weekly-plan prompt
const PROMPT_EVENT_LIMIT: usize = 5;

const MEETING_KEYWORDS: [&str; 5] = ["회의", "미팅", "meeting", "call", "sync"];
const TASK_KEYWORDS: [&str; 5] = ["업무", "task", "작업", "프로젝트", "개발"];
const PERSONAL_KEYWORDS: [&str; 5] = ["개인", "운동", "점심", "저녁", "약속"];

/// Errors from the calendar service
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("Access token required")]
    AuthMissing,

    #[error("Calendar API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// A normalized calendar event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// RFC 3339 timestamp or all-day date
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub location: String,
    /// Attendee count
    #[serde(default)]
    pub attendees: u32,
}

/// Bucket an event falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    Meeting,
    Task,
    Personal,
    Other,
}

impl CalendarEvent {
    /// Classify by title/description keywords; more than one attendee always means a meeting
    pub fn category(&self) -> EventCategory {
        let text = format!("{} {}", self.title, self.description).to_lowercase();
        let has = |keywords: &[&str]| keywords.iter().any(|k| text.contains(k));

        if has(&MEETING_KEYWORDS) || self.attendees > 1 {
            EventCategory::Meeting
        } else if has(&TASK_KEYWORDS) {
            EventCategory::Task
        } else if has(&PERSONAL_KEYWORDS) {
            EventCategory::Personal
        } else {
            EventCategory::Other
        }
    }

    /// Calendar date of the start time, as `YYYY-MM-DD`
    pub fn start_date(&self) -> &str {
        self.start.get(..10).unwrap_or(&self.start)
    }
}

/// Events split into the four mutually exclusive buckets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorizedEvents {
    pub meetings: Vec<CalendarEvent>,
    pub tasks: Vec<CalendarEvent>,
    pub personal: Vec<CalendarEvent>,
    pub other: Vec<CalendarEvent>,
}

/// Bucket events, preserving their order within each bucket
pub fn categorize(events: &[CalendarEvent]) -> CategorizedEvents {
    debug!(count = events.len(), "categorize: called");
    let mut out = CategorizedEvents::default();
    for event in events {
        let bucket = match event.category() {
            EventCategory::Meeting => &mut out.meetings,
            EventCategory::Task => &mut out.tasks,
            EventCategory::Personal => &mut out.personal,
            EventCategory::Other => &mut out.other,
        };
        bucket.push(event.clone());
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Recent calendar activity handed to the weekly-plan stage
///
/// Clients may send only `events`; missing buckets and totals are derived from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "SummaryFields")]
pub struct CalendarSummary {
    pub events: Vec<CalendarEvent>,
    pub categorized: CategorizedEvents,
    pub total_events: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryFields {
    #[serde(default)]
    events: Vec<CalendarEvent>,
    #[serde(default)]
    categorized: Option<CategorizedEvents>,
    #[serde(default)]
    total_events: Option<usize>,
    #[serde(default)]
    period: Option<Period>,
}

impl From<SummaryFields> for CalendarSummary {
    fn from(fields: SummaryFields) -> Self {
        let categorized = fields.categorized.unwrap_or_else(|| categorize(&fields.events));
        Self {
            categorized,
            total_events: fields.total_events.unwrap_or(fields.events.len()),
            events: fields.events,
            period: fields.period,
        }
    }
}

impl CalendarSummary {
    pub fn new(events: Vec<CalendarEvent>, period: Period) -> Self {
        Self {
            categorized: categorize(&events),
            total_events: events.len(),
            events,
            period: Some(period),
        }
    }

    /// Prompt rendering: counts per bucket plus the first few events
    pub fn render(&self) -> String {
        if self.events.is_empty() {
            return "No recent calendar events.".to_string();
        }

        let mut out = format!(
            "- {} events in total\n- Meetings: {}\n- Tasks: {}\n- Personal: {}\n\nMain events:\n",
            self.total_events,
            self.categorized.meetings.len(),
            self.categorized.tasks.len(),
            self.categorized.personal.len(),
        );
        for event in self.events.iter().take(PROMPT_EVENT_LIMIT) {
            out.push_str(&format!("- {}: {}\n", event.start_date(), event.title));
        }
        out
    }
}

/// Source of calendar events for one user
#[async_trait]
pub trait CalendarSource: Send + Sync {
    /// Fetch the look-back window ending now, authorized by `access_token`
    async fn fetch(&self, access_token: Option<&str>) -> Result<CalendarSummary, CalendarError>;
}
