//! Google Calendar v3 events client

use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::{CalendarError, CalendarEvent, CalendarSource, CalendarSummary, Period};
use crate::config::CalendarConfig;

/// Reads the configured calendar's recent events
pub struct GoogleCalendarClient {
    http: Client,
    base_url: String,
    calendar_id: String,
    lookback_days: i64,
    max_results: u32,
}

impl GoogleCalendarClient {
    pub fn from_config(config: &CalendarConfig) -> Self {
        debug!(?config, "GoogleCalendarClient::from_config: called");
        Self {
            http: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            calendar_id: config.calendar_id.clone(),
            lookback_days: config.lookback_days,
            max_results: config.max_results,
        }
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/{}/events", self.base_url, self.calendar_id)
    }
}

#[async_trait]
impl CalendarSource for GoogleCalendarClient {
    async fn fetch(&self, access_token: Option<&str>) -> Result<CalendarSummary, CalendarError> {
        let Some(token) = access_token.filter(|t| !t.trim().is_empty()) else {
            debug!("GoogleCalendarClient::fetch: no access token");
            return Err(CalendarError::AuthMissing);
        };

        let to = Utc::now();
        let from = to - Duration::days(self.lookback_days);
        debug!(%from, %to, "GoogleCalendarClient::fetch: called");

        let response = self
            .http
            .get(self.events_url())
            .bearer_auth(token)
            .query(&[
                ("timeMin", from.to_rfc3339()),
                ("timeMax", to.to_rfc3339()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
                ("maxResults", self.max_results.to_string()),
            ])
            .send()
            .await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            debug!(%status, "GoogleCalendarClient::fetch: API error");
            return Err(match status {
                401 => CalendarError::AuthMissing,
                _ => CalendarError::Api { status, message },
            });
        }

        let body: EventsResponse = response.json().await?;
        let events: Vec<CalendarEvent> = body.items.into_iter().map(GoogleEvent::normalize).collect();
        info!(count = events.len(), "Fetched calendar events");

        Ok(CalendarSummary::new(events, Period { from, to }))
    }
}

// === Google Calendar API response types ===

#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    items: Vec<GoogleEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleEvent {
    #[serde(default)]
    id: String,
    summary: Option<String>,
    description: Option<String>,
    start: Option<EventTime>,
    end: Option<EventTime>,
    location: Option<String>,
    #[serde(default)]
    attendees: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventTime {
    date_time: Option<String>,
    date: Option<String>,
}

impl EventTime {
    fn value(self) -> String {
        self.date_time.or(self.date).unwrap_or_default()
    }
}

impl GoogleEvent {
    fn normalize(self) -> CalendarEvent {
        CalendarEvent {
            id: self.id,
            title: self.summary.filter(|s| !s.trim().is_empty()).unwrap_or_else(|| "Untitled".to_string()),
            description: self.description.unwrap_or_default(),
            start: self.start.map(EventTime::value).unwrap_or_default(),
            end: self.end.map(EventTime::value).unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            attendees: self.attendees.len() as u32,
        }
    }
}
