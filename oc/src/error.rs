//! Pipeline boundary errors
//!
//! Everything a stage, the calendar adapter or the feedback sink can fail
//! with, reduced to the kinds a caller reacts to differently. Parse failures
//! never appear here: stages absorb them by substituting defaults.

use thiserror::Error;
use tracing::debug;

use crate::calendar::CalendarError;
use crate::feedback::FeedbackError;
use crate::llm::LlmError;

/// Errors surfaced across the pipeline boundary
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Access token required")]
    AuthMissing,

    #[error("The model service is receiving too many requests right now. Please try again shortly.")]
    RateLimited(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("{context}: {message}")]
    Upstream { context: String, message: String },

    #[error("Prompt error: {0}")]
    Prompt(String),
}

impl PipelineError {
    /// Classify an LLM failure for the named operation
    pub fn from_llm(context: &str, err: LlmError) -> Self {
        debug!(%context, error = %err, "PipelineError::from_llm: called");
        if err.is_rate_limit() {
            PipelineError::RateLimited(err.to_string())
        } else {
            PipelineError::Upstream {
                context: context.to_string(),
                message: err.to_string(),
            }
        }
    }

    pub fn upstream(context: &str, message: impl Into<String>) -> Self {
        PipelineError::Upstream {
            context: context.to_string(),
            message: message.into(),
        }
    }

    /// HTTP-equivalent status code
    pub fn status(&self) -> u16 {
        match self {
            PipelineError::AuthMissing => 401,
            PipelineError::RateLimited(_) => 429,
            PipelineError::InvalidRequest(_) => 400,
            PipelineError::Upstream { .. } | PipelineError::Prompt(_) => 500,
        }
    }

    pub fn is_rate_limit(&self) -> bool {
        matches!(self, PipelineError::RateLimited(_))
    }
}

impl From<CalendarError> for PipelineError {
    fn from(err: CalendarError) -> Self {
        match err {
            CalendarError::AuthMissing => PipelineError::AuthMissing,
            other => PipelineError::upstream("Failed to fetch calendar events", other.to_string()),
        }
    }
}

impl From<FeedbackError> for PipelineError {
    fn from(err: FeedbackError) -> Self {
        match err {
            FeedbackError::InvalidRating(_) | FeedbackError::MissingRating => PipelineError::InvalidRequest(err.to_string()),
            other => PipelineError::upstream("Failed to save feedback", other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(PipelineError::AuthMissing.status(), 401);
        assert_eq!(PipelineError::RateLimited("x".to_string()).status(), 429);
        assert_eq!(PipelineError::InvalidRequest("x".to_string()).status(), 400);
        assert_eq!(PipelineError::upstream("a", "b").status(), 500);
        assert_eq!(PipelineError::Prompt("x".to_string()).status(), 500);
    }

    #[test]
    fn test_from_llm_rate_limit() {
        let err = PipelineError::from_llm("Failed to extract OKR", LlmError::RateLimited("429".to_string()));
        assert!(err.is_rate_limit());
        assert!(err.to_string().contains("too many requests"));
    }

    #[test]
    fn test_from_llm_quota_marker() {
        let llm = LlmError::ApiError {
            status: 400,
            message: "Quota exceeded".to_string(),
        }
        .classify();
        assert!(PipelineError::from_llm("op", llm).is_rate_limit());
    }

    #[test]
    fn test_from_llm_other() {
        let err = PipelineError::from_llm(
            "Failed to extract OKR",
            LlmError::ApiError {
                status: 500,
                message: "boom".to_string(),
            },
        );
        assert_eq!(err.status(), 500);
        assert!(err.to_string().starts_with("Failed to extract OKR"));
    }

    #[test]
    fn test_from_calendar_auth() {
        assert_eq!(PipelineError::from(CalendarError::AuthMissing).status(), 401);
    }

    #[test]
    fn test_from_feedback_rating() {
        assert_eq!(PipelineError::from(FeedbackError::InvalidRating(9)).status(), 400);
    }
}
