//! LLM error types

use thiserror::Error;

/// Words that mark an upstream failure as a rate-limit or quota rejection
pub const RATE_LIMIT_MARKERS: [&str; 3] = ["429", "quota", "rate"];

/// Check whether an upstream error message reads like a rate-limit rejection
///
/// Markers match whole words only, so `generateContent` or `accurate` do not
/// count. Run-together reasons such as `rateLimitExceeded` or `quotaExceeded`
/// still do.
pub fn mentions_rate_limit(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .any(|word| {
            RATE_LIMIT_MARKERS.iter().any(|m| {
                word == *m
                    || word
                        .strip_prefix(m)
                        .is_some_and(|rest| rest.starts_with("limit") || rest.starts_with("exceeded"))
            })
        })
}

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Authentication failed ({status}): {message}")]
    Auth { status: u16, message: String },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// Build an error from a non-success HTTP status and response body
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            429 => LlmError::RateLimited(body),
            401 | 403 => LlmError::Auth { status, message: body },
            _ => LlmError::ApiError { status, message: body }.classify(),
        }
    }

    /// Reclassify by marker substrings
    ///
    /// Network errors are left alone: their text embeds the request URL.
    pub fn classify(self) -> Self {
        let hit = match &self {
            LlmError::ApiError { message, .. } | LlmError::InvalidResponse(message) => mentions_rate_limit(message),
            _ => false,
        };
        if hit { LlmError::RateLimited(self.to_string()) } else { self }
    }

    /// Check if this is a rate limit error
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, LlmError::RateLimited(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_rate_limit() {
        assert!(LlmError::RateLimited("slow down".to_string()).is_rate_limit());

        let err = LlmError::ApiError {
            status: 500,
            message: "Server error".to_string(),
        };
        assert!(!err.is_rate_limit());
    }

    #[test]
    fn test_from_status_429() {
        let err = LlmError::from_status(429, "Too Many Requests".to_string());
        assert!(err.is_rate_limit());
    }

    #[test]
    fn test_from_status_auth() {
        assert!(matches!(
            LlmError::from_status(401, "bad key".to_string()),
            LlmError::Auth { status: 401, .. }
        ));
        assert!(matches!(
            LlmError::from_status(403, "forbidden".to_string()),
            LlmError::Auth { status: 403, .. }
        ));
    }

    #[test]
    fn test_from_status_marker_in_body() {
        let err = LlmError::from_status(
            400,
            r#"{"error":{"message":"Resource has been exhausted (e.g. check quota)."}}"#.to_string(),
        );
        assert!(err.is_rate_limit());

        let err = LlmError::from_status(500, "internal".to_string());
        assert!(!err.is_rate_limit());
        assert!(matches!(err, LlmError::ApiError { status: 500, .. }));
    }

    #[test]
    fn test_classify_markers() {
        assert!(LlmError::InvalidResponse("RATE exceeded".to_string()).classify().is_rate_limit());
        assert!(LlmError::InvalidResponse("reason: rateLimitExceeded".to_string()).classify().is_rate_limit());
        assert!(LlmError::InvalidResponse("HTTP 429".to_string()).classify().is_rate_limit());
        assert!(!LlmError::InvalidResponse("empty body".to_string()).classify().is_rate_limit());
    }

    #[test]
    fn test_mentions_rate_limit() {
        assert!(mentions_rate_limit("Quota exceeded for project"));
        assert!(mentions_rate_limit("status 429"));
        assert!(mentions_rate_limit("RESOURCE_EXHAUSTED: quotaExceeded"));
        assert!(!mentions_rate_limit("invalid argument"));
        assert!(!mentions_rate_limit("an accurate, well-rated answer"));
        assert!(!mentions_rate_limit("error 4290"));
    }

    #[test]
    fn test_model_not_found_is_not_rate_limit() {
        let err = LlmError::from_status(
            404,
            "models/gemini-x is not found for API version v1beta, or is not supported for generateContent".to_string(),
        );
        assert!(!err.is_rate_limit());
        assert!(matches!(err, LlmError::ApiError { status: 404, .. }));
    }
}
