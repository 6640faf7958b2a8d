//! HTTP surface: the pipeline operations under `/api/*`

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use eyre::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::api::{
    Api, ChatRequest, ClassifyPersonaRequest, ExtractOkrRequest, FeedbackRequest, GenerateVisionRequest,
    WeeklyPlanRequest,
};
use crate::error::PipelineError;
use crate::session::{Identity, Session};

/// Error body: `{"error": "...", "isRateLimit": true}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_rate_limit: Option<bool>,
}

struct ApiError(PipelineError);

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(PipelineError::InvalidRequest(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            warn!(%status, error = %self.0, "Request failed");
        } else {
            debug!(%status, error = %self.0, "Request rejected");
        }
        let body = ErrorBody {
            error: self.0.to_string(),
            is_rate_limit: self.0.is_rate_limit().then_some(true),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

fn body<T: DeserializeOwned>(payload: std::result::Result<Json<T>, JsonRejection>) -> std::result::Result<T, ApiError> {
    Ok(payload?.0)
}

/// Build the caller's session from request headers
fn session_from_headers(headers: &HeaderMap) -> Session {
    let text = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    let access_token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    Session {
        access_token,
        identity: Identity {
            id: text("x-user-id"),
            name: text("x-user-name"),
            email: text("x-user-email"),
        },
    }
}

async fn chat(
    State(api): State<Arc<Api>>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<crate::api::ChatResponse> {
    Ok(Json(api.chat(body(payload)?).await?))
}

async fn extract_okr(
    State(api): State<Arc<Api>>,
    payload: std::result::Result<Json<ExtractOkrRequest>, JsonRejection>,
) -> ApiResult<crate::domain::OkrExtraction> {
    Ok(Json(api.extract_okr(body(payload)?).await?))
}

async fn classify_persona(
    State(api): State<Arc<Api>>,
    payload: std::result::Result<Json<ClassifyPersonaRequest>, JsonRejection>,
) -> ApiResult<crate::api::ClassifyPersonaResponse> {
    Ok(Json(api.classify_persona(body(payload)?).await?))
}

async fn generate_vision(
    State(api): State<Arc<Api>>,
    payload: std::result::Result<Json<GenerateVisionRequest>, JsonRejection>,
) -> ApiResult<crate::domain::FutureVision> {
    Ok(Json(api.generate_vision(body(payload)?).await?))
}

async fn generate_weekly_plan(
    State(api): State<Arc<Api>>,
    payload: std::result::Result<Json<WeeklyPlanRequest>, JsonRejection>,
) -> ApiResult<crate::api::WeeklyPlanResponse> {
    Ok(Json(api.generate_weekly_plan(body(payload)?).await?))
}

async fn calendar(State(api): State<Arc<Api>>, headers: HeaderMap) -> ApiResult<crate::calendar::CalendarSummary> {
    let session = session_from_headers(&headers);
    Ok(Json(api.calendar(&session).await?))
}

async fn feedback(
    State(api): State<Arc<Api>>,
    headers: HeaderMap,
    payload: std::result::Result<Json<FeedbackRequest>, JsonRejection>,
) -> ApiResult<crate::feedback::FeedbackReceipt> {
    let session = session_from_headers(&headers);
    Ok(Json(api.submit_feedback(&session, body(payload)?).await?))
}

async fn personas(State(api): State<Arc<Api>>) -> Json<Vec<crate::domain::PersonaProfile>> {
    Json(api.personas())
}

pub fn router(api: Arc<Api>) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/extract-okr", post(extract_okr))
        .route("/api/classify-persona", post(classify_persona))
        .route("/api/generate-vision", post(generate_vision))
        .route("/api/generate-weekly-plan", post(generate_weekly_plan))
        .route("/api/calendar", get(calendar))
        .route("/api/feedback", post(feedback))
        .route("/api/personas", get(personas))
        .with_state(api)
}

/// Bind and serve until the process is stopped
pub async fn serve(api: Arc<Api>, bind: &str) -> Result<()> {
    let addr: SocketAddr = bind.parse().context(format!("Invalid bind address: {}", bind))?;
    let listener = TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind {}", addr))?;
    info!(%addr, "Serving okrcoach API");
    axum::serve(listener, router(api)).await.context("Server error")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer tok-123"));
        headers.insert("x-user-name", HeaderValue::from_static("Dana"));
        headers.insert("x-user-email", HeaderValue::from_static("  "));

        let session = session_from_headers(&headers);
        assert_eq!(session.access_token.as_deref(), Some("tok-123"));
        assert_eq!(session.identity.name.as_deref(), Some("Dana"));
        assert_eq!(session.identity.email, None);
        assert_eq!(session.identity.id, None);
    }

    #[test]
    fn test_session_without_headers_is_anonymous() {
        let session = session_from_headers(&HeaderMap::new());
        assert!(session.access_token.is_none());
        assert_eq!(session.identity.name_or_anonymous(), "anonymous");
    }

    #[test]
    fn test_error_body_flags_rate_limit() {
        let response = ApiError(PipelineError::RateLimited("429".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let response = ApiError(PipelineError::InvalidRequest("x".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
