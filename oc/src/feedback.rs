//! Feedback capture
//!
//! Builds the denormalized feedback record and hands it to a [`FeedbackSink`].
//! The default sink appends to a `feedbackstore` collection.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use feedbackstore::DocumentStore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{Okr, Persona};
use crate::session::Identity;

/// Confirmation shown after a successful submission
pub const FEEDBACK_SAVED: &str = "Your feedback was saved successfully.";

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("Rating is required")]
    MissingRating,

    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    #[error("Feedback store error: {0}")]
    Store(String),
}

/// One feedback submission, as written to the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub rating: u8,
    pub comment: String,
    pub okr_objective: String,
    pub persona_code: String,
    pub persona_name: String,
    pub user_id: String,
    pub user_email: String,
    pub user_name: String,
}

impl FeedbackRecord {
    /// Validate the rating and snapshot the OKR, persona and identity
    pub fn new(
        rating: Option<u8>,
        comment: Option<&str>,
        okr: Option<&Okr>,
        persona: Option<&Persona>,
        identity: &Identity,
    ) -> Result<Self, FeedbackError> {
        let rating = match rating {
            None | Some(0) => return Err(FeedbackError::MissingRating),
            Some(r @ 1..=5) => r,
            Some(r) => return Err(FeedbackError::InvalidRating(r)),
        };

        Ok(Self {
            rating,
            comment: comment.unwrap_or_default().to_string(),
            okr_objective: okr.map(|o| o.objective.clone()).unwrap_or_default(),
            persona_code: persona.map(|p| p.code.to_string()).unwrap_or_default(),
            persona_name: persona.map(|p| p.name.clone()).unwrap_or_default(),
            user_id: identity.id_or_anonymous(),
            user_email: identity.email_or_anonymous(),
            user_name: identity.name_or_anonymous(),
        })
    }
}

/// Response to a successful submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackReceipt {
    pub success: bool,
    pub feedback_id: String,
    pub message: String,
}

impl FeedbackReceipt {
    pub fn saved(feedback_id: String) -> Self {
        Self {
            success: true,
            feedback_id,
            message: FEEDBACK_SAVED.to_string(),
        }
    }
}

/// Destination for feedback records
#[async_trait]
pub trait FeedbackSink: Send + Sync {
    /// Persist a record and return its generated identifier
    async fn submit(&self, record: FeedbackRecord) -> Result<String, FeedbackError>;
}

/// Sink backed by a JSONL document store collection
pub struct JsonlFeedbackSink {
    store: Arc<DocumentStore>,
    collection: String,
}

impl JsonlFeedbackSink {
    pub fn open(store_dir: &Path, collection: impl Into<String>) -> eyre::Result<Self> {
        let collection = collection.into();
        debug!(?store_dir, %collection, "JsonlFeedbackSink::open: called");
        Ok(Self {
            store: Arc::new(DocumentStore::open(store_dir)?),
            collection,
        })
    }
}

#[async_trait]
impl FeedbackSink for JsonlFeedbackSink {
    async fn submit(&self, record: FeedbackRecord) -> Result<String, FeedbackError> {
        debug!(rating = record.rating, "JsonlFeedbackSink::submit: called");
        let store = Arc::clone(&self.store);
        let collection = self.collection.clone();

        let id = tokio::task::spawn_blocking(move || store.add(&collection, &record))
            .await
            .map_err(|e| FeedbackError::Store(e.to_string()))?
            .map_err(|e| FeedbackError::Store(format!("{:#}", e)))?;

        info!(%id, collection = %self.collection, "Feedback saved");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PersonaCode;
    use tempfile::TempDir;

    #[test]
    fn test_record_defaults_to_anonymous() {
        let record = FeedbackRecord::new(Some(4), None, None, None, &Identity::default()).unwrap();
        assert_eq!(record.user_id, "anonymous");
        assert_eq!(record.user_email, "anonymous");
        assert_eq!(record.user_name, "anonymous");
        assert_eq!(record.comment, "");
        assert_eq!(record.okr_objective, "");
    }

    #[test]
    fn test_record_snapshots_okr_and_persona() {
        let okr = Okr {
            objective: "Grow the team".to_string(),
            key_results: vec![],
        };
        let persona = Persona::new(PersonaCode::D, 0.8, "collaborative");
        let record = FeedbackRecord::new(Some(5), Some("great"), Some(&okr), Some(&persona), &Identity::default())
            .unwrap();
        assert_eq!(record.okr_objective, "Grow the team");
        assert_eq!(record.persona_code, "D");
        assert_eq!(record.persona_name, "Relationship Builder");
    }

    #[test]
    fn test_rating_validation() {
        let id = Identity::default();
        assert!(matches!(FeedbackRecord::new(None, None, None, None, &id), Err(FeedbackError::MissingRating)));
        assert!(matches!(FeedbackRecord::new(Some(0), None, None, None, &id), Err(FeedbackError::MissingRating)));
        assert!(matches!(
            FeedbackRecord::new(Some(6), None, None, None, &id),
            Err(FeedbackError::InvalidRating(6))
        ));
    }

    #[test]
    fn test_record_json_shape() {
        let record = FeedbackRecord::new(Some(3), Some("ok"), None, None, &Identity::default()).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["okrObjective"], "");
        assert_eq!(json["userEmail"], "anonymous");
    }

    #[tokio::test]
    async fn test_jsonl_sink_writes_record() {
        let dir = TempDir::new().unwrap();
        let sink = JsonlFeedbackSink::open(dir.path(), "feedbacks").unwrap();
        let record = FeedbackRecord::new(Some(5), Some("nice"), None, None, &Identity::default()).unwrap();

        let id = sink.submit(record).await.unwrap();

        let store = DocumentStore::open(dir.path()).unwrap();
        let doc = store.get("feedbacks", &id).unwrap();
        assert_eq!(doc.data["rating"], 5);
        assert_eq!(doc.data["comment"], "nice");
    }
}
