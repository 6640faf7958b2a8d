//! FeedbackStore - append-only JSONL document store
//!
//! Holds small JSON documents grouped into named collections. Every write
//! gets a generated identifier and a store-side timestamp, so callers never
//! supply either.
//!
//! # Layout
//!
//! ```text
//! <store>/
//! ├── feedbacks.jsonl   # one StoredDocument per line
//! └── other.jsonl
//! ```
//!
//! # Example
//!
//! ```ignore
//! use feedbackstore::DocumentStore;
//!
//! let store = DocumentStore::open("/tmp/feedback")?;
//! let id = store.add("feedbacks", &serde_json::json!({ "rating": 5 }))?;
//! let doc = store.get("feedbacks", &id)?;
//! ```

pub mod cli;
pub mod config;
mod store;

pub use store::{CollectionStats, DocumentId, DocumentStore, StoredDocument};

/// Default collection for wizard feedback
pub const DEFAULT_COLLECTION: &str = "feedbacks";
