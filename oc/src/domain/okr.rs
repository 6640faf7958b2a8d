//! OKR types and normalization

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extract::Fallback;

/// Every OKR carries exactly this many key results
pub const KEY_RESULT_COUNT: usize = 3;

/// Objective plus key results, as held by the wizard and sent to later stages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Okr {
    #[serde(default)]
    pub objective: String,
    #[serde(default)]
    pub key_results: Vec<String>,
}

/// Result of the extract-OKR stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OkrExtraction {
    pub objective: String,
    #[serde(default)]
    pub key_results: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

impl OkrExtraction {
    /// Force exactly [`KEY_RESULT_COUNT`] key results
    ///
    /// Extra entries are dropped; blank or missing ones become refinement placeholders.
    pub fn normalized(mut self) -> Self {
        debug!(count = self.key_results.len(), "OkrExtraction::normalized: called");
        self.key_results.truncate(KEY_RESULT_COUNT);
        for (i, kr) in self.key_results.iter_mut().enumerate() {
            if kr.trim().is_empty() {
                *kr = refine_placeholder(i);
            }
        }
        while self.key_results.len() < KEY_RESULT_COUNT {
            self.key_results.push(refine_placeholder(self.key_results.len()));
        }
        if self.objective.trim().is_empty() {
            self.objective = Self::fallback().objective;
        }
        self
    }

    pub fn okr(&self) -> Okr {
        Okr {
            objective: self.objective.clone(),
            key_results: self.key_results.clone(),
        }
    }
}

fn refine_placeholder(index: usize) -> String {
    format!("Please refine key result {}", index + 1)
}

impl Fallback for OkrExtraction {
    fn fallback() -> Self {
        Self {
            objective: "Please restate your objective".to_string(),
            key_results: (0..KEY_RESULT_COUNT).map(refine_placeholder).collect(),
            summary: "Could not extract an OKR from the conversation.".to_string(),
        }
    }
}
