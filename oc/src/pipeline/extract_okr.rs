//! Extract-OKR stage

use serde::Serialize;
use tracing::{debug, info};

use super::Pipeline;
use crate::domain::{ChatMessage, KEY_RESULT_COUNT, OkrExtraction, render_transcript};
use crate::error::PipelineError;
use crate::extract::extract;

#[derive(Debug, Serialize)]
struct ExtractOkrContext {
    transcript: String,
    key_result_count: usize,
}

impl Pipeline {
    /// Turn the coaching transcript into one objective, three key results and a summary
    ///
    /// An unparseable reply yields the refinement placeholders, not an error.
    pub async fn extract_okr(&self, transcript: &[ChatMessage]) -> Result<OkrExtraction, PipelineError> {
        debug!(transcript_len = transcript.len(), "Pipeline::extract_okr: called");
        let ctx = ExtractOkrContext {
            transcript: render_transcript(transcript),
            key_result_count: KEY_RESULT_COUNT,
        };
        let raw = self
            .call("extract-okr", &ctx, &self.stages.extract_okr, "Failed to extract OKR")
            .await?;

        let extraction = extract::<OkrExtraction>("extract-okr", &raw);
        let okr = extraction.value.normalized();
        info!(objective = %okr.objective, source = ?extraction.source, "OKR extracted");
        Ok(okr)
    }
}
