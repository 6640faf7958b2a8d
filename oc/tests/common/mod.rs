//! Shared fixtures for okrcoach integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use okrcoach::api::Api;
use okrcoach::feedback::{FeedbackError, FeedbackRecord, FeedbackSink};
use okrcoach::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError};
use okrcoach::pipeline::Pipeline;

/// What the scripted model does on its next call
pub enum Reply {
    Text(&'static str),
    RateLimited,
    ServerError,
}

/// LLM client that plays back a fixed script and records every prompt
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Reply>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn texts(texts: &[&'static str]) -> Arc<Self> {
        Self::new(texts.iter().map(|t| Reply::Text(*t)).collect())
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let prompt = request.messages.iter().map(|m| m.content.as_str()).collect::<Vec<_>>().join("\n");
        self.prompts.lock().unwrap().push(prompt);
        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Text(text)) => Ok(CompletionResponse::text(text)),
            Some(Reply::RateLimited) => Err(LlmError::RateLimited("429 RESOURCE_EXHAUSTED".to_string())),
            Some(Reply::ServerError) => Err(LlmError::ApiError {
                status: 503,
                message: "service unavailable".to_string(),
            }),
            None => Err(LlmError::InvalidResponse("script exhausted".to_string())),
        }
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

/// Feedback sink that keeps records in memory
#[derive(Default)]
pub struct MemorySink {
    pub records: Mutex<Vec<FeedbackRecord>>,
}

#[async_trait]
impl FeedbackSink for MemorySink {
    async fn submit(&self, record: FeedbackRecord) -> Result<String, FeedbackError> {
        let mut records = self.records.lock().unwrap();
        records.push(record);
        Ok(format!("feedback-{}", records.len()))
    }
}

pub fn pipeline(llm: Arc<ScriptedLlm>) -> Pipeline {
    Pipeline::with_defaults(llm)
}

/// Api over a scripted model, no calendar and an in-memory sink
pub fn api(llm: Arc<ScriptedLlm>) -> (Arc<Api>, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::default());
    let api = Api::new(Arc::new(pipeline(llm)), None, sink.clone());
    (Arc::new(api), sink)
}
