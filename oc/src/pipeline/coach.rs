//! Coaching chat stage

use serde::Serialize;
use tracing::{debug, info, warn};

use super::Pipeline;
use crate::domain::{COACH_APOLOGY, ChatMessage, ChatRole};
use crate::error::PipelineError;
use crate::llm::{Message, Role};

#[derive(Debug, Serialize)]
struct CoachContext {
    opening: Option<String>,
}

/// Leading coach lines (the greeting) go into the system prompt, since the
/// conversation sent to the model has to start with a user turn.
fn coach_context(history: &[ChatMessage]) -> CoachContext {
    let opening: Vec<&str> = history
        .iter()
        .take_while(|m| m.role == ChatRole::Ai)
        .map(|m| m.content.trim())
        .filter(|c| !c.is_empty())
        .collect();
    CoachContext {
        opening: (!opening.is_empty()).then(|| opening.join("\n\n")),
    }
}

/// Transcript plus the new message as alternating user/assistant turns
fn coach_turns(message: &str, history: &[ChatMessage]) -> Vec<Message> {
    let mut turns: Vec<Message> = Vec::new();
    let rest = history.iter().skip_while(|m| m.role == ChatRole::Ai);
    let current = ChatMessage::user(message);

    for line in rest.chain(std::iter::once(&current)) {
        let content = line.content.trim();
        if content.is_empty() {
            continue;
        }
        let role = match line.role {
            ChatRole::User => Role::User,
            ChatRole::Ai => Role::Assistant,
        };
        match turns.last_mut() {
            Some(last) if last.role == role => {
                last.content.push_str("\n\n");
                last.content.push_str(content);
            }
            _ => turns.push(match role {
                Role::User => Message::user(content),
                Role::Assistant => Message::assistant(content),
            }),
        }
    }
    turns
}

impl Pipeline {
    /// Reply to `message` as the OKR coach, given the prior transcript
    pub async fn coach(&self, message: &str, history: &[ChatMessage]) -> Result<String, PipelineError> {
        debug!(history_len = history.len(), "Pipeline::coach: called");
        let ctx = coach_context(history);
        let turns = coach_turns(message, history);
        let raw = self
            .converse("coach", &ctx, turns, &self.stages.coach, "Failed to generate response")
            .await?;

        let reply = raw.trim();
        if reply.is_empty() {
            warn!("Pipeline::coach: empty model reply");
            return Ok(COACH_APOLOGY.to_string());
        }
        info!(reply_len = reply.len(), "Coach replied");
        Ok(reply.to_string())
    }
}
