//! Coaching transcript types

use serde::{Deserialize, Serialize};

/// Opening line the coach uses for every new session
pub const COACH_GREETING: &str = "Hello! I'm your OKR coach. What is the biggest objective you want to focus on right now? \
Tell me in your own words and we'll sharpen it together.";

/// Reply used when the model returns no text
pub const COACH_APOLOGY: &str = "Sorry, I couldn't come up with a response. Could you say that again?";

/// Who wrote a transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    #[serde(alias = "assistant", alias = "coach", alias = "model")]
    Ai,
}

impl ChatRole {
    /// Speaker label used in prompts
    pub fn label(self) -> &'static str {
        match self {
            ChatRole::User => "User",
            ChatRole::Ai => "Coach",
        }
    }
}

/// One line of the coaching conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Ai,
            content: content.into(),
        }
    }
}

/// Render a transcript as `User: ...` / `Coach: ...` lines
pub fn render_transcript(history: &[ChatMessage]) -> String {
    history
        .iter()
        .map(|m| format!("{}: {}", m.role.label(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_aliases() {
        let msgs: Vec<ChatMessage> = serde_json::from_str(
            r#"[{"role":"user","content":"a"},{"role":"ai","content":"b"},{"role":"assistant","content":"c"}]"#,
        )
        .unwrap();
        assert_eq!(msgs[0].role, ChatRole::User);
        assert_eq!(msgs[1].role, ChatRole::Ai);
        assert_eq!(msgs[2].role, ChatRole::Ai);
    }

    #[test]
    fn test_render_transcript() {
        let history = vec![ChatMessage::user("I want to grow the team"), ChatMessage::ai("By how much?")];
        assert_eq!(render_transcript(&history), "User: I want to grow the team\nCoach: By how much?");
        assert_eq!(render_transcript(&[]), "");
    }
}
