//! Conversation transcript types.

use serde::{Deserialize, Serialize};

/// Fixed greeting that opens every session.
pub const WELCOME_MESSAGE: &str = "Hello! I'm your legal document assistant. Upload your documents and ask me anything. I'll provide accurate answers with citations from your files.";

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    /// Citation labels, only meaningful for assistant messages
    #[serde(default)]
    pub citations: Vec<String>,
    /// Score in [0, 1]; `None` when unknown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            citations: Vec::new(),
            confidence: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            citations: Vec::new(),
            confidence: None,
        }
    }

    /// Replaces the citation list.
    pub fn with_citations(mut self, citations: Vec<String>) -> Self {
        self.citations = citations;
        self
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }
}

/// Append-only, ordered conversation history.
///
/// Entries cannot be edited, removed, or reordered once pushed. The first
/// entry is always the welcome message.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Creates a transcript holding only the welcome message.
    pub fn new() -> Self {
        Self {
            messages: vec![Message::assistant(WELCOME_MESSAGE)],
        }
    }

    /// Appends the user's question ahead of the network call.
    ///
    /// The text is stored exactly as submitted; emptiness is checked by the
    /// caller.
    pub fn append_user_question(&mut self, question: impl Into<String>) {
        self.messages.push(Message::user(question));
    }

    /// Appends an assistant reply, error or system summary.
    pub fn append_assistant(&mut self, message: Message) {
        debug_assert_eq!(message.role, MessageRole::Assistant);
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_transcript_starts_with_welcome() {
        let transcript = Transcript::new();
        assert_eq!(transcript.len(), 1);
        let first = &transcript.messages()[0];
        assert_eq!(first.role, MessageRole::Assistant);
        assert_eq!(first.content, WELCOME_MESSAGE);
        assert!(first.citations.is_empty());
        assert!(first.confidence.is_none());
    }

    #[test]
    fn test_append_preserves_order() {
        let mut transcript = Transcript::new();
        transcript.append_user_question("What is the termination clause?");
        transcript.append_assistant(
            Message::assistant("30 days notice.").with_citations(vec!["p.4".to_string()]),
        );

        let messages = transcript.messages();
        assert_eq!(messages.len(), 3);
        assert!(messages[1].is_user());
        assert_eq!(messages[1].content, "What is the termination clause?");
        assert_eq!(messages[2].role, MessageRole::Assistant);
        assert_eq!(messages[2].citations, vec!["p.4".to_string()]);
    }

    #[test]
    fn test_message_role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::user("hi")).unwrap();
        assert!(json.contains(r#""role":"user""#));
        assert!(!json.contains("confidence"));
    }
}
