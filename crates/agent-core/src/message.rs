//! Conversation Messages
//!
//! Standard message format used across the agent system, plus the
//! [`Transcript`] an agent builds up while answering a single turn.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Role of a message sender
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System prompt/instructions
    System,
    /// User input
    User,
    /// Assistant (LLM) response
    Assistant,
    /// Tool result (injected as context)
    Tool,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

/// A single message in a conversation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message role
    pub role: Role,
    
    /// Text content
    pub content: String,
    
    /// Timestamp
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    
    /// Tool call ID (for tool messages)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    /// Create a new message
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
            tool_call_id: None,
        }
    }
    
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
    
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
    
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
    
    /// Create a tool result message
    pub fn tool(content: impl Into<String>, tool_call_id: Option<String>) -> Self {
        let mut msg = Self::new(Role::Tool, content);
        msg.tool_call_id = tool_call_id;
        msg
    }
}

/// Message trace produced while an agent answers one turn
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }
    
    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        let mut transcript = Self::new();
        transcript.push(Message::system(prompt));
        transcript
    }
    
    /// Add a message
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }
    
    /// Get all messages
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
    
    pub(crate) fn messages_mut(&mut self) -> &mut Vec<Message> {
        &mut self.messages
    }
    
    /// Get the last message
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
    
    /// Last message authored by the assistant, if any
    pub fn last_assistant(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.role == Role::Assistant)
    }
    
    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }
    
    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello");
        assert!(msg.tool_call_id.is_none());
    }

    #[test]
    fn test_transcript() {
        let mut transcript = Transcript::with_system_prompt("You are helpful.");
        transcript.push(Message::user("Hi"));
        transcript.push(Message::assistant("Hello!"));
        
        assert_eq!(transcript.len(), 3);
        assert!(transcript.last().unwrap().role == Role::Assistant);
    }

    #[test]
    fn test_last_assistant_skips_tool_messages() {
        let mut transcript = Transcript::with_system_prompt("sys");
        transcript.push(Message::user("q"));
        transcript.push(Message::assistant("first"));
        transcript.push(Message::tool("result", Some("call-1".into())));
        
        assert_eq!(transcript.last_assistant().unwrap().content, "first");
        assert!(Transcript::new().last_assistant().is_none());
    }

    #[test]
    fn test_serialized_shape() {
        let msg = Message::assistant("done");
        let json = serde_json::to_value(&msg).unwrap();
        
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "done");
        assert!(json.get("timestamp").is_some());
        assert!(json.get("tool_call_id").is_none());
    }
}
