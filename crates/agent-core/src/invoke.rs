//! Agent Invocation Seam
//!
//! One request in, one tagged result out. Implementations build an agent
//! for the requested provider/model, run a single turn and report either the
//! final answer or a typed [`InvokeError`]. Nothing escapes as a panic.

use async_trait::async_trait;
use thiserror::Error;

use crate::error::AgentError;

/// Everything needed to answer one user utterance
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvokeRequest {
    pub model_id: String,
    pub provider: String,
    pub prompt: String,
    pub allow_search: bool,
    pub system_prompt: String,
}

/// Why an invocation produced no answer
#[derive(Error, Debug)]
pub enum InvokeError {
    /// Provider name is not in the registry
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
    
    /// The agent finished without any assistant message
    #[error("Agent produced no response")]
    NoResponse,
    
    /// Model, tool or agent construction failure
    #[error(transparent)]
    Agent(#[from] AgentError),
}

impl InvokeError {
    /// Text shown to the user in place of an answer
    pub fn user_message(&self) -> String {
        match self {
            InvokeError::UnknownProvider(_) => "❌ Invalid provider selected.".into(),
            InvokeError::NoResponse => "⚠️ No response from agent.".into(),
            InvokeError::Agent(e) => format!("🔥 Agent Error: {e}"),
        }
    }
}

/// Runs one agent turn
#[async_trait]
pub trait Invoker: Send + Sync {
    async fn invoke(&self, request: InvokeRequest) -> Result<String, InvokeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(
            InvokeError::UnknownProvider("Mistral".into()).user_message(),
            "❌ Invalid provider selected."
        );
        assert_eq!(InvokeError::NoResponse.user_message(), "⚠️ No response from agent.");
        assert_eq!(
            InvokeError::Agent(AgentError::Auth("OPENAI_API_KEY is not set".into())).user_message(),
            "🔥 Agent Error: Authentication failed: OPENAI_API_KEY is not set"
        );
    }
}
