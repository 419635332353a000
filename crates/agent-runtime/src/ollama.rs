//! Ollama LLM Provider
//!
//! Implementation of `LlmProvider` for local Ollama inference.

use agent_core::{
    error::{AgentError, Result},
    message::{Message, Role},
    provider::{Completion, GenerationOptions, LlmProvider},
};
use async_trait::async_trait;
use ollama_rs::{
    generation::chat::{ChatMessage, MessageRole, request::ChatMessageRequest},
    Ollama,
};

/// Ollama LLM provider
pub struct OllamaProvider {
    client: Ollama,
}

impl OllamaProvider {
    /// Create a new Ollama provider with custom host/port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        let host = host.into();
        Self {
            client: Ollama::new(host, port),
        }
    }
    
    /// Create with default localhost settings
    pub fn localhost() -> Self {
        Self::new("http://localhost", 11434)
    }
    
    /// Convert agent messages to Ollama format
    fn convert_messages(messages: &[Message]) -> Vec<ChatMessage> {
        messages
            .iter()
            .map(|m| {
                let role = match m.role {
                    Role::System => MessageRole::System,
                    Role::User | Role::Tool => MessageRole::User,
                    Role::Assistant => MessageRole::Assistant,
                };
                ChatMessage::new(role, m.content.clone())
            })
            .collect()
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "Ollama"
    }
    
    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let request = ChatMessageRequest::new(
            options.model.clone(),
            Self::convert_messages(messages),
        );
        
        tracing::debug!(model = %options.model, "Ollama chat request");
        
        let response = self.client
            .send_chat_messages(request)
            .await
            .map_err(|e| AgentError::ProviderUnavailable(e.to_string()))?;
        
        Ok(Completion::text(response.message.content, options.model.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_conversion() {
        let messages = vec![
            Message::system("You are helpful."),
            Message::user("Hello"),
            Message::tool("[Tool 'web_search' returned]\n...", None),
        ];
        
        let converted = OllamaProvider::convert_messages(&messages);
        assert_eq!(converted.len(), 3);
        assert_eq!(converted[2].content, messages[2].content);
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(OllamaProvider::localhost().name(), "Ollama");
    }
}
