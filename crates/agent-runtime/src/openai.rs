//! OpenAI-compatible Chat Completions Provider
//!
//! Serves both OpenAI and Groq: Groq exposes the same API under its own
//! base URL.

use std::time::Duration;

use agent_core::{
    error::{AgentError, Result},
    message::{Message, Role},
    provider::{Completion, FinishReason, GenerationOptions, LlmProvider, TokenUsage},
};
use async_trait::async_trait;
use serde::Deserialize;

use crate::config::{GROQ_BASE_URL, OPENAI_BASE_URL};

/// Chat completions client for one OpenAI-compatible endpoint
pub struct OpenAiProvider {
    name: String,
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl OpenAiProvider {
    pub fn new(
        name: impl Into<String>,
        client: reqwest::Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(120),
        }
    }
    
    /// OpenAI at its public endpoint
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::new("OpenAI", reqwest::Client::new(), api_key, OPENAI_BASE_URL)
    }
    
    /// Groq through its OpenAI-compatible endpoint
    pub fn groq(api_key: impl Into<String>) -> Self {
        Self::new("Groq", reqwest::Client::new(), api_key, GROQ_BASE_URL)
    }
    
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
    
    fn build_request_body(messages: &[Message], options: &GenerationOptions) -> serde_json::Value {
        let messages: Vec<serde_json::Value> = messages
            .iter()
            .map(|m| {
                serde_json::json!({
                    "role": wire_role(m.role),
                    "content": m.content,
                })
            })
            .collect();
        
        let mut body = serde_json::json!({
            "model": options.model,
            "messages": messages,
            "temperature": options.temperature,
            "top_p": options.top_p,
            "max_tokens": options.max_tokens,
        });
        
        if !options.stop_sequences.is_empty() {
            body["stop"] = serde_json::json!(options.stop_sequences);
        }
        
        body
    }
}

/// Tool output is fed back as user context, not native tool messages
fn wire_role(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User | Role::Tool => "user",
        Role::Assistant => "assistant",
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        &self.name
    }
    
    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = Self::build_request_body(messages, options);
        
        tracing::debug!(provider = %self.name, model = %options.model, "Chat completion request");
        
        let response = self.client
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::ProviderUnavailable(e.to_string()))?;
        
        let status = response.status().as_u16();
        if status != 200 {
            let text = response.text().await.unwrap_or_default();
            return Err(AgentError::from_status(status, &text));
        }
        
        let data: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Provider(format!("Malformed response: {e}")))?;
        
        let choice = data.choices.into_iter().next()
            .ok_or_else(|| AgentError::Provider("No choices in response".into()))?;
        
        Ok(Completion {
            content: choice.message.content.unwrap_or_default(),
            model: data.model.unwrap_or_else(|| options.model.clone()),
            usage: data.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.finish_reason.as_deref().and_then(FinishReason::parse),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
