//! Agent Invoker
//!
//! Builds a fresh single-turn agent per request: model client from the
//! registry, zero or one search tool, resolved system prompt.

use std::sync::Arc;

use agent_core::{
    AgentBuilder, AgentError, InvokeError, InvokeRequest, Invoker,
};
use async_trait::async_trait;

use crate::config::RuntimeConfig;
use crate::registry::{ProviderRegistry, ProviderStatus};
use crate::search::TavilySearchTool;

/// Search backend settings
#[derive(Clone, Debug)]
struct SearchSettings {
    api_key: Option<String>,
    base_url: String,
    max_results: u32,
}

/// Production [`Invoker`]
pub struct AgentInvoker {
    registry: ProviderRegistry,
    search: SearchSettings,
    client: reqwest::Client,
    max_iterations: usize,
}

impl AgentInvoker {
    pub fn new(registry: ProviderRegistry, config: &RuntimeConfig) -> Self {
        Self {
            registry,
            search: SearchSettings {
                api_key: config.tavily_api_key.clone(),
                base_url: config.tavily_base_url.clone(),
                max_results: config.search_max_results,
            },
            client: reqwest::Client::new(),
            max_iterations: config.max_iterations,
        }
    }
    
    /// Registry built from the same configuration
    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::new(ProviderRegistry::from_config(config), config)
    }
    
    pub fn provider_statuses(&self) -> Vec<ProviderStatus> {
        self.registry.statuses()
    }
    
    pub fn search_configured(&self) -> bool {
        self.search.api_key.is_some()
    }
    
    fn search_tool(&self) -> agent_core::Result<TavilySearchTool> {
        let api_key = self.search.api_key.clone()
            .ok_or_else(|| AgentError::Config("TAVILY_API_KEY is not set".into()))?;
        Ok(TavilySearchTool::new(
            self.client.clone(),
            api_key,
            self.search.base_url.clone(),
            self.search.max_results,
        ))
    }
    
    async fn run(&self, request: &InvokeRequest) -> Result<String, InvokeError> {
        let provider = self.registry
            .create(&request.provider)
            .ok_or_else(|| InvokeError::UnknownProvider(request.provider.clone()))??;
        
        let mut builder = AgentBuilder::new()
            .provider(provider)
            .model(request.model_id.clone())
            .system_prompt(&request.system_prompt)
            .max_iterations(self.max_iterations);
        
        if request.allow_search {
            builder = builder.tool(self.search_tool()?);
        }
        
        let transcript = builder.build()?.invoke(&request.prompt).await?;
        
        transcript
            .last_assistant()
            .map(|m| m.content.clone())
            .ok_or(InvokeError::NoResponse)
    }
}

#[async_trait]
impl Invoker for AgentInvoker {
    async fn invoke(&self, request: InvokeRequest) -> Result<String, InvokeError> {
        tracing::info!(
            provider = %request.provider,
            model = %request.model_id,
            search = request.allow_search,
            "Invoking agent"
        );
        
        let result = self.run(&request).await;
        if let Err(e) = &result {
            tracing::error!(provider = %request.provider, error = %e, "Agent invocation failed");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::{
        message::{Message, Role},
        provider::{Completion, GenerationOptions, LlmProvider},
        reasoning::DEFAULT_SYSTEM_PROMPT,
    };
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Canned replies; remembers every message list it was sent
    #[derive(Default)]
    struct Recorder {
        replies: Mutex<VecDeque<String>>,
        seen: Mutex<Vec<Vec<Message>>>,
        models: Mutex<Vec<String>>,
    }

    struct RecordingProvider(Arc<Recorder>);

    #[async_trait]
    impl LlmProvider for RecordingProvider {
        fn name(&self) -> &str {
            "Test"
        }

        async fn complete(&self, messages: &[Message], options: &GenerationOptions) -> agent_core::Result<Completion> {
            self.0.seen.lock().unwrap().push(messages.to_vec());
            self.0.models.lock().unwrap().push(options.model.clone());
            let reply = self.0.replies.lock().unwrap().pop_front()
                .ok_or_else(|| AgentError::ProviderUnavailable("upstream down".into()))?;
            Ok(Completion::text(reply, options.model.clone()))
        }
    }

    fn invoker(replies: &[&str], config: &RuntimeConfig) -> (AgentInvoker, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        recorder.replies.lock().unwrap().extend(replies.iter().map(|r| r.to_string()));

        let mut registry = ProviderRegistry::new();
        let shared = recorder.clone();
        registry.register("Test", true, move || {
            Ok(Arc::new(RecordingProvider(shared.clone())) as Arc<dyn LlmProvider>)
        });
        registry.register("Broken", false, || Err(AgentError::Auth("BROKEN_API_KEY is not set".into())));

        (AgentInvoker::new(registry, config), recorder)
    }

    fn request(provider: &str, system_prompt: &str, allow_search: bool) -> InvokeRequest {
        InvokeRequest {
            model_id: "gpt-4o".into(),
            provider: provider.into(),
            prompt: "Hi".into(),
            allow_search,
            system_prompt: system_prompt.into(),
        }
    }

    #[tokio::test]
    async fn test_blank_system_prompt_uses_default() {
        for blank in ["", "   ", "\n\t"] {
            let (invoker, recorder) = invoker(&["Hello!"], &RuntimeConfig::default());
            let answer = invoker.invoke(request("Test", blank, false)).await.unwrap();
            
            assert_eq!(answer, "Hello!");
            let seen = recorder.seen.lock().unwrap();
            assert_eq!(seen[0][0].role, Role::System);
            assert_eq!(seen[0][0].content, DEFAULT_SYSTEM_PROMPT);
            assert_eq!(seen[0][1].content, "Hi");
            assert_eq!(recorder.models.lock().unwrap()[0], "gpt-4o");
        }
    }

    #[tokio::test]
    async fn test_custom_system_prompt_is_kept() {
        let (invoker, recorder) = invoker(&["Arr."], &RuntimeConfig::default());
        invoker.invoke(request("Test", "Act as a research analyst.", false)).await.unwrap();
        
        assert_eq!(recorder.seen.lock().unwrap()[0][0].content, "Act as a research analyst.");
    }

    #[tokio::test]
    async fn test_unknown_provider() {
        let (invoker, recorder) = invoker(&[], &RuntimeConfig::default());
        let err = invoker.invoke(request("Mistral", "", false)).await.unwrap_err();
        
        assert!(matches!(err, InvokeError::UnknownProvider(ref p) if p == "Mistral"));
        assert_eq!(err.user_message(), "❌ Invalid provider selected.");
        assert!(recorder.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_construction_and_upstream_failures_are_tagged() {
        let (invoker, _) = invoker(&[], &RuntimeConfig::default());
        
        let err = invoker.invoke(request("Broken", "", false)).await.unwrap_err();
        assert!(matches!(err, InvokeError::Agent(AgentError::Auth(_))));
        
        let err = invoker.invoke(request("Test", "", false)).await.unwrap_err();
        assert_eq!(err.user_message(), "🔥 Agent Error: Provider unavailable: upstream down");
    }

    #[tokio::test]
    async fn test_search_requires_key() {
        let (invoker, recorder) = invoker(&["unused"], &RuntimeConfig::default());
        let err = invoker.invoke(request("Test", "", true)).await.unwrap_err();
        
        assert!(matches!(err, InvokeError::Agent(AgentError::Config(_))));
        assert!(recorder.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_tool_in_the_loop() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{"title": "Dhaka", "url": "https://example.com", "content": "Capital of Bangladesh"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = RuntimeConfig {
            tavily_api_key: Some("tvly-test".into()),
            tavily_base_url: server.uri(),
            ..Default::default()
        };
        let (invoker, recorder) = invoker(
            &[
                "```tool\n{\"tool\": \"web_search\", \"arguments\": {\"query\": \"capital of bangladesh\"}}\n```",
                "The capital is Dhaka.",
            ],
            &config,
        );

        let answer = invoker.invoke(request("Test", "", true)).await.unwrap();
        assert_eq!(answer, "The capital is Dhaka.");

        let seen = recorder.seen.lock().unwrap();
        assert!(seen[0][0].content.contains("### web_search"));
        let tool_message = seen[1].last().unwrap();
        assert_eq!(tool_message.role, Role::Tool);
        assert!(tool_message.content.contains("Capital of Bangladesh"));
    }
}
