//! Provider Registry
//!
//! Maps provider names to constructors. Adding a backend means registering
//! one more closure; nothing dispatches on provider strings elsewhere.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use agent_core::{AgentError, LlmProvider, Result};
use serde::Serialize;

use crate::config::RuntimeConfig;
use crate::openai::OpenAiProvider;

/// Builds a model client for one provider
pub type ProviderFactory = Arc<dyn Fn() -> Result<Arc<dyn LlmProvider>> + Send + Sync>;

/// Health view of one registry entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    pub name: String,
    /// Whether credentials are present
    pub configured: bool,
}

struct Entry {
    factory: ProviderFactory,
    configured: bool,
}

/// Provider name → client constructor
#[derive(Default)]
pub struct ProviderRegistry {
    entries: BTreeMap<String, Entry>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Register (or replace) a provider constructor
    pub fn register<F>(&mut self, name: impl Into<String>, configured: bool, factory: F)
    where
        F: Fn() -> Result<Arc<dyn LlmProvider>> + Send + Sync + 'static,
    {
        self.entries.insert(
            name.into(),
            Entry {
                factory: Arc::new(factory),
                configured,
            },
        );
    }
    
    /// OpenAI, Groq and (with the `ollama` feature) Ollama
    pub fn from_config(config: &RuntimeConfig) -> Self {
        let client = reqwest::Client::new();
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let mut registry = Self::new();
        
        registry.register_openai_compatible(
            "OpenAI",
            "OPENAI_API_KEY",
            config.openai_api_key.clone(),
            config.openai_base_url.clone(),
            client.clone(),
            timeout,
        );
        registry.register_openai_compatible(
            "Groq",
            "GROQ_API_KEY",
            config.groq_api_key.clone(),
            config.groq_base_url.clone(),
            client,
            timeout,
        );
        
        #[cfg(feature = "ollama")]
        {
            let host = config.ollama_host.clone();
            let port = config.ollama_port;
            registry.register("Ollama", true, move || {
                Ok(Arc::new(crate::ollama::OllamaProvider::new(host.clone(), port)) as Arc<dyn LlmProvider>)
            });
        }
        
        registry
    }
    
    fn register_openai_compatible(
        &mut self,
        name: &'static str,
        key_var: &'static str,
        api_key: Option<String>,
        base_url: String,
        client: reqwest::Client,
        timeout: Duration,
    ) {
        self.register(name, api_key.is_some(), move || {
            let api_key = api_key
                .clone()
                .ok_or_else(|| AgentError::Auth(format!("{key_var} is not set")))?;
            let provider = OpenAiProvider::new(name, client.clone(), api_key, base_url.clone())
                .with_timeout(timeout);
            Ok(Arc::new(provider) as Arc<dyn LlmProvider>)
        });
    }
    
    /// Construct a client; `None` when the provider is not registered
    pub fn create(&self, name: &str) -> Option<Result<Arc<dyn LlmProvider>>> {
        self.entries.get(name).map(|entry| (entry.factory)())
    }
    
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
    
    pub fn statuses(&self) -> Vec<ProviderStatus> {
        self.entries
            .iter()
            .map(|(name, entry)| ProviderStatus {
                name: name.clone(),
                configured: entry.configured,
            })
            .collect()
    }
    
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
