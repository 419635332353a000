//! Runtime Configuration
//!
//! Provider credentials and endpoints, read from the environment.

/// Default OpenAI endpoint
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Groq serves an OpenAI-compatible API under this prefix
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

pub const TAVILY_BASE_URL: &str = "https://api.tavily.com";

/// Credentials and endpoints for every provider and tool
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub groq_api_key: Option<String>,
    pub groq_base_url: String,
    pub ollama_host: String,
    pub ollama_port: u16,
    pub tavily_api_key: Option<String>,
    pub tavily_base_url: String,
    /// Results requested from the search tool per query
    pub search_max_results: u32,
    /// Model calls allowed per turn
    pub max_iterations: usize,
    /// Upper bound on a single upstream HTTP call
    pub request_timeout_secs: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: OPENAI_BASE_URL.into(),
            groq_api_key: None,
            groq_base_url: GROQ_BASE_URL.into(),
            ollama_host: "http://localhost".into(),
            ollama_port: 11434,
            tavily_api_key: None,
            tavily_base_url: TAVILY_BASE_URL.into(),
            search_max_results: 2,
            max_iterations: 10,
            request_timeout_secs: 120,
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
    
    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        
        Self {
            openai_api_key: get("OPENAI_API_KEY"),
            openai_base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            groq_api_key: get("GROQ_API_KEY"),
            groq_base_url: get("GROQ_BASE_URL").unwrap_or(defaults.groq_base_url),
            ollama_host: get("OLLAMA_HOST").unwrap_or(defaults.ollama_host),
            ollama_port: get("OLLAMA_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.ollama_port),
            tavily_api_key: get("TAVILY_API_KEY"),
            tavily_base_url: get("TAVILY_BASE_URL").unwrap_or(defaults.tavily_base_url),
            max_iterations: get("AGENT_MAX_ITERATIONS")
                .and_then(|n| n.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_iterations),
            ..defaults
        }
    }
}
