//! # agent-runtime
//!
//! Runtime providers and the agent invoker for Agent Studio.
//!
//! ## Providers
//!
//! - **OpenAI**: chat completions API
//! - **Groq**: same client, Groq's OpenAI-compatible endpoint
//! - **Ollama** (default feature): local inference via `ollama-rs`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::{AgentInvoker, RuntimeConfig};
//!
//! let invoker = AgentInvoker::from_config(&RuntimeConfig::from_env());
//! let answer = invoker.invoke(request).await;
//! ```

pub mod config;
pub mod invoker;
pub mod openai;
pub mod registry;
pub mod search;

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "ollama")]
pub use ollama::OllamaProvider;

pub use config::RuntimeConfig;
pub use invoker::AgentInvoker;
pub use openai::OpenAiProvider;
pub use registry::{ProviderRegistry, ProviderStatus};
pub use search::TavilySearchTool;
