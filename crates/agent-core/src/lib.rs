//! # agent-core
//!
//! Core agent logic with provider-agnostic LLM abstraction, the chat wire
//! contract, and the per-session conversation model.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  ChatRequest   ┌──────────────┐  InvokeRequest  ┌───────────────────────────┐
//! │ ChatSession  │───────────────▶│ chat service │────────────────▶│ Invoker                   │
//! │ (UI state)   │◀───────────────│ (server)     │◀────────────────│  Agent = LlmProvider      │
//! └──────────────┘   ChatReply    └──────────────┘ Result<String,  │        + ToolRegistry     │
//!                                                   InvokeError>   │        + system prompt    │
//!                                                                  └───────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait enables swapping between OpenAI, Groq, Ollama,
//! or any other provider without changing agent logic. This crate has no
//! runtime dependency on tokio so the web frontend can share it.

pub mod catalog;
pub mod chat;
pub mod error;
pub mod invoke;
pub mod message;
pub mod provider;
pub mod reasoning;
pub mod session;
pub mod tool;

pub use catalog::Catalog;
pub use chat::{ChatReply, ChatRequest, ErrorBody, ErrorCode};
pub use error::{AgentError, Result};
pub use invoke::{InvokeError, InvokeRequest, Invoker};
pub use message::{Message, Role, Transcript};
pub use provider::LlmProvider;
pub use reasoning::{Agent, AgentBuilder};
pub use session::{ChatSession, ConversationId, QueryConfig};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult};
