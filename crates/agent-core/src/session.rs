//! Session Management
//!
//! The conversation state behind one UI session. A [`ChatSession`] is an
//! explicit context object: the UI owns it and threads it through every
//! operation, and dropping it discards the conversations.
//!
//! Conversations materialize on their first saved message and are
//! append-only afterwards.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::chat::{ChatReply, ChatRequest};
use crate::message::{Message, Role};

/// Characters of the first message kept in a conversation title
const TITLE_CHARS: usize = 50;

/// Messages replayed as context in chain mode
const CHAIN_HISTORY: usize = 4;

/// Short random conversation identifier
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    /// First eight characters of a v4 UUID
    pub fn new() -> Self {
        let mut id = Uuid::new_v4().to_string();
        id.truncate(8);
        Self(id)
    }
    
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }
    
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Agent configuration a conversation was started with
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model: String,
    pub provider: String,
    pub search_enabled: bool,
    pub template: String,
}

/// Settings gathered from the UI for one query
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryConfig {
    pub provider: String,
    pub model: String,
    pub template: String,
    pub system_prompt: String,
    pub allow_search: bool,
}

impl QueryConfig {
    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            model: self.model.clone(),
            provider: self.provider.clone(),
            search_enabled: self.allow_search,
            template: self.template.clone(),
        }
    }
}

/// A named, ordered list of user/assistant messages
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub title: String,
    messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub model_info: ModelInfo,
}

impl Conversation {
    fn new(first_content: &str, model_info: ModelInfo) -> Self {
        Self {
            title: derive_title(first_content),
            messages: Vec::new(),
            created_at: Utc::now(),
            model_info,
        }
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
}

/// Title from the first message: up to 50 characters, with an ellipsis when cut
fn derive_title(content: &str) -> String {
    if content.chars().count() > TITLE_CHARS {
        let head: String = content.chars().take(TITLE_CHARS).collect();
        format!("{head}...")
    } else {
        content.to_string()
    }
}

/// Sidebar entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub title: String,
}

/// Totals shown in the footer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub conversations: usize,
    pub messages: usize,
}

/// Session errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("Please enter a query.")]
    EmptyQuery,
    
    #[error("Conversation not found: {0}")]
    UnknownConversation(ConversationId),
}

/// Failure to reach the chat endpoint or read its reply
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Endpoint answered with a non-200 status
    #[error("Error: {0}")]
    Status(u16),
    
    /// Network failure, timeout or undecodable body
    #[error("Exception occurred: {0}")]
    Failed(String),
}

/// Text stored as the assistant message for a chat outcome
pub fn render_reply(result: &Result<ChatReply, TransportError>) -> String {
    match result {
        Ok(reply) => reply.display_text().to_string(),
        Err(e) => e.to_string(),
    }
}

/// The network half of a query
#[async_trait(?Send)]
pub trait ChatBackend {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, TransportError>;
}

/// A query that has been validated and recorded, awaiting its reply
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingQuery {
    pub conversation_id: ConversationId,
    pub request: ChatRequest,
    pub model_info: ModelInfo,
}

/// Portable form of one conversation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportedConversation {
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub model_info: ModelInfo,
}

/// Everything `export_conversations` writes to the download file
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub conversations: BTreeMap<ConversationId, ExportedConversation>,
    pub exported_at: DateTime<Utc>,
}

impl ExportDocument {
    /// Download file name, e.g. `agent_conversations_20260101_120000.json`
    pub fn file_name(&self) -> String {
        format!(
            "agent_conversations_{}.json",
            self.exported_at.format("%Y%m%d_%H%M%S")
        )
    }
    
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Conversation state for one UI session
#[derive(Clone, Debug, Default)]
pub struct ChatSession {
    /// Creation order
    conversations: Vec<(ConversationId, Conversation)>,
    current: Option<ConversationId>,
    chain_mode: bool,
    query_counter: u64,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Start a new conversation and make it current
    ///
    /// Nothing is stored until the first message is saved.
    pub fn create_conversation(&mut self) -> ConversationId {
        let id = ConversationId::new();
        self.current = Some(id.clone());
        id
    }
    
    /// Append a message, creating the conversation on first use
    pub fn save_message(
        &mut self,
        id: &ConversationId,
        role: Role,
        content: &str,
        model_info: &ModelInfo,
    ) {
        let index = match self.position(id) {
            Some(index) => index,
            None => {
                self.conversations
                    .push((id.clone(), Conversation::new(content, model_info.clone())));
                self.conversations.len() - 1
            }
        };
        
        self.conversations[index].1.messages.push(Message::new(role, content));
    }
    
    /// Validate the input, record the user message and build the request
    pub fn prepare_query(
        &mut self,
        user_text: &str,
        config: &QueryConfig,
    ) -> Result<PendingQuery, SessionError> {
        if user_text.trim().is_empty() {
            return Err(SessionError::EmptyQuery);
        }
        
        let conversation_id = match &self.current {
            Some(id) => id.clone(),
            None => self.create_conversation(),
        };
        
        let outgoing = if self.chain_mode {
            self.chained_query(&conversation_id, user_text)
        } else {
            user_text.to_string()
        };
        
        let request = ChatRequest {
            model_name: config.model.clone(),
            model_provider: config.provider.clone(),
            system_prompt: config.system_prompt.clone(),
            messages: vec![outgoing],
            allow_search: config.allow_search,
        };
        
        let model_info = config.model_info();
        self.save_message(&conversation_id, Role::User, user_text, &model_info);
        
        Ok(PendingQuery {
            conversation_id,
            request,
            model_info,
        })
    }
    
    /// Record the assistant's reply and reset the input field
    ///
    /// A reply whose conversation was cleared while in flight is dropped;
    /// conversations always start with the user message.
    pub fn record_reply(&mut self, pending: &PendingQuery, text: &str) -> Result<(), SessionError> {
        if self.position(&pending.conversation_id).is_none() {
            tracing::debug!(id = %pending.conversation_id, "Dropping reply for discarded conversation");
            return Err(SessionError::UnknownConversation(pending.conversation_id.clone()));
        }
        self.save_message(&pending.conversation_id, Role::Assistant, text, &pending.model_info);
        self.query_counter += 1;
        Ok(())
    }
    
    /// Full query cycle: validate, record, call the backend, record the reply
    ///
    /// Returns the text stored as the assistant message.
    pub async fn send_query<B: ChatBackend + ?Sized>(
        &mut self,
        user_text: &str,
        config: &QueryConfig,
        backend: &B,
    ) -> Result<String, SessionError> {
        let pending = self.prepare_query(user_text, config)?;
        let text = render_reply(&backend.send(&pending.request).await);
        self.record_reply(&pending, &text)?;
        Ok(text)
    }
    
    /// Query text with the last few messages of the conversation as context
    fn chained_query(&self, id: &ConversationId, user_text: &str) -> String {
        let history = self
            .conversation(id)
            .map(|c| {
                let start = c.messages.len().saturating_sub(CHAIN_HISTORY);
                c.messages[start..]
                    .iter()
                    .map(|m| format!("{}: {}", m.role, m.content))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default();
        
        format!("Previous context:\n{history}\n\nCurrent query: {user_text}")
    }
    
    fn position(&self, id: &ConversationId) -> Option<usize> {
        self.conversations.iter().position(|(cid, _)| cid == id)
    }
    
    pub fn conversation(&self, id: &ConversationId) -> Option<&Conversation> {
        self.position(id).map(|i| &self.conversations[i].1)
    }
    
    /// The current conversation, once it has messages
    pub fn current_conversation(&self) -> Option<&Conversation> {
        self.current.as_ref().and_then(|id| self.conversation(id))
    }
    
    pub fn current_id(&self) -> Option<&ConversationId> {
        self.current.as_ref()
    }
    
    /// Make an existing conversation current
    pub fn select(&mut self, id: &ConversationId) -> Result<(), SessionError> {
        if self.position(id).is_none() {
            return Err(SessionError::UnknownConversation(id.clone()));
        }
        self.current = Some(id.clone());
        Ok(())
    }
    
    /// Deselect; the next query starts a fresh conversation
    pub fn new_chat(&mut self) {
        self.current = None;
    }
    
    /// Discard every conversation
    pub fn clear_all(&mut self) {
        tracing::debug!(count = self.conversations.len(), "Clearing conversations");
        self.conversations.clear();
        self.current = None;
    }
    
    /// Conversations, most recently created first
    pub fn sidebar(&self) -> Vec<ConversationSummary> {
        self.conversations
            .iter()
            .rev()
            .map(|(id, c)| ConversationSummary {
                id: id.clone(),
                title: c.title.clone(),
            })
            .collect()
    }
    
    pub fn chain_mode(&self) -> bool {
        self.chain_mode
    }
    
    pub fn set_chain_mode(&mut self, enabled: bool) {
        self.chain_mode = enabled;
    }
    
    /// Bumped after every answered query; keys the input widget
    pub fn query_counter(&self) -> u64 {
        self.query_counter
    }
    
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            conversations: self.conversations.len(),
            messages: self.conversations.iter().map(|(_, c)| c.len()).sum(),
        }
    }
    
    /// Snapshot of every conversation for download
    pub fn export_conversations(&self) -> ExportDocument {
        ExportDocument {
            conversations: self
                .conversations
                .iter()
                .map(|(id, c)| {
                    (
                        id.clone(),
                        ExportedConversation {
                            title: c.title.clone(),
                            messages: c.messages.clone(),
                            created_at: c.created_at,
                            model_info: c.model_info.clone(),
                        },
                    )
                })
                .collect(),
            exported_at: Utc::now(),
        }
    }
}
