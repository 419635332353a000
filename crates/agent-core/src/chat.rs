//! Chat Wire Types
//!
//! The JSON contract of `POST /chat`, shared by the server and the web UI.

use serde::{Deserialize, Serialize};

use crate::invoke::{InvokeError, InvokeRequest};

/// Message shown when a request names a model outside the allow-list
pub const INVALID_MODEL_MESSAGE: &str = "❌ Invalid model name. Please select a valid AI model.";

/// Body of `POST /chat`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model_name: String,
    pub model_provider: String,
    pub system_prompt: String,
    pub messages: Vec<String>,
    pub allow_search: bool,
}

impl ChatRequest {
    /// The utterance the agent answers: the last entry of `messages`
    pub fn query(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }

    /// Invocation for the current query, if there is one
    pub fn to_invoke_request(&self) -> Option<InvokeRequest> {
        self.query().map(|prompt| InvokeRequest {
            model_id: self.model_name.clone(),
            provider: self.model_provider.clone(),
            prompt: prompt.to_string(),
            allow_search: self.allow_search,
            system_prompt: self.system_prompt.clone(),
        })
    }
}

/// Machine-readable failure class
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidModel,
    EmptyMessages,
    InvalidProvider,
    NoResponse,
    /// Also assumed for bodies that carry no code
    #[default]
    AgentError,
}

/// Error envelope returned instead of an answer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default)]
    pub code: ErrorCode,
}

impl ErrorBody {
    pub fn new(code: ErrorCode, error: impl Into<String>) -> Self {
        Self { error: error.into(), code }
    }

    pub fn invalid_model() -> Self {
        Self::new(ErrorCode::InvalidModel, INVALID_MODEL_MESSAGE)
    }
}

impl From<&InvokeError> for ErrorBody {
    fn from(err: &InvokeError) -> Self {
        let code = match err {
            InvokeError::UnknownProvider(_) => ErrorCode::InvalidProvider,
            InvokeError::NoResponse => ErrorCode::NoResponse,
            InvokeError::Agent(_) => ErrorCode::AgentError,
        };
        Self::new(code, err.user_message())
    }
}

/// Response of `POST /chat`: a bare JSON string, or an error envelope
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatReply {
    Answer(String),
    Error(ErrorBody),
}

impl ChatReply {
    /// Text to display in the conversation
    pub fn display_text(&self) -> &str {
        match self {
            ChatReply::Answer(text) => text,
            ChatReply::Error(body) => &body.error,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ChatReply::Error(_))
    }
}

impl From<Result<String, InvokeError>> for ChatReply {
    fn from(result: Result<String, InvokeError>) -> Self {
        match result {
            Ok(answer) => ChatReply::Answer(answer),
            Err(err) => ChatReply::Error(ErrorBody::from(&err)),
        }
    }
}
