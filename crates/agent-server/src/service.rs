//! Request Service
//!
//! Allow-list check in front of the invoker. Rejected requests never reach it.

use std::sync::Arc;

use agent_core::{
    chat::{ChatReply, ChatRequest, ErrorBody, ErrorCode},
    Catalog, Invoker,
};

pub struct ChatService {
    catalog: Arc<Catalog>,
    invoker: Arc<dyn Invoker>,
}

impl ChatService {
    pub fn new(catalog: Arc<Catalog>, invoker: Arc<dyn Invoker>) -> Self {
        Self { catalog, invoker }
    }

    /// Validate and pass the last message through to the invoker
    pub async fn handle_chat(&self, request: ChatRequest) -> ChatReply {
        if !self.catalog.is_allowed_model(&request.model_name) {
            tracing::warn!(model = %request.model_name, "Rejected model outside allow-list");
            return ChatReply::Error(ErrorBody::invalid_model());
        }

        let Some(invoke) = request.to_invoke_request() else {
            tracing::warn!("Rejected chat request without messages");
            return ChatReply::Error(ErrorBody::new(
                ErrorCode::EmptyMessages,
                "No message to answer.",
            ));
        };

        ChatReply::from(self.invoker.invoke(invoke).await)
    }
}
