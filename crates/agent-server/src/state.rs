//! Application State

use std::sync::Arc;

use agent_core::{Catalog, Invoker};
use agent_runtime::ProviderStatus;

use crate::service::ChatService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Request service in front of the agent invoker
    pub chat: Arc<ChatService>,
    
    /// Provider/model allow-list and prompt templates
    pub catalog: Arc<Catalog>,
    
    /// Provider credential status, fixed at startup
    pub providers: Arc<Vec<ProviderStatus>>,
    
    /// Whether the web search tool has credentials
    pub search_configured: bool,
}

impl AppState {
    pub fn new(
        invoker: Arc<dyn Invoker>,
        catalog: Catalog,
        providers: Vec<ProviderStatus>,
        search_configured: bool,
    ) -> Self {
        let catalog = Arc::new(catalog);
        Self {
            chat: Arc::new(ChatService::new(catalog.clone(), invoker)),
            catalog,
            providers: Arc::new(providers),
            search_configured,
        }
    }
}
