//! Web Search Tool
//!
//! Tavily-backed search the agent can call before answering.

use agent_core::{
    error::{AgentError, Result},
    tool::{ParameterSchema, Tool, ToolCall, ToolResult, ToolSchema},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name the model uses to call the tool
pub const WEB_SEARCH_TOOL: &str = "web_search";

/// One search hit
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub content: String,
}

/// Errors from the search backend
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    
    #[error("Search API returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Tavily search as an agent tool
pub struct TavilySearchTool {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    max_results: u32,
}

impl TavilySearchTool {
    pub fn new(
        client: reqwest::Client,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        max_results: u32,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_results,
        }
    }
    
    /// Query Tavily and return at most `max_results` hits
    pub async fn search(&self, query: &str) -> std::result::Result<Vec<SearchResult>, SearchError> {
        let body = TavilyRequest {
            api_key: &self.api_key,
            query,
            max_results: self.max_results,
        };
        
        let response = self.client
            .post(format!("{}/search", self.base_url))
            .json(&body)
            .send()
            .await?;
        
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        
        let data: TavilyResponse = response.json().await?;
        Ok(data.results.into_iter().take(self.max_results as usize).collect())
    }
}

/// Render hits as plain text for the model
fn format_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No results found.".into();
    }
    
    results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {} ({})\n{}", i + 1, r.title, r.url, r.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[async_trait]
impl Tool for TavilySearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: WEB_SEARCH_TOOL.into(),
            description: "Search the web for current information".into(),
            parameters: vec![ParameterSchema {
                name: "query".into(),
                param_type: "string".into(),
                description: "Search query".into(),
                required: true,
            }],
        }
    }
    
    async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let query = call
            .str_arg("query")
            .ok_or_else(|| AgentError::ToolValidation("query must be a string".into()))?;
        
        let results = self
            .search(query)
            .await
            .map_err(|e| AgentError::ToolExecution(e.to_string()))?;
        
        tracing::debug!(query, hits = results.len(), "Web search complete");
        
        Ok(ToolResult::success(WEB_SEARCH_TOOL, format_results(&results))
            .with_data(serde_json::to_value(&results)?))
    }
}

#[derive(Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: u32,
}

#[derive(Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}
