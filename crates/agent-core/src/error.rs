//! Error Types

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// LLM provider error
    #[error("Provider error: {0}")]
    Provider(String),
    
    /// Provider unavailable or not responding
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),
    
    /// Tool not found in registry
    #[error("Tool not found: {0}")]
    ToolNotFound(String),
    
    /// Tool validation failed
    #[error("Tool validation error: {0}")]
    ToolValidation(String),
    
    /// Tool execution failed
    #[error("Tool execution error: {0}")]
    ToolExecution(String),
    
    /// Maximum iterations reached in reasoning loop
    #[error("Maximum iterations ({0}) reached")]
    MaxIterations(usize),
    
    /// Configuration error (missing key, bad base URL)
    #[error("Configuration error: {0}")]
    Config(String),
    
    /// Rate limited
    #[error("Rate limited: {0}")]
    RateLimited(String),
    
    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Auth(String),
    
    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    
    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl AgentError {
    /// Map an upstream HTTP status and body to an error variant
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => AgentError::Auth(body.to_string()),
            429 => AgentError::RateLimited(body.to_string()),
            500..=599 => AgentError::ProviderUnavailable(format!("HTTP {status}: {body}")),
            _ => AgentError::Provider(format!("HTTP {status}: {body}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(AgentError::from_status(401, "bad key"), AgentError::Auth(_)));
        assert!(matches!(AgentError::from_status(429, "slow down"), AgentError::RateLimited(_)));
        assert!(matches!(AgentError::from_status(503, ""), AgentError::ProviderUnavailable(_)));
        assert!(matches!(AgentError::from_status(400, "bad model"), AgentError::Provider(_)));
    }
}
