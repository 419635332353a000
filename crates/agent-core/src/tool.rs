//! Tool System
//!
//! Extensible tool framework for agent capabilities.
//! Tools are registered per agent and invoked by the reasoning loop.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

use crate::error::{AgentError, Result};

/// Tool call request from the LLM
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool identifier
    #[serde(alias = "tool")]
    pub name: String,
    
    /// Arguments as key-value pairs
    #[serde(default)]
    pub arguments: HashMap<String, serde_json::Value>,
    
    /// Optional call ID for tracking
    #[serde(default)]
    pub id: Option<String>,
}

impl ToolCall {
    /// String argument lookup
    pub fn str_arg(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }
}

/// Result from tool execution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolResult {
    /// Tool that was called
    pub name: String,
    
    /// Call ID (if provided in request)
    pub id: Option<String>,
    
    /// Whether execution succeeded
    pub success: bool,
    
    /// Output (success message or error)
    pub output: String,
    
    /// Structured data (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ToolResult {
    pub fn success(name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            success: true,
            output: output.into(),
            data: None,
        }
    }
    
    pub fn failure(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            success: false,
            output: error.into(),
            data: None,
        }
    }
    
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Parameter definition for tool schema
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Parameter name
    pub name: String,
    
    /// JSON Schema type (string, number, boolean, object, array)
    #[serde(rename = "type")]
    pub param_type: String,
    
    /// Human-readable description
    pub description: String,
    
    /// Whether this parameter is required
    #[serde(default)]
    pub required: bool,
}

/// Tool definition schema (rendered into the system prompt)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique tool identifier
    pub name: String,
    
    /// Human-readable description (shown to LLM)
    pub description: String,
    
    /// Parameter definitions
    pub parameters: Vec<ParameterSchema>,
}

/// Tool trait - implement to add new capabilities
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's schema
    fn schema(&self) -> ToolSchema;
    
    /// Execute the tool with given arguments
    async fn execute(&self, call: &ToolCall) -> Result<ToolResult>;
    
    /// Validate arguments before execution (optional)
    fn validate(&self, call: &ToolCall) -> Result<()> {
        let schema = self.schema();
        
        for param in &schema.parameters {
            if param.required && !call.arguments.contains_key(&param.name) {
                return Err(AgentError::ToolValidation(format!(
                    "Missing required parameter: {}",
                    param.name
                )));
            }
        }
        
        Ok(())
    }
}

/// Registry for available tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Register a new tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.register_shared(Arc::new(tool));
    }
    
    /// Register a shared tool
    pub fn register_shared(&mut self, tool: Arc<dyn Tool>) {
        let schema = tool.schema();
        self.tools.insert(schema.name, tool);
    }
    
    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }
    
    /// Execute a tool call
    pub async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let tool = self.get(&call.name).ok_or_else(|| {
            AgentError::ToolNotFound(call.name.clone())
        })?;
        
        tool.validate(call)?;
        tool.execute(call).await
    }
    
    /// Get all tool schemas, sorted by name
    pub fn schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<_> = self.tools.values().map(|t| t.schema()).collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }
    
    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }
    
    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
    
    /// Generate system prompt section describing available tools
    pub fn generate_prompt_section(&self) -> String {
        let mut prompt = String::from("## Available Tools\n\n");
        prompt.push_str("You can use the following tools by responding with a JSON block:\n\n");
        prompt.push_str("```tool\n{\"tool\": \"tool_name\", \"arguments\": {\"arg\": \"value\"}}\n```\n\n");
        prompt.push_str("After receiving tool results, synthesize them into your answer.\n\n");
        
        for schema in self.schemas() {
            let _ = writeln!(prompt, "### {}", schema.name);
            let _ = writeln!(prompt, "{}", schema.description);
            
            if !schema.parameters.is_empty() {
                prompt.push_str("**Parameters:**\n");
                for param in &schema.parameters {
                    let required = if param.required { " (required)" } else { "" };
                    let _ = writeln!(
                        prompt,
                        "- `{}` ({}){}: {}",
                        param.name, param.param_type, required, param.description
                    );
                }
            }
            prompt.push('\n');
        }
        
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "echo".into(),
                description: "Repeat the input".into(),
                parameters: vec![ParameterSchema {
                    name: "text".into(),
                    param_type: "string".into(),
                    description: "Text to repeat".into(),
                    required: true,
                }],
            }
        }

        async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
            Ok(ToolResult::success("echo", call.str_arg("text").unwrap_or_default()))
        }
    }

    fn call(name: &str, args: serde_json::Value) -> ToolCall {
        ToolCall {
            name: name.into(),
            arguments: serde_json::from_value(args).unwrap(),
            id: None,
        }
    }

    #[test]
    fn test_tool_registry() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());
        registry.register(EchoTool);
        
        assert_eq!(registry.len(), 1);
        assert!(registry.get("echo").is_some());
        assert!(registry.get("unknown").is_none());
    }

    #[tokio::test]
    async fn test_execute_validates_arguments() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let ok = registry.execute(&call("echo", serde_json::json!({"text": "hi"}))).await.unwrap();
        assert!(ok.success);
        assert_eq!(ok.output, "hi");

        let missing = registry.execute(&call("echo", serde_json::json!({}))).await;
        assert!(matches!(missing, Err(AgentError::ToolValidation(_))));

        let unknown = registry.execute(&call("nope", serde_json::json!({}))).await;
        assert!(matches!(unknown, Err(AgentError::ToolNotFound(_))));
    }

    #[test]
    fn test_tool_call_accepts_tool_key() {
        let parsed: ToolCall =
            serde_json::from_str(r#"{"tool": "echo", "arguments": {"text": "x"}}"#).unwrap();
        assert_eq!(parsed.name, "echo");
        assert_eq!(parsed.str_arg("text"), Some("x"));
    }

    #[test]
    fn test_prompt_section_lists_parameters() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);
        let section = registry.generate_prompt_section();
        
        assert!(section.contains("### echo"));
        assert!(section.contains("- `text` (string) (required): Text to repeat"));
    }
}
