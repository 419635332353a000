//! Reasoning Loop
//!
//! Implements the ReAct (Reason + Act) pattern for agent behavior.
//! The agent observes, thinks, acts (via tools), and responds.

use std::sync::Arc;

use crate::error::{AgentError, Result};
use crate::message::{Message, Role, Transcript};
use crate::provider::{GenerationOptions, LlmProvider};
use crate::tool::{ToolCall, ToolRegistry, ToolResult};

/// Prompt used when the caller supplies an empty or blank system prompt
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a smart and friendly AI assistant. \
Answer all questions using 3–5 clear bullet points, under 80 words total.";

/// Resolve a caller-supplied system prompt, falling back to [`DEFAULT_SYSTEM_PROMPT`]
pub fn resolve_system_prompt(prompt: &str) -> String {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        DEFAULT_SYSTEM_PROMPT.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// System prompt
    pub system_prompt: String,
    
    /// Maximum model calls per turn before giving up
    pub max_iterations: usize,
    
    /// Generation options
    pub generation: GenerationOptions,
    
    /// Whether to append tool descriptions to system prompt
    pub inject_tool_descriptions: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            max_iterations: 10,
            generation: GenerationOptions::default(),
            inject_tool_descriptions: true,
        }
    }
}

/// The main Agent struct
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Agent {
    /// Create a new agent
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }
    
    /// Build the full system prompt including tool descriptions
    pub fn system_prompt(&self) -> String {
        let mut prompt = self.config.system_prompt.clone();
        
        if self.config.inject_tool_descriptions && !self.tools.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(&self.tools.generate_prompt_section());
        }
        
        prompt
    }
    
    /// Run the reasoning loop until the model answers without a tool call
    pub async fn run(&self, transcript: &mut Transcript) -> Result<String> {
        if transcript.messages().first().map(|m| m.role) != Some(Role::System) {
            transcript.messages_mut().insert(0, Message::system(self.system_prompt()));
        }
        
        let mut iterations = 0;
        
        loop {
            iterations += 1;
            
            if iterations > self.config.max_iterations {
                return Err(AgentError::MaxIterations(self.config.max_iterations));
            }
            
            let completion = self.provider
                .complete(transcript.messages(), &self.config.generation)
                .await?;
            
            let content = completion.content;
            transcript.push(Message::assistant(content.clone()));
            
            if let Some(tool_call) = parse_tool_call(&content) {
                tracing::debug!(tool = %tool_call.name, iteration = iterations, "Executing tool");
                
                let result = self.execute_tool(&tool_call).await;
                transcript.push(Message::tool(format_tool_result(&result), tool_call.id.clone()));
                continue;
            }
            
            return Ok(content);
        }
    }
    
    /// Answer a single user message, returning the full message trace
    pub async fn invoke(&self, question: &str) -> Result<Transcript> {
        let mut transcript = Transcript::with_system_prompt(self.system_prompt());
        transcript.push(Message::user(question));
        self.run(&mut transcript).await?;
        Ok(transcript)
    }
    
    async fn execute_tool(&self, call: &ToolCall) -> ToolResult {
        match self.tools.execute(call).await {
            Ok(mut result) => {
                result.id = call.id.clone();
                result
            }
            Err(e) => {
                tracing::warn!(tool = %call.name, error = %e, "Tool call failed");
                let mut result = ToolResult::failure(call.name.clone(), format!("Error: {e}"));
                result.id = call.id.clone();
                result
            }
        }
    }
}

/// Parse a tool call from an LLM response
fn parse_tool_call(content: &str) -> Option<ToolCall> {
    const TOOL_START: &str = "```tool";
    const TOOL_END: &str = "```";
    
    if let Some(start_idx) = content.find(TOOL_START) {
        let after_marker = &content[start_idx + TOOL_START.len()..];
        if let Some(end_idx) = after_marker.find(TOOL_END) {
            let json_str = after_marker[..end_idx].trim();
            if let Ok(call) = serde_json::from_str::<ToolCall>(json_str) {
                return Some(with_call_id(call));
            }
        }
    }
    
    parse_inline_tool_call(content).map(with_call_id)
}

/// Fallback: a bare JSON object carrying a "tool" key
fn parse_inline_tool_call(content: &str) -> Option<ToolCall> {
    if !content.contains(r#""tool""#) {
        return None;
    }
    
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    
    if end <= start {
        return None;
    }
    
    serde_json::from_str::<ToolCall>(&content[start..=end]).ok()
}

fn with_call_id(mut call: ToolCall) -> ToolCall {
    if call.id.is_none() {
        call.id = Some(uuid::Uuid::new_v4().to_string());
    }
    call
}

fn format_tool_result(result: &ToolResult) -> String {
    if result.success {
        format!("[Tool '{}' returned]\n{}", result.name, result.output)
    } else {
        format!("[Tool '{}' failed]\n{}", result.name, result.output)
    }
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: ToolRegistry::new(),
            config: AgentConfig::default(),
        }
    }
    
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }
    
    pub fn tool<T: crate::tool::Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }
    
    /// Set the system prompt; blank prompts resolve to the default
    pub fn system_prompt(mut self, prompt: &str) -> Self {
        self.config.system_prompt = resolve_system_prompt(prompt);
        self
    }
    
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }
    
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }
    
    pub fn build(self) -> Result<Agent> {
        let provider = self.provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;
        
        Ok(Agent::new(provider, Arc::new(self.tools), self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Completion;
    use crate::tool::{ParameterSchema, Tool, ToolSchema};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned replies and records the messages it was shown
    struct ScriptedProvider {
        replies: Mutex<VecDeque<String>>,
        seen: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedProvider {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, messages: &[Message], options: &GenerationOptions) -> Result<Completion> {
            self.seen.lock().unwrap().push(messages.to_vec());
            let reply = self.replies.lock().unwrap().pop_front()
                .ok_or_else(|| AgentError::Provider("script exhausted".into()))?;
            Ok(Completion::text(reply, options.model.clone()))
        }
    }

    struct UpperTool;

    #[async_trait]
    impl Tool for UpperTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "upper".into(),
                description: "Uppercase text".into(),
                parameters: vec![ParameterSchema {
                    name: "text".into(),
                    param_type: "string".into(),
                    description: "Input".into(),
                    required: true,
                }],
            }
        }

        async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
            let text = call.str_arg("text").unwrap_or_default().to_uppercase();
            Ok(ToolResult::success("upper", text))
        }
    }

    #[test]
    fn test_parse_tool_call() {
        let content = r#"Let me check that for you.
```tool
{"tool": "upper", "arguments": {"text": "abc"}}
```"#;
        
        let call = parse_tool_call(content).unwrap();
        assert_eq!(call.name, "upper");
        assert_eq!(call.str_arg("text"), Some("abc"));
        assert!(call.id.is_some());
    }

    #[test]
    fn test_parse_inline_tool_call() {
        let call = parse_tool_call(r#"{"tool": "upper", "arguments": {"text": "x"}}"#).unwrap();
        assert_eq!(call.name, "upper");
        assert!(parse_tool_call("Paris is the capital of France.").is_none());
    }

    #[test]
    fn test_resolve_system_prompt() {
        assert_eq!(resolve_system_prompt(""), DEFAULT_SYSTEM_PROMPT);
        assert_eq!(resolve_system_prompt(" \n\t "), DEFAULT_SYSTEM_PROMPT);
        assert_eq!(resolve_system_prompt("  Act as a pirate. "), "Act as a pirate.");
    }

    #[tokio::test]
    async fn test_direct_answer() {
        let provider = Arc::new(ScriptedProvider::new(&["Dhaka."]));
        let agent = AgentBuilder::new()
            .provider(provider.clone())
            .system_prompt("")
            .model("gpt-4o")
            .build()
            .unwrap();

        let transcript = agent.invoke("Capital of Bangladesh?").await.unwrap();
        assert_eq!(transcript.last_assistant().unwrap().content, "Dhaka.");

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0][0].content, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(seen[0][1].content, "Capital of Bangladesh?");
    }

    #[tokio::test]
    async fn test_tool_round_trip() {
        let provider = Arc::new(ScriptedProvider::new(&[
            "```tool\n{\"tool\": \"upper\", \"arguments\": {\"text\": \"shout\"}}\n```",
            "It says SHOUT.",
        ]));
        let agent = AgentBuilder::new()
            .provider(provider.clone())
            .tool(UpperTool)
            .build()
            .unwrap();

        assert!(agent.system_prompt().contains("### upper"));

        let transcript = agent.invoke("shout please").await.unwrap();
        let roles: Vec<Role> = transcript.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::Tool, Role::Assistant]
        );
        assert!(transcript.messages()[3].content.contains("SHOUT"));
        assert_eq!(transcript.last_assistant().unwrap().content, "It says SHOUT.");
    }

    #[tokio::test]
    async fn test_unknown_tool_is_reported_to_model() {
        let provider = Arc::new(ScriptedProvider::new(&[
            r#"{"tool": "missing", "arguments": {}}"#,
            "Sorry, I cannot do that.",
        ]));
        let agent = AgentBuilder::new().provider(provider).build().unwrap();

        let transcript = agent.invoke("do it").await.unwrap();
        assert_eq!(
            transcript.messages()[3].content,
            "[Tool 'missing' failed]\nError: Tool not found: missing"
        );
    }

    #[tokio::test]
    async fn test_max_iterations() {
        let loop_reply = r#"{"tool": "upper", "arguments": {"text": "a"}}"#;
        let provider = Arc::new(ScriptedProvider::new(&[loop_reply, loop_reply, loop_reply]));
        let agent = AgentBuilder::new()
            .provider(provider)
            .tool(UpperTool)
            .max_iterations(2)
            .build()
            .unwrap();

        let err = agent.invoke("loop").await.unwrap_err();
        assert!(matches!(err, AgentError::MaxIterations(2)));
    }

    #[test]
    fn test_builder_requires_provider() {
        assert!(matches!(AgentBuilder::new().build(), Err(AgentError::Config(_))));
    }
}
