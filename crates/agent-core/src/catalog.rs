//! Agent Catalog
//!
//! Static, read-only configuration shared by the server and the UI:
//! which models each provider may serve, and the named prompt templates.

use serde::{Deserialize, Serialize};

/// Models offered by one provider
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderModels {
    pub provider: String,
    pub models: Vec<String>,
}

/// Named system prompt preset
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub name: String,
    pub system_prompt: String,
}

/// Provider → model mapping plus prompt templates
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub providers: Vec<ProviderModels>,
    pub templates: Vec<PromptTemplate>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// The catalog shipped with the studio
    pub fn builtin() -> Self {
        fn provider(name: &str, models: &[&str]) -> ProviderModels {
            ProviderModels {
                provider: name.into(),
                models: models.iter().map(|m| (*m).to_string()).collect(),
            }
        }
        fn template(name: &str, prompt: &str) -> PromptTemplate {
            PromptTemplate {
                name: name.into(),
                system_prompt: prompt.into(),
            }
        }

        Self {
            providers: vec![
                provider("Groq", &["llama3-70b-8192", "mixtral-8x7b-32768", "llama-3.3-70b-versatile"]),
                provider("OpenAI", &["gpt-4o", "gpt-3.5-turbo"]),
                provider("Ollama", &["llama3.2"]),
            ],
            templates: vec![
                template("Research Analyst", "Act as a research analyst."),
                template("Content Strategist", "Act as a content strategist."),
                template("Custom Agent", "You are a helpful AI assistant."),
                template("Financial Advisor", "Act as a financial advisor."),
                template("Marketing Specialist", "Act as a marketing expert."),
            ],
        }
    }

    /// Whether a model name is on the allow-list of any provider
    pub fn is_allowed_model(&self, model: &str) -> bool {
        self.providers.iter().any(|p| p.models.iter().any(|m| m == model))
    }

    /// Every allow-listed model name, in catalog order
    pub fn allowed_models(&self) -> impl Iterator<Item = &str> {
        self.providers.iter().flat_map(|p| p.models.iter().map(String::as_str))
    }

    pub fn provider_names(&self) -> impl Iterator<Item = &str> {
        self.providers.iter().map(|p| p.provider.as_str())
    }

    /// Models for one provider (empty for unknown providers)
    pub fn models_for(&self, provider: &str) -> &[String] {
        self.providers
            .iter()
            .find(|p| p.provider == provider)
            .map_or(&[], |p| p.models.as_slice())
    }

    pub fn template(&self, name: &str) -> Option<&PromptTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// Keep only providers the runtime can serve; their models leave the allow-list
    pub fn retain_providers(&mut self, available: impl Fn(&str) -> bool) {
        self.providers.retain(|p| available(&p.provider));
    }
}
