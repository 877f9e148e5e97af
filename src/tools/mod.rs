//! Agent tools: string-in/string-out capabilities exposed to the model.
//!
//! The model treats tool output as plain text to reason over, so a tool must
//! never fail: any internal problem is reported as an `Error: ...` string.
//! Tools are registered once at agent construction and immutable afterwards.

mod calculator;
mod text_analyzer;

pub use calculator::Calculator;
pub use text_analyzer::TextAnalyzer;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Tool name must not be empty")]
    EmptyName,

    #[error("Duplicate tool name: {0}")]
    DuplicateName(String),
}

/// A named capability the model can invoke with a free-form string input.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema for the tool's parameters. Tools here take a single
    /// free-form `input` string, so a shared default is provided.
    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "input": {
                    "type": "string",
                    "description": "Input for the tool as a single string"
                }
            },
            "required": ["input"]
        })
    }

    /// Run the tool. Must not panic; failures are encoded in the returned
    /// string with an `Error` prefix.
    async fn invoke(&self, input: &str) -> String;
}

/// Name/description pair reported by the info endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
}

/// Fixed, ordered collection of tools owned by one agent.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool. Names must be non-empty and unique within the registry.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        let name = tool.name();
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.get(name).is_some() {
            return Err(RegistryError::DuplicateName(name.to_string()));
        }
        self.tools.push(tool);
        Ok(())
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tool metadata in registration order.
    pub fn list(&self) -> Vec<ToolInfo> {
        self.tools
            .iter()
            .map(|t| ToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
            })
            .collect()
    }

    /// OpenAI-format function specs for the chat API.
    pub fn function_specs(&self) -> Vec<Value> {
        self.tools
            .iter()
            .map(|t| {
                json!({
                    "type": "function",
                    "function": {
                        "name": t.name(),
                        "description": t.description(),
                        "parameters": t.schema(),
                    }
                })
            })
            .collect()
    }
}

/// The default tool set for the single-agent service.
pub fn default_tools() -> Vec<Arc<dyn Tool>> {
    vec![Arc::new(Calculator), Arc::new(TextAnalyzer)]
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    #[async_trait]
    impl Tool for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "test tool"
        }

        async fn invoke(&self, input: &str) -> String {
            format!("{}: {}", self.0, input)
        }
    }

    #[test]
    fn register_preserves_order() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Named("alpha"))).unwrap();
        registry.register(Arc::new(Named("beta"))).unwrap();

        let names: Vec<String> = registry.list().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["alpha", "beta"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn register_rejects_duplicates() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Named("alpha"))).unwrap();

        let err = registry.register(Arc::new(Named("alpha"))).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName(name) if name == "alpha"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn register_rejects_empty_names() {
        let mut registry = ToolRegistry::new();
        let err = registry.register(Arc::new(Named(""))).unwrap_err();
        assert!(matches!(err, RegistryError::EmptyName));
    }

    #[test]
    fn function_specs_carry_the_input_parameter() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Named("alpha"))).unwrap();

        let specs = registry.function_specs();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0]["function"]["name"], "alpha");
        assert_eq!(
            specs[0]["function"]["parameters"]["required"][0],
            "input"
        );
    }

    #[test]
    fn default_tools_have_unique_names() {
        let mut registry = ToolRegistry::new();
        for tool in default_tools() {
            registry.register(tool).unwrap();
        }
        assert_eq!(registry.len(), 2);
        assert!(registry.get("calculator").is_some());
        assert!(registry.get("text_analyzer").is_some());
    }
}
