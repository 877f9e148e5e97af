//! The model client boundary and its production "tools in a loop" executor.
//!
//! The agent core only depends on the `ModelClient` trait; `ChatExecutor` is
//! the production implementation driving an OpenAI-style chat API: call the
//! model, execute any requested tool calls, feed results back, and stop when
//! the model answers in plain text or the iteration budget runs out.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::llm::{ChatApi, ChatMessage, LlmError};
use crate::tools::ToolRegistry;

/// Faults at the model client boundary. `process_task` absorbs all of them
/// into an error-status task result.
#[derive(Debug, Error)]
pub enum ModelClientError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Max iterations ({0}) reached without a final response")]
    MaxIterations(usize),

    #[error("Model returned an empty response")]
    EmptyResponse,
}

/// Narrow interface to the reasoning loop: given a prompt and the agent's
/// tools, produce a final natural-language answer.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn reason(
        &self,
        prompt: &str,
        tools: &ToolRegistry,
        max_iterations: usize,
    ) -> Result<String, ModelClientError>;
}

/// Production `ModelClient` backed by a chat-completions API.
pub struct ChatExecutor {
    api: Arc<dyn ChatApi>,
    model: String,
    system_prompt: String,
}

impl ChatExecutor {
    pub fn new(api: Arc<dyn ChatApi>, model: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            api,
            model: model.into(),
            system_prompt: system_prompt.into(),
        }
    }
}

#[async_trait]
impl ModelClient for ChatExecutor {
    async fn reason(
        &self,
        prompt: &str,
        tools: &ToolRegistry,
        max_iterations: usize,
    ) -> Result<String, ModelClientError> {
        let specs = tools.function_specs();
        let mut messages = vec![
            ChatMessage::system(&self.system_prompt),
            ChatMessage::user(prompt),
        ];

        for iteration in 0..max_iterations {
            debug!(iteration = iteration + 1, "model round-trip");

            let reply = self
                .api
                .chat_completion(&self.model, &messages, &specs)
                .await?;

            let tool_calls = reply.tool_calls.clone().unwrap_or_default();
            if tool_calls.is_empty() {
                return reply
                    .content
                    .filter(|content| !content.is_empty())
                    .ok_or(ModelClientError::EmptyResponse);
            }

            messages.push(reply);
            for call in &tool_calls {
                let output = match tools.get(&call.function.name) {
                    Some(tool) => {
                        let input = parse_input(&call.function.arguments);
                        tool.invoke(&input).await
                    }
                    None => format!("Error: Unknown tool '{}'", call.function.name),
                };
                debug!(tool = %call.function.name, "tool call completed");
                messages.push(ChatMessage::tool(&call.id, output));
            }
        }

        Err(ModelClientError::MaxIterations(max_iterations))
    }
}

/// Extract the single string input from the model's JSON arguments. Models
/// occasionally send a bare string instead of an object; accept both.
fn parse_input(arguments: &str) -> String {
    match serde_json::from_str::<Value>(arguments) {
        Ok(Value::Object(map)) => {
            if let Some(input) = map.get("input").and_then(Value::as_str) {
                input.to_string()
            } else {
                Value::Object(map).to_string()
            }
        }
        Ok(Value::String(s)) => s,
        _ => arguments.to_string(),
    }
}
