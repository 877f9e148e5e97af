//! OpenAI chat-completions client.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::{ChatApi, ChatMessage, FunctionCall, LlmError, Role, ToolCall};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Sampling temperature used for all requests.
const TEMPERATURE: f64 = 0.7;

/// Cap on response length.
const MAX_TOKENS: u32 = 1000;

/// Client for the OpenAI chat-completions API.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    api_base: String,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Override the API base URL (for tests or compatible providers).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn build_request(model: &str, messages: &[ChatMessage], tools: &[Value]) -> Value {
        let mut body = json!({
            "model": model,
            "messages": messages,
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });

        if !tools.is_empty() {
            body["tools"] = json!(tools);
            body["tool_choice"] = json!("auto");
        }

        body
    }

    fn parse_response(body: Value) -> Result<ChatMessage, LlmError> {
        let message = body["choices"]
            .get(0)
            .map(|choice| &choice["message"])
            .ok_or(LlmError::InvalidResponse)?;

        let content = message["content"].as_str().map(str::to_string);

        let tool_calls = message["tool_calls"].as_array().map(|calls| {
            calls
                .iter()
                .map(|call| ToolCall {
                    id: call["id"].as_str().unwrap_or_default().to_string(),
                    function: FunctionCall {
                        name: call["function"]["name"].as_str().unwrap_or_default().to_string(),
                        arguments: call["function"]["arguments"]
                            .as_str()
                            .unwrap_or("{}")
                            .to_string(),
                    },
                })
                .collect::<Vec<_>>()
        });

        Ok(ChatMessage {
            role: Role::Assistant,
            content,
            tool_calls: tool_calls.filter(|calls| !calls.is_empty()),
            tool_call_id: None,
        })
    }
}

#[async_trait]
impl ChatApi for OpenAiClient {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: &[Value],
    ) -> Result<ChatMessage, LlmError> {
        let body = Self::build_request(model, messages, tools);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let payload: Value = response.json().await?;

        if !status.is_success() {
            let message = payload["error"]["message"].as_str().unwrap_or("unknown error");
            return Err(LlmError::Api(format!("{}: {}", status, message)));
        }

        Self::parse_response(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_response() {
        let body = json!({
            "choices": [{
                "message": {"role": "assistant", "content": "The answer is 4."},
                "finish_reason": "stop"
            }]
        });

        let message = OpenAiClient::parse_response(body).unwrap();
        assert_eq!(message.content.as_deref(), Some("The answer is 4."));
        assert!(message.tool_calls.is_none());
    }

    #[test]
    fn parse_tool_call_response() {
        let body = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": "calculator", "arguments": "{\"input\": \"2 + 2\"}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        });

        let message = OpenAiClient::parse_response(body).unwrap();
        let calls = message.tool_calls.unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].function.name, "calculator");
        assert_eq!(calls[0].function.arguments, "{\"input\": \"2 + 2\"}");
    }

    #[test]
    fn missing_choices_is_invalid() {
        let result = OpenAiClient::parse_response(json!({"object": "chat.completion"}));
        assert!(matches!(result, Err(LlmError::InvalidResponse)));
    }

    #[test]
    fn request_includes_tools_only_when_present() {
        let messages = vec![ChatMessage::user("hi")];

        let bare = OpenAiClient::build_request("gpt-4", &messages, &[]);
        assert!(bare.get("tools").is_none());

        let spec = json!({"type": "function", "function": {"name": "calculator"}});
        let with_tools = OpenAiClient::build_request("gpt-4", &messages, &[spec]);
        assert_eq!(with_tools["tools"][0]["function"]["name"], "calculator");
        assert_eq!(with_tools["tool_choice"], "auto");
    }
}
