//! The task-processing agent: identity, tools, and the result envelope.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{error, info};
use uuid::Uuid;

use crate::config::Config;
use crate::llm::OpenAiClient;
use crate::tools::{self, Tool, ToolRegistry};

use super::executor::{ChatExecutor, ModelClient};
use super::prompt::{build_system_prompt, build_task_prompt};
use super::AgentError;

/// Agent type reported in results and info payloads.
const AGENT_TYPE: &str = "TaskAgent";

/// Task outcome status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Success,
    Error,
}

/// Structured envelope returned by every `process_task` call.
///
/// Invariant: `status` is `Error` if and only if `error` is present.
#[derive(Debug, Clone, Serialize)]
pub struct TaskResult {
    /// The original task text
    pub task: String,

    /// The agent's answer, or a failure explanation on error
    pub result: String,

    /// Which agent produced this result
    pub agent_name: String,

    /// Agent variant identifier
    pub agent_type: String,

    /// Task outcome
    pub status: TaskStatus,

    /// Context passed by the caller, echoed back
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,

    /// Fault description, present only on error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Agent capability description for the info endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AgentInfo {
    pub name: String,

    #[serde(rename = "type")]
    pub agent_type: String,

    pub description: String,

    pub tools: Vec<crate::tools::ToolInfo>,

    pub status: String,

    pub model: String,
}

/// Tool listing entry for the tools endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ToolListing {
    pub name: String,
    pub description: String,
    pub agent: String,
}

/// Health snapshot, computed on demand.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub agent_name: String,
    pub agent_type: String,
    pub tools_loaded: usize,
    pub model_connected: bool,
    pub ready: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// An agent: identity metadata, a fixed tool registry, and a model client,
/// exposed behind a single task-processing operation.
///
/// The agent holds no mutable state, so any number of `process_task` calls
/// may be in flight concurrently; each one suspends only while awaiting the
/// model client.
pub struct Agent {
    name: String,
    description: String,
    model: String,
    max_iterations: usize,
    model_client: Arc<dyn ModelClient>,
    tools: ToolRegistry,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("model", &self.model)
            .field("max_iterations", &self.max_iterations)
            .finish_non_exhaustive()
    }
}

impl Agent {
    /// Build an agent with an explicit model client and tool set.
    ///
    /// # Errors
    ///
    /// Returns `AgentError::Registry` when a tool name is empty or collides
    /// with an already registered one. Construction failures are permanent:
    /// there is no valid agent to retry on.
    pub fn new(
        config: &Config,
        model_client: Arc<dyn ModelClient>,
        tool_set: Vec<Arc<dyn Tool>>,
    ) -> Result<Self, AgentError> {
        let mut tools = ToolRegistry::new();
        for tool in tool_set {
            tools.register(tool)?;
        }

        let agent = Self {
            name: config.agent_name.clone(),
            description: config.agent_description.clone(),
            model: config.model.clone(),
            max_iterations: config.max_iterations,
            model_client,
            tools,
        };

        info!(
            agent = %agent.name,
            tools = agent.tools.len(),
            "Agent initialized"
        );
        Ok(agent)
    }

    /// Build the production agent: OpenAI-backed executor plus the default
    /// tool set (calculator and text analyzer).
    ///
    /// # Errors
    ///
    /// Returns `AgentError::MissingApiKey` when the configuration carries no
    /// API key, in addition to the registration errors of [`Agent::new`].
    pub fn from_config(config: &Config) -> Result<Self, AgentError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(AgentError::MissingApiKey)?;

        info!(model = %config.model, "Connecting to model provider");

        let api = Arc::new(OpenAiClient::new(api_key));
        let system_prompt = build_system_prompt(&config.agent_name, &config.agent_description);
        let executor = ChatExecutor::new(api, config.model.clone(), system_prompt);

        Self::new(config, Arc::new(executor), tools::default_tools())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Process a task. Never fails: any fault during delegation is folded
    /// into an error-status result.
    pub async fn process_task(
        &self,
        task: &str,
        context: Option<Map<String, Value>>,
    ) -> TaskResult {
        let task_id = Uuid::new_v4();
        info!(%task_id, agent = %self.name, task, "Processing task");

        let prompt = build_task_prompt(task, context.as_ref());
        match self
            .model_client
            .reason(&prompt, &self.tools, self.max_iterations)
            .await
        {
            Ok(output) => {
                info!(%task_id, agent = %self.name, "Task completed");
                TaskResult {
                    task: task.to_string(),
                    result: output,
                    agent_name: self.name.clone(),
                    agent_type: AGENT_TYPE.to_string(),
                    status: TaskStatus::Success,
                    context,
                    error: None,
                }
            }
            Err(e) => {
                error!(%task_id, agent = %self.name, error = %e, "Task failed");
                TaskResult {
                    task: task.to_string(),
                    result: format!("Task failed: {}", e),
                    agent_name: self.name.clone(),
                    agent_type: AGENT_TYPE.to_string(),
                    status: TaskStatus::Error,
                    context,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Capability description: identity plus the ordered tool list.
    pub fn agent_info(&self) -> AgentInfo {
        AgentInfo {
            name: self.name.clone(),
            agent_type: AGENT_TYPE.to_string(),
            description: self.description.clone(),
            tools: self.tools.list(),
            status: "active".to_string(),
            model: self.model.clone(),
        }
    }

    /// Tools this agent can use, tagged with the agent name.
    pub fn available_tools(&self) -> Vec<ToolListing> {
        self.tools
            .list()
            .into_iter()
            .map(|tool| ToolListing {
                name: tool.name,
                description: tool.description,
                agent: self.name.clone(),
            })
            .collect()
    }

    /// Health snapshot for monitoring. Trivially healthy once constructed:
    /// the model client handle and tool registry are immutable.
    pub fn health_status(&self) -> HealthStatus {
        HealthStatus {
            status: "healthy".to_string(),
            agent_name: self.name.clone(),
            agent_type: AGENT_TYPE.to_string(),
            tools_loaded: self.tools.len(),
            model_connected: true,
            ready: true,
            error: None,
        }
    }
}
