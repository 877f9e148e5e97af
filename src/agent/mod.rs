//! Agent module - identity, tool registry, and task processing.
//!
//! The agent composes a model client and a fixed tool set behind a single
//! `process_task` operation. Reasoning and tool selection are delegated to
//! the model client; the agent owns the request/response envelope and never
//! lets a task-time fault escape to its caller.

mod executor;
mod prompt;
mod task_agent;

pub use executor::{ChatExecutor, ModelClient, ModelClientError};
pub use task_agent::{Agent, AgentInfo, HealthStatus, TaskResult, TaskStatus, ToolListing};

use thiserror::Error;

use crate::tools::RegistryError;

/// Construction-time agent faults. These are the only errors the agent
/// surfaces directly; everything at task time is folded into a `TaskResult`.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Model API key not provided - set OPENAI_API_KEY")]
    MissingApiKey,

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
