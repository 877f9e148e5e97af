//! API request and response types.

use serde::{Deserialize, Serialize};

use crate::agent::{HealthStatus, TaskStatus};

/// Request to run a task through the agent.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    /// The user's task or question
    pub query: String,

    /// Optional session tracking identifier
    pub session_id: Option<String>,
}

/// Response for a processed task.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    /// The original query
    pub query: String,

    /// The agent's answer, or a failure explanation
    pub response: String,

    /// Session identifier echoed back when provided
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Which agent answered
    pub agent_name: String,

    /// Task outcome: success or error
    pub status: TaskStatus,
}

/// Liveness blurb served at the root path.
#[derive(Debug, Clone, Serialize)]
pub struct RootResponse {
    /// Human-readable service banner
    pub message: String,

    /// Process liveness (always `healthy` if this answered)
    pub status: String,

    /// Whether the agent was constructed successfully
    pub agent_available: bool,
}

/// Health payload: agent health plus the effective server settings.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    #[serde(flatten)]
    pub health: HealthStatus,

    pub settings: HealthSettings,
}

/// Settings block reported by the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct HealthSettings {
    pub port: u16,
    pub model: String,
}

/// Tool list wrapper for the tools endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ToolsResponse {
    pub tools: Vec<crate::agent::ToolListing>,
}
