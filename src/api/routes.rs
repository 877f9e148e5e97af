//! Router, shared state, and request handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{Map, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::agent::{Agent, AgentInfo};
use crate::config::Config;

use super::types::{
    HealthResponse, HealthSettings, QueryRequest, QueryResponse, RootResponse, ToolsResponse,
};

/// Shared application state.
///
/// `agent` is `None` when construction failed (e.g. missing API key); the
/// server still runs and the agent endpoints answer 503.
#[derive(Clone)]
pub struct AppState {
    pub agent: Option<Arc<Agent>>,
    pub config: Config,
}

const AGENT_UNAVAILABLE: &str = "Agent not initialized - check your OPENAI_API_KEY";

fn require_agent(state: &AppState) -> Result<Arc<Agent>, (StatusCode, String)> {
    state
        .agent
        .clone()
        .ok_or((StatusCode::SERVICE_UNAVAILABLE, AGENT_UNAVAILABLE.to_string()))
}

/// Build the API router with CORS and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/agent/query", post(process_query))
        .route("/agent/info", get(agent_info))
        .route("/agent/tools", get(available_tools))
        // The chat page is served from anywhere, so allow any origin.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Construct the agent and start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let agent = match Agent::from_config(&config) {
        Ok(agent) => Some(Arc::new(agent)),
        Err(e) => {
            error!("Failed to initialize agent: {}", e);
            error!("The server will start, but agent endpoints answer 503");
            None
        }
    };

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState { agent, config };

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// GET / - liveness blurb.
async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: format!("{} is running", state.config.agent_name),
        status: "healthy".to_string(),
        agent_available: state.agent.is_some(),
    })
}

/// GET /health - agent health plus effective settings.
async fn health(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, String)> {
    let agent = require_agent(&state)?;

    Ok(Json(HealthResponse {
        health: agent.health_status(),
        settings: HealthSettings {
            port: state.config.port,
            model: state.config.model.clone(),
        },
    }))
}

/// POST /agent/query - run a task through the agent.
///
/// Task-level faults ride inside the response envelope with `status: error`;
/// transport-level errors are reserved for an unavailable agent (503) and
/// empty input (400).
async fn process_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, (StatusCode, String)> {
    let agent = require_agent(&state)?;

    if request.query.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Query must not be empty".to_string()));
    }

    let mut context = Map::new();
    context.insert(
        "session_id".to_string(),
        match &request.session_id {
            Some(id) => Value::String(id.clone()),
            None => Value::Null,
        },
    );

    let result = agent.process_task(&request.query, Some(context)).await;

    Ok(Json(QueryResponse {
        query: result.task,
        response: result.result,
        session_id: request.session_id,
        agent_name: result.agent_name,
        status: result.status,
    }))
}

/// GET /agent/info - agent capabilities.
async fn agent_info(
    State(state): State<AppState>,
) -> Result<Json<AgentInfo>, (StatusCode, String)> {
    let agent = require_agent(&state)?;
    Ok(Json(agent.agent_info()))
}

/// GET /agent/tools - tools the agent can use.
async fn available_tools(
    State(state): State<AppState>,
) -> Result<Json<ToolsResponse>, (StatusCode, String)> {
    let agent = require_agent(&state)?;
    Ok(Json(ToolsResponse {
        tools: agent.available_tools(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{ModelClient, ModelClientError, TaskStatus};
    use crate::tools::{self, ToolRegistry};
    use async_trait::async_trait;

    struct EchoClient;

    #[async_trait]
    impl ModelClient for EchoClient {
        async fn reason(
            &self,
            prompt: &str,
            _tools: &ToolRegistry,
            _max_iterations: usize,
        ) -> Result<String, ModelClientError> {
            Ok(format!("echo: {}", prompt))
        }
    }

    fn state_with_agent() -> AppState {
        let config = Config::new(None);
        let agent = Agent::new(&config, Arc::new(EchoClient), tools::default_tools()).unwrap();
        AppState {
            agent: Some(Arc::new(agent)),
            config,
        }
    }

    fn state_without_agent() -> AppState {
        AppState {
            agent: None,
            config: Config::new(None),
        }
    }

    #[tokio::test]
    async fn root_reports_agent_availability() {
        let Json(up) = root(State(state_with_agent())).await;
        assert!(up.agent_available);
        assert_eq!(up.status, "healthy");

        let Json(down) = root(State(state_without_agent())).await;
        assert!(!down.agent_available);
        assert_eq!(down.status, "healthy");
    }

    #[tokio::test]
    async fn agent_endpoints_answer_503_without_an_agent() {
        let state = state_without_agent();

        let (status, _) = health(State(state.clone())).await.unwrap_err();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, _) = agent_info(State(state.clone())).await.unwrap_err();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, _) = available_tools(State(state.clone())).await.unwrap_err();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let request = QueryRequest {
            query: "hi".to_string(),
            session_id: None,
        };
        let (status, _) = process_query(State(state), Json(request)).await.unwrap_err();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn query_round_trip() {
        let request = QueryRequest {
            query: "What is 2 + 2?".to_string(),
            session_id: Some("s-1".to_string()),
        };

        let Json(response) = process_query(State(state_with_agent()), Json(request))
            .await
            .unwrap();

        assert_eq!(response.query, "What is 2 + 2?");
        assert_eq!(response.status, TaskStatus::Success);
        assert_eq!(response.session_id.as_deref(), Some("s-1"));
        // Context (with the session id) is folded into the prompt.
        assert!(response.response.contains("s-1"), "{}", response.response);
    }

    #[tokio::test]
    async fn empty_query_is_rejected_before_the_agent() {
        let request = QueryRequest {
            query: "   ".to_string(),
            session_id: None,
        };

        let (status, message) = process_query(State(state_with_agent()), Json(request))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(message.contains("empty"));
    }

    #[tokio::test]
    async fn health_includes_the_settings_block() {
        let Json(response) = health(State(state_with_agent())).await.unwrap();
        assert_eq!(response.settings.port, 8000);
        assert_eq!(response.settings.model, "gpt-4");
        assert_eq!(response.health.tools_loaded, 2);
    }

    #[tokio::test]
    async fn tools_endpoint_lists_both_tools() {
        let Json(response) = available_tools(State(state_with_agent())).await.unwrap();
        let names: Vec<&str> = response.tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["calculator", "text_analyzer"]);
    }
}
