//! # Task Agent
//!
//! A single-agent AI microservice with an HTTP task API.
//!
//! This library provides:
//! - An HTTP API for submitting tasks and inspecting the agent
//! - An agent that delegates reasoning and tool selection to a model client
//! - Built-in tools: a restricted arithmetic evaluator and a text analyzer
//!
//! ## Architecture
//!
//! The agent follows the "tools in a loop" pattern behind a narrow model
//! client boundary:
//! 1. Receive a task via the API
//! 2. Merge optional context into the prompt
//! 3. The model client calls the LLM, executes requested tool calls, and
//!    feeds results back until a final answer or the iteration budget
//! 4. Wrap the outcome in a structured success/error envelope
//!
//! ## Example
//!
//! ```rust,ignore
//! use task_agent::{agent::Agent, config::Config};
//!
//! let config = Config::from_env()?;
//! let agent = Agent::from_config(&config)?;
//! let result = agent.process_task("What is 2 + 2?", None).await;
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod llm;
pub mod tools;

pub use config::Config;
