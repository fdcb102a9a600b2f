//! # alfred-agents
//!
//! Tool-driven LLM agents built around a "tools in a loop" runtime.
//!
//! This library provides:
//! - A tool-calling agent loop with per-step records and step observers
//! - A browser session handle (CDP) with screenshot capture
//! - Tools for web search, webpage visiting, GitHub issue triage and scoring,
//!   menu suggestion, and cargo travel time estimation
//!
//! ## Architecture
//!
//! The agent follows the "tools in a loop" pattern:
//! 1. Build context with system prompt and available tools
//! 2. Call the LLM, parse the response, execute any tool calls
//! 3. Run step observers (e.g. attach a downsized browser screenshot)
//! 4. Feed results back to the LLM, repeat until the task completes
//!
//! ## Example
//!
//! ```rust,ignore
//! use alfred_agents::{agent::Agent, config::Config, llm::OpenRouterClient, tools::ToolRegistry};
//! use std::sync::Arc;
//!
//! let config = Config::from_env()?;
//! let llm = Arc::new(OpenRouterClient::new(config.api_key.clone()));
//! let mut tools = ToolRegistry::new();
//! tools.register(Arc::new(alfred_agents::tools::SuggestMenu));
//! let agent = Agent::new(llm, tools, vec![], config.default_model.clone(), config.max_steps);
//! let run = agent.run("Prepare a formal menu for the party.").await?;
//! ```

pub mod agent;
pub mod browser;
pub mod config;
pub mod github;
pub mod llm;
pub mod markup;
pub mod scoring;
pub mod tools;

pub use config::Config;
