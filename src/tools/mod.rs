//! Tool layer: callable capabilities exposed to the agent loop.
//!
//! Every tool declares a name, a description shown to the model, and a JSON
//! schema for its parameters. Tools own whatever they need at construction
//! time (HTTP client, browser session, LLM client) so nothing is reached
//! through ambient globals.

mod browser;
mod github;
mod menu;
mod search;
mod travel;
mod web;

pub use browser::{ClosePopups, FindText, GoBack, Navigate, Scroll};
pub use github::{GetIssue, GetIssueNumbers, ScoreIssues};
pub use menu::SuggestMenu;
pub use search::WebSearch;
pub use travel::CargoTravelTime;
pub use web::VisitWebpage;

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// A capability the agent can invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn parameters_schema(&self) -> Value;

    async fn execute(&self, args: Value) -> anyhow::Result<String>;
}

/// Name and description of a registered tool, for prompt building.
pub struct ToolInfo {
    pub name: String,
    pub description: String,
}

/// Registry of tools available to one agent.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool. Later registrations with the same name replace earlier ones.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_none() {
            self.order.push(name);
        }
    }

    /// Tools in registration order, for the system prompt.
    pub fn list_tools(&self) -> Vec<ToolInfo> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| ToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
            })
            .collect()
    }

    /// Tool schemas in the OpenAI function-calling format.
    pub fn get_tool_schemas(&self) -> Vec<Value> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| {
                json!({
                    "type": "function",
                    "function": {
                        "name": t.name(),
                        "description": t.description(),
                        "parameters": t.parameters_schema(),
                    }
                })
            })
            .collect()
    }

    /// Execute a tool by name.
    pub async fn execute(&self, name: &str, args: Value) -> anyhow::Result<String> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown tool: {}", name))?;
        tool.execute(args).await
    }
}
