//! Party planner agent - menu suggestion and schedule reasoning.

use std::sync::Arc;

use alfred_agents::agent::Agent;
use alfred_agents::config::Config;
use alfred_agents::llm::OpenRouterClient;
use alfred_agents::tools::{SuggestMenu, ToolRegistry, WebSearch};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_TASK: &str = "\
Alfred needs to prepare for the party. Here are the tasks:
1. Prepare the drinks - 30 minutes
2. Decorate the mansion - 60 minutes
3. Decide on the menu - 5 minutes
4. Set up the menu - 45 minutes
5. Prepare the music and playlist - 45 minutes

Answer the following questions:
1. If we start right now, at what time will the party be ready?
2. What menu should Alfred prepare for the party?
3. What music should be played at the party?";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alfred_agents=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    info!("Loaded configuration: model={}", config.default_model);

    let task = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_TASK.to_string());

    let llm = Arc::new(OpenRouterClient::new(config.api_key.clone()));
    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(SuggestMenu));
    tools.register(Arc::new(WebSearch::from_config(&config)?));

    let agent = Agent::new(
        llm,
        tools,
        vec![],
        config.default_model.clone(),
        config.max_steps,
    );

    let run = agent.run(&task).await?;
    println!("{}", run.answer);
    Ok(())
}
