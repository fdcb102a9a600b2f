//! Issue triage agent - browser-driven GitHub issue research.
//!
//! Navigates GitHub in a real browser, lists open issues, and ranks them by
//! ease of implementation. After every step a downsized screenshot of the
//! page is attached for the model.

use std::sync::Arc;

use alfred_agents::agent::{Agent, ScreenshotObserver, StepObserver, BROWSER_INSTRUCTIONS};
use alfred_agents::browser::BrowserSession;
use alfred_agents::config::Config;
use alfred_agents::github::GithubClient;
use alfred_agents::llm::OpenRouterClient;
use alfred_agents::scoring::IssueScorer;
use alfred_agents::tools::{
    ClosePopups, FindText, GetIssue, GetIssueNumbers, GoBack, Navigate, ScoreIssues, Scroll,
    ToolRegistry,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_TASK: &str = "Please navigate to https://github.com/huggingface/smolagents/issues?q=is%3Aissue and give me a list of top 5 issues sorted by the ease of implementation.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alfred_agents=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration: model={}", config.default_model);

    let task = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_TASK.to_string());

    let session = Arc::new(BrowserSession::launch(config.headless).await?);

    // The browser must come down whether the run succeeds or fails.
    let result = run_agent(&config, session.clone(), &task).await;
    session.close().await;

    let answer = result?;
    println!("Final output:\n{}", answer);
    Ok(())
}

async fn run_agent(
    config: &Config,
    session: Arc<BrowserSession>,
    task: &str,
) -> anyhow::Result<String> {
    let llm = Arc::new(OpenRouterClient::new(config.api_key.clone()));
    let github = Arc::new(GithubClient::new());
    let scorer = IssueScorer::new(llm.clone(), config.default_model.clone());

    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(Navigate::new(session.clone())));
    tools.register(Arc::new(GoBack::new(session.clone())));
    tools.register(Arc::new(ClosePopups::new(session.clone())));
    tools.register(Arc::new(FindText::new(session.clone())));
    tools.register(Arc::new(Scroll::new(session.clone())));
    tools.register(Arc::new(GetIssueNumbers::new(github.clone())));
    tools.register(Arc::new(GetIssue::new(github.clone())));
    tools.register(Arc::new(ScoreIssues::new(github, scorer)));

    let observers: Vec<Arc<dyn StepObserver>> = vec![Arc::new(ScreenshotObserver::new(session))];

    let agent = Agent::new(
        llm,
        tools,
        observers,
        config.default_model.clone(),
        config.max_steps,
    )
    .with_prompt_addendum(BROWSER_INSTRUCTIONS);

    let run = agent.run(task).await?;
    Ok(run.answer)
}
