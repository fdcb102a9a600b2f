//! GitHub issue triage tools: fetch, list, and score issues.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::Tool;
use crate::github::GithubClient;
use crate::scoring::IssueScorer;

fn str_arg<'a>(args: &'a Value, name: &str) -> anyhow::Result<&'a str> {
    let value = args[name]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("Missing '{}' argument", name))?;
    if value.trim().is_empty() {
        return Err(anyhow::anyhow!("'{}' must not be empty", name));
    }
    Ok(value)
}

/// Fetch one GitHub issue as markdown.
pub struct GetIssue {
    github: Arc<GithubClient>,
}

impl GetIssue {
    pub fn new(github: Arc<GithubClient>) -> Self {
        Self { github }
    }
}

#[async_trait]
impl Tool for GetIssue {
    fn name(&self) -> &str {
        "get_issue"
    }

    fn description(&self) -> &str {
        "Fetches a GitHub issue by number and returns its title and body in markdown format."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "repo_owner": {
                    "type": "string",
                    "description": "The owner of the GitHub repository"
                },
                "repo_name": {
                    "type": "string",
                    "description": "The name of the GitHub repository"
                },
                "issue_number": {
                    "type": "integer",
                    "description": "The number of the GitHub issue"
                }
            },
            "required": ["repo_owner", "repo_name", "issue_number"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let owner = str_arg(&args, "repo_owner")?;
        let repo = str_arg(&args, "repo_name")?;
        let number = args["issue_number"]
            .as_u64()
            .ok_or_else(|| anyhow::anyhow!("Missing 'issue_number' argument"))?;

        let issue = self.github.fetch_issue(owner, repo, number).await?;
        Ok(issue.to_markdown())
    }
}

/// List all open issue numbers of a repository.
pub struct GetIssueNumbers {
    github: Arc<GithubClient>,
}

impl GetIssueNumbers {
    pub fn new(github: Arc<GithubClient>) -> Self {
        Self { github }
    }
}

#[async_trait]
impl Tool for GetIssueNumbers {
    fn name(&self) -> &str {
        "get_issue_numbers"
    }

    fn description(&self) -> &str {
        "Returns the numbers of all open issues in a GitHub repository."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "repo_owner": {
                    "type": "string",
                    "description": "The owner of the GitHub repository"
                },
                "repo_name": {
                    "type": "string",
                    "description": "The name of the GitHub repository"
                }
            },
            "required": ["repo_owner", "repo_name"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let owner = str_arg(&args, "repo_owner")?;
        let repo = str_arg(&args, "repo_name")?;

        let numbers = self.github.list_issue_numbers(owner, repo).await?;
        Ok(format!("{:?}", numbers))
    }
}

/// Score issues by ease of implementation (1 difficult .. 5 easy).
pub struct ScoreIssues {
    github: Arc<GithubClient>,
    scorer: IssueScorer,
}

impl ScoreIssues {
    pub fn new(github: Arc<GithubClient>, scorer: IssueScorer) -> Self {
        Self { github, scorer }
    }
}

#[async_trait]
impl Tool for ScoreIssues {
    fn name(&self) -> &str {
        "score_issues"
    }

    fn description(&self) -> &str {
        "Scores a list of GitHub issues based on the ease of implementation. Returns one score per issue, where higher scores indicate easier implementation (scale 1-5)."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "repo_owner": {
                    "type": "string",
                    "description": "The owner of the GitHub repository"
                },
                "repo_name": {
                    "type": "string",
                    "description": "The name of the GitHub repository"
                },
                "issue_numbers": {
                    "type": "array",
                    "items": {"type": "integer"},
                    "description": "The numbers of the GitHub issues to score"
                }
            },
            "required": ["repo_owner", "repo_name", "issue_numbers"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let owner = str_arg(&args, "repo_owner")?;
        let repo = str_arg(&args, "repo_name")?;
        let numbers: Vec<u64> = args["issue_numbers"]
            .as_array()
            .map(|a| a.iter().filter_map(|v| v.as_u64()).collect())
            .unwrap_or_default();
        if numbers.is_empty() {
            return Err(anyhow::anyhow!("Please provide at least one issue number."));
        }

        let mut issues = Vec::with_capacity(numbers.len());
        for number in &numbers {
            let issue = self.github.fetch_issue(owner, repo, *number).await?;
            issues.push(issue.to_markdown());
        }

        let scores = self.scorer.score(&issues).await?;
        let lines: Vec<String> = numbers
            .iter()
            .zip(&scores)
            .map(|(number, score)| format!("Issue #{}: score {}", number, score))
            .collect();
        Ok(lines.join("\n"))
    }
}
