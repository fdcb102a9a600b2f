//! GitHub REST API client for issue triage.
//!
//! Unauthenticated reads against `GET /repos/{owner}/{repo}/issues`. Only the
//! fields the agent consumes are deserialized.

use serde::Deserialize;
use thiserror::Error;

const GITHUB_API_URL: &str = "https://api.github.com";

#[derive(Debug, Error)]
pub enum GithubError {
    /// Network-level or HTTP-status failure.
    #[error("Error fetching the issue: {0}")]
    Fetch(String),

    /// The response arrived but could not be understood.
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A GitHub issue, body already converted to markdown.
#[derive(Debug, Clone)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub body: String,
}

impl Issue {
    /// Render the issue as a markdown document: `## title` plus the body.
    pub fn to_markdown(&self) -> String {
        format!("## {}\n\n{}", self.title, self.body)
    }
}

#[derive(Debug, Deserialize)]
struct IssuePayload {
    number: u64,
    title: Option<String>,
    body: Option<String>,
}

/// Client for the GitHub issues API.
pub struct GithubClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for GithubClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GithubClient {
    pub fn new() -> Self {
        Self::with_base_url(GITHUB_API_URL.to_string())
    }

    /// Point the client at a different API root (used by tests).
    pub fn with_base_url(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("alfred-agents/0.3")
            .build()
            .unwrap_or_default();
        Self { client, base_url }
    }

    /// Fetch one issue and convert its body to markdown with blank-line
    /// runs collapsed.
    pub async fn fetch_issue(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Issue, GithubError> {
        let url = format!("{}/repos/{}/{}/issues/{}", self.base_url, owner, repo, number);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GithubError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GithubError::Fetch(format!("HTTP {} for {}", status, url)));
        }

        let payload: IssuePayload = response
            .json()
            .await
            .map_err(|e| GithubError::Unexpected(e.to_string()))?;

        let title = payload.title.unwrap_or_default();
        let raw_body = payload.body.unwrap_or_default();
        let body = crate::markup::collapse_blank_lines(
            crate::markup::html_to_markdown(&raw_body).trim(),
        );

        Ok(Issue {
            number: payload.number,
            title,
            body,
        })
    }

    /// All open issue numbers for a repository.
    pub async fn list_issue_numbers(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<u64>, GithubError> {
        let url = format!("{}/repos/{}/{}/issues", self.base_url, owner, repo);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GithubError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GithubError::Fetch(format!("HTTP {} for {}", status, url)));
        }

        let payloads: Vec<IssuePayload> = response
            .json()
            .await
            .map_err(|e| GithubError::Unexpected(e.to_string()))?;

        Ok(payloads.into_iter().map(|p| p.number).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_markdown_has_title_heading() {
        let issue = Issue {
            number: 7,
            title: "Fix the thing".into(),
            body: "It is broken.".into(),
        };
        assert_eq!(issue.to_markdown(), "## Fix the thing\n\nIt is broken.");
    }
}
