//! GitHub issue fetching and scoring against a mocked API.

use std::sync::Arc;

use alfred_agents::github::{GithubClient, GithubError};
use alfred_agents::llm::{ChatMessage, ChatResponse, LlmClient};
use alfred_agents::scoring::IssueScorer;
use async_trait::async_trait;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// LLM stub that always answers with the same text.
struct FixedReplyLlm {
    reply: String,
}

#[async_trait]
impl LlmClient for FixedReplyLlm {
    async fn chat_completion(
        &self,
        _model: &str,
        _messages: &[ChatMessage],
        _tools: Option<&[serde_json::Value]>,
    ) -> anyhow::Result<ChatResponse> {
        Ok(ChatResponse {
            content: Some(self.reply.clone()),
            tool_calls: None,
        })
    }
}

#[tokio::test]
async fn fetches_issue_and_collapses_blank_lines() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/widgets/issues/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "number": 42,
            "title": "Widget crashes",
            "body": "First paragraph.\n\n\n\n\n\nSecond paragraph."
        })))
        .mount(&server)
        .await;

    let client = GithubClient::with_base_url(server.uri());
    let issue = client.fetch_issue("octo", "widgets", 42).await.unwrap();

    assert_eq!(issue.number, 42);
    assert_eq!(issue.title, "Widget crashes");
    assert_eq!(issue.body, "First paragraph.\n\nSecond paragraph.");
    assert_eq!(
        issue.to_markdown(),
        "## Widget crashes\n\nFirst paragraph.\n\nSecond paragraph."
    );
}

#[tokio::test]
async fn converts_html_bodies_to_markdown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/widgets/issues/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "number": 7,
            "title": "Docs",
            "body": "<p>See <b>the guide</b> and run <code>cargo test</code></p>"
        })))
        .mount(&server)
        .await;

    let client = GithubClient::with_base_url(server.uri());
    let issue = client.fetch_issue("octo", "widgets", 7).await.unwrap();
    assert!(issue.body.contains("**the guide**"));
    assert!(issue.body.contains("`cargo test`"));
}

#[tokio::test]
async fn lists_open_issue_numbers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/widgets/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"number": 3, "title": "a", "body": ""},
            {"number": 8, "title": "b", "body": ""},
            {"number": 21, "title": "c", "body": null}
        ])))
        .mount(&server)
        .await;

    let client = GithubClient::with_base_url(server.uri());
    let numbers = client.list_issue_numbers("octo", "widgets").await.unwrap();
    assert_eq!(numbers, vec![3, 8, 21]);
}

#[tokio::test]
async fn http_failures_are_fetch_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = GithubClient::with_base_url(server.uri());
    let err = client.fetch_issue("octo", "widgets", 1).await.unwrap_err();
    assert!(matches!(err, GithubError::Fetch(_)));
    assert!(err.to_string().starts_with("Error fetching the issue"));
}

#[tokio::test]
async fn malformed_payloads_are_unexpected_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = GithubClient::with_base_url(server.uri());
    let err = client.fetch_issue("octo", "widgets", 1).await.unwrap_err();
    assert!(matches!(err, GithubError::Unexpected(_)));
    assert!(err.to_string().starts_with("An unexpected error occurred"));
}

#[tokio::test]
async fn scoring_three_issues_with_blank_line_runs() {
    // Three issues whose bodies each contain a run of five blank lines; the
    // bodies handed to the scorer must already be collapsed.
    let server = MockServer::start().await;
    let noisy_body = format!("Top.{}Bottom.", "\n".repeat(6));
    for number in [1, 2, 3] {
        Mock::given(method("GET"))
            .and(path(format!("/repos/octo/widgets/issues/{}", number)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "number": number,
                "title": format!("Issue {number}"),
                "body": noisy_body
            })))
            .mount(&server)
            .await;
    }

    let client = GithubClient::with_base_url(server.uri());
    let mut bodies = Vec::new();
    for number in [1u64, 2, 3] {
        let issue = client.fetch_issue("octo", "widgets", number).await.unwrap();
        assert!(
            !issue.body.contains("\n\n\n"),
            "blank-line run survived conversion"
        );
        assert_eq!(issue.body, "Top.\n\nBottom.");
        bodies.push(issue.to_markdown());
    }

    let scorer = IssueScorer::new(
        Arc::new(FixedReplyLlm { reply: "4".into() }),
        "test-model".into(),
    );
    let scores = scorer.score(&bodies).await.unwrap();
    assert_eq!(scores, vec![4, 4, 4]);
}
