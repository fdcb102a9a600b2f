//! Webpage visiting tool: fetch a URL and return readable markdown.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::Tool;
use crate::markup::html_to_markdown;

const MAX_CONTENT_CHARS: usize = 20000;

/// Fetch the content of a URL as markdown.
pub struct VisitWebpage {
    client: reqwest::Client,
}

impl Default for VisitWebpage {
    fn default() -> Self {
        Self::new()
    }
}

impl VisitWebpage {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent("alfred-agents/0.3")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

#[async_trait]
impl Tool for VisitWebpage {
    fn name(&self) -> &str {
        "visit_webpage"
    }

    fn description(&self) -> &str {
        "Visits a webpage at the given URL and returns its content as a markdown string. Use this to browse webpages found via web_search."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The URL of the webpage to visit"
                }
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let url = args["url"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'url' argument"))?;
        let url = url::Url::parse(url).map_err(|e| anyhow::anyhow!("Invalid URL '{}': {}", url, e))?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!("HTTP error: {}", status));
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let body = response.text().await?;
        let result = if content_type.contains("text/html") {
            html_to_markdown(&body)
        } else {
            body
        };

        if result.len() > MAX_CONTENT_CHARS {
            let mut cut = MAX_CONTENT_CHARS;
            while !result.is_char_boundary(cut) {
                cut -= 1;
            }
            let mut truncated = result;
            truncated.truncate(cut);
            truncated.push_str("... [content truncated]");
            Ok(truncated)
        } else {
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn converts_html_pages_to_markdown() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<h2>Docs</h2><p>Read <b>this</b>.</p>", "text/html"),
            )
            .mount(&server)
            .await;

        let result = VisitWebpage::new()
            .execute(json!({"url": server.uri()}))
            .await
            .unwrap();
        assert!(result.contains("## Docs"));
        assert!(result.contains("**this**"));
    }

    #[tokio::test]
    async fn http_errors_are_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = VisitWebpage::new()
            .execute(json!({"url": server.uri()}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("404"));
    }
}
