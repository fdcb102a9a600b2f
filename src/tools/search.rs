//! Web search tool with two provider variants (SerpApi and Serper).

use async_trait::async_trait;
use serde_json::{json, Value};

use super::Tool;
use crate::config::{Config, ConfigError, SearchProvider};

const SERPAPI_URL: &str = "https://serpapi.com/search.json";
const SERPER_URL: &str = "https://google.serper.dev/search";

/// Google web search via SerpApi or Serper.
pub struct WebSearch {
    client: reqwest::Client,
    provider: SearchProvider,
    api_key: String,
    base_url: String,
}

impl WebSearch {
    /// Build the tool from configuration. Fails fast when the provider's
    /// API key is missing from the environment.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let api_key = config.search_api_key()?;
        Ok(Self::new(config.search_provider, api_key))
    }

    pub fn new(provider: SearchProvider, api_key: String) -> Self {
        let base_url = match provider {
            SearchProvider::SerpApi => SERPAPI_URL,
            SearchProvider::Serper => SERPER_URL,
        };
        Self {
            client: reqwest::Client::new(),
            provider,
            api_key,
            base_url: base_url.to_string(),
        }
    }

    /// Point the tool at a different endpoint (used by tests).
    pub fn with_base_url(provider: SearchProvider, api_key: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            provider,
            api_key,
            base_url,
        }
    }

    /// The JSON key holding organic results for this provider.
    fn organic_key(&self) -> &'static str {
        match self.provider {
            SearchProvider::SerpApi => "organic_results",
            SearchProvider::Serper => "organic",
        }
    }
}

#[async_trait]
impl Tool for WebSearch {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Performs a google web search for your query then returns a string of the top search results."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query to perform"
                },
                "filter_year": {
                    "type": "integer",
                    "description": "Optionally restrict results to a certain year"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let query = args["query"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'query' argument"))?;
        let filter_year = args["filter_year"].as_i64();

        let mut params: Vec<(String, String)> = vec![
            ("q".to_string(), query.to_string()),
            ("api_key".to_string(), self.api_key.clone()),
        ];
        if self.provider == SearchProvider::SerpApi {
            params.push(("engine".to_string(), "google".to_string()));
            params.push(("google_domain".to_string(), "google.com".to_string()));
        }
        if let Some(year) = filter_year {
            params.push((
                "tbs".to_string(),
                format!("cdr:1,cd_min:01/01/{year},cd_max:12/31/{year}"),
            ));
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Search API error ({}): {}", status, detail));
        }

        let results: Value = response.json().await?;
        let organic = match results.get(self.organic_key()) {
            Some(Value::Array(entries)) => entries,
            _ => {
                return Err(match filter_year {
                    Some(year) => anyhow::anyhow!(
                        "No results found for query: '{}' with filtering on year={}. Use a less restrictive query or do not filter on year.",
                        query,
                        year
                    ),
                    None => anyhow::anyhow!(
                        "No results found for query: '{}'. Use a less restrictive query.",
                        query
                    ),
                });
            }
        };

        if organic.is_empty() {
            let year_filter_message = filter_year
                .map(|year| format!(" with filter year={year}"))
                .unwrap_or_default();
            return Ok(format!(
                "No results found for '{}'{}. Try with a more general query, or remove the year filter.",
                query, year_filter_message
            ));
        }

        Ok(format_results(organic))
    }
}

/// Render organic results as a numbered markdown list.
fn format_results(organic: &[Value]) -> String {
    let mut snippets = Vec::with_capacity(organic.len());
    for (idx, page) in organic.iter().enumerate() {
        let title = page["title"].as_str().unwrap_or("Untitled");
        let link = page["link"].as_str().unwrap_or("");

        let mut entry = format!("{}. [{}]({})", idx, title, link);
        if let Some(date) = page["date"].as_str() {
            entry.push_str(&format!("\nDate published: {}", date));
        }
        if let Some(source) = page["source"].as_str() {
            entry.push_str(&format!("\nSource: {}", source));
        }
        entry.push('\n');
        if let Some(snippet) = page["snippet"].as_str() {
            entry.push('\n');
            entry.push_str(snippet);
        }
        snippets.push(entry);
    }
    format!("## Search Results\n{}", snippets.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_results_with_optional_fields() {
        let organic = vec![
            json!({
                "title": "Rust Book",
                "link": "https://doc.rust-lang.org/book/",
                "snippet": "The Rust Programming Language",
                "date": "2024-01-01",
                "source": "rust-lang.org"
            }),
            json!({
                "title": "Crates",
                "link": "https://crates.io"
            }),
        ];
        let formatted = format_results(&organic);
        assert!(formatted.starts_with("## Search Results"));
        assert!(formatted.contains("0. [Rust Book](https://doc.rust-lang.org/book/)"));
        assert!(formatted.contains("Date published: 2024-01-01"));
        assert!(formatted.contains("Source: rust-lang.org"));
        assert!(formatted.contains("1. [Crates](https://crates.io)"));
    }

    #[test]
    fn organic_key_depends_on_provider() {
        let serpapi = WebSearch::new(SearchProvider::SerpApi, "k".into());
        let serper = WebSearch::new(SearchProvider::Serper, "k".into());
        assert_eq!(serpapi.organic_key(), "organic_results");
        assert_eq!(serper.organic_key(), "organic");
    }

    #[tokio::test]
    async fn search_returns_formatted_results() {
        use wiremock::matchers::{method, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "rust agents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "organic": [
                    {"title": "Agents in Rust", "link": "https://example.com", "snippet": "tools in a loop"}
                ]
            })))
            .mount(&server)
            .await;

        let tool = WebSearch::with_base_url(SearchProvider::Serper, "key".into(), server.uri());
        let result = tool
            .execute(json!({"query": "rust agents"}))
            .await
            .unwrap();
        assert!(result.contains("[Agents in Rust](https://example.com)"));
        assert!(result.contains("tools in a loop"));
    }

    #[tokio::test]
    async fn missing_organic_key_with_year_filter_mentions_the_filter() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"other": []})))
            .mount(&server)
            .await;

        let tool = WebSearch::with_base_url(SearchProvider::Serper, "key".into(), server.uri());
        let err = tool
            .execute(json!({"query": "obscure", "filter_year": 1998}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("year=1998"));
    }
}
