//! Configuration management for alfred-agents.
//!
//! Configuration can be set via environment variables:
//! - `OPENROUTER_API_KEY` - Required. Your OpenRouter API key.
//! - `DEFAULT_MODEL` - Optional. The default LLM model to use. Defaults to `qwen/qwen-2.5-coder-32b-instruct`.
//! - `MAX_STEPS` - Optional. Maximum agent loop steps. Defaults to `20`.
//! - `HEADLESS` - Optional. Run the browser headless. Defaults to `true`.
//! - `SEARCH_PROVIDER` - Optional. Web search provider, `serpapi` or `serper`. Defaults to `serpapi`.
//! - `SERPAPI_API_KEY` / `SERPER_API_KEY` - Required by the web search tool,
//!   depending on the selected provider.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Web search provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchProvider {
    SerpApi,
    Serper,
}

impl SearchProvider {
    /// The environment variable holding this provider's API key.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            SearchProvider::SerpApi => "SERPAPI_API_KEY",
            SearchProvider::Serper => "SERPER_API_KEY",
        }
    }
}

/// Agent configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenRouter API key
    pub api_key: String,

    /// Default LLM model identifier (OpenRouter format)
    pub default_model: String,

    /// Maximum steps for the agent loop
    pub max_steps: usize,

    /// Whether to run the browser headless
    pub headless: bool,

    /// Which web search provider to use
    pub search_provider: SearchProvider,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `OPENROUTER_API_KEY` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("OPENROUTER_API_KEY".to_string()))?;

        let default_model = std::env::var("DEFAULT_MODEL")
            .unwrap_or_else(|_| "qwen/qwen-2.5-coder-32b-instruct".to_string());

        let max_steps = std::env::var("MAX_STEPS")
            .unwrap_or_else(|_| "20".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("MAX_STEPS".to_string(), format!("{}", e)))?;

        let headless = std::env::var("HEADLESS")
            .ok()
            .map(|v| parse_bool(&v).map_err(|e| ConfigError::InvalidValue("HEADLESS".to_string(), e)))
            .transpose()?
            .unwrap_or(true);

        let search_provider = match std::env::var("SEARCH_PROVIDER")
            .unwrap_or_else(|_| "serpapi".to_string())
            .trim()
            .to_lowercase()
            .as_str()
        {
            "serpapi" => SearchProvider::SerpApi,
            "serper" => SearchProvider::Serper,
            other => {
                return Err(ConfigError::InvalidValue(
                    "SEARCH_PROVIDER".to_string(),
                    format!("expected 'serpapi' or 'serper', got: {}", other),
                ))
            }
        };

        Ok(Self {
            api_key,
            default_model,
            max_steps,
            headless,
            search_provider,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(api_key: String, default_model: String) -> Self {
        Self {
            api_key,
            default_model,
            max_steps: 20,
            headless: true,
            search_provider: SearchProvider::SerpApi,
        }
    }

    /// Resolve the search API key for the configured provider.
    ///
    /// A missing key is a fatal startup error, reported before the agent
    /// takes its first step.
    pub fn search_api_key(&self) -> Result<String, ConfigError> {
        let env_name = self.search_provider.api_key_env();
        std::env::var(env_name).map_err(|_| ConfigError::MissingEnvVar(env_name.to_string()))
    }
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Ok(false),
        other => Err(format!("expected boolean-like value, got: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_accepts_common_forms() {
        assert!(parse_bool("true").unwrap());
        assert!(parse_bool("YES").unwrap());
        assert!(parse_bool(" 1 ").unwrap());
        assert!(!parse_bool("off").unwrap());
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn provider_key_env_names() {
        assert_eq!(SearchProvider::SerpApi.api_key_env(), "SERPAPI_API_KEY");
        assert_eq!(SearchProvider::Serper.api_key_env(), "SERPER_API_KEY");
    }

    #[test]
    fn config_new_defaults() {
        let config = Config::new("key".into(), "model".into());
        assert_eq!(config.max_steps, 20);
        assert!(config.headless);
        assert_eq!(config.search_provider, SearchProvider::SerpApi);
    }
}
