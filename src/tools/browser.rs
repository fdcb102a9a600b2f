//! Page-interaction tools over an explicitly shared browser session.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::Tool;
use crate::browser::BrowserSession;

/// Open a URL in the browser.
pub struct Navigate {
    session: Arc<BrowserSession>,
}

impl Navigate {
    pub fn new(session: Arc<BrowserSession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Tool for Navigate {
    fn name(&self) -> &str {
        "navigate"
    }

    fn description(&self) -> &str {
        "Navigates the browser to the given URL. After navigating, stop and look at the screenshot to see what loaded."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The URL to open"
                }
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let raw = args["url"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'url' argument"))?;
        // Bare hostnames like "github.com/trending" are common model output.
        let url = match url::Url::parse(raw) {
            Ok(url) => url,
            Err(_) => url::Url::parse(&format!("https://{}", raw))
                .map_err(|e| anyhow::anyhow!("Invalid URL '{}': {}", raw, e))?,
        };
        self.session.navigate(url.as_str()).await?;
        Ok(format!("Navigated to {}", url))
    }
}

/// Go back to the previous page.
pub struct GoBack {
    session: Arc<BrowserSession>,
}

impl GoBack {
    pub fn new(session: Arc<BrowserSession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Tool for GoBack {
    fn name(&self) -> &str {
        "go_back"
    }

    fn description(&self) -> &str {
        "Goes back to the previous page."
    }

    fn parameters_schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    async fn execute(&self, _args: Value) -> anyhow::Result<String> {
        self.session.back().await?;
        Ok("Went back to the previous page.".to_string())
    }
}

/// Dismiss modals and pop-ups with an Escape keypress.
pub struct ClosePopups {
    session: Arc<BrowserSession>,
}

impl ClosePopups {
    pub fn new(session: Arc<BrowserSession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Tool for ClosePopups {
    fn name(&self) -> &str {
        "close_popups"
    }

    fn description(&self) -> &str {
        "Closes any visible modal or pop-up on the page. Use this to dismiss pop-up windows! This does not work on cookie consent banners."
    }

    fn parameters_schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    async fn execute(&self, _args: Value) -> anyhow::Result<String> {
        self.session.press_escape().await?;
        Ok("Sent Escape to the page.".to_string())
    }
}

/// Find text on the page and scroll the nth occurrence into view.
pub struct FindText {
    session: Arc<BrowserSession>,
}

impl FindText {
    pub fn new(session: Arc<BrowserSession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Tool for FindText {
    fn name(&self) -> &str {
        "find_text"
    }

    fn description(&self) -> &str {
        "Searches for text on the current page, like Ctrl+F, and jumps to the nth occurrence. Reports how many matches were found."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "The text to search for"
                },
                "nth_result": {
                    "type": "integer",
                    "description": "Which occurrence to jump to (default: 1)"
                }
            },
            "required": ["text"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let text = args["text"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'text' argument"))?;
        let nth = args["nth_result"].as_u64().unwrap_or(1) as usize;

        let found = self.session.find_text(text, nth).await?;
        Ok(format_match_message(text, nth, found))
    }
}

/// Human-readable match report for `find_text`.
fn format_match_message(text: &str, nth: usize, found: usize) -> String {
    format!(
        "Found {} matches for '{}'. Focused on element {} of {}",
        found, text, nth, found
    )
}

/// Scroll the page up or down.
pub struct Scroll {
    session: Arc<BrowserSession>,
}

impl Scroll {
    pub fn new(session: Arc<BrowserSession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Tool for Scroll {
    fn name(&self) -> &str {
        "scroll"
    }

    fn description(&self) -> &str {
        "Scrolls the page vertically by the given number of pixels. Positive scrolls down, negative scrolls up. 1200 pixels is about one viewport."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "pixels": {
                    "type": "integer",
                    "description": "Number of pixels to scroll (positive = down, negative = up)"
                }
            },
            "required": ["pixels"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let pixels = args["pixels"]
            .as_i64()
            .ok_or_else(|| anyhow::anyhow!("Missing 'pixels' argument"))?;
        self.session.scroll_by(pixels).await?;
        let direction = if pixels >= 0 { "down" } else { "up" };
        Ok(format!("Scrolled {} {} pixels.", direction, pixels.abs()))
    }
}
