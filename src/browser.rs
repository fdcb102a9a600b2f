//! Owned browser session over the Chrome DevTools Protocol.
//!
//! The session is created once at startup, passed explicitly to the tools and
//! observers that need it, and closed in a guaranteed teardown path whether
//! the agent run succeeds or fails.

use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::input::{DispatchKeyEventParams, DispatchKeyEventType};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Fixed window geometry, chosen so screenshots cover a full article column.
const WINDOW_WIDTH: u32 = 1000;
const WINDOW_HEIGHT: u32 = 1350;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Browser driver error: {0}")]
    Driver(String),

    #[error("Match n°{nth} not found (only {found} matches found)")]
    MatchNotFound { nth: usize, found: usize },
}

impl From<chromiumoxide::error::CdpError> for BrowserError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        BrowserError::Driver(err.to_string())
    }
}

/// A live browser with a single page attached.
pub struct BrowserSession {
    browser: Mutex<Browser>,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl BrowserSession {
    /// Launch Chrome with the fixed geometry and attach one blank page.
    pub async fn launch(headless: bool) -> Result<Self, BrowserError> {
        let mut builder = BrowserConfig::builder()
            .window_size(WINDOW_WIDTH, WINDOW_HEIGHT)
            .arg("--force-device-scale-factor=1")
            .arg("--window-position=0,0")
            .arg("--disable-pdf-viewer");
        if !headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(BrowserError::Launch)?;

        let (browser, mut handler) = Browser::launch(config).await?;

        // The handler stream must be polled for the whole session lifetime.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    debug!("CDP handler event error: {}", err);
                }
            }
        });

        let page = browser.new_page("about:blank").await?;
        info!(
            headless,
            width = WINDOW_WIDTH,
            height = WINDOW_HEIGHT,
            "Browser session started"
        );

        Ok(Self {
            browser: Mutex::new(browser),
            page,
            handler_task,
        })
    }

    /// Navigate the page to a URL and wait for it to settle.
    pub async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        self.page.goto(url).await?;
        self.page.wait_for_navigation().await?;
        Ok(())
    }

    /// Go back one entry in the page history.
    pub async fn back(&self) -> Result<(), BrowserError> {
        self.page.evaluate("history.back()").await?;
        // Give the history navigation a moment to land.
        tokio::time::sleep(Duration::from_millis(300)).await;
        Ok(())
    }

    /// Send an Escape keypress to the page (dismisses most modals).
    pub async fn press_escape(&self) -> Result<(), BrowserError> {
        for event_type in [DispatchKeyEventType::KeyDown, DispatchKeyEventType::KeyUp] {
            let params = DispatchKeyEventParams::builder()
                .r#type(event_type)
                .key("Escape")
                .build()
                .map_err(BrowserError::Driver)?;
            self.page.execute(params).await?;
        }
        Ok(())
    }

    /// Find elements whose direct text contains `text` and scroll the nth
    /// match (1-based) into view.
    ///
    /// Returns the total number of matches. Errors when `nth` exceeds the
    /// match count.
    pub async fn find_text(&self, text: &str, nth: usize) -> Result<usize, BrowserError> {
        let needle = serde_json::to_string(text)
            .map_err(|e| BrowserError::Driver(e.to_string()))?;
        let script = format!(
            r#"(function() {{
                var needle = {needle};
                var matches = [];
                var all = document.getElementsByTagName('*');
                for (var i = 0; i < all.length; i++) {{
                    var nodes = all[i].childNodes;
                    for (var j = 0; j < nodes.length; j++) {{
                        if (nodes[j].nodeType === 3 && nodes[j].textContent.indexOf(needle) !== -1) {{
                            matches.push(all[i]);
                            break;
                        }}
                    }}
                }}
                if ({nth} >= 1 && {nth} <= matches.length) {{
                    matches[{nth} - 1].scrollIntoView(true);
                }}
                return matches.length;
            }})()"#
        );

        let found: usize = self
            .page
            .evaluate(script)
            .await?
            .into_value()
            .map_err(|e| BrowserError::Driver(e.to_string()))?;

        check_nth(nth, found)
    }

    /// Scroll the page vertically by the given number of pixels
    /// (negative scrolls up).
    pub async fn scroll_by(&self, pixels: i64) -> Result<(), BrowserError> {
        self.page
            .evaluate(format!("window.scrollBy(0, {})", pixels))
            .await?;
        Ok(())
    }

    /// Capture a PNG screenshot of the current viewport.
    pub async fn screenshot_png(&self) -> Result<Vec<u8>, BrowserError> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        let data = self.page.screenshot(params).await?;
        Ok(data)
    }

    /// The page's current URL.
    pub async fn current_url(&self) -> Result<String, BrowserError> {
        let url = self
            .page
            .url()
            .await?
            .unwrap_or_else(|| "about:blank".to_string());
        Ok(url)
    }

    /// Tear the session down. Safe to call exactly once at process exit.
    pub async fn close(&self) {
        let mut browser = self.browser.lock().await;
        if let Err(err) = browser.close().await {
            debug!("Browser close failed: {}", err);
        }
        if let Err(err) = browser.wait().await {
            debug!("Browser wait failed: {}", err);
        }
        self.handler_task.abort();
        info!("Browser session closed");
    }
}

/// Validate a 1-based occurrence index against the match count.
///
/// `nth` must land inside `1..=found`; anything else is a
/// `MatchNotFound` error reported back to the caller.
fn check_nth(nth: usize, found: usize) -> Result<usize, BrowserError> {
    if nth == 0 || nth > found {
        return Err(BrowserError::MatchNotFound { nth, found });
    }
    Ok(found)
}
