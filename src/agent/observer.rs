//! Step observers: hooks run by the loop after every step.
//!
//! Observers are handed to the agent as configuration up front; nothing
//! registers or unregisters them while a run is in progress.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::memory::{AgentMemory, StepImage};
use crate::browser::BrowserSession;

/// Target size for screenshots sent to the model: the largest dimension is
/// reduced to roughly this many pixels.
const MAX_SCREENSHOT_DIM: u32 = 50;

/// Hook invoked after each agent step completes.
#[async_trait]
pub trait StepObserver: Send + Sync {
    async fn after_step(&self, memory: &mut AgentMemory, step_number: usize);
}

/// Captures a downsized browser screenshot for the current step and prunes
/// screenshots from all earlier steps.
///
/// Best-effort only: if the browser is unreachable the step simply goes
/// without an image.
pub struct ScreenshotObserver {
    session: Arc<BrowserSession>,
}

impl ScreenshotObserver {
    pub fn new(session: Arc<BrowserSession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl StepObserver for ScreenshotObserver {
    async fn after_step(&self, memory: &mut AgentMemory, step_number: usize) {
        // Let JavaScript animations settle before capturing.
        tokio::time::sleep(Duration::from_secs(1)).await;

        memory.prune_images_before(step_number);

        match self.session.screenshot_png().await {
            Ok(png) => match downscale_png(&png, MAX_SCREENSHOT_DIM) {
                Ok(small) => {
                    debug!(bytes = small.len(), "Captured a browser screenshot");
                    if let Some(step) = memory.current_step() {
                        step.images.push(StepImage { png: small });
                    }
                }
                Err(err) => debug!("Screenshot downscale failed: {}", err),
            },
            Err(err) => debug!("Screenshot capture skipped: {}", err),
        }

        match self.session.current_url().await {
            Ok(url) => {
                if let Some(step) = memory.current_step() {
                    step.append_observation(&format!("Current url: {}", url));
                }
            }
            Err(err) => debug!("Could not read current url: {}", err),
        }
    }
}

/// Downscale a PNG so its largest dimension is at most `max_dim` pixels.
pub fn downscale_png(png: &[u8], max_dim: u32) -> anyhow::Result<Vec<u8>> {
    let img = image::load_from_memory(png)?;
    let (width, height) = (img.width(), img.height());
    let largest = width.max(height);

    let resized = if largest > max_dim {
        let factor = largest as f64 / max_dim as f64;
        let new_width = ((width as f64 / factor).round() as u32).max(1);
        let new_height = ((height as f64 / factor).round() as u32).max(1);
        img.resize_exact(new_width, new_height, image::imageops::FilterType::Triangle)
    } else {
        img
    };

    let mut out = Cursor::new(Vec::new());
    resized.write_to(&mut out, image::ImageOutputFormat::Png)?;
    Ok(out.into_inner())
}
