//! Agent module - the core tool-calling loop.
//!
//! The agent follows a "tools in a loop" pattern:
//! 1. Build context with system prompt and user task
//! 2. Call LLM with available tools
//! 3. If the LLM requests tool calls, execute them and feed results back
//! 4. Run the configured step observers (screenshots, URL tracking)
//! 5. Repeat until the LLM produces a final response or max steps is reached

mod agent_loop;
mod memory;
mod observer;
mod prompt;

pub use agent_loop::{Agent, AgentRun};
pub use memory::{AgentMemory, StepImage, StepRecord};
pub use observer::{downscale_png, ScreenshotObserver, StepObserver};
pub use prompt::{build_system_prompt, BROWSER_INSTRUCTIONS};
