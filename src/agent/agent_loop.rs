//! Core agent loop implementation.

use std::sync::Arc;

use crate::llm::{ChatMessage, ContentPart, ImageUrl, LlmClient, MessageContent, Role};
use crate::tools::ToolRegistry;

use super::memory::AgentMemory;
use super::observer::StepObserver;
use super::prompt::build_system_prompt;

/// Result of a completed agent run.
#[derive(Debug)]
pub struct AgentRun {
    /// Unique identifier for this run, for log correlation.
    pub id: uuid::Uuid,
    /// The model's final answer.
    pub answer: String,
    /// Everything that happened along the way.
    pub memory: AgentMemory,
}

/// The tool-calling agent.
pub struct Agent {
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
    observers: Vec<Arc<dyn StepObserver>>,
    model: String,
    max_steps: usize,
    prompt_addendum: Option<String>,
}

impl Agent {
    /// Create a new agent. Tools and observers arrive fully constructed;
    /// the agent never reaches for ambient state.
    pub fn new(
        llm: Arc<dyn LlmClient>,
        tools: ToolRegistry,
        observers: Vec<Arc<dyn StepObserver>>,
        model: String,
        max_steps: usize,
    ) -> Self {
        Self {
            llm,
            tools,
            observers,
            model,
            max_steps,
            prompt_addendum: None,
        }
    }

    /// Extra instructions appended to the system prompt (e.g. browser usage).
    pub fn with_prompt_addendum(mut self, addendum: impl Into<String>) -> Self {
        self.prompt_addendum = Some(addendum.into());
        self
    }

    /// Run a task to completion and return the final answer plus the
    /// step-by-step memory.
    pub async fn run(&self, task: &str) -> anyhow::Result<AgentRun> {
        let run_id = uuid::Uuid::new_v4();
        tracing::info!(%run_id, "Starting agent run");
        let mut memory = AgentMemory::new();

        let system_prompt = build_system_prompt(&self.tools, self.prompt_addendum.as_deref());
        let mut messages = vec![
            ChatMessage::text(Role::System, system_prompt),
            ChatMessage::text(Role::User, task),
        ];

        let tool_schemas = self.tools.get_tool_schemas();

        for iteration in 0..self.max_steps {
            tracing::debug!("Agent step {}", iteration + 1);

            let response = self
                .llm
                .chat_completion(&self.model, &messages, Some(&tool_schemas))
                .await?;

            if let Some(tool_calls) = &response.tool_calls {
                if !tool_calls.is_empty() {
                    let step_number = memory.begin_step().step_number;

                    messages.push(ChatMessage {
                        role: Role::Assistant,
                        content: response.content.clone().map(MessageContent::Text),
                        tool_calls: Some(tool_calls.clone()),
                        tool_call_id: None,
                    });

                    for tool_call in tool_calls {
                        tracing::info!(
                            tool = %tool_call.function.name,
                            args = %tool_call.function.arguments,
                            "Calling tool"
                        );

                        let args: serde_json::Value =
                            serde_json::from_str(&tool_call.function.arguments)
                                .unwrap_or(serde_json::Value::Null);
                        let result = self.tools.execute(&tool_call.function.name, args).await;

                        // Failures become regular observations so the model
                        // can react instead of the process crashing.
                        let result_str = match result {
                            Ok(output) => output,
                            Err(e) => format!("Error: {}", e),
                        };

                        if let Some(step) = memory.current_step() {
                            if !step.tool_calls_text.is_empty() {
                                step.tool_calls_text.push('\n');
                            }
                            step.tool_calls_text.push_str(&format!(
                                "{}({})",
                                tool_call.function.name, tool_call.function.arguments
                            ));
                            step.append_observation(&truncate_for_log(&result_str, 1000));
                        }

                        messages.push(ChatMessage {
                            role: Role::Tool,
                            content: Some(MessageContent::Text(result_str)),
                            tool_calls: None,
                            tool_call_id: Some(tool_call.id.clone()),
                        });
                    }

                    self.run_observers(&mut memory, step_number).await;
                    attach_step_images(&mut messages, &memory, step_number);

                    continue;
                }
            }

            // No tool calls - this is the final response.
            if let Some(content) = response.content {
                tracing::info!(%run_id, "Agent finished after {} steps", memory.steps().len());
                return Ok(AgentRun {
                    id: run_id,
                    answer: content,
                    memory,
                });
            }

            return Err(anyhow::anyhow!("LLM returned empty response"));
        }

        Err(anyhow::anyhow!(
            "Max steps ({}) reached without completion",
            self.max_steps
        ))
    }

    /// Run every configured observer for the step that just finished.
    async fn run_observers(&self, memory: &mut AgentMemory, step_number: usize) {
        for observer in &self.observers {
            observer.after_step(memory, step_number).await;
        }
    }
}

/// Keep the conversation's image payload bounded: strip image parts from all
/// earlier messages, then attach the just-finished step's screenshot (if any)
/// as a fresh user message.
fn attach_step_images(messages: &mut Vec<ChatMessage>, memory: &AgentMemory, step_number: usize) {
    for message in messages.iter_mut() {
        if let Some(content) = &message.content {
            if content.has_images() {
                message.content = Some(content.without_images());
            }
        }
    }

    let Some(step) = memory.steps().iter().find(|s| s.step_number == step_number) else {
        return;
    };
    if step.images.is_empty() {
        return;
    }

    let mut parts = vec![ContentPart::Text {
        text: format!("Screenshot after step {}:", step_number),
    }];
    for image in &step.images {
        parts.push(ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: image.to_data_url(),
            },
        });
    }

    messages.push(ChatMessage {
        role: Role::User,
        content: Some(MessageContent::Parts(parts)),
        tool_calls: None,
        tool_call_id: None,
    });
}

/// Truncate a string for logging purposes.
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let mut cut = max_len;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}... [truncated]", &s[..cut])
    }
}
