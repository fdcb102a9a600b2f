//! Per-step execution records maintained by the agent loop.

use base64::Engine;

/// An image attached to a step (PNG bytes).
#[derive(Debug, Clone)]
pub struct StepImage {
    pub png: Vec<u8>,
}

impl StepImage {
    /// Render as a data URL suitable for an LLM image part.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.png)
        )
    }
}

/// One execution step: what was called, what came back, what it looked like.
#[derive(Debug, Clone)]
pub struct StepRecord {
    /// 1-based, strictly increasing step number.
    pub step_number: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// The tool calls executed this step, rendered as text.
    pub tool_calls_text: String,
    /// Textual observation (tool results, appended URL info, errors).
    pub observations: String,
    /// Screenshot attachments; pruned from earlier steps by observers.
    pub images: Vec<StepImage>,
}

impl StepRecord {
    pub fn new(step_number: usize) -> Self {
        Self {
            step_number,
            timestamp: chrono::Utc::now(),
            tool_calls_text: String::new(),
            observations: String::new(),
            images: Vec::new(),
        }
    }

    /// Append a line to the step's observations.
    pub fn append_observation(&mut self, line: &str) {
        if self.observations.is_empty() {
            self.observations.push_str(line);
        } else {
            self.observations.push('\n');
            self.observations.push_str(line);
        }
    }
}

/// The loop's record of everything that has happened so far.
#[derive(Debug, Default)]
pub struct AgentMemory {
    steps: Vec<StepRecord>,
}

impl AgentMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new step. Step numbers increase by one each time.
    pub fn begin_step(&mut self) -> &mut StepRecord {
        let number = self.steps.len() + 1;
        self.steps.push(StepRecord::new(number));
        self.steps.last_mut().expect("just pushed")
    }

    pub fn current_step(&mut self) -> Option<&mut StepRecord> {
        self.steps.last_mut()
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// Clear image attachments on every step numbered below `step_number`.
    ///
    /// Keeps the payload sent to the LLM bounded: only the newest screenshot
    /// survives.
    pub fn prune_images_before(&mut self, step_number: usize) {
        for step in &mut self.steps {
            if step.step_number < step_number {
                step.images.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_numbers_increase_monotonically() {
        let mut memory = AgentMemory::new();
        for expected in 1..=5 {
            let step = memory.begin_step();
            assert_eq!(step.step_number, expected);
        }
    }

    #[test]
    fn prune_clears_all_earlier_images() {
        let mut memory = AgentMemory::new();
        for _ in 0..4 {
            let step = memory.begin_step();
            step.images.push(StepImage { png: vec![1, 2, 3] });
        }

        memory.prune_images_before(4);

        for step in memory.steps() {
            if step.step_number < 4 {
                assert!(step.images.is_empty(), "step {} kept images", step.step_number);
            } else {
                assert_eq!(step.images.len(), 1);
            }
        }
    }

    #[test]
    fn observations_append_on_new_lines() {
        let mut step = StepRecord::new(1);
        step.append_observation("first");
        step.append_observation("Current url: https://example.com");
        assert_eq!(step.observations, "first\nCurrent url: https://example.com");
    }

    #[test]
    fn image_data_url_is_base64_png() {
        let image = StepImage { png: vec![0, 1, 2] };
        assert!(image.to_data_url().starts_with("data:image/png;base64,"));
    }
}
