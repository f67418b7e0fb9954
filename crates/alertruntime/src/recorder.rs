use alertcore::{Node, NodeError, StepResult, StepStatus, DURATION_KEY, ERROR_KEY};
use serde_json::{Map, Value};
use std::time::Duration;

/// Ordered trace of handler invocations for one traversal
#[derive(Debug, Default)]
pub struct StepRecorder {
    steps: Vec<StepResult>,
}

impl StepRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed step with the handler's output fields
    pub fn completed(&mut self, node: &Node, mut fields: Map<String, Value>, elapsed: Duration) {
        fields.insert(DURATION_KEY.to_string(), Value::from(millis(elapsed)));
        self.steps
            .push(StepResult::new(node, StepStatus::Completed, fields));
    }

    /// Append a failed step carrying the error message
    pub fn failed(&mut self, node: &Node, error: &NodeError, elapsed: Duration) {
        let mut output = Map::new();
        output.insert(ERROR_KEY.to_string(), Value::from(error.to_string()));
        output.insert(DURATION_KEY.to_string(), Value::from(millis(elapsed)));
        self.steps
            .push(StepResult::new(node, StepStatus::Failed, output));
    }

    pub fn last(&self) -> Option<&StepResult> {
        self.steps.last()
    }

    pub fn into_steps(self) -> Vec<StepResult> {
        self.steps
    }
}

/// Whole milliseconds, saturating at `u64::MAX`
pub(crate) fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
