use std::sync::Arc;

use log::info;

use crate::error::ArmError;
use crate::executor::{PlanExecutor, PlanOutcome};
use crate::plan::split_plan;
use crate::translator::Translator;

/// Free text in, motion out: translate the prompt against the current
/// position, split the plan, and hand the steps to the executor.
pub struct Pipeline {
    translator: Box<dyn Translator>,
    executor: Arc<PlanExecutor>,
}

impl Pipeline {
    pub fn new(translator: Box<dyn Translator>, executor: Arc<PlanExecutor>) -> Self {
        Pipeline {
            translator,
            executor,
        }
    }

    pub fn handle_prompt(&self, prompt: &str) -> Result<PlanOutcome, ArmError> {
        info!("interpreting: {}", prompt);
        let position = self.executor.position();
        let plan_text = self.translator.translate(prompt, &position)?;
        info!("translated: {}", plan_text);

        let steps = split_plan(&plan_text);
        if steps.is_empty() {
            return Err(ArmError::Translator(format!(
                "empty plan for prompt '{}'",
                prompt
            )));
        }

        self.executor.execute_plan(&steps)
    }
}
