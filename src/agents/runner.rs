//! Production task runner backed by an LLM client.

use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;

use crate::llm::{ChatMessage, ChatOptions, LlmClient};
use crate::tasks::TaskSpec;

use super::{AgentProfile, TaskRunner};

/// Sampling temperature used for all stages.
const STAGE_TEMPERATURE: f64 = 0.6;

/// Runs tasks by rendering the agent profile into a system prompt and the
/// task into a user message, then calling the configured LLM.
pub struct LlmTaskRunner {
    llm: Arc<dyn LlmClient>,
}

impl LlmTaskRunner {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    fn system_prompt(profile: &AgentProfile) -> String {
        format!(
            "You are {role}.\n\
             Goal: {goal}\n\
             Background: {backstory}\n\n\
             Respond ONLY with a JSON object matching the expected output. \
             Do not add commentary outside the JSON.",
            role = profile.role,
            goal = profile.goal,
            backstory = profile.backstory,
        )
    }

    fn user_message(task: &TaskSpec) -> String {
        format!(
            "{description}\n\nExpected output:\n{expected}",
            description = task.description,
            expected = task.expected_output,
        )
    }
}

#[async_trait]
impl TaskRunner for LlmTaskRunner {
    async fn run_task(&self, profile: &AgentProfile, task: &TaskSpec) -> anyhow::Result<String> {
        let messages = vec![
            ChatMessage::system(Self::system_prompt(profile)),
            ChatMessage::user(Self::user_message(task)),
        ];

        let options = ChatOptions {
            temperature: Some(STAGE_TEMPERATURE),
            max_tokens: None,
        };

        let response = self.llm.chat_completion(&messages, options).await?;

        tracing::debug!(
            role = profile.role,
            tokens = response.usage.as_ref().map(|u| u.total_tokens),
            "agent task completed"
        );

        response
            .content
            .ok_or_else(|| anyhow!("model returned an empty reply for role '{}'", profile.role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::AgentRoster;

    #[test]
    fn system_prompt_carries_the_full_persona() {
        let roster = AgentRoster::new();
        let prompt = LlmTaskRunner::system_prompt(&roster.budget_checker);
        assert!(prompt.contains("Budget Compliance Checker"));
        assert!(prompt.contains("Validate that plans adhere"));
        assert!(prompt.contains("JSON object"));
    }

    #[test]
    fn user_message_includes_expected_output() {
        let task = TaskSpec::new("Do the thing.", "{\"ok\": true}");
        let message = LlmTaskRunner::user_message(&task);
        assert!(message.contains("Do the thing."));
        assert!(message.contains("Expected output:"));
        assert!(message.contains("\"ok\""));
    }
}
