use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::extract::extract_tool_call;
use crate::hooks::AgentHook;
use crate::llm::LanguageModel;
use crate::memory::Conversation;
use crate::message::Message;
use crate::prompt::render_prompt;
use crate::tool::ToolRegistry;

/// An agent that alternates between the language model and registered tools.
///
/// One call to [`Agent::run_turn`] may chain any number of tool invocations:
/// the turn only ends when the model produces text the extractor cannot read
/// as a tool call. There is deliberately no iteration cap; a model that never
/// stops calling tools keeps the turn alive until the operator interrupts.
pub struct Agent<M: LanguageModel> {
    model: Arc<M>,
    tools: ToolRegistry,
    conversation: Conversation,
    hooks: Vec<Arc<dyn AgentHook>>,
}

impl<M: LanguageModel> Agent<M> {
    pub fn new(model: Arc<M>, tools: ToolRegistry, system_prompt: impl Into<String>) -> Self {
        Self {
            model,
            tools,
            conversation: Conversation::new(system_prompt),
            hooks: Vec::new(),
        }
    }

    pub fn with_hook(mut self, hook: Arc<dyn AgentHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Throw away everything but the system message.
    pub fn reset(&mut self) {
        self.conversation.reset();
    }

    /// Run one user turn to completion.
    ///
    /// The raw completion is appended to the conversation verbatim before
    /// extraction, so the model's own phrasing of a tool call stays in
    /// history. Tool results re-enter the conversation as user messages
    /// prefixed with `Tool result:`. Model faults propagate to the caller
    /// with the conversation left as it was at the point of failure.
    pub async fn run_turn(&mut self, user_input: impl Into<String>) -> Result<()> {
        self.conversation.push(Message::user(user_input));

        loop {
            let prompt = render_prompt(self.conversation.messages());
            let raw = self.model.complete(&prompt).await?;
            self.conversation.push(Message::assistant(&raw));

            let (call, explanation) = extract_tool_call(&raw);
            if !explanation.is_empty() {
                for hook in &self.hooks {
                    hook.on_explanation(&explanation);
                }
            }

            let Some(call) = call else {
                return Ok(());
            };

            debug!(tool = %call.name, "model requested a tool");
            for hook in &self.hooks {
                hook.on_tool_call(&call);
            }

            let result = self.tools.dispatch(&call.name, &call.args).await;
            for hook in &self.hooks {
                hook.on_tool_result(&result);
            }

            self.conversation
                .push(Message::user(format!("Tool result:\n{result}")));
        }
    }
}
