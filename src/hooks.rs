use crate::extract::ToolCall;

/// Observer for the display-worthy moments of a turn: the model's prose, the
/// tool it picked, and what the tool said back. The REPL uses this to render
/// progress; tests use it to record the sequence of events.
pub trait AgentHook: Send + Sync {
    fn on_explanation(&self, _text: &str) {}

    fn on_tool_call(&self, _call: &ToolCall) {}

    fn on_tool_result(&self, _result: &str) {}
}

/// Hook that observes nothing.
pub struct SilentHook;

impl AgentHook for SilentHook {}
