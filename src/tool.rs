use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{CodelingError, Result};

/// Type tag for a tool parameter, rendered into the capability list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Number,
    Boolean,
}

impl ParamKind {
    fn label(self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Number => "number",
            ParamKind::Boolean => "boolean",
        }
    }
}

/// Static description of one tool parameter.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
}

impl ParamSpec {
    pub const fn required(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters(&self) -> &[ParamSpec];
    async fn call(&self, args: &Map<String, Value>) -> Result<String>;
}

/// Registry of the tools an agent may invoke, in registration order.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.tools.push(Arc::new(tool));
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    pub fn lookup(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|tool| tool.name() == name)
    }

    /// Human-readable capability list, one `name(params) - description` line
    /// per tool in registration order.
    pub fn describe(&self) -> String {
        let mut lines = Vec::with_capacity(self.tools.len());
        for tool in &self.tools {
            let params = tool
                .parameters()
                .iter()
                .map(|p| {
                    let suffix = if p.required { "" } else { "?" };
                    format!("{}: {}{}", p.name, p.kind.label(), suffix)
                })
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(format!("  {}({}) - {}", tool.name(), params, tool.description()));
        }
        lines.join("\n")
    }

    /// Invoke a tool by name. Faults never escape: an unknown name or a
    /// failing handler comes back as an `error: ...` result string, which is
    /// still a successful execution as far as the agent loop is concerned.
    pub async fn dispatch(&self, name: &str, args: &Map<String, Value>) -> String {
        debug!(tool = name, "dispatching tool call");
        match self.lookup(name) {
            Some(tool) => match tool.call(args).await {
                Ok(output) => output,
                Err(err) => format!("error: {err}"),
            },
            None => format!("error: {}", CodelingError::ToolNotFound(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the `text` argument back"
        }

        fn parameters(&self) -> &[ParamSpec] {
            const PARAMS: [ParamSpec; 2] = [
                ParamSpec::required("text", ParamKind::String),
                ParamSpec::optional("loud", ParamKind::Boolean),
            ];
            &PARAMS
        }

        async fn call(&self, args: &Map<String, Value>) -> Result<String> {
            let text = args
                .get("text")
                .and_then(Value::as_str)
                .ok_or_else(|| CodelingError::Protocol("missing `text` for echo".into()))?;
            Ok(text.to_string())
        }
    }

    fn args_of(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn describe_lists_tools_in_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let listing = registry.describe();

        assert_eq!(listing, "  echo(text: string, loud: boolean?) - Echo the `text` argument back");
    }

    #[tokio::test]
    async fn dispatch_runs_the_named_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let result = registry.dispatch("echo", &args_of(json!({"text": "ping"}))).await;

        assert_eq!(result, "ping");
    }

    #[tokio::test]
    async fn dispatch_turns_handler_faults_into_error_results() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let result = registry.dispatch("echo", &args_of(json!({}))).await;

        assert_eq!(result, "error: protocol error: missing `text` for echo");
    }

    #[tokio::test]
    async fn dispatch_reports_unknown_tools_without_panicking() {
        let registry = ToolRegistry::new();

        let result = registry.dispatch("launch", &Map::new()).await;

        assert_eq!(result, "error: unknown tool `launch`");
    }
}
