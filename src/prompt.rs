//! Prompt assembly: the system prompt handed to a fresh conversation and the
//! flat rendering of a conversation for the completion endpoint.

use std::path::Path;

use crate::message::{Message, Role};
use crate::tool::ToolRegistry;

/// Render the conversation as `System:`/`User:`/`Assistant:` blocks followed
/// by a trailing `Assistant:` cue for the model to continue from.
pub fn render_prompt(messages: &[Message]) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(messages.len() + 1);
    for message in messages {
        let tag = match message.role {
            Role::System => "System",
            Role::User => "User",
            Role::Assistant => "Assistant",
        };
        parts.push(format!("{tag}: {}\n", message.content));
    }
    parts.push("Assistant:".to_string());
    parts.join("\n")
}

/// Build the system prompt: assistant framing, working directory, the tool
/// catalog, and the invocation format the extractor understands.
pub fn system_prompt(cwd: &Path, tools: &ToolRegistry) -> String {
    let listing = if tools.is_empty() {
        "  (none)".to_string()
    } else {
        tools.describe()
    };
    let lines = vec![
        format!(
            "You are a concise coding assistant. Current working directory: {}.",
            cwd.display()
        ),
        String::new(),
        "You are a coding assistant with access to tools for file operations.".to_string(),
        String::new(),
        "AVAILABLE TOOLS:".to_string(),
        listing,
        String::new(),
        "TOOL USAGE INSTRUCTIONS:".to_string(),
        "When you need to use a tool, you MUST respond with valid JSON in exactly this format:"
            .to_string(),
        r#"{"tool": "tool_name", "args": {"param1": "value1", "param2": "value2"}}"#.to_string(),
        String::new(),
        "Examples:".to_string(),
        r#"- To list Python files: {"tool": "glob", "args": {"pat": "*.py"}}"#.to_string(),
        r#"- To read a file: {"tool": "read", "args": {"path": "script.py"}}"#.to_string(),
        r#"- To search for text: {"tool": "grep", "args": {"pat": "function"}}"#.to_string(),
        String::new(),
        "You may include a brief explanation BEFORE the JSON, but the JSON must be on its own line."
            .to_string(),
        "After receiving tool results, continue helping the user with their request.".to_string(),
    ];
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_roles_in_order_with_trailing_cue() {
        let messages = vec![
            Message::system("be brief"),
            Message::user("hello"),
            Message::assistant("hi"),
        ];

        let prompt = render_prompt(&messages);

        assert_eq!(
            prompt,
            "System: be brief\n\nUser: hello\n\nAssistant: hi\n\nAssistant:"
        );
    }

    #[test]
    fn system_prompt_names_the_working_directory_and_format() {
        let tools = ToolRegistry::new();

        let prompt = system_prompt(Path::new("/tmp/project"), &tools);

        assert!(prompt.contains("Current working directory: /tmp/project."));
        assert!(prompt.contains(r#"{"tool": "tool_name", "args""#));
        assert!(prompt.contains("AVAILABLE TOOLS:"));
    }
}
