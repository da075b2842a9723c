//! The built-in toolkit: file operations, search, and shell execution.

pub mod fs;
pub mod search;
pub mod shell;

pub use shell::{OutputSink, ShellConfig};

use std::sync::Arc;

use crate::config::ToolsConfig;
use crate::tool::ToolRegistry;

/// Build the standard coding toolkit. Registration order is the order tools
/// appear in the system prompt.
pub fn coding_toolkit(config: &ToolsConfig, sink: Option<Arc<dyn OutputSink>>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(fs::ReadFileTool);
    registry.register(fs::WriteFileTool);
    registry.register(fs::EditFileTool);
    registry.register(search::GlobTool);
    registry.register(search::GrepTool::new(config.grep_max_hits));

    let mut bash = shell::BashTool::new(ShellConfig {
        timeout_secs: config.shell_timeout_secs,
    });
    if let Some(sink) = sink {
        bash = bash.with_sink(sink);
    }
    registry.register(bash);

    registry
}
