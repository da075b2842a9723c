//! Building blocks for a terminal coding agent.
//!
//! The crate provides a minimal runtime with:
//! - A language model abstraction (`LanguageModel`) with an Ollama-backed client.
//! - A tool interface (`Tool` and `ToolRegistry`) plus the built-in coding toolkit.
//! - An `Agent` that loops between the model and tools until the model answers
//!   in plain text, and a `Repl` that wraps the loop in an interactive shell.

mod agent;
mod config;
mod error;
mod extract;
mod hooks;
mod llm;
mod memory;
mod message;
mod prompt;
mod repl;
mod tool;
pub mod tools;

pub use agent::Agent;
pub use config::{AppConfig, ModelConfig, ToolsConfig};
pub use error::{CodelingError, Result};
pub use extract::{extract_tool_call, ToolCall};
pub use hooks::{AgentHook, SilentHook};
pub use llm::{LanguageModel, OllamaClient, StubModel};
pub use memory::Conversation;
pub use message::{Message, Role};
pub use prompt::{render_prompt, system_prompt};
pub use repl::{Repl, ReplSink};
pub use tool::{ParamKind, ParamSpec, Tool, ToolRegistry};
pub use tools::{coding_toolkit, OutputSink, ShellConfig};
