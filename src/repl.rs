//! The interactive shell wrapped around the agent loop: line input, session
//! commands, and ANSI rendering of explanations, tool calls, and results.

use std::io::Write;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::agent::Agent;
use crate::error::Result;
use crate::extract::ToolCall;
use crate::hooks::AgentHook;
use crate::llm::LanguageModel;
use crate::tools::OutputSink;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const BLUE: &str = "\x1b[34m";
const CYAN: &str = "\x1b[36m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";

/// Echoes each shell output line to the terminal while the command runs.
pub struct ReplSink;

impl OutputSink for ReplSink {
    fn line(&self, line: &str) {
        println!("  {DIM}│ {}{RESET}", line.trim_end());
    }
}

/// Renders explanations, tool headers, and result previews as the turn
/// progresses.
struct DisplayHook;

impl AgentHook for DisplayHook {
    fn on_explanation(&self, text: &str) {
        println!("\n{CYAN}⏺{RESET} {}", render_markdown(text));
    }

    fn on_tool_call(&self, call: &ToolCall) {
        let preview = call
            .args
            .values()
            .next()
            .map(|value| match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_default();
        println!(
            "\n{GREEN}⏺ {}{RESET}({DIM}{}{RESET})",
            capitalize(call.name.as_str()),
            truncate_chars(&preview, 50)
        );
    }

    fn on_tool_result(&self, result: &str) {
        println!("  {DIM}⎿  {}{RESET}", result_preview(result));
    }
}

pub struct Repl<M: LanguageModel> {
    agent: Agent<M>,
    model_label: String,
}

impl<M: LanguageModel> Repl<M> {
    pub fn new(agent: Agent<M>, model_label: impl Into<String>) -> Self {
        Self {
            agent: agent.with_hook(Arc::new(DisplayHook)),
            model_label: model_label.into(),
        }
    }

    /// Read-eval loop: empty lines are ignored, `/q` and `exit` end the
    /// session, `/c` resets the conversation, everything else becomes a user
    /// turn. Model faults are reported and the loop keeps going.
    pub async fn run(mut self) -> Result<()> {
        let cwd = std::env::current_dir()?;
        println!(
            "{BOLD}codeling{RESET} | {DIM}{} (Ollama) | {}{RESET}\n",
            self.model_label,
            cwd.display()
        );

        let mut input = BufReader::new(tokio::io::stdin()).lines();
        loop {
            println!("{}", separator());
            print!("{BOLD}{BLUE}❯{RESET} ");
            std::io::stdout().flush()?;

            let Some(line) = input.next_line().await? else {
                break; // EOF
            };
            let line = line.trim().to_string();
            println!("{}", separator());

            if line.is_empty() {
                continue;
            }
            if line == "/q" || line == "exit" {
                break;
            }
            if line == "/c" {
                self.agent.reset();
                println!("{GREEN}⏺ Cleared conversation{RESET}");
                continue;
            }

            if let Err(err) = self.agent.run_turn(line).await {
                println!("{RED}⏺ Error: {err}{RESET}");
            }
            println!();
        }

        Ok(())
    }
}

fn separator() -> String {
    format!("{DIM}{}{RESET}", "─".repeat(80))
}

fn render_markdown(text: &str) -> String {
    static BOLD_SPAN: OnceLock<Regex> = OnceLock::new();
    let pattern = BOLD_SPAN.get_or_init(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid pattern"));
    let replacement = format!("{BOLD}$1{RESET}");
    pattern.replace_all(text, replacement.as_str()).into_owned()
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// First line of the result, clipped, with a tail count for multi-line blobs.
fn result_preview(result: &str) -> String {
    let mut lines = result.lines();
    let first = lines.next().unwrap_or_default();
    let rest = lines.count();

    let mut preview = truncate_chars(first, 60);
    if rest > 0 {
        preview.push_str(&format!(" ... +{rest} lines"));
    } else if first.chars().count() > 60 {
        preview.push_str("...");
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_spans_become_ansi_bold() {
        let rendered = render_markdown("this is **important** text");

        assert_eq!(rendered, format!("this is {BOLD}important{RESET} text"));
    }

    #[test]
    fn capitalizes_tool_names_for_display() {
        assert_eq!(capitalize("glob"), "Glob");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn previews_clip_the_first_line_and_count_the_rest() {
        assert_eq!(result_preview("ok"), "ok");
        assert_eq!(result_preview("a\nb\nc"), "a ... +2 lines");

        let long = "x".repeat(80);
        let preview = result_preview(&long);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 63);
    }
}
