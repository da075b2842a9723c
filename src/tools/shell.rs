//! Shell command tool.
//!
//! Runs one command through `sh -c` with stderr folded into stdout, forwards
//! each output line to an optional sink as it arrives, and enforces a hard
//! wall-clock budget measured from spawn. On expiry the child is killed and a
//! timeout marker is appended to whatever was captured.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::time::Instant;
use tracing::warn;

use crate::error::{CodelingError, Result};
use crate::tool::{ParamKind, ParamSpec, Tool};

/// Receives each output line as the command produces it, ahead of the final
/// captured blob. The REPL plugs in a printer here.
pub trait OutputSink: Send + Sync {
    fn line(&self, line: &str);
}

#[derive(Clone)]
pub struct ShellConfig {
    /// Wall-clock budget in seconds, counted from subprocess start.
    pub timeout_secs: u64,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

pub struct BashTool {
    config: ShellConfig,
    sink: Option<Arc<dyn OutputSink>>,
}

impl BashTool {
    pub fn new(config: ShellConfig) -> Self {
        Self { config, sink: None }
    }

    pub fn with_sink(mut self, sink: Arc<dyn OutputSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    fn fault(&self, err: impl std::error::Error + Send + Sync + 'static) -> CodelingError {
        CodelingError::ToolInvocation {
            name: self.name().into(),
            source: Box::new(err),
        }
    }
}

#[async_trait]
impl Tool for BashTool {
    fn name(&self) -> &str {
        "bash"
    }

    fn description(&self) -> &str {
        "Run shell command"
    }

    fn parameters(&self) -> &[ParamSpec] {
        const PARAMS: [ParamSpec; 1] = [ParamSpec::required("cmd", ParamKind::String)];
        &PARAMS
    }

    async fn call(&self, args: &Map<String, Value>) -> Result<String> {
        let cmd = args
            .get("cmd")
            .and_then(Value::as_str)
            .ok_or_else(|| CodelingError::Protocol("missing `cmd` for bash".into()))?;

        #[cfg(unix)]
        let (program, flag) = ("sh", "-c");
        #[cfg(windows)]
        let (program, flag) = ("cmd", "/C");

        let mut child = Command::new(program)
            .arg(flag)
            .arg(cmd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| self.fault(err))?;

        let deadline = Instant::now() + Duration::from_secs(self.config.timeout_secs);

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| CodelingError::Protocol("child stdout was not captured".into()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| CodelingError::Protocol("child stderr was not captured".into()))?;
        let mut out_lines = BufReader::new(stdout).lines();
        let mut err_lines = BufReader::new(stderr).lines();
        let mut out_open = true;
        let mut err_open = true;

        let mut captured = String::new();
        let mut timed_out = false;

        while out_open || err_open {
            let next = tokio::time::timeout_at(deadline, async {
                tokio::select! {
                    line = out_lines.next_line(), if out_open => (true, line),
                    line = err_lines.next_line(), if err_open => (false, line),
                }
            })
            .await;

            match next {
                Err(_) => {
                    timed_out = true;
                    break;
                }
                Ok((_, Ok(Some(line)))) => {
                    if let Some(sink) = &self.sink {
                        sink.line(&line);
                    }
                    captured.push_str(&line);
                    captured.push('\n');
                }
                Ok((true, Ok(None))) => out_open = false,
                Ok((false, Ok(None))) => err_open = false,
                Ok((true, Err(_))) => out_open = false,
                Ok((false, Err(_))) => err_open = false,
            }
        }

        if !timed_out && tokio::time::timeout_at(deadline, child.wait()).await.is_err() {
            timed_out = true;
        }

        if timed_out {
            warn!(timeout_secs = self.config.timeout_secs, "shell command timed out");
            let _ = child.kill().await;
            captured.push_str(&format!("\n(timed out after {}s)", self.config.timeout_secs));
        }

        let trimmed = captured.trim();
        if trimmed.is_empty() {
            return Ok("(empty)".to_string());
        }
        Ok(trimmed.to_string())
    }
}
