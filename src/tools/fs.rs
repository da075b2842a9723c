//! File tools: numbered reads, whole-file writes, and uniqueness-gated edits.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::fs;

use crate::error::{CodelingError, Result};
use crate::tool::{ParamKind, ParamSpec, Tool};

pub struct ReadFileTool;

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read"
    }

    fn description(&self) -> &str {
        "Read file with line numbers (file path, not directory)"
    }

    fn parameters(&self) -> &[ParamSpec] {
        const PARAMS: [ParamSpec; 3] = [
            ParamSpec::required("path", ParamKind::String),
            ParamSpec::optional("offset", ParamKind::Number),
            ParamSpec::optional("limit", ParamKind::Number),
        ];
        &PARAMS
    }

    async fn call(&self, args: &Map<String, Value>) -> Result<String> {
        let path = args
            .get("path")
            .and_then(Value::as_str)
            .ok_or_else(|| CodelingError::Protocol("missing `path` for read".into()))?;

        let text = fs::read_to_string(path)
            .await
            .map_err(|err| CodelingError::ToolInvocation {
                name: self.name().into(),
                source: Box::new(err),
            })?;

        let lines: Vec<&str> = text.split_inclusive('\n').collect();
        let offset = args
            .get("offset")
            .and_then(Value::as_u64)
            .unwrap_or(0) as usize;
        let limit = args
            .get("limit")
            .and_then(Value::as_u64)
            .map(|limit| limit as usize)
            .unwrap_or_else(|| lines.len().saturating_sub(offset));

        let start = offset.min(lines.len());
        let end = offset.saturating_add(limit).min(lines.len());

        let mut numbered = String::new();
        for (idx, line) in lines[start..end].iter().enumerate() {
            numbered.push_str(&format!("{:4}| {}", offset + idx + 1, line));
        }
        Ok(numbered)
    }
}

pub struct WriteFileTool;

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        "write"
    }

    fn description(&self) -> &str {
        "Write content to file"
    }

    fn parameters(&self) -> &[ParamSpec] {
        const PARAMS: [ParamSpec; 2] = [
            ParamSpec::required("path", ParamKind::String),
            ParamSpec::required("content", ParamKind::String),
        ];
        &PARAMS
    }

    async fn call(&self, args: &Map<String, Value>) -> Result<String> {
        let path = args
            .get("path")
            .and_then(Value::as_str)
            .ok_or_else(|| CodelingError::Protocol("missing `path` for write".into()))?;
        let content = args
            .get("content")
            .and_then(Value::as_str)
            .ok_or_else(|| CodelingError::Protocol("missing `content` for write".into()))?;

        fs::write(path, content)
            .await
            .map_err(|err| CodelingError::ToolInvocation {
                name: self.name().into(),
                source: Box::new(err),
            })?;

        Ok("ok".to_string())
    }
}

pub struct EditFileTool;

#[async_trait]
impl Tool for EditFileTool {
    fn name(&self) -> &str {
        "edit"
    }

    fn description(&self) -> &str {
        "Replace old with new in file (old must be unique unless all=true)"
    }

    fn parameters(&self) -> &[ParamSpec] {
        const PARAMS: [ParamSpec; 4] = [
            ParamSpec::required("path", ParamKind::String),
            ParamSpec::required("old", ParamKind::String),
            ParamSpec::required("new", ParamKind::String),
            ParamSpec::optional("all", ParamKind::Boolean),
        ];
        &PARAMS
    }

    async fn call(&self, args: &Map<String, Value>) -> Result<String> {
        let path = args
            .get("path")
            .and_then(Value::as_str)
            .ok_or_else(|| CodelingError::Protocol("missing `path` for edit".into()))?;
        let old = args
            .get("old")
            .and_then(Value::as_str)
            .ok_or_else(|| CodelingError::Protocol("missing `old` for edit".into()))?;
        let new = args
            .get("new")
            .and_then(Value::as_str)
            .ok_or_else(|| CodelingError::Protocol("missing `new` for edit".into()))?;
        let all = args.get("all").and_then(Value::as_bool).unwrap_or(false);

        let text = fs::read_to_string(path)
            .await
            .map_err(|err| CodelingError::ToolInvocation {
                name: self.name().into(),
                source: Box::new(err),
            })?;

        // These two are results handed back to the model, not faults: the
        // file is left untouched and the loop carries on.
        let count = text.matches(old).count();
        if count == 0 {
            return Ok("error: old_string not found".to_string());
        }
        if !all && count > 1 {
            return Ok(format!(
                "error: old_string appears {count} times, must be unique (use all=true)"
            ));
        }

        let replaced = if all {
            text.replace(old, new)
        } else {
            text.replacen(old, new, 1)
        };

        fs::write(path, replaced)
            .await
            .map_err(|err| CodelingError::ToolInvocation {
                name: self.name().into(),
                source: Box::new(err),
            })?;

        Ok("ok".to_string())
    }
}
