//! Search tools: filesystem pattern matching and regex search over files.

use std::time::SystemTime;

use async_trait::async_trait;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{CodelingError, Result};
use crate::tool::{ParamKind, ParamSpec, Tool};

pub struct GlobTool;

#[async_trait]
impl Tool for GlobTool {
    fn name(&self) -> &str {
        "glob"
    }

    fn description(&self) -> &str {
        "Find files by pattern, sorted by mtime"
    }

    fn parameters(&self) -> &[ParamSpec] {
        const PARAMS: [ParamSpec; 2] = [
            ParamSpec::required("pat", ParamKind::String),
            ParamSpec::optional("path", ParamKind::String),
        ];
        &PARAMS
    }

    async fn call(&self, args: &Map<String, Value>) -> Result<String> {
        let pat = args
            .get("pat")
            .and_then(Value::as_str)
            .ok_or_else(|| CodelingError::Protocol("missing `pat` for glob".into()))?;
        let root = args.get("path").and_then(Value::as_str).unwrap_or(".");

        let pattern = format!("{root}/{pat}").replace("//", "/");
        let paths = glob::glob(&pattern).map_err(|err| CodelingError::ToolInvocation {
            name: self.name().into(),
            source: Box::new(err),
        })?;

        // Directories get the epoch as a sentinel mtime so they sort behind
        // every real file; the stable sort keeps enumeration order for ties.
        let mut entries: Vec<(SystemTime, String)> = Vec::new();
        for path in paths.flatten() {
            let modified = path
                .metadata()
                .ok()
                .filter(|meta| meta.is_file())
                .and_then(|meta| meta.modified().ok())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            entries.push((modified, path.display().to_string()));
        }
        entries.sort_by(|a, b| b.0.cmp(&a.0));

        if entries.is_empty() {
            return Ok("none".to_string());
        }
        Ok(entries
            .into_iter()
            .map(|(_, path)| path)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

pub struct GrepTool {
    max_hits: usize,
}

impl GrepTool {
    pub fn new(max_hits: usize) -> Self {
        Self { max_hits }
    }
}

#[async_trait]
impl Tool for GrepTool {
    fn name(&self) -> &str {
        "grep"
    }

    fn description(&self) -> &str {
        "Search files for regex pattern"
    }

    fn parameters(&self) -> &[ParamSpec] {
        const PARAMS: [ParamSpec; 2] = [
            ParamSpec::required("pat", ParamKind::String),
            ParamSpec::optional("path", ParamKind::String),
        ];
        &PARAMS
    }

    async fn call(&self, args: &Map<String, Value>) -> Result<String> {
        let pat = args
            .get("pat")
            .and_then(Value::as_str)
            .ok_or_else(|| CodelingError::Protocol("missing `pat` for grep".into()))?;
        let root = args.get("path").and_then(Value::as_str).unwrap_or(".");

        let regex = Regex::new(pat).map_err(|err| CodelingError::ToolInvocation {
            name: self.name().into(),
            source: Box::new(err),
        })?;

        let pattern = format!("{root}/**").replace("//", "/");
        let paths = glob::glob(&pattern).map_err(|err| CodelingError::ToolInvocation {
            name: self.name().into(),
            source: Box::new(err),
        })?;

        let mut hits: Vec<String> = Vec::new();
        'files: for path in paths.flatten() {
            // Directories and non-UTF-8 files fail to read; skip them quietly.
            let Ok(text) = std::fs::read_to_string(&path) else {
                continue;
            };
            for (idx, line) in text.lines().enumerate() {
                if regex.is_match(line) {
                    hits.push(format!("{}:{}:{}", path.display(), idx + 1, line.trim_end()));
                    if hits.len() >= self.max_hits {
                        break 'files;
                    }
                }
            }
        }

        if hits.is_empty() {
            return Ok("none".to_string());
        }
        Ok(hits.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{File, FileTimes};
    use std::time::{Duration, SystemTime};

    use serde_json::json;
    use tempfile::tempdir;

    fn args_of(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn set_mtime(path: &std::path::Path, secs_after_epoch: u64) {
        let file = File::options().write(true).open(path).unwrap();
        let when = SystemTime::UNIX_EPOCH + Duration::from_secs(secs_after_epoch);
        file.set_times(FileTimes::new().set_modified(when)).unwrap();
    }

    #[tokio::test]
    async fn glob_sorts_newest_first() {
        let dir = tempdir().unwrap();
        let older = dir.path().join("older.py");
        let newer = dir.path().join("newer.py");
        std::fs::write(&older, "").unwrap();
        std::fs::write(&newer, "").unwrap();
        set_mtime(&older, 1_000);
        set_mtime(&newer, 2_000);

        let out = GlobTool
            .call(&args_of(json!({
                "pat": "*.py",
                "path": dir.path().to_str().unwrap(),
            })))
            .await
            .unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("newer.py"));
        assert!(lines[1].ends_with("older.py"));
    }

    #[tokio::test]
    async fn glob_sorts_directories_last() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("aaa_dir")).unwrap();
        let file = dir.path().join("zzz.txt");
        std::fs::write(&file, "").unwrap();
        set_mtime(&file, 1_000);

        let out = GlobTool
            .call(&args_of(json!({
                "pat": "*",
                "path": dir.path().to_str().unwrap(),
            })))
            .await
            .unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].ends_with("zzz.txt"));
        assert!(lines[1].ends_with("aaa_dir"));
    }

    #[tokio::test]
    async fn glob_reports_none_for_zero_matches() {
        let dir = tempdir().unwrap();

        let out = GlobTool
            .call(&args_of(json!({
                "pat": "*.nope",
                "path": dir.path().to_str().unwrap(),
            })))
            .await
            .unwrap();

        assert_eq!(out, "none");
    }

    #[tokio::test]
    async fn grep_emits_path_line_and_text() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("lib.rs"), "mod a;\nfn main() {}\n").unwrap();

        let out = GrepTool::new(50)
            .call(&args_of(json!({
                "pat": "fn main",
                "path": dir.path().to_str().unwrap(),
            })))
            .await
            .unwrap();

        assert_eq!(out.lines().count(), 1);
        assert!(out.ends_with("lib.rs:2:fn main() {}"));
    }

    #[tokio::test]
    async fn grep_caps_total_hits() {
        let dir = tempdir().unwrap();
        let body = "match me\n".repeat(80);
        std::fs::write(dir.path().join("big.txt"), body).unwrap();

        let out = GrepTool::new(50)
            .call(&args_of(json!({
                "pat": "match",
                "path": dir.path().to_str().unwrap(),
            })))
            .await
            .unwrap();

        assert_eq!(out.lines().count(), 50);
    }

    #[tokio::test]
    async fn grep_reports_none_for_zero_matches() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("lib.rs"), "nothing here\n").unwrap();

        let out = GrepTool::new(50)
            .call(&args_of(json!({
                "pat": "unobtainium",
                "path": dir.path().to_str().unwrap(),
            })))
            .await
            .unwrap();

        assert_eq!(out, "none");
    }

    #[tokio::test]
    async fn grep_faults_on_an_invalid_pattern() {
        let err = GrepTool::new(50)
            .call(&args_of(json!({"pat": "([unclosed"})))
            .await
            .unwrap_err();

        assert!(matches!(err, CodelingError::ToolInvocation { .. }));
    }
}
