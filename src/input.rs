use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Input JSON from the Claude Code hook system
#[derive(Debug, Deserialize)]
pub struct HookInput {
    pub session_id: String,
    /// Path to the session transcript (JSON Lines), relative or absolute
    pub transcript_path: String,
    /// Tool that triggered the hook (normally "Task")
    pub tool_name: Option<String>,
    /// The tool's input parameters, passed through unexamined
    #[serde(default)]
    #[allow(dead_code)]
    pub tool_input: Value,
    #[allow(dead_code)]
    pub tool_output: Option<String>,
    /// Project root; anchors relative paths and the config lookup
    pub project_dir: Option<String>,
}

impl HookInput {
    /// Resolve a possibly-relative path against project_dir, falling back to
    /// the process working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match &self.project_dir {
            Some(dir) => Path::new(dir).join(path),
            None => path.to_path_buf(),
        }
    }
}

/// Read the hook input: from a file named by the first argument (test mode),
/// otherwise from stdin, which is how Claude Code delivers it.
pub fn read_input(args: &[String]) -> Result<HookInput> {
    let raw = match args.first() {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read hook input file: {}", path))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read hook input from stdin")?;
            buffer
        }
    };

    let input: HookInput =
        serde_json::from_str(&raw).context("Failed to parse hook input JSON")?;
    Ok(input)
}
