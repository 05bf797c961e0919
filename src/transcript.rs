use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// One transcript line, as far as this hook cares
#[derive(Debug, Deserialize)]
struct TranscriptEvent {
    #[serde(rename = "type")]
    kind: Option<String>,
    tool: Option<String>,
    input: Option<EventInput>,
}

#[derive(Debug, Deserialize)]
struct EventInput {
    subagent_type: Option<String>,
}

/// Markers matched as-is in raw lines; "warning" is additionally matched
/// case-insensitively.
const WARNING_MARKERS: [&str; 2] = ["⚠️", "경고"];

/// Maximum excerpt length in characters
const EXCERPT_CHARS: usize = 100;

/// A warning spotted in the raw transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// 1-based transcript line number
    pub line: usize,
    pub excerpt: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: {}", self.line, self.excerpt)
    }
}

/// Extract the ordered sub-agent history from a transcript: the
/// `input.subagent_type` of every `Task` tool_use event.
///
/// Each non-empty line is parsed independently; a line that is not valid
/// JSON is logged and skipped, never fatal.
pub fn agent_calls(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript: {}", path.display()))?;

    let mut agents = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let event: TranscriptEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(_) => {
                tracing::warn!(line = idx + 1, "skipping unparseable transcript line");
                continue;
            }
        };
        if event.kind.as_deref() == Some("tool_use") && event.tool.as_deref() == Some("Task") {
            if let Some(agent) = event.input.and_then(|input| input.subagent_type) {
                if !agent.is_empty() {
                    agents.push(agent);
                }
            }
        }
    }

    Ok(agents)
}

/// Scan raw transcript lines (not parsed JSON) for warning markers.
/// Reads the file independently of agent_calls; transcripts are small.
pub fn scan_warnings(path: &Path) -> Result<Vec<Warning>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript: {}", path.display()))?;

    let mut warnings = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if has_warning_marker(line) {
            warnings.push(Warning {
                line: idx + 1,
                excerpt: line.chars().take(EXCERPT_CHARS).collect(),
            });
        }
    }

    Ok(warnings)
}

fn has_warning_marker(line: &str) -> bool {
    WARNING_MARKERS.iter().any(|marker| line.contains(marker))
        || line.to_lowercase().contains("warning")
}
