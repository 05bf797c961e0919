use anyhow::{bail, Context, Result};
use glob::Pattern;
use serde::Deserialize;
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "stagegate.yaml";

const DEFAULT_NAME: &str = "content";
const DEFAULT_PATTERN: &str = "*content-*";
const DEFAULT_CREATOR: &str = "content-creator";
const DEFAULT_AUDITOR: &str = "content-auditor";
const DEFAULT_REVIEWER: &str = "content-reviewer";

/// Raw configuration structure (as parsed from YAML)
#[derive(Debug, Deserialize)]
struct ConfigRaw {
    workflow: Option<WorkflowRaw>,
}

/// Workflow overrides; every field falls back to the content defaults
#[derive(Debug, Default, Deserialize)]
struct WorkflowRaw {
    name: Option<String>,
    pattern: Option<String>,
    creator: Option<String>,
    auditor: Option<String>,
    reviewer: Option<String>,
}

/// Resolved workflow definition: the three stage labels and the family
/// pattern that marks an agent as belonging to this workflow.
#[derive(Debug, Clone)]
pub struct Workflow {
    /// Short name used in decision reasons ("Not a {name} workflow")
    pub name: String,
    pattern: Pattern,
    pub creator: String,
    pub auditor: String,
    pub reviewer: String,
}

impl Default for Workflow {
    fn default() -> Self {
        Workflow {
            name: DEFAULT_NAME.to_string(),
            pattern: Pattern::new(DEFAULT_PATTERN).unwrap_or_default(),
            creator: DEFAULT_CREATOR.to_string(),
            auditor: DEFAULT_AUDITOR.to_string(),
            reviewer: DEFAULT_REVIEWER.to_string(),
        }
    }
}

impl Workflow {
    /// Whether an agent name belongs to this workflow family
    pub fn matches_family(&self, agent: &str) -> bool {
        self.pattern.matches(agent)
    }
}

/// Load the workflow definition for a project.
///
/// No project_dir or no `stagegate.yaml` means the content defaults. An
/// unreadable or invalid config is logged and also falls back to the
/// defaults rather than failing the hook.
pub fn load_workflow(project_dir: Option<&Path>) -> Workflow {
    let Some(dir) = project_dir else {
        return Workflow::default();
    };
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Workflow::default();
    }

    match load_from(&config_path) {
        Ok(workflow) => workflow,
        Err(err) => {
            tracing::warn!(
                config = %config_path.display(),
                error = %err,
                "ignoring invalid config, using defaults"
            );
            Workflow::default()
        }
    }
}

fn load_from(config_path: &Path) -> Result<Workflow> {
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;

    let parsed: ConfigRaw = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", config_path.display()))?;

    resolve(parsed.workflow.unwrap_or_default(), config_path)
}

/// Fill in defaults and validate a raw workflow definition
fn resolve(raw: WorkflowRaw, config_path: &Path) -> Result<Workflow> {
    let name = raw.name.unwrap_or_else(|| DEFAULT_NAME.to_string());
    let pattern_str = raw.pattern.unwrap_or_else(|| DEFAULT_PATTERN.to_string());
    let creator = raw.creator.unwrap_or_else(|| DEFAULT_CREATOR.to_string());
    let auditor = raw.auditor.unwrap_or_else(|| DEFAULT_AUDITOR.to_string());
    let reviewer = raw.reviewer.unwrap_or_else(|| DEFAULT_REVIEWER.to_string());

    for (field, value) in [
        ("name", &name),
        ("creator", &creator),
        ("auditor", &auditor),
        ("reviewer", &reviewer),
    ] {
        if value.is_empty() {
            bail!(
                "Invalid config at {}: 'workflow.{}' is empty",
                config_path.display(),
                field
            );
        }
    }
    if creator == auditor || auditor == reviewer || creator == reviewer {
        bail!(
            "Invalid config at {}: workflow stages must be distinct",
            config_path.display()
        );
    }

    let pattern = match Pattern::new(&pattern_str) {
        Ok(pattern) => pattern,
        Err(_) => bail!(
            "Invalid config at {}: bad glob pattern '{}'",
            config_path.display(),
            pattern_str
        ),
    };

    Ok(Workflow {
        name,
        pattern,
        creator,
        auditor,
        reviewer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let workflow = Workflow::default();
        assert_eq!(workflow.creator, "content-creator");
        assert_eq!(workflow.auditor, "content-auditor");
        assert_eq!(workflow.reviewer, "content-reviewer");
        assert!(workflow.matches_family("content-creator"));
        assert!(workflow.matches_family("my-content-editor"));
        assert!(!workflow.matches_family("Read"));
    }

    #[test]
    fn test_no_project_dir_uses_defaults() {
        let workflow = load_workflow(None);
        assert_eq!(workflow.name, "content");
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let workflow = load_workflow(Some(temp.path()));
        assert_eq!(workflow.creator, "content-creator");
    }

    #[test]
    fn test_full_override() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILENAME),
            r#"
workflow:
  name: docs
  pattern: "docs-*"
  creator: docs-writer
  auditor: docs-checker
  reviewer: docs-approver
"#,
        )
        .unwrap();

        let workflow = load_workflow(Some(temp.path()));
        assert_eq!(workflow.name, "docs");
        assert_eq!(workflow.creator, "docs-writer");
        assert!(workflow.matches_family("docs-writer"));
        assert!(!workflow.matches_family("content-creator"));
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILENAME),
            "workflow:\n  name: blog\n",
        )
        .unwrap();

        let workflow = load_workflow(Some(temp.path()));
        assert_eq!(workflow.name, "blog");
        assert_eq!(workflow.auditor, "content-auditor");
    }

    #[test]
    fn test_invalid_yaml_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILENAME), ":: not yaml ::").unwrap();

        let workflow = load_workflow(Some(temp.path()));
        assert_eq!(workflow.creator, "content-creator");
    }

    #[test]
    fn test_duplicate_stages_rejected() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join(CONFIG_FILENAME);
        fs::write(
            &config_path,
            "workflow:\n  creator: same\n  auditor: same\n",
        )
        .unwrap();

        assert!(load_from(&config_path).is_err());
        // and the public entry point degrades to defaults
        let workflow = load_workflow(Some(temp.path()));
        assert_eq!(workflow.creator, "content-creator");
    }

    #[test]
    fn test_empty_label_rejected() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join(CONFIG_FILENAME);
        fs::write(&config_path, "workflow:\n  creator: \"\"\n").unwrap();

        assert!(load_from(&config_path).is_err());
    }

    #[test]
    fn test_bad_glob_rejected() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join(CONFIG_FILENAME);
        fs::write(&config_path, "workflow:\n  pattern: \"[unclosed\"\n").unwrap();

        assert!(load_from(&config_path).is_err());
    }
}
