use serde_json::Value;

use crate::models::{GitConfig, ProjectConfig, WorkflowConfig};

/// Parse `config.json` from the planning root.
///
/// Unparseable JSON yields `None`; parseable JSON with missing or mistyped
/// fields yields a config with per-field defaults.
pub fn parse_config(raw: &str) -> Option<ProjectConfig> {
    let json: Value = serde_json::from_str(raw).ok()?;

    Some(ProjectConfig {
        mode: str_or(&json, "/mode", "unknown"),
        depth: str_or(&json, "/depth", "standard"),
        parallelization: bool_or(&json, "/parallelization"),
        commit_docs: bool_or(&json, "/commit_docs"),
        model_profile: str_or(&json, "/model_profile", "unknown"),
        workflow: WorkflowConfig {
            research: bool_or(&json, "/workflow/research"),
            plan_check: bool_or(&json, "/workflow/plan_check"),
            verifier: bool_or(&json, "/workflow/verifier"),
        },
        git: GitConfig {
            branching_strategy: str_or(&json, "/git/branching_strategy", "unknown"),
        },
        created: str_or(&json, "/created", ""),
    })
}

fn str_or(json: &Value, pointer: &str, fallback: &str) -> String {
    json.pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}

fn bool_or(json: &Value, pointer: &str) -> bool {
    json.pointer(pointer).and_then(Value::as_bool).unwrap_or(false)
}
