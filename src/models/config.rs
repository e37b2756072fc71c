use serde::{Deserialize, Serialize};

/// Workflow toggles declared in `config.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub research: bool,
    pub plan_check: bool,
    pub verifier: bool,
}

/// Git conventions declared in `config.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitConfig {
    pub branching_strategy: String,
}

/// Parsed `config.json` from the planning root.
///
/// Every field carries a permissive default; a config file with missing or
/// mistyped fields still produces a usable record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub mode: String,
    pub depth: String,
    pub parallelization: bool,
    pub commit_docs: bool,
    pub model_profile: String,
    pub workflow: WorkflowConfig,
    pub git: GitConfig,
    pub created: String,
}
