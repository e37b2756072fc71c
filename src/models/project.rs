use serde::{Deserialize, Serialize};

use super::{
    Decision, MarkdownDocument, Milestone, Phase, ProjectConfig, ProjectStatus, Requirement,
    ResearchDoc, SearchEntry, Todo,
};

/// The root aggregate: everything parsed from a planning root.
///
/// Built once at startup, then replaced wholesale by the incremental updater.
/// Every path stored anywhere in the aggregate is relative to the planning
/// root, so the serving layer never has to strip absolute paths.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectState {
    pub config: Option<ProjectConfig>,
    pub status: Option<ProjectStatus>,
    pub project_doc: Option<MarkdownDocument>,
    pub milestones: Vec<Milestone>,
    pub current_milestone: Option<Milestone>,
    pub phases: Vec<Phase>,
    pub requirements: Vec<Requirement>,
    pub todos: Vec<Todo>,
    pub research: Vec<ResearchDoc>,
    pub decisions: Vec<Decision>,
    pub search_index: Vec<SearchEntry>,
}

impl ProjectState {
    /// Total number of plans across all phases.
    pub fn plan_count(&self) -> usize {
        self.phases.iter().map(|p| p.plans.len()).sum()
    }
}
