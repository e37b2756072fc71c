use serde::{Deserialize, Serialize};

use super::Phase;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    Shipped,
    InProgress,
    Planned,
}

impl MilestoneStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shipped => "shipped",
            Self::InProgress => "in_progress",
            Self::Planned => "planned",
        }
    }
}

/// Which roadmap category heading a milestone was declared under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneCategory {
    Shipped,
    GoLiveGate,
    PostLaunch,
}

/// A named release grouping a numeric phase range, declared in ROADMAP.md.
///
/// `phases` is a derived view: it is recomputed from the filesystem phase list
/// whenever phases change, never parsed from the roadmap itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub version: String,
    pub name: String,
    pub phase_range: String,
    pub status: MilestoneStatus,
    pub category: MilestoneCategory,
    pub completed: Option<String>,
    pub plan_count: u32,
    pub phases: Vec<Phase>,
}
