use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RequirementStatus {
    Complete,
    Pending,
}

/// A single requirement entry from REQUIREMENTS.md.
///
/// `fulfilled_by_plans` is derived by scanning every plan's declared
/// requirement-ID list. A requirement no plan references stays unfulfilled;
/// that is a normal state, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requirement {
    pub id: String,
    pub description: String,
    pub status: RequirementStatus,
    pub section: String,
    pub milestone: String,
    pub fulfilled_by_plans: Vec<String>,
}
