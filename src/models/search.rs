use serde::{Deserialize, Serialize};

/// Which first-class record a search entry was flattened from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Plan,
    Summary,
    Verification,
    Research,
    Todo,
    Milestone,
    Requirement,
    Document,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plan => "plan",
            Self::Summary => "summary",
            Self::Verification => "verification",
            Self::Research => "research",
            Self::Todo => "todo",
            Self::Milestone => "milestone",
            Self::Requirement => "requirement",
            Self::Document => "document",
        }
    }
}

/// One denormalized entry of the search index.
///
/// Entries are regenerated wholesale whenever their source records change;
/// they are never patched field by field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchEntry {
    pub title: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub phase: Option<String>,
    pub milestone: Option<String>,
    pub content: String,
    pub preview: String,
}
