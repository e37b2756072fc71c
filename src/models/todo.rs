use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    Pending,
    Done,
}

impl TodoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
        }
    }
}

/// A todo file from `todos/pending/` or `todos/done/`.
///
/// The date and slug come from the filename; status comes from which
/// directory the file lives in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    pub date: String,
    pub slug: String,
    pub file_name: String,
    pub title: String,
    pub area: String,
    pub files: Vec<String>,
    pub status: TodoStatus,
    pub problem: String,
    pub solution: String,
    pub body: String,
}
