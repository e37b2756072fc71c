mod builder;
mod phases;
mod update;

pub use builder::build_state;
pub use update::{FileEvent, FileEventKind};

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::models::ProjectState;
use crate::search::{self, ScoredEntry};

/// Cheaply cloneable owner of the project aggregate.
///
/// Readers take an `Arc` snapshot; the updater clones the current state,
/// applies a whole event batch, and publishes the result by swapping the Arc.
/// Consumers therefore only ever observe a fully-built state. Mutation is
/// serialized by the single update loop that owns the event channel; the lock
/// here only guards the pointer swap.
#[derive(Clone)]
pub struct StateHandle {
    planning_root: Arc<PathBuf>,
    current: Arc<RwLock<Arc<ProjectState>>>,
}

impl StateHandle {
    /// Build the initial state from disk.
    pub async fn load(planning_root: PathBuf) -> Self {
        let state = builder::build_state(&planning_root).await;
        Self {
            planning_root: Arc::new(planning_root),
            current: Arc::new(RwLock::new(Arc::new(state))),
        }
    }

    pub fn planning_root(&self) -> &Path {
        &self.planning_root
    }

    /// The current fully-built aggregate.
    pub fn snapshot(&self) -> Arc<ProjectState> {
        self.current.read().expect("state lock poisoned").clone()
    }

    /// Apply one debounced batch of file events and publish the result.
    pub async fn apply_events(&self, events: &[FileEvent]) {
        let mut next = ProjectState::clone(&self.snapshot());
        for event in events {
            update::apply_event(&mut next, &self.planning_root, event).await;
        }
        *self.current.write().expect("state lock poisoned") = Arc::new(next);
    }

    /// Ranked search over the current index.
    pub fn search(&self, query: &str) -> Vec<ScoredEntry> {
        search::search(&self.snapshot().search_index, query)
    }
}

/// Read a file as UTF-8, treating any failure as absent content.
pub(crate) async fn read_file_safe(path: &Path) -> Option<String> {
    tokio::fs::read_to_string(path).await.ok()
}

/// Names of the markdown files directly inside `dir`, sorted. A missing or
/// unreadable directory is an empty tree, not an error.
pub(crate) async fn markdown_files(dir: &Path) -> Vec<String> {
    let mut names = Vec::new();
    let Ok(mut entries) = tokio::fs::read_dir(dir).await else {
        return names;
    };
    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name().to_string_lossy().to_string();
        if name.ends_with(".md") {
            names.push(name);
        }
    }
    names.sort();
    names
}
