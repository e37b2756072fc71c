//! Incremental updater: path-keyed dispatch over change events.
//!
//! The dispatch trades efficiency for correctness: any event under a subtree
//! whose relationships are encoded in filenames (summary-to-plan matching,
//! milestone range membership) re-enumerates that whole subtree, because a
//! rename or add invalidates sibling matching that a single-file patch
//! cannot see.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::models::ProjectState;
use crate::parsers::{config::parse_config, markdown::parse_markdown, status::parse_status};
use crate::search;
use crate::state::builder::{
    assign_phases_to_milestones, build_state, cross_reference_requirements, extract_decisions,
    parse_research_docs, parse_todos, select_current_milestone,
};
use crate::state::{phases, read_file_safe};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileEventKind {
    Add,
    Change,
    Unlink,
}

/// One debounced filesystem change, as delivered by the watcher.
#[derive(Debug, Clone)]
pub struct FileEvent {
    pub kind: FileEventKind,
    pub path: PathBuf,
}

impl FileEvent {
    pub fn new(kind: FileEventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// Apply one change event to the state in place.
pub(crate) async fn apply_event(state: &mut ProjectState, planning_root: &Path, event: &FileEvent) {
    let rel = event
        .path
        .strip_prefix(planning_root)
        .unwrap_or(&event.path);
    let unlinked = event.kind == FileEventKind::Unlink;

    if rel == Path::new("config.json") {
        state.config = if unlinked {
            None
        } else {
            read_file_safe(&event.path).await.as_deref().and_then(parse_config)
        };
        return;
    }

    if rel == Path::new("STATE.md") {
        state.status = if unlinked {
            None
        } else {
            read_file_safe(&event.path).await.as_deref().map(parse_status)
        };
        return;
    }

    if rel == Path::new("PROJECT.md") {
        state.project_doc = if unlinked {
            None
        } else {
            read_file_safe(&event.path)
                .await
                .as_deref()
                .map(|raw| parse_markdown(raw, "PROJECT.md", "PROJECT.md"))
        };
        return;
    }

    // Roadmap and requirements changes reach into milestone membership and
    // every cross-reference, so only a full rebuild is safe.
    if rel == Path::new("ROADMAP.md") || rel == Path::new("REQUIREMENTS.md") {
        *state = build_state(planning_root).await;
        return;
    }

    if rel.starts_with("phases") {
        // Goals came from the roadmap at build time; carry them across the
        // re-enumeration. A roadmap change takes the full-rebuild path above.
        let old_goals: HashMap<String, String> = state
            .phases
            .iter()
            .filter(|p| !p.goal.is_empty())
            .map(|p| (p.number.clone(), p.goal.clone()))
            .collect();

        state.phases = phases::parse_phases(planning_root).await;
        for phase in &mut state.phases {
            if let Some(goal) = old_goals.get(&phase.number) {
                phase.goal = goal.clone();
            }
        }

        assign_phases_to_milestones(&mut state.milestones, &mut state.phases);
        state.decisions = extract_decisions(&state.phases);
        state.current_milestone = select_current_milestone(state);
        cross_reference_requirements(&mut state.requirements, &state.phases);
        state.search_index = search::build_index(state);
        return;
    }

    if rel.starts_with("todos") {
        state.todos = parse_todos(planning_root).await;
        state.search_index = search::build_index(state);
        return;
    }

    if rel.starts_with("research") {
        state.research = parse_research_docs(planning_root).await;
        state.search_index = search::build_index(state);
    }
}
