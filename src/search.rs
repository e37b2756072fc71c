//! Search indexer: a flat, denormalized view of every first-class record,
//! plus ranked substring lookups over it.

use serde::Serialize;

use crate::models::{EntryKind, ProjectState, SearchEntry};

/// Results are cut off here after ranking.
const MAX_RESULTS: usize = 50;
/// Repeated content occurrences stop counting past this.
const OCCURRENCE_CAP: usize = 5;

/// A search hit: the entry plus its accumulated score.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredEntry {
    #[serde(flatten)]
    pub entry: SearchEntry,
    pub score: u32,
}

/// Flatten the whole state into search entries. Runs after every build or
/// relevant update; entries are regenerated wholesale, never patched.
pub fn build_index(state: &ProjectState) -> Vec<SearchEntry> {
    let mut entries = Vec::new();

    for phase in &state.phases {
        for plan in &phase.plans {
            let content = [
                plan.objective.as_deref().unwrap_or(""),
                plan.context.as_deref().unwrap_or(""),
                plan.tasks.as_deref().unwrap_or(""),
                &plan.must_haves.truths.join(" "),
                &plan.files_modified.join(" "),
                &plan.requirements.join(" "),
            ]
            .join(" ");

            let title_tail = plan
                .objective
                .as_deref()
                .map(|o| truncate(o, 80))
                .unwrap_or_else(|| plan.file_name.clone());

            entries.push(SearchEntry {
                title: format!("Plan {}: {}", plan.plan_number, title_tail),
                path: plan.file_path.clone(),
                kind: EntryKind::Plan,
                phase: non_empty(&plan.phase),
                milestone: non_empty(&phase.milestone),
                content,
                preview: plan
                    .objective
                    .as_deref()
                    .map(|o| truncate(o, 200))
                    .unwrap_or_default(),
            });
        }

        for plan in &phase.plans {
            let Some(summary) = &plan.summary else {
                continue;
            };
            let title_tail = if summary.one_liner.is_empty() {
                plan.file_name.clone()
            } else {
                summary.one_liner.clone()
            };
            entries.push(SearchEntry {
                title: format!("Summary: {title_tail}"),
                path: plan.file_path.replace("-PLAN.md", "-SUMMARY.md"),
                kind: EntryKind::Summary,
                phase: non_empty(&plan.phase),
                milestone: non_empty(&phase.milestone),
                content: summary.body.clone(),
                preview: summary.one_liner.clone(),
            });
        }

        if let Some(verification) = &phase.verification {
            let prefix = phase.dir_name.split('-').next().unwrap_or(&phase.dir_name);
            entries.push(SearchEntry {
                title: format!("Verification: Phase {}", phase.number),
                path: format!("{}/{}-VERIFICATION.md", phase.dir_path, prefix),
                kind: EntryKind::Verification,
                phase: Some(phase.dir_name.clone()),
                milestone: non_empty(&phase.milestone),
                content: verification.body.clone(),
                preview: format!("{} - {}", verification.status, verification.score),
            });
        }
    }

    for doc in &state.research {
        entries.push(SearchEntry {
            title: doc.title.clone(),
            path: doc.file_path.clone(),
            kind: EntryKind::Research,
            phase: None,
            milestone: None,
            content: doc.body.clone(),
            preview: truncate(&doc.body, 200),
        });
    }

    for todo in &state.todos {
        entries.push(SearchEntry {
            title: todo.title.clone(),
            path: format!("todos/{}/{}", todo.status.as_str(), todo.file_name),
            kind: EntryKind::Todo,
            phase: None,
            milestone: None,
            content: format!("{} {} {}", todo.problem, todo.solution, todo.body),
            preview: truncate(&todo.problem, 200),
        });
    }

    for milestone in &state.milestones {
        entries.push(SearchEntry {
            title: format!("{} {}", milestone.version, milestone.name),
            path: "ROADMAP.md".to_string(),
            kind: EntryKind::Milestone,
            phase: None,
            milestone: Some(milestone.version.clone()),
            content: format!(
                "{} {} {}",
                milestone.name,
                milestone.phase_range,
                milestone.status.as_str()
            ),
            preview: format!(
                "{} {} - {}",
                milestone.version,
                milestone.name,
                milestone.status.as_str()
            ),
        });
    }

    for requirement in &state.requirements {
        entries.push(SearchEntry {
            title: format!("{}: {}", requirement.id, truncate(&requirement.description, 80)),
            path: "REQUIREMENTS.md".to_string(),
            kind: EntryKind::Requirement,
            phase: None,
            milestone: non_empty(&requirement.milestone),
            content: format!(
                "{} {} {}",
                requirement.id, requirement.description, requirement.section
            ),
            preview: truncate(&requirement.description, 200),
        });
    }

    if let Some(doc) = &state.project_doc {
        entries.push(SearchEntry {
            title: "PROJECT.md".to_string(),
            path: doc.file_path.clone(),
            kind: EntryKind::Document,
            phase: None,
            milestone: None,
            content: doc.body.clone(),
            preview: truncate(&doc.body, 200),
        });
    }

    entries
}

/// Ranked lookup. The query is lowercased and whitespace-tokenized; each
/// entry accumulates, per term: title substring +10 (+5 more for a
/// whole-word title match), content substring +1 plus the occurrence count
/// capped at 5, type tag +3, phase tag +2, milestone tag +2. Zero-score
/// entries are dropped; ties break by ascending title.
pub fn search(index: &[SearchEntry], query: &str) -> Vec<ScoredEntry> {
    let query = query.to_lowercase();
    let terms: Vec<&str> = query.split_whitespace().collect();
    if terms.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<ScoredEntry> = Vec::new();

    for entry in index {
        let title = entry.title.to_lowercase();
        let content = entry.content.to_lowercase();
        let mut score = 0u32;

        for &term in &terms {
            if title.contains(term) {
                score += 10;
                if title
                    .split(|c: char| !c.is_alphanumeric() && c != '_')
                    .any(|word| word == term)
                {
                    score += 5;
                }
            }
            if content.contains(term) {
                score += 1;
                score += content.matches(term).count().min(OCCURRENCE_CAP) as u32;
            }
            if entry.kind.as_str().contains(term) {
                score += 3;
            }
            if tag_matches(entry.phase.as_deref(), term) {
                score += 2;
            }
            if tag_matches(entry.milestone.as_deref(), term) {
                score += 2;
            }
        }

        if score > 0 {
            scored.push(ScoredEntry {
                entry: entry.clone(),
                score,
            });
        }
    }

    scored.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.entry.title.cmp(&b.entry.title))
    });
    scored.truncate(MAX_RESULTS);
    scored
}

fn tag_matches(tag: Option<&str>, term: &str) -> bool {
    tag.map(|t| t.to_lowercase().contains(term)).unwrap_or(false)
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
