//! Full state build: top-level files, the phases tree, research and todos,
//! then every cross-reference, then the search index.

use std::path::Path;

use crate::models::{
    Decision, Milestone, Phase, ProjectState, Requirement, ResearchDoc, Todo, TodoStatus,
};
use crate::parsers::{
    config::parse_config,
    markdown::parse_markdown,
    requirements::parse_requirements,
    roadmap::{self, RoadmapMilestone},
    status::parse_status,
    todo::parse_todo,
};
use crate::search;
use crate::state::{markdown_files, phases, read_file_safe};

/// Build the complete project state from a planning root.
///
/// Every top-level file is independently optional: a missing or unreadable
/// file yields an empty section, never an abort. The worst possible input
/// produces an impoverished but valid state.
pub async fn build_state(planning_root: &Path) -> ProjectState {
    let config_path = planning_root.join("config.json");
    let status_path = planning_root.join("STATE.md");
    let roadmap_path = planning_root.join("ROADMAP.md");
    let requirements_path = planning_root.join("REQUIREMENTS.md");
    let project_path = planning_root.join("PROJECT.md");
    let (config_raw, status_raw, roadmap_raw, requirements_raw, project_raw) = tokio::join!(
        read_file_safe(&config_path),
        read_file_safe(&status_path),
        read_file_safe(&roadmap_path),
        read_file_safe(&requirements_path),
        read_file_safe(&project_path),
    );

    let mut state = ProjectState {
        config: config_raw.as_deref().and_then(parse_config),
        status: status_raw.as_deref().map(parse_status),
        project_doc: project_raw
            .as_deref()
            .map(|raw| parse_markdown(raw, "PROJECT.md", "PROJECT.md")),
        requirements: requirements_raw
            .as_deref()
            .map(parse_requirements)
            .unwrap_or_default(),
        ..ProjectState::default()
    };

    let roadmap = roadmap_raw
        .as_deref()
        .map(roadmap::parse_roadmap)
        .unwrap_or_default();
    state.milestones = roadmap::to_milestones(&roadmap);

    state.phases = phases::parse_phases(planning_root).await;
    enrich_goals(&mut state.phases, &roadmap);

    state.research = parse_research_docs(planning_root).await;
    state.todos = parse_todos(planning_root).await;

    assign_phases_to_milestones(&mut state.milestones, &mut state.phases);
    state.current_milestone = select_current_milestone(&state);
    cross_reference_requirements(&mut state.requirements, &state.phases);
    state.decisions = extract_decisions(&state.phases);

    // Last: the index depends on everything above.
    state.search_index = search::build_index(&state);

    state
}

/// Assign each phase to at most one milestone by testing its number against
/// every declared range; the first matching range wins. Membership is
/// recomputed from scratch each time.
pub(crate) fn assign_phases_to_milestones(milestones: &mut [Milestone], phases: &mut [Phase]) {
    for milestone in milestones.iter_mut() {
        milestone.phases.clear();
    }

    for phase in phases.iter_mut() {
        phase.milestone.clear();
        let value = phase.numeric();
        for milestone in milestones.iter_mut() {
            let Some((start, end)) = roadmap::parse_phase_range(&milestone.phase_range) else {
                continue;
            };
            if value >= f64::from(start) && value <= f64::from(end) {
                phase.milestone = milestone.version.clone();
                milestone.phases.push(phase.clone());
                break;
            }
        }
    }
}

/// The active milestone is whichever one STATE.md names; no match is None.
pub(crate) fn select_current_milestone(state: &ProjectState) -> Option<Milestone> {
    let name = state.status.as_ref()?.milestone_name.as_str();
    if name.is_empty() {
        return None;
    }
    state
        .milestones
        .iter()
        .find(|m| m.version == name)
        .cloned()
}

/// Back-link requirements to the plans that declare them. A requirement ID
/// no plan mentions stays unfulfilled.
pub(crate) fn cross_reference_requirements(requirements: &mut [Requirement], phases: &[Phase]) {
    for requirement in requirements.iter_mut() {
        requirement.fulfilled_by_plans.clear();
    }

    for phase in phases {
        for plan in &phase.plans {
            for req_id in &plan.requirements {
                if let Some(requirement) = requirements.iter_mut().find(|r| &r.id == req_id) {
                    requirement
                        .fulfilled_by_plans
                        .push(format!("{}/{}", plan.phase, plan.file_name));
                }
            }
        }
    }
}

/// Flatten every plan summary's decisions table into one identity-less list.
pub(crate) fn extract_decisions(phases: &[Phase]) -> Vec<Decision> {
    let mut decisions = Vec::new();

    for phase in phases {
        for plan in &phase.plans {
            let Some(summary) = &plan.summary else {
                continue;
            };
            for entry in &summary.decisions {
                let source = if summary.one_liner.is_empty() {
                    plan.file_name.clone()
                } else {
                    summary.one_liner.clone()
                };
                decisions.push(Decision {
                    decision: entry.decision.clone(),
                    rationale: entry.rationale.clone(),
                    phase: plan.phase.clone(),
                    plan: format!("{}/{}", plan.phase, plan.file_name),
                    source,
                });
            }
        }
    }

    decisions
}

/// Fill empty phase goals from the roadmap's phase stubs, matched by number.
fn enrich_goals(phases: &mut [Phase], roadmap: &[RoadmapMilestone]) {
    for phase in phases.iter_mut() {
        if !phase.goal.is_empty() {
            continue;
        }
        let value = phase.numeric();
        let stub_goal = roadmap
            .iter()
            .flat_map(|m| &m.phases)
            .find(|stub| stub.number.parse::<f64>().map(|n| n == value).unwrap_or(false))
            .map(|stub| stub.goal.clone());
        if let Some(goal) = stub_goal {
            phase.goal = goal;
        }
    }
}

/// Standalone research documents from the `research/` tree.
pub(crate) async fn parse_research_docs(planning_root: &Path) -> Vec<ResearchDoc> {
    let research_dir = planning_root.join("research");
    let mut docs = Vec::new();

    for file in markdown_files(&research_dir).await {
        let Some(raw) = read_file_safe(&research_dir.join(&file)).await else {
            continue;
        };
        let rel_path = format!("research/{file}");
        let md = parse_markdown(&raw, &file, &rel_path);
        let title = md
            .headings
            .iter()
            .find(|h| h.level == 1)
            .map(|h| h.text.clone())
            .unwrap_or_else(|| file.trim_end_matches(".md").to_string());

        docs.push(ResearchDoc {
            file_name: file,
            file_path: rel_path,
            title,
            body: md.body,
            headings: md.headings.into_iter().map(|h| h.text).collect(),
        });
    }

    docs
}

/// Todos from `todos/pending/` and `todos/done/`, newest first.
pub(crate) async fn parse_todos(planning_root: &Path) -> Vec<Todo> {
    let mut todos = Vec::new();

    for (subdir, status) in [("pending", TodoStatus::Pending), ("done", TodoStatus::Done)] {
        let dir = planning_root.join("todos").join(subdir);
        for file in markdown_files(&dir).await {
            let Some(raw) = read_file_safe(&dir.join(&file)).await else {
                continue;
            };
            todos.push(parse_todo(&raw, &file, status));
        }
    }

    todos.sort_by(|a, b| b.date.cmp(&a.date));
    todos
}
