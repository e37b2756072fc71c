//! Phase assembler: turns one directory under `phases/` into a Phase
//! aggregate, inferring status from which files exist.

use std::cmp::Ordering;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{MarkdownDocument, Phase, PhaseStatus, PhaseVerification, Plan, PlanStatus, PlanSummary};
use crate::parsers::{
    markdown::parse_markdown, plan::parse_plan, summary::parse_summary,
    verification::parse_verification,
};
use crate::state::{markdown_files, read_file_safe};

static NUMBERED_DIR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)?)-(.+)$").unwrap());
static BARE_DIR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^phase-(\d+)$").unwrap());

static PLAN_FILE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)-PLAN\.md$").unwrap());
static SUMMARY_FILE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)-SUMMARY\.md$").unwrap());
static SUMMARY_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+)-(\d+)-SUMMARY").unwrap());
static VERIFICATION_FILE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)-VERIFICATION\.md$").unwrap());
static RESEARCH_FILE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)-RESEARCH\.md$").unwrap());
static CONTEXT_FILE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)-CONTEXT\.md$").unwrap());
static UAT_FILE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)-UAT\.md$").unwrap());

/// Parse every phase directory under `phases/`, sorted ascending by number.
/// Fractional numbers (7.1) sort between their integer neighbors.
pub(crate) async fn parse_phases(planning_root: &Path) -> Vec<Phase> {
    let phases_dir = planning_root.join("phases");
    let Ok(mut entries) = tokio::fs::read_dir(&phases_dir).await else {
        return Vec::new();
    };

    let mut phases = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        let is_dir = entry
            .file_type()
            .await
            .map(|t| t.is_dir())
            .unwrap_or(false);
        if !is_dir {
            continue;
        }
        let dir_name = entry.file_name().to_string_lossy().to_string();
        if let Some(phase) = parse_phase_dir(&dir_name, &entry.path()).await {
            phases.push(phase);
        }
    }

    phases.sort_by(|a, b| {
        a.numeric()
            .partial_cmp(&b.numeric())
            .unwrap_or(Ordering::Equal)
    });
    phases
}

/// Parse one phase directory. Naming patterns, in order:
/// "01-core-endpoint", "07.1-api-response-consistency", "phase-41".
/// A directory matching neither pattern is non-planning content and is
/// silently excluded.
async fn parse_phase_dir(dir_name: &str, dir_path: &Path) -> Option<Phase> {
    let (number, slug) = if let Some(caps) = NUMBERED_DIR_RE.captures(dir_name) {
        (caps[1].to_string(), caps[2].to_string())
    } else if let Some(caps) = BARE_DIR_RE.captures(dir_name) {
        (caps[1].to_string(), String::new())
    } else {
        return None;
    };

    let rel_dir = format!("phases/{dir_name}");
    let files = markdown_files(dir_path).await;

    let mut plans: Vec<Plan> = Vec::new();
    let mut pending_summaries: Vec<(u32, PlanSummary)> = Vec::new();
    let mut research: Option<MarkdownDocument> = None;
    let mut context: Option<MarkdownDocument> = None;
    let mut uat: Option<MarkdownDocument> = None;
    let mut verification: Option<PhaseVerification> = None;

    for file in &files {
        let Some(raw) = read_file_safe(&dir_path.join(file)).await else {
            continue;
        };
        let rel_path = format!("{rel_dir}/{file}");

        if PLAN_FILE_RE.is_match(file) {
            plans.push(parse_plan(&raw, file, &rel_path));
        } else if SUMMARY_FILE_RE.is_match(file) {
            if let Some(plan_number) = summary_plan_number(file) {
                pending_summaries.push((plan_number, parse_summary(&raw)));
            }
        } else if VERIFICATION_FILE_RE.is_match(file) {
            verification = Some(parse_verification(&raw));
        } else if RESEARCH_FILE_RE.is_match(file) {
            research = Some(parse_markdown(&raw, file, &rel_path));
        } else if CONTEXT_FILE_RE.is_match(file) {
            context = Some(parse_markdown(&raw, file, &rel_path));
        } else if UAT_FILE_RE.is_match(file) {
            uat = Some(parse_markdown(&raw, file, &rel_path));
        }
    }

    plans.sort_by_key(|p| p.plan_number);

    // Enumeration order is not guaranteed, so summaries are matched to plans
    // only after every file has been read. A matched summary unconditionally
    // promotes the plan to complete, whatever its header declared.
    for (plan_number, summary) in pending_summaries {
        if let Some(plan) = plans
            .iter_mut()
            .find(|p| p.plan_number == plan_number && p.summary.is_none())
        {
            plan.summary = Some(summary);
            plan.status = PlanStatus::Complete;
        }
    }

    let status = derive_phase_status(&plans, verification.is_some(), research.is_some());

    Some(Phase {
        number,
        slug,
        dir_name: dir_name.to_string(),
        dir_path: rel_dir,
        goal: String::new(),
        milestone: String::new(),
        status,
        plans,
        research,
        context,
        uat,
        verification,
    })
}

/// Shared numeric plan id from "<phase>-<plan>-SUMMARY.md".
fn summary_plan_number(file_name: &str) -> Option<u32> {
    SUMMARY_ID_RE
        .captures(file_name)
        .and_then(|caps| caps[2].parse().ok())
}

fn derive_phase_status(plans: &[Plan], has_verification: bool, has_research: bool) -> PhaseStatus {
    if has_verification {
        PhaseStatus::Verified
    } else if !plans.is_empty() && plans.iter().all(|p| p.summary.is_some()) {
        PhaseStatus::Summarized
    } else if plans.iter().any(|p| p.summary.is_some()) {
        PhaseStatus::Executing
    } else if has_research {
        PhaseStatus::Researched
    } else {
        PhaseStatus::Planned
    }
}
