//! ROADMAP.md parser.
//!
//! Two independent passes share nothing but the milestone list. The first
//! recovers milestones from checkbox bullets under the category headings. The
//! second recovers phase stubs from two physical layouts: phase blocks nested
//! in a `<details>` section (assigned unconditionally to that section's
//! milestone) and top-level `### Phase N:` headings (assigned to the first
//! milestone whose declared range contains the number). Either layout may be
//! entirely absent.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Milestone, MilestoneCategory, MilestoneStatus};
use crate::parsers::extract::section_until;

static MILESTONE_ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^- \[([x ])\]\s*\*\*(\S+)\s+([^*]+)\*\*\s*-\s*(?:Phases?\s*)?([^\n(]+?)(?:\s*\((?:shipped\s*)?([^)]*)\))?\s*$",
    )
    .unwrap()
});
static DETAILS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<details>\s*<summary>([^<]+)</summary>(.*?)</details>").unwrap());
static SUMMARY_VERSION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(v[\d.]+)").unwrap());
static PHASE_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^### Phase ([\d.]+):?\s*(.+)$").unwrap());
static GOAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*Goal\*\*:\s*([^\n]+)").unwrap());
static PLAN_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"- \[[ x]\]\s*([\d.]+-\d+-PLAN\.md)\s*(?:--?\s*)?(.+)?").unwrap());
static PHASE_RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)(?:\s*[-\u{2013}]\s*(\d+))?").unwrap());

/// A phase as sketched in the roadmap, before the filesystem is consulted.
#[derive(Debug, Clone)]
pub struct RoadmapPhaseStub {
    pub number: String,
    pub slug: String,
    pub goal: String,
    pub plan_count: u32,
    pub plan_names: Vec<String>,
}

/// A milestone as declared in the roadmap, with its sketched phases.
#[derive(Debug, Clone)]
pub struct RoadmapMilestone {
    pub version: String,
    pub name: String,
    pub phase_range: String,
    pub status: MilestoneStatus,
    pub category: MilestoneCategory,
    pub completed: Option<String>,
    pub phases: Vec<RoadmapPhaseStub>,
}

/// Parse the numeric range a milestone declares ("Phases 1-3", "Phase 4",
/// "40-45"). A single number is a one-phase range.
pub fn parse_phase_range(range: &str) -> Option<(u32, u32)> {
    let caps = PHASE_RANGE_RE.captures(range)?;
    let start: u32 = caps[1].parse().ok()?;
    let end = caps
        .get(2)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(start);
    Some((start, end))
}

pub fn parse_roadmap(raw: &str) -> Vec<RoadmapMilestone> {
    let mut milestones = Vec::new();

    for (category, content) in category_sections(raw) {
        for caps in MILESTONE_ENTRY_RE.captures_iter(&content) {
            let checked = &caps[1] == "x";
            let status = if checked {
                MilestoneStatus::Shipped
            } else if category == MilestoneCategory::GoLiveGate {
                MilestoneStatus::InProgress
            } else {
                MilestoneStatus::Planned
            };
            let date_or_info = caps
                .get(5)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();

            milestones.push(RoadmapMilestone {
                version: caps[2].trim().to_string(),
                name: caps[3].trim().to_string(),
                phase_range: caps[4].trim().to_string(),
                status,
                category,
                completed: checked.then_some(date_or_info),
                phases: Vec::new(),
            });
        }
    }

    collect_details_phases(raw, &mut milestones);
    collect_top_level_phases(raw, &mut milestones);

    milestones
}

/// Convert roadmap milestones to the model type. Filesystem phases are
/// attached later by the state builder; here only the sketched plan counts
/// survive.
pub fn to_milestones(roadmap: &[RoadmapMilestone]) -> Vec<Milestone> {
    roadmap
        .iter()
        .map(|rm| Milestone {
            version: rm.version.clone(),
            name: rm.name.clone(),
            phase_range: rm.phase_range.clone(),
            status: rm.status,
            category: rm.category,
            completed: rm.completed.clone(),
            plan_count: rm.phases.iter().map(|p| p.plan_count).sum(),
            phases: Vec::new(),
        })
        .collect()
}

fn category_sections(raw: &str) -> Vec<(MilestoneCategory, String)> {
    let mut sections = Vec::new();

    if let Some(content) = section_until(raw, 3, |t| t == "Shipped", |l, _| l <= 3) {
        sections.push((MilestoneCategory::Shipped, content));
    }
    // The go-live section may contain phase blocks; skip past their headings.
    if let Some(content) = section_until(
        raw,
        3,
        |t| t == "Go-Live Gate",
        |l, t| l <= 3 && !t.starts_with("Phase"),
    ) {
        sections.push((MilestoneCategory::GoLiveGate, content));
    }
    if let Some(content) = section_until(raw, 3, |t| t == "Post-Launch", |l, _| l <= 2) {
        sections.push((MilestoneCategory::PostLaunch, content));
    }

    sections
}

/// Phase blocks nested in `<details>` sections belong to the milestone named
/// in the `<summary>` line, no range test involved.
fn collect_details_phases(raw: &str, milestones: &mut [RoadmapMilestone]) {
    for caps in DETAILS_RE.captures_iter(raw) {
        let summary_text = caps[1].trim().to_string();
        let details_body = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        let Some(version) = SUMMARY_VERSION_RE
            .captures(&summary_text)
            .map(|v| v[1].to_string())
        else {
            continue;
        };
        let Some(milestone) = milestones.iter_mut().find(|m| m.version == version) else {
            continue;
        };

        for (number, name, body) in phase_blocks(details_body) {
            milestone.phases.push(parse_phase_stub(&number, &name, &body));
        }
    }
}

/// Top-level `### Phase N:` headings (outside any `<details>` block) join the
/// first milestone whose declared range contains their number.
fn collect_top_level_phases(raw: &str, milestones: &mut [RoadmapMilestone]) {
    let matches: Vec<_> = PHASE_HEADING_RE.captures_iter(raw).collect();

    for caps in &matches {
        let whole = caps.get(0).expect("capture 0 always present");
        if inside_details(raw, whole.start()) {
            continue;
        }

        let number = caps[1].trim().to_string();
        let name = caps[2].trim().to_string();
        let body = top_level_block_body(raw, whole.end());
        let stub = parse_phase_stub(&number, &name, &body);
        let value: f64 = number.parse().unwrap_or(0.0);

        for milestone in milestones.iter_mut() {
            let Some((start, end)) = parse_phase_range(&milestone.phase_range) else {
                continue;
            };
            if value >= f64::from(start) && value <= f64::from(end) {
                milestone.phases.push(stub);
                break;
            }
        }
    }
}

fn inside_details(raw: &str, index: usize) -> bool {
    let before = &raw[..index];
    let last_open = before.rfind("<details>");
    let last_close = before.rfind("</details>");
    match (last_open, last_close) {
        (Some(open), Some(close)) => open > close,
        (Some(_), None) => true,
        _ => false,
    }
}

/// `(number, name, body)` for every `### Phase N:` heading in the content;
/// each body runs to the next phase heading, truncated at a `---` rule.
fn phase_blocks(content: &str) -> Vec<(String, String, String)> {
    let matches: Vec<_> = PHASE_HEADING_RE.captures_iter(content).collect();
    let mut blocks = Vec::new();

    for (i, caps) in matches.iter().enumerate() {
        let whole = caps.get(0).expect("capture 0 always present");
        let begin = whole.end();
        let end = matches
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(content.len());
        let mut body = &content[begin..end];
        if let Some(rule) = body.find("\n---") {
            body = &body[..rule];
        }
        blocks.push((
            caps[1].trim().to_string(),
            caps[2].trim().to_string(),
            body.to_string(),
        ));
    }

    blocks
}

fn top_level_block_body(raw: &str, begin: usize) -> String {
    let rest = &raw[begin..];
    let end = ["\n### Phase ", "\n### v", "\n## "]
        .iter()
        .filter_map(|marker| rest.find(marker))
        .min()
        .unwrap_or(rest.len());
    rest[..end].to_string()
}

fn parse_phase_stub(number: &str, name: &str, body: &str) -> RoadmapPhaseStub {
    let goal = GOAL_RE
        .captures(body)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_default();

    let mut plan_names = Vec::new();
    for caps in PLAN_LINE_RE.captures_iter(body) {
        let name = caps
            .get(2)
            .or_else(|| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();
        plan_names.push(name);
    }

    RoadmapPhaseStub {
        number: number.to_string(),
        slug: slugify(name),
        goal,
        plan_count: plan_names.len() as u32,
        plan_names,
    }
}

fn slugify(name: &str) -> String {
    let mut slug = String::new();
    let mut last_dash = true;
    for ch in name.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_matches('-').to_string()
}
