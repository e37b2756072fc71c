use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Requirement, RequirementStatus};
use crate::parsers::extract;

static HEADER_MILESTONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"# Requirements:.*?(v[\d.]+)").unwrap());
static SECTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^###\s+(.+)$").unwrap());
static CHECKBOX_REQ_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^- \[([x ])\]\s*\*\*([A-Z]+-\d+)\*\*:\s*(.+)$").unwrap());
static FUTURE_REQ_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^- \*\*([A-Z]+-\d+)\*\*:\s*(.+)$").unwrap());

/// Parse REQUIREMENTS.md into individual requirement entries.
///
/// Checkbox entries (`- [x] **ID**: ...`) are grouped under their `###`
/// section and inherit the milestone from the document header. Entries under
/// "Future Requirements" use a checkbox-less form and get milestone "future".
pub fn parse_requirements(raw: &str) -> Vec<Requirement> {
    let mut requirements = Vec::new();

    let default_milestone = HEADER_MILESTONE_RE
        .captures(raw)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default();

    let mut current_section = String::new();
    for line in raw.lines() {
        if let Some(caps) = SECTION_RE.captures(line) {
            current_section = caps[1].trim().to_string();
            continue;
        }
        if let Some(caps) = CHECKBOX_REQ_RE.captures(line) {
            let status = if &caps[1] == "x" {
                RequirementStatus::Complete
            } else {
                RequirementStatus::Pending
            };
            requirements.push(Requirement {
                id: caps[2].to_string(),
                description: caps[3].trim().to_string(),
                status,
                section: current_section.clone(),
                milestone: default_milestone.clone(),
                fulfilled_by_plans: Vec::new(),
            });
        }
    }

    if let Some(future) = extract::section(raw, 2, |t| t == "Future Requirements") {
        let mut subsection = "Future".to_string();
        for line in future.lines() {
            if let Some(caps) = SECTION_RE.captures(line) {
                subsection = caps[1].trim().to_string();
                continue;
            }
            if let Some(caps) = FUTURE_REQ_RE.captures(line) {
                requirements.push(Requirement {
                    id: caps[1].to_string(),
                    description: caps[2].trim().to_string(),
                    status: RequirementStatus::Pending,
                    section: subsection.clone(),
                    milestone: "future".to_string(),
                    fulfilled_by_plans: Vec::new(),
                });
            }
        }
    }

    requirements
}
