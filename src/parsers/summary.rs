use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{DecisionEntry, PlanSummary};
use crate::parsers::extract;
use crate::parsers::frontmatter::{as_string, as_string_array, as_u32, split_frontmatter};

static ONE_LINER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*One-liner:\*\*\s*(.+)").unwrap());
static TAGS_LIST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^tags:\s*\[(.+)\]$").unwrap());

/// Parse a `<phase>-<plan>-SUMMARY.md` file.
///
/// Metadata may live in frontmatter or inline `key: value` lines; frontmatter
/// wins when both are present. The decisions table and the Created/Modified
/// file lists come out of the body.
pub fn parse_summary(raw: &str) -> PlanSummary {
    let fm = split_frontmatter(raw);
    let body = fm.body;
    let data = &fm.data;

    let phase = {
        let from_header = as_string(data.get("phase"), "");
        if from_header.is_empty() {
            extract::line_value(&body, "phase").unwrap_or_default()
        } else {
            from_header
        }
    };

    let plan = match data.get("plan") {
        Some(value) => as_u32(Some(value), 0),
        None => extract::line_value(&body, "plan")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0),
    };

    let subsystem = {
        let from_header = as_string(data.get("subsystem"), "");
        if from_header.is_empty() {
            extract::line_value(&body, "subsystem")
        } else {
            Some(from_header)
        }
    };

    let tags = if data.get("tags").is_some() {
        as_string_array(data.get("tags"))
    } else {
        TAGS_LIST_RE
            .captures(&body)
            .map(|caps| caps[1].split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_default()
    };

    let one_liner = ONE_LINER_RE
        .captures(&body)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_default();

    PlanSummary {
        phase,
        plan,
        status: extract::line_value(&body, "status").unwrap_or_else(|| "complete".to_string()),
        started: extract::line_value(&body, "started").unwrap_or_default(),
        completed: extract::line_value(&body, "completed").unwrap_or_default(),
        duration: extract::line_value(&body, "duration").unwrap_or_default(),
        subsystem: subsystem.filter(|s| !s.is_empty()),
        tags,
        one_liner,
        files_created: file_list(&body, "Created"),
        files_modified: file_list(&body, "Modified"),
        decisions: decisions_table(&body),
        body,
    }
}

fn file_list(body: &str, heading: &str) -> Vec<String> {
    extract::section(body, 3, |t| t == heading)
        .map(|s| extract::bullets(&s))
        .unwrap_or_default()
}

/// Rows of the `## Decisions` (or `## Decisions Made`) table.
pub fn decisions_table(body: &str) -> Vec<DecisionEntry> {
    let Some(section) = extract::section(body, 2, |t| t == "Decisions" || t == "Decisions Made")
    else {
        return Vec::new();
    };

    extract::table_rows(&section, "Decision")
        .into_iter()
        .filter_map(|cells| {
            let decision = cells.first()?.clone();
            let rationale = cells.get(1)?.clone();
            Some(DecisionEntry {
                decision,
                rationale,
            })
        })
        .collect()
}
