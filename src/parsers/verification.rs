use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{HumanCheck, PhaseVerification};
use crate::parsers::extract;
use crate::parsers::frontmatter::{as_string, split_frontmatter};

static SCORE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*/\s*(\d+)").unwrap());
static RE_VERIFICATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\*\*Re-verification:\*\*\s*(Yes|No)").unwrap());

/// Parse a `<phase>-VERIFICATION.md` file.
pub fn parse_verification(raw: &str) -> PhaseVerification {
    let fm = split_frontmatter(raw);
    let body = fm.body;
    let data = &fm.data;

    let score = as_string(data.get("score"), "0/0");
    let (score_num, score_total) = SCORE_RE
        .captures(&score)
        .map(|caps| {
            (
                caps[1].parse().unwrap_or(0),
                caps[2].parse().unwrap_or(0),
            )
        })
        .unwrap_or((0, 0));

    let re_verification = RE_VERIFICATION_RE
        .captures(&body)
        .map(|caps| caps[1].eq_ignore_ascii_case("yes"))
        .unwrap_or(false);

    let human_verification = extract::section(&body, 3, |t| t == "Human Verification")
        .or_else(|| extract::section(&body, 2, |t| t == "Human Verification"))
        .map(|section| {
            extract::table_rows(&section, "Test")
                .into_iter()
                .filter_map(|cells| {
                    Some(HumanCheck {
                        test: cells.first()?.clone(),
                        expected: cells.get(1)?.clone(),
                        why_human: cells.get(2)?.clone(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let goal_achievement = extract::section(&body, 2, |t| t == "Goal Achievement" || t == "Summary")
        .unwrap_or_default();

    PhaseVerification {
        phase: as_string(data.get("phase"), ""),
        verified: as_string(data.get("verified"), ""),
        status: as_string(data.get("status"), "unknown"),
        score,
        score_num,
        score_total,
        re_verification,
        human_verification,
        goal_achievement,
        body,
    }
}
