use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{PhaseMetric, ProjectStatus, SessionContinuity, Velocity};
use crate::parsers::extract;

static PHASE_POS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Phase:\s*(\d+)\s*of\s*(\d+)\s*(?:\(([^)]+)\))?").unwrap());
static STATUS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^Status:\s*(.+)$").unwrap());
static LAST_ACTIVITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^Last activity:\s*(.+)$").unwrap());
static PROGRESS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Progress:\s*(v[\d.]+)\s*\[[^\]]*\]\s*(\d+)%").unwrap());
static TOTAL_PLANS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Total plans completed:\s*(\d+)").unwrap());
static AVG_DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Average duration:\s*(\d+)\s*min").unwrap());
static TOTAL_DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Total execution time:\s*(\d+)\s*min").unwrap());
static METRICS_ROW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\|\s*([a-zA-Z0-9._-]+(?:\s+[a-zA-Z0-9._-]+)*)\s*\|\s*(\d+)\s*\|\s*(\d+)\s*min\s*\|\s*(\d+)\s*min\s*\|",
    )
    .unwrap()
});
static LAST_SESSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^Last session:\s*(.+)$").unwrap());

/// Parse STATE.md: current position, progress, velocity, metrics, decisions,
/// blockers and session continuity. Every field defaults when its line or
/// section is missing.
pub fn parse_status(raw: &str) -> ProjectStatus {
    let phase_pos = PHASE_POS_RE.captures(raw);
    let current_phase = capture_u32(phase_pos.as_ref(), 1);
    let total_phases = capture_u32(phase_pos.as_ref(), 2);
    let phase_name = phase_pos
        .as_ref()
        .and_then(|caps| caps.get(3))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    let progress = PROGRESS_RE.captures(raw);
    let milestone_name = progress
        .as_ref()
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_default();
    let progress_percent = capture_u32(progress.as_ref(), 2);

    let velocity = Velocity {
        total_plans: first_u32(&TOTAL_PLANS_RE, raw),
        avg_duration: first_u32(&AVG_DURATION_RE, raw),
        total_duration: first_u32(&TOTAL_DURATION_RE, raw),
    };

    let phase_metrics = METRICS_ROW_RE
        .captures_iter(raw)
        .filter_map(|caps| {
            let phase = caps[1].trim().to_string();
            if phase == "Phase" || phase.starts_with("---") {
                return None;
            }
            Some(PhaseMetric {
                phase,
                plans: caps[2].parse().unwrap_or(0),
                total_minutes: caps[3].parse().unwrap_or(0),
                avg_per_plan: caps[4].parse().unwrap_or(0),
            })
        })
        .collect();

    let decisions = extract::section(raw, 3, |t| t == "Decisions")
        .map(|s| extract::bullets(&s))
        .unwrap_or_default();

    let blockers = extract::section(raw, 3, |t| t == "Blockers/Concerns")
        .filter(|s| {
            let lowered = s.trim().to_lowercase();
            lowered != "none" && lowered != "none."
        })
        .map(|s| extract::bullets(&s))
        .unwrap_or_default();

    let session_continuity = SessionContinuity {
        last_session: LAST_SESSION_RE
            .captures(raw)
            .map(|caps| caps[1].trim().to_string())
            .unwrap_or_default(),
        stopped_at: stopped_at(raw),
    };

    ProjectStatus {
        current_phase,
        total_phases,
        phase_name,
        status: first_string(&STATUS_RE, raw),
        last_activity: first_string(&LAST_ACTIVITY_RE, raw),
        progress_percent,
        milestone_name,
        velocity,
        phase_metrics,
        decisions,
        blockers,
        session_continuity,
    }
}

/// "Stopped at:" runs to the next blank line, not the end of its own line.
fn stopped_at(raw: &str) -> String {
    let Some(idx) = raw.find("Stopped at:") else {
        return String::new();
    };
    let rest = &raw[idx + "Stopped at:".len()..];
    match rest.find("\n\n") {
        Some(end) => rest[..end].trim().to_string(),
        None => rest.trim().to_string(),
    }
}

fn capture_u32(caps: Option<&regex::Captures<'_>>, index: usize) -> u32 {
    caps.and_then(|c| c.get(index))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

fn first_u32(re: &Regex, raw: &str) -> u32 {
    re.captures(raw)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}

fn first_string(re: &Regex, raw: &str) -> String {
    re.captures(raw)
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_default()
}
