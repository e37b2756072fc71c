use serde::{Deserialize, Serialize};

use super::MarkdownDocument;

/// The derived lifecycle state of a phase directory.
///
/// Precedence when deriving: `Verified` > `Summarized` > `Executing` >
/// `Researched` > `Planned`. The status is never read from a document; it is
/// inferred from which files exist.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    Planned,
    Researched,
    Executing,
    Summarized,
    Verified,
}

impl PhaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Researched => "researched",
            Self::Executing => "executing",
            Self::Summarized => "summarized",
            Self::Verified => "verified",
        }
    }
}

/// The lifecycle state of a plan.
///
/// `Complete` is derived, not authoritative: a plan becomes complete the
/// moment a matching summary file exists, regardless of what the plan's own
/// header declares.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Planned,
    Executing,
    Complete,
    Failed,
}

/// A verifiable artifact a plan promises to produce.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Artifact {
    pub path: String,
    pub provides: String,
    pub contains: Option<String>,
    pub exports: Vec<String>,
}

/// A declared wiring between two artifacts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyLink {
    pub from: String,
    pub to: String,
    pub via: String,
    pub pattern: String,
}

/// A plan's declared truths, artifacts and key links, used for later
/// acceptance checking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MustHaves {
    pub truths: Vec<String>,
    pub artifacts: Vec<Artifact>,
    pub key_links: Vec<KeyLink>,
}

/// A unit of executable work declared in a `<phase>-<plan>-PLAN.md` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub phase: String,
    pub plan_number: u32,
    pub file_name: String,
    pub file_path: String,
    #[serde(rename = "type")]
    pub plan_type: String,
    pub wave: u32,
    pub depends_on: Vec<String>,
    pub files_modified: Vec<String>,
    pub autonomous: bool,
    pub requirements: Vec<String>,
    pub must_haves: MustHaves,
    pub objective: Option<String>,
    pub context: Option<String>,
    pub tasks: Option<String>,
    pub status: PlanStatus,
    pub summary: Option<PlanSummary>,
}

/// One decision/rationale pair from a summary's decisions table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionEntry {
    pub decision: String,
    pub rationale: String,
}

/// The post-hoc completion record for a plan (`<phase>-<plan>-SUMMARY.md`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    pub phase: String,
    pub plan: u32,
    pub status: String,
    pub started: String,
    pub completed: String,
    pub duration: String,
    pub subsystem: Option<String>,
    pub tags: Vec<String>,
    pub one_liner: String,
    pub files_created: Vec<String>,
    pub files_modified: Vec<String>,
    pub decisions: Vec<DecisionEntry>,
    pub body: String,
}

/// A row of a verification document's human-verification table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HumanCheck {
    pub test: String,
    pub expected: String,
    pub why_human: String,
}

/// The verification record for a whole phase (`<phase>-VERIFICATION.md`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseVerification {
    pub phase: String,
    pub verified: String,
    pub status: String,
    pub score: String,
    pub score_num: u32,
    pub score_total: u32,
    pub re_verification: bool,
    pub human_verification: Vec<HumanCheck>,
    pub goal_achievement: String,
    pub body: String,
}

/// A numbered unit of work, represented as one directory under `phases/`.
///
/// `number` keeps the text exactly as it appeared in the directory name
/// ("03", "07.1", "41"); [`Phase::numeric`] gives the sortable value, so
/// fractional phases order between their integer neighbors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phase {
    pub number: String,
    pub slug: String,
    pub dir_name: String,
    pub dir_path: String,
    pub goal: String,
    pub milestone: String,
    pub status: PhaseStatus,
    pub plans: Vec<Plan>,
    pub research: Option<MarkdownDocument>,
    pub context: Option<MarkdownDocument>,
    pub uat: Option<MarkdownDocument>,
    pub verification: Option<PhaseVerification>,
}

impl Phase {
    /// Numeric value of the phase number, for sorting and range membership.
    pub fn numeric(&self) -> f64 {
        self.number.parse().unwrap_or(0.0)
    }
}
