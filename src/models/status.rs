use serde::{Deserialize, Serialize};

/// Rollup execution stats from STATE.md.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub total_plans: u32,
    pub avg_duration: u32,
    pub total_duration: u32,
}

/// One row of the per-phase metrics table in STATE.md.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseMetric {
    pub phase: String,
    pub plans: u32,
    pub total_minutes: u32,
    pub avg_per_plan: u32,
}

/// Where the last working session left off.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionContinuity {
    pub last_session: String,
    pub stopped_at: String,
}

/// Parsed STATE.md: the project's self-declared position and momentum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectStatus {
    pub current_phase: u32,
    pub total_phases: u32,
    pub phase_name: String,
    pub status: String,
    pub last_activity: String,
    pub progress_percent: u32,
    pub milestone_name: String,
    pub velocity: Velocity,
    pub phase_metrics: Vec<PhaseMetric>,
    pub decisions: Vec<String>,
    pub blockers: Vec<String>,
    pub session_continuity: SessionContinuity,
}
