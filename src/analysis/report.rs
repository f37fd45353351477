use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A detected customer objection and how the rep handled it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectionRecord {
    /// The objection as voiced by the customer
    pub objection: String,

    /// Category tag (price, timing, authority, need, competition, other)
    pub category: String,

    /// How the rep responded
    pub handling: String,
}

/// Per-pass summary retained on the final report for traceability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentInsight {
    pub agent_name: String,

    /// Truncated raw pass output
    pub analysis: String,

    pub key_points: Vec<String>,

    pub score: Option<f64>,
}

/// Final synthesized coaching report. Immutable once produced.
///
/// `overall_score` is nominally 1-10 but comes from the model and is not
/// clamped; callers must tolerate out-of-range values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub job_id: String,

    pub call_summary: String,

    pub overall_score: f64,

    pub strengths: Vec<String>,

    pub weaknesses: Vec<String>,

    pub missed_opportunities: Vec<String>,

    pub objections_detected: Vec<ObjectionRecord>,

    pub recommended_actions: Vec<String>,

    /// One entry per analysis pass, in pass order
    pub agent_insights: Vec<AgentInsight>,

    pub generated_at: DateTime<Utc>,
}
