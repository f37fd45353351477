use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::Report;
use crate::transcript::Transcript;

/// Processing state of a job.
///
/// `pending -> transcribing -> analyzing -> completed`, with `failed` reachable
/// from any non-terminal state and absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Transcribing,
    Analyzing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Transcribing => "transcribing",
            Self::Analyzing => "analyzing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything tracked about one job. Written only by the pipeline driving the
/// job; read concurrently by status polling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_id: String,

    pub status: JobStatus,

    /// Coarse progress, monotonically non-decreasing within a run; reset to 0
    /// when the job fails
    pub progress_percentage: u8,

    /// Human-readable label for the current pipeline step
    pub current_step: String,

    /// Extension of the uploaded audio file, recorded at upload time
    pub file_extension: String,

    /// Reconstructed transcript, once transcription has finished
    pub transcript: Option<Transcript>,

    /// Final coaching report, once analysis has finished
    pub report: Option<Report>,

    /// Failure message when the job is in the failed state
    pub error_message: Option<String>,

    pub updated_at: DateTime<Utc>,
}

impl JobRecord {
    /// Fresh record for a newly requested upload.
    pub fn pending(job_id: impl Into<String>, file_extension: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            status: JobStatus::Pending,
            progress_percentage: 0,
            current_step: "Awaiting upload".to_string(),
            file_extension: file_extension.into(),
            transcript: None,
            report: None,
            error_message: None,
            updated_at: Utc::now(),
        }
    }
}
