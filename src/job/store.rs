use std::collections::HashMap;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::types::{JobRecord, JobStatus};
use crate::analysis::Report;
use crate::transcript::Transcript;

/// Why a job could not be claimed for pipeline execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    #[error("job not found")]
    NotFound,

    #[error("job is not pending (status: {status})")]
    NotPending { status: JobStatus },
}

/// Process-wide job state store: single source of truth for status polling.
///
/// The pipeline is the single writer for any given job; polling reads may
/// interleave freely. Implementations must make `try_claim` atomic so a job
/// can never be started twice.
#[async_trait::async_trait]
pub trait JobStore: Send + Sync {
    async fn insert(&self, record: JobRecord);

    async fn get(&self, job_id: &str) -> Option<JobRecord>;

    /// Atomically transition a pending job to transcribing and hand it to the
    /// caller. Rejects unknown jobs and jobs already past pending.
    async fn try_claim(&self, job_id: &str) -> Result<JobRecord, ClaimError>;

    async fn set_progress(&self, job_id: &str, status: JobStatus, progress: u8, step: &str);

    async fn set_transcript(&self, job_id: &str, transcript: Transcript);

    async fn set_report(&self, job_id: &str, report: Report);

    /// Mark the job failed: progress resets to 0 and the message is recorded.
    /// Any transcript or report stored earlier in the run stays visible.
    async fn fail(&self, job_id: &str, message: &str);
}

/// In-memory store backed by a single coarse lock over the job map.
///
/// Records are retained for the process lifetime; there is no eviction.
#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<String, JobRecord>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn update<F>(&self, job_id: &str, apply: F)
    where
        F: FnOnce(&mut JobRecord),
    {
        let mut jobs = self.jobs.write().await;
        match jobs.get_mut(job_id) {
            Some(record) => {
                apply(record);
                record.updated_at = Utc::now();
            }
            None => warn!("Update for unknown job {}", job_id),
        }
    }
}

#[async_trait::async_trait]
impl JobStore for InMemoryJobStore {
    async fn insert(&self, record: JobRecord) {
        let mut jobs = self.jobs.write().await;
        jobs.insert(record.job_id.clone(), record);
    }

    async fn get(&self, job_id: &str) -> Option<JobRecord> {
        let jobs = self.jobs.read().await;
        jobs.get(job_id).cloned()
    }

    async fn try_claim(&self, job_id: &str) -> Result<JobRecord, ClaimError> {
        let mut jobs = self.jobs.write().await;

        let record = jobs.get_mut(job_id).ok_or(ClaimError::NotFound)?;

        if record.status != JobStatus::Pending {
            return Err(ClaimError::NotPending {
                status: record.status,
            });
        }

        record.status = JobStatus::Transcribing;
        record.progress_percentage = 10;
        record.current_step = "Starting transcription".to_string();
        record.updated_at = Utc::now();

        Ok(record.clone())
    }

    async fn set_progress(&self, job_id: &str, status: JobStatus, progress: u8, step: &str) {
        info!("Job {}: {} - {} ({}%)", job_id, status, step, progress);

        self.update(job_id, |record| {
            record.status = status;
            record.progress_percentage = progress;
            record.current_step = step.to_string();
        })
        .await;
    }

    async fn set_transcript(&self, job_id: &str, transcript: Transcript) {
        self.update(job_id, |record| {
            record.transcript = Some(transcript);
        })
        .await;
    }

    async fn set_report(&self, job_id: &str, report: Report) {
        self.update(job_id, |record| {
            record.report = Some(report);
        })
        .await;
    }

    async fn fail(&self, job_id: &str, message: &str) {
        info!("Job {}: failed - {}", job_id, message);

        self.update(job_id, |record| {
            record.status = JobStatus::Failed;
            record.progress_percentage = 0;
            record.current_step = "Processing failed".to_string();
            record.error_message = Some(message.to_string());
        })
        .await;
    }
}
