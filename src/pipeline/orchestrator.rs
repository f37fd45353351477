use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::analysis::AnalysisCoordinator;
use crate::error::PipelineError;
use crate::job::{JobStatus, JobStore};
use crate::storage::BlobStore;
use crate::transcribe::{MediaFormat, RawTranscriptionResult, RemoteJobState, TranscribeError, Transcriber};
use crate::transcript::align_transcript;

/// Tuning knobs for one pipeline instance.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Delay between transcription polls
    pub poll_interval: Duration,

    /// Bound on the total transcription wait
    pub poll_timeout: Duration,

    /// Prefix for remote transcription job names
    pub job_prefix: String,

    /// Key prefix for uploaded audio objects
    pub audio_prefix: String,

    /// Key prefix for the raw transcript audit copies
    pub transcript_prefix: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            poll_timeout: Duration::from_secs(600),
            job_prefix: "transcribe-".to_string(),
            audio_prefix: "audio-uploads/".to_string(),
            transcript_prefix: "transcripts/".to_string(),
        }
    }
}

/// Drives one job end-to-end: transcribe, align, analyze, finalize.
///
/// One pipeline run is the single writer for its job's state record. A failed
/// job is terminal; callers resubmit as a new job.
pub struct Pipeline {
    store: Arc<dyn JobStore>,
    blobs: Arc<dyn BlobStore>,
    transcriber: Arc<dyn Transcriber>,
    coordinator: AnalysisCoordinator,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(
        store: Arc<dyn JobStore>,
        blobs: Arc<dyn BlobStore>,
        transcriber: Arc<dyn Transcriber>,
        coordinator: AnalysisCoordinator,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            blobs,
            transcriber,
            coordinator,
            config,
        }
    }

    /// Storage key for a job's uploaded audio.
    pub fn audio_key(&self, job_id: &str, file_extension: &str) -> String {
        format!("{}{}.{}", self.config.audio_prefix, job_id, file_extension)
    }

    fn transcript_key(&self, job_id: &str) -> String {
        format!("{}{}.json", self.config.transcript_prefix, job_id)
    }

    fn remote_job_name(&self, job_id: &str) -> String {
        format!("{}{}", self.config.job_prefix, job_id)
    }

    /// Run a claimed job. Every error funnels into the failed state here;
    /// nothing is re-raised past the job boundary.
    pub async fn run(&self, job_id: &str, file_extension: &str) {
        if let Err(e) = self.execute(job_id, file_extension).await {
            error!("Error processing job {}: {}", job_id, e);
            self.store.fail(job_id, &e.to_string()).await;
        }
    }

    async fn execute(&self, job_id: &str, file_extension: &str) -> Result<(), PipelineError> {
        self.store
            .set_progress(job_id, JobStatus::Transcribing, 10, "Starting transcription")
            .await;

        let media_key = self.audio_key(job_id, file_extension);
        let media_format = MediaFormat::from_extension(file_extension);
        let job_name = self.remote_job_name(job_id);

        self.transcriber
            .submit(&job_name, &media_key, media_format)
            .await?;

        self.store
            .set_progress(job_id, JobStatus::Transcribing, 20, "Transcription in progress")
            .await;

        self.wait_for_completion(&job_name).await?;

        self.store
            .set_progress(job_id, JobStatus::Transcribing, 50, "Transcription completed")
            .await;

        let raw_bytes = self.transcriber.fetch_result(&job_name).await?;

        // Audit copy goes to storage before parsing so the raw payload
        // survives even if reconstruction fails.
        self.blobs
            .put(&self.transcript_key(job_id), &raw_bytes)
            .await?;

        let raw: RawTranscriptionResult = serde_json::from_slice(&raw_bytes)?;
        let transcript = align_transcript(job_id, &raw);

        self.store.set_transcript(job_id, transcript.clone()).await;
        self.store
            .set_progress(job_id, JobStatus::Analyzing, 60, "Running analysis passes")
            .await;

        let report = self.coordinator.analyze_call(job_id, &transcript).await?;

        self.store.set_report(job_id, report).await;
        self.store
            .set_progress(job_id, JobStatus::Completed, 100, "Analysis complete")
            .await;

        info!("Job {} completed successfully", job_id);
        Ok(())
    }

    /// Wait for the remote transcription job, polling on a fixed interval.
    ///
    /// This is a bounded wait for an in-progress operation, not a retry: it
    /// raises a timeout rather than looping forever, and it holds no store
    /// lock while sleeping.
    async fn wait_for_completion(&self, job_name: &str) -> Result<(), PipelineError> {
        let started = Instant::now();

        loop {
            if started.elapsed() > self.config.poll_timeout {
                return Err(PipelineError::Timeout {
                    secs: self.config.poll_timeout.as_secs(),
                });
            }

            match self.transcriber.poll(job_name).await? {
                RemoteJobState::Completed => {
                    info!("Transcription completed: {}", job_name);
                    return Ok(());
                }
                RemoteJobState::Failed { reason } => {
                    return Err(TranscribeError::JobFailed { reason }.into());
                }
                state => {
                    info!("Transcription status: {:?}. Waiting...", state);
                    tokio::time::sleep(self.config.poll_interval).await;
                }
            }
        }
    }
}
