use thiserror::Error;

use crate::llm::LlmError;
use crate::storage::StorageError;
use crate::transcribe::TranscribeError;

/// Everything that can fail a job.
///
/// External-service errors and timeouts fail the job without retry; malformed
/// model output never reaches here (it degrades inside the analysis passes).
/// `EmptyTranscript` is a contract violation caught before analysis starts.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("transcription service error: {0}")]
    Transcribe(#[from] TranscribeError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("language model error: {0}")]
    Llm(#[from] LlmError),

    #[error("transcription job timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("transcription result is not valid JSON: {0}")]
    MalformedResult(#[from] serde_json::Error),

    #[error("transcript is empty - cannot run analysis")]
    EmptyTranscript,
}
