use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Media formats the transcription engine accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaFormat {
    Mp3,
    Wav,
    Ogg,
    Webm,
    M4a,
}

impl MediaFormat {
    /// Derive the format from a file extension. Unrecognized extensions fall
    /// back to mp3, matching the engine's most permissive decoder.
    pub fn from_extension(ext: &str) -> Self {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "wav" => Self::Wav,
            "ogg" => Self::Ogg,
            "webm" => Self::Webm,
            "m4a" => Self::M4a,
            _ => Self::Mp3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Ogg => "ogg",
            Self::Webm => "webm",
            Self::M4a => "m4a",
        }
    }
}

/// State of a remote transcription job as reported by polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteJobState {
    Queued,
    InProgress,
    Completed,
    Failed { reason: String },
}

#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("transcription request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("transcription failed: {reason}")]
    JobFailed { reason: String },

    #[error("transcription service returned HTTP {status} for job {job_name}")]
    Unexpected { job_name: String, status: u16 },
}

/// External speech-to-text engine, consumed as submit / poll / fetch.
#[async_trait::async_trait]
pub trait Transcriber: Send + Sync {
    /// Submit a transcription job for an already-uploaded media object.
    async fn submit(
        &self,
        job_name: &str,
        media_key: &str,
        format: MediaFormat,
    ) -> Result<(), TranscribeError>;

    /// Report the remote job's current state.
    async fn poll(&self, job_name: &str) -> Result<RemoteJobState, TranscribeError>;

    /// Fetch the raw result payload of a completed job, verbatim.
    async fn fetch_result(&self, job_name: &str) -> Result<Vec<u8>, TranscribeError>;
}

#[derive(Serialize)]
struct SubmitRequest<'a> {
    job_name: &'a str,
    media_key: &'a str,
    media_format: MediaFormat,
    language_code: &'a str,
    show_speaker_labels: bool,
    max_speaker_labels: u8,
}

#[derive(Deserialize)]
struct RemoteJobStatus {
    status: String,
    #[serde(default)]
    failure_reason: Option<String>,
}

/// REST client for the transcription engine.
pub struct HttpTranscriber {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTranscriber {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn job_url(&self, job_name: &str) -> String {
        format!("{}/jobs/{}", self.base_url, job_name)
    }
}

#[async_trait::async_trait]
impl Transcriber for HttpTranscriber {
    async fn submit(
        &self,
        job_name: &str,
        media_key: &str,
        format: MediaFormat,
    ) -> Result<(), TranscribeError> {
        info!("Submitting transcription job {} for {}", job_name, media_key);

        let body = SubmitRequest {
            job_name,
            media_key,
            media_format: format,
            language_code: "en-US",
            show_speaker_labels: true,
            max_speaker_labels: 2,
        };

        let response = self
            .client
            .post(format!("{}/jobs", self.base_url))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TranscribeError::Unexpected {
                job_name: job_name.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }

    async fn poll(&self, job_name: &str) -> Result<RemoteJobState, TranscribeError> {
        let response = self.client.get(self.job_url(job_name)).send().await?;

        if !response.status().is_success() {
            return Err(TranscribeError::Unexpected {
                job_name: job_name.to_string(),
                status: response.status().as_u16(),
            });
        }

        let status: RemoteJobStatus = response.json().await?;

        let state = match status.status.as_str() {
            "COMPLETED" => RemoteJobState::Completed,
            "FAILED" => RemoteJobState::Failed {
                reason: status
                    .failure_reason
                    .unwrap_or_else(|| "Unknown".to_string()),
            },
            "IN_PROGRESS" => RemoteJobState::InProgress,
            _ => RemoteJobState::Queued,
        };

        Ok(state)
    }

    async fn fetch_result(&self, job_name: &str) -> Result<Vec<u8>, TranscribeError> {
        let response = self
            .client
            .get(format!("{}/result", self.job_url(job_name)))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TranscribeError::Unexpected {
                job_name: job_name.to_string(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}
